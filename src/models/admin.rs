use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{DbPool, DbResult};

#[derive(Debug, Serialize, Clone)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl Admin {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Admin {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn find_by_username(pool: &DbPool, username: &str) -> DbResult<Option<Self>> {
        let conn = pool.get()?;
        let admin = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM admins WHERE username = ?1",
                params![username],
                Self::from_row,
            )
            .optional()?;
        Ok(admin)
    }

    pub fn create(pool: &DbPool, username: &str, password_hash: &str) -> DbResult<i64> {
        let conn = pool.get()?;
        conn.execute(
            "INSERT INTO admins (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
