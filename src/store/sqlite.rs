use chrono::{Duration, Utc};
use rusqlite::{params, OptionalExtension};

use super::{new_token, Session, SessionStore};
use crate::db::{DbPool, DbResult};

pub struct SqliteSessionStore {
    pool: DbPool,
    ttl: Duration,
}

impl SqliteSessionStore {
    pub fn new(pool: DbPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }
}

impl SessionStore for SqliteSessionStore {
    fn create(&self, admin_id: i64, username: &str) -> DbResult<Session> {
        let conn = self.pool.get()?;
        let now = Utc::now().naive_utc();
        let session = Session {
            token: new_token(),
            admin_id,
            username: username.to_string(),
            expires_at: now + self.ttl,
        };

        conn.execute(
            "INSERT INTO sessions (token, admin_id, username, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.token,
                session.admin_id,
                session.username,
                now,
                session.expires_at
            ],
        )?;

        Ok(session)
    }

    fn get(&self, token: &str) -> DbResult<Option<Session>> {
        let conn = self.pool.get()?;
        let now = Utc::now().naive_utc();
        let session = conn
            .query_row(
                "SELECT token, admin_id, username, expires_at FROM sessions
                 WHERE token = ?1 AND expires_at > ?2",
                params![token, now],
                |row| {
                    Ok(Session {
                        token: row.get(0)?,
                        admin_id: row.get(1)?,
                        username: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    fn destroy(&self, token: &str) -> DbResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    fn purge_expired(&self) -> DbResult<usize> {
        let conn = self.pool.get()?;
        let now = Utc::now().naive_utc();
        let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
        Ok(removed)
    }
}
