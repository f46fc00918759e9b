use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::category::Category;
use super::non_blank;
use crate::db::{DbPool, DbResult};
use crate::error::ApiError;

#[derive(Debug, Serialize, Clone)]
pub struct Article {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumo")]
    pub summary: String,
    #[serde(rename = "conteudo")]
    pub body: String,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "imagem")]
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Raw submission, as it arrives from the admin form.
#[derive(Debug, Default, Clone)]
pub struct ArticleInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
}

/// A submission that passed validation and may be written.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub category: Category,
}

impl ArticleInput {
    pub fn validate(self) -> Result<NewArticle, ApiError> {
        let (Some(title), Some(summary), Some(body), Some(category)) = (
            non_blank(self.title),
            non_blank(self.summary),
            non_blank(self.body),
            non_blank(self.category),
        ) else {
            return Err(ApiError::validation("Campos obrigatórios faltando."));
        };

        let category = category
            .parse()
            .map_err(|_| ApiError::validation("Categoria inválida."))?;

        Ok(NewArticle {
            title,
            summary,
            body,
            category,
        })
    }
}

impl Article {
    const SELECT_COLS: &'static str = "id, title, summary, body, category, image, created_at";

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Article {
            id: row.get("id")?,
            title: row.get("title")?,
            summary: row.get("summary")?,
            body: row.get("body")?,
            category: row.get("category")?,
            image: row.get("image")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Newest first. No pagination.
    pub fn list(pool: &DbPool, category: Option<Category>) -> DbResult<Vec<Self>> {
        let conn = pool.get()?;
        let rows = match category {
            Some(c) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM articles WHERE category = ?1 ORDER BY created_at DESC, id DESC",
                    Self::SELECT_COLS
                ))?;
                let rows = stmt
                    .query_map(params![c], Self::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM articles ORDER BY created_at DESC, id DESC",
                    Self::SELECT_COLS
                ))?;
                let rows = stmt
                    .query_map([], Self::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };
        Ok(rows)
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> DbResult<Option<Self>> {
        let conn = pool.get()?;
        let article = conn
            .query_row(
                &format!("SELECT {} FROM articles WHERE id = ?1", Self::SELECT_COLS),
                params![id],
                Self::from_row,
            )
            .optional()?;
        Ok(article)
    }

    /// Inserts and returns the stored row, including its id and timestamp.
    pub fn create(pool: &DbPool, form: &NewArticle, image: Option<&str>) -> DbResult<Self> {
        let conn = pool.get()?;
        let now = Utc::now().naive_utc();

        conn.execute(
            "INSERT INTO articles (title, summary, body, category, image, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![form.title, form.summary, form.body, form.category, image, now],
        )?;

        let article = conn.query_row(
            &format!("SELECT {} FROM articles WHERE id = ?1", Self::SELECT_COLS),
            params![conn.last_insert_rowid()],
            Self::from_row,
        )?;
        Ok(article)
    }

    /// Returns whether a row was removed.
    pub fn delete(pool: &DbPool, id: i64) -> DbResult<bool> {
        let conn = pool.get()?;
        let removed = conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
