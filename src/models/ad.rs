use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::category::Category;
use super::non_blank;
use crate::db::{DbPool, DbResult};
use crate::error::ApiError;

pub const DEFAULT_KIND: &str = "patrocinador";
pub const DEFAULT_WEIGHT: i64 = 100;

#[derive(Debug, Serialize, Clone)]
pub struct Ad {
    pub id: i64,
    pub slot: String,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "texto")]
    pub text: Option<String>,
    pub href: Option<String>,
    #[serde(rename = "imagem")]
    pub image: Option<String>,
    /// `None` means the ad runs under every category.
    #[serde(rename = "categoria")]
    pub category: Option<Category>,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "peso")]
    pub weight: i64,
    pub adsense_slot: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, Clone)]
pub struct AdInput {
    pub slot: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub href: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub weight: Option<String>,
    pub adsense_slot: Option<String>,
    pub active: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAd {
    pub slot: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub href: Option<String>,
    pub category: Option<Category>,
    pub kind: String,
    pub weight: i64,
    pub adsense_slot: Option<String>,
    pub active: bool,
}

impl AdInput {
    pub fn validate(self) -> Result<NewAd, ApiError> {
        let slot = non_blank(self.slot).ok_or_else(|| ApiError::validation("slot é obrigatório."))?;

        let category = match non_blank(self.category) {
            Some(raw) => Some(
                raw.parse::<Category>()
                    .map_err(|_| ApiError::validation("Categoria inválida."))?,
            ),
            None => None,
        };

        let active = match non_blank(self.active) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| ApiError::validation("Valor de ativo inválido."))?,
            None => true,
        };

        Ok(NewAd {
            slot,
            title: non_blank(self.title),
            text: non_blank(self.text),
            href: non_blank(self.href),
            category,
            kind: non_blank(self.kind).unwrap_or_else(|| DEFAULT_KIND.to_string()),
            weight: parse_weight(self.weight.as_deref()),
            adsense_slot: non_blank(self.adsense_slot),
            active,
        })
    }
}

/// Any finite number is accepted and rounded. A field that is sent but blank
/// counts as 0; a missing or non-numeric one means the default.
pub fn parse_weight(raw: Option<&str>) -> i64 {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_WEIGHT;
    };
    if raw.is_empty() {
        return 0;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && w.abs() <= i64::MAX as f64)
        .map(|w| w.round() as i64)
        .unwrap_or(DEFAULT_WEIGHT)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl Ad {
    const SELECT_COLS: &'static str = "id, slot, title, text, href, image, category, kind, weight, adsense_slot, active, created_at";

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Ad {
            id: row.get("id")?,
            slot: row.get("slot")?,
            title: row.get("title")?,
            text: row.get("text")?,
            href: row.get("href")?,
            image: row.get("image")?,
            category: row.get("category")?,
            kind: row.get("kind")?,
            weight: row.get("weight")?,
            adsense_slot: row.get("adsense_slot")?,
            active: row.get("active")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Picks the single best active ad for `slot`.
    ///
    /// With a category, only ads targeting that category or no category at
    /// all qualify, and an exact match outranks a global ad before weight is
    /// considered. Then: heavier first, newer first, higher id first.
    pub fn select(pool: &DbPool, slot: &str, category: Option<&str>) -> DbResult<Option<Self>> {
        let conn = pool.get()?;
        let ad = match category {
            Some(c) => conn
                .query_row(
                    &format!(
                        "SELECT {} FROM ads
                         WHERE active = 1 AND slot = ?1
                           AND (category IS NULL OR category = ?2)
                         ORDER BY CASE WHEN category = ?2 THEN 0 ELSE 1 END,
                                  weight DESC, created_at DESC, id DESC
                         LIMIT 1",
                        Self::SELECT_COLS
                    ),
                    params![slot, c],
                    Self::from_row,
                )
                .optional()?,
            None => conn
                .query_row(
                    &format!(
                        "SELECT {} FROM ads
                         WHERE active = 1 AND slot = ?1
                         ORDER BY weight DESC, created_at DESC, id DESC
                         LIMIT 1",
                        Self::SELECT_COLS
                    ),
                    params![slot],
                    Self::from_row,
                )
                .optional()?,
        };
        Ok(ad)
    }

    pub fn list_all(pool: &DbPool) -> DbResult<Vec<Self>> {
        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM ads ORDER BY created_at DESC, id DESC",
            Self::SELECT_COLS
        ))?;
        let ads = stmt
            .query_map([], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ads)
    }

    pub fn create(pool: &DbPool, form: &NewAd, image: Option<&str>) -> DbResult<Self> {
        let conn = pool.get()?;
        let now = Utc::now().naive_utc();

        conn.execute(
            "INSERT INTO ads (slot, title, text, href, image, category, kind, weight, adsense_slot, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                form.slot,
                form.title,
                form.text,
                form.href,
                image,
                form.category,
                form.kind,
                form.weight,
                form.adsense_slot,
                form.active,
                now,
            ],
        )?;

        let ad = conn.query_row(
            &format!("SELECT {} FROM ads WHERE id = ?1", Self::SELECT_COLS),
            params![conn.last_insert_rowid()],
            Self::from_row,
        )?;
        Ok(ad)
    }

    /// Returns whether a row was removed.
    pub fn delete(pool: &DbPool, id: i64) -> DbResult<bool> {
        let conn = pool.get()?;
        let removed = conn.execute("DELETE FROM ads WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_defaults_when_missing_or_not_finite() {
        assert_eq!(parse_weight(None), DEFAULT_WEIGHT);
        assert_eq!(parse_weight(Some("abc")), DEFAULT_WEIGHT);
        assert_eq!(parse_weight(Some("inf")), DEFAULT_WEIGHT);
        assert_eq!(parse_weight(Some("NaN")), DEFAULT_WEIGHT);
    }

    #[test]
    fn blank_weight_is_zero() {
        assert_eq!(parse_weight(Some("")), 0);
        assert_eq!(parse_weight(Some("   ")), 0);
    }

    #[test]
    fn weight_accepts_numbers() {
        assert_eq!(parse_weight(Some("250")), 250);
        assert_eq!(parse_weight(Some(" 0 ")), 0);
        assert_eq!(parse_weight(Some("-5")), -5);
        assert_eq!(parse_weight(Some("12.6")), 13);
    }

    #[test]
    fn validate_applies_defaults() {
        let ad = AdInput {
            slot: Some("sidebar".into()),
            title: Some("".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(ad.kind, DEFAULT_KIND);
        assert_eq!(ad.weight, DEFAULT_WEIGHT);
        assert!(ad.active);
        assert!(ad.category.is_none());
        assert!(ad.title.is_none());
    }

    #[test]
    fn validate_requires_slot_and_known_category() {
        let err = AdInput::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "slot é obrigatório.");

        let err = AdInput {
            slot: Some("topo".into()),
            category: Some("esportes".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Categoria inválida.");
    }

    #[test]
    fn validate_parses_active_flag() {
        let ad = AdInput {
            slot: Some("topo".into()),
            active: Some("off".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(!ad.active);

        let err = AdInput {
            slot: Some("topo".into()),
            active: Some("maybe".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Valor de ativo inválido.");
    }
}
