use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use thiserror::Error;

/// The fixed set of topics articles and ads are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Geral,
    Tecnologia,
    Politica,
    Economia,
    Empreendedorismo,
    Bolsas,
    Cursos,
    Carreira,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Geral,
        Category::Tecnologia,
        Category::Politica,
        Category::Economia,
        Category::Empreendedorismo,
        Category::Bolsas,
        Category::Cursos,
        Category::Carreira,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Geral => "geral",
            Category::Tecnologia => "tecnologia",
            Category::Politica => "politica",
            Category::Economia => "economia",
            Category::Empreendedorismo => "empreendedorismo",
            Category::Bolsas => "bolsas",
            Category::Cursos => "cursos",
            Category::Carreira => "carreira",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_listed_category() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>(), Ok(c));
        }
    }

    #[test]
    fn rejects_unknown_and_differently_cased_values() {
        assert!("esportes".parse::<Category>().is_err());
        assert!("Tecnologia".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Empreendedorismo).unwrap(),
            "\"empreendedorismo\""
        );
    }
}
