use crate::error::ApiError;

pub mod ads;
pub mod api;
pub mod articles;
pub mod auth;

/// Everything mounted under `/api`.
pub fn routes() -> Vec<rocket::Route> {
    let mut all = api::routes();
    all.extend(articles::routes());
    all.extend(ads::routes());
    all.extend(auth::routes());
    all
}

/// Path ids arrive as raw segments so malformed ones get a 400 instead of a 404.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation("ID inválido."))
}

/// Query values that are present but empty are treated as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
    }
}
