use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::json;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every handler failure ends up as one of these. The message is what the
/// client sees; internal causes stay in the server log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Logs `source` and hides it behind a generic `message`.
    pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        let message = message.into();
        let source = source.into();
        log::error!("{}: {}", message, source);
        ApiError::Internal { message, source }
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::Unauthorized(_) => Status::Unauthorized,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Internal { .. } => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        (self.status(), Json(json!({ "error": self.to_string() }))).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::validation("x").status(), Status::BadRequest);
        assert_eq!(ApiError::unauthorized("x").status(), Status::Unauthorized);
        assert_eq!(ApiError::not_found("x").status(), Status::NotFound);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        assert_eq!(
            ApiError::internal("Erro interno.", io).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn internal_message_hides_the_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "/var/secret/path");
        let err = ApiError::internal("Erro ao criar notícia.", io);
        assert_eq!(err.to_string(), "Erro ao criar notícia.");
    }
}
