//! Error types for the clinic server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation error: {0}")]
    Validation(String),

    /// More than one reference row shares a natural key.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A concurrent unit of work committed the same natural key first.
    #[error("{entity} with key {key} was created concurrently")]
    DuplicateKeyRace { entity: &'static str, key: String },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Database(err)
    }
}

impl From<clinic_paging::Error> for Error {
    fn from(err: clinic_paging::Error) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            })
            .collect();
        fields.sort();
        Error::Validation(fields.join("; "))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Missing entities answer with a bare 404.
            Error::NotFound { .. } => return StatusCode::NOT_FOUND.into_response(),
            Error::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::DuplicateKeyRace { .. } => (StatusCode::CONFLICT, self.to_string()),
            Error::Database(_)
            | Error::InvariantViolation(_)
            | Error::Internal(_)
            | Error::Other(_) => {
                tracing::error!(error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        }));

        (status, body).into_response()
    }
}
