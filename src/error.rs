use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the action boundary. Every variant renders as an inline
/// JSON error; none of them end the session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    AuthFailure,

    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Record already exists")]
    ConstraintViolation(String),

    #[error("Employee is unknown or still has attendance records")]
    ReferentialIntegrity(String),

    #[error("Database is unavailable, try again later")]
    Connectivity(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Internal Server Error")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Detail shown next to the generic message; `None` where nothing may leak.
    fn details(&self) -> Option<&str> {
        match self {
            AppError::ConstraintViolation(d) | AppError::ReferentialIntegrity(d) => Some(d),
            _ => None,
        }
    }
}

// Postgres SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) => {
                let detail = db_err.message().to_string();
                match db_err.code().as_deref() {
                    Some(UNIQUE_VIOLATION) => AppError::ConstraintViolation(detail),
                    Some(FOREIGN_KEY_VIOLATION) => AppError::ReferentialIntegrity(detail),
                    Some(NOT_NULL_VIOLATION) => AppError::validation("record", detail),
                    _ => AppError::Internal(e.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => AppError::Connectivity(e.to_string()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthFailure => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::ConstraintViolation(_) | AppError::ReferentialIntegrity(_) => {
                StatusCode::CONFLICT
            }
            AppError::Connectivity(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Connectivity(e) | AppError::Internal(e) => {
                tracing::error!(error = %e, "Store failure");
            }
            _ => {}
        }

        let body = match (self, self.details()) {
            (AppError::Validation { field, message }, _) => json!({
                "error": message,
                "field": field,
            }),
            (_, Some(details)) => json!({ "error": self.to_string(), "details": details }),
            (_, None) => json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
