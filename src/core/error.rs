use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0:?}")]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Wire format for failures: `{message}` for most errors, `{errors: [..]}`
/// for field-level validation failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl ErrorBody {
    fn message(message: String) -> Self {
        Self {
            message: Some(message),
            errors: None,
        }
    }

    fn errors(errors: Vec<String>) -> Self {
        Self {
            message: None,
            errors: Some(errors),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message("Internal server error".to_string()),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::message(msg)),
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, ErrorBody::errors(errors)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::message(msg)),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message("Internal server error".to_string()),
                )
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorBody::message(msg)),
            // Duplicate unique keys answer 400, not 409: the register
            // contract treats a taken email as a plain bad request.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, ErrorBody::message(msg)),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn conflict_maps_to_bad_request() {
        let response = AppError::Conflict("User already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_error_hides_cause() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_collect_field_messages() {
        #[derive(validator::Validate)]
        struct Probe {
            #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
            password: String,
        }
        let probe = Probe {
            password: "short".to_string(),
        };
        let err: AppError = validator::Validate::validate(&probe).unwrap_err().into();
        match err {
            AppError::Validation(messages) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("password"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
