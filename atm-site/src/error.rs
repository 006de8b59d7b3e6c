//! Error types for atm-site
//!
//! HTML handlers return [`SiteError`], JSON API handlers return [`ApiError`].
//! Form validation failures are not errors on the HTML side: the form is
//! rendered again with its messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::form::FormErrors;
use crate::pages;

/// HTML page error
#[derive(Debug, Error)]
pub enum SiteError {
    /// Record not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// atm-common error
    #[error("Common error: {0}")]
    Common(#[from] atm_common::Error),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        match self {
            SiteError::NotFound(what) => {
                (StatusCode::NOT_FOUND, pages::not_found(&what)).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, pages::server_error()).into_response()
            }
        }
    }
}

/// Result type for HTML handlers
pub type SiteResult<T> = Result<T, SiteError>;

/// JSON API error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Caller lacks the administrator role (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Field validation failed (400)
    #[error("Validation failed")]
    Validation(FormErrors),

    /// Malformed request body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// atm-common error
    #[error("Common error: {0}")]
    Common(#[from] atm_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            // Field errors go back as a bare field map
            ApiError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors.to_json())).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
            ApiError::Database(ref err) => {
                error!("API database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    err.to_string(),
                )
            }
            ApiError::Common(ref err) => {
                error!("API error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON_ERROR",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::NotFound(what) => ApiError::NotFound(what),
            SiteError::Database(e) => ApiError::Database(e),
            SiteError::Common(e) => ApiError::Common(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_errors_map_to_status() {
        let response = SiteError::NotFound("Band 9".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let hashing = atm_common::Error::PasswordHash("invalid salt".into());
        let response = SiteError::from(hashing).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_site_error_converts_to_api_error() {
        let api = ApiError::from(SiteError::NotFound("Genre 3".into()));
        assert!(matches!(api, ApiError::NotFound(ref what) if what == "Genre 3"));

        let config = atm_common::Error::Config("bad".into());
        let api = ApiError::from(SiteError::from(config));
        assert_eq!(api.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
