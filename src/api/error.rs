use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::services::CatalogError;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    TmdbUnavailable(String),

    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    InvalidArgument(String),

    Conflict(String),

    EndpointNotFound,

    DatabaseError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::TmdbUnavailable(msg) => write!(f, "TMDB unavailable: {}", msg),
            ApiError::Validation { message, .. } => write!(f, "Validation error: {}", message),
            ApiError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::EndpointNotFound => write!(f, "Endpoint not found"),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CatalogError::Tmdb(e) => ApiError::TmdbUnavailable(e.to_string()),
            CatalogError::Conflict(msg) => ApiError::Conflict(msg),
            CatalogError::Database(e) => ApiError::DatabaseError(e.to_string()),
        }
    }
}

/// Status, label, client-facing message and field errors for one
/// error. Internal detail is logged here and never leaves the process.
struct ErrorParts {
    status: StatusCode,
    error: &'static str,
    message: String,
    field_errors: Option<HashMap<String, String>>,
}

impl ApiError {
    fn into_parts(self) -> ErrorParts {
        let (status, error, message, field_errors) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Resource not found", msg, None),
            ApiError::TmdbUnavailable(msg) => {
                tracing::warn!("TMDB request failed: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "TMDB API error", msg, None)
            }
            ApiError::Validation {
                message,
                field_errors,
            } => (
                StatusCode::BAD_REQUEST,
                "Validation failed",
                message,
                Some(field_errors),
            ),
            ApiError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "Invalid argument", msg, None)
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg, None),
            ApiError::EndpointNotFound => (
                StatusCode::NOT_FOUND,
                "Endpoint not found",
                "The requested endpoint does not exist".to_string(),
                None,
            ),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };
        ErrorParts {
            status,
            error,
            message,
            field_errors,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let parts = self.into_parts();
        let status = parts.status;
        // the envelope middleware fills in path and method
        let mut response = status.into_response();
        response.extensions_mut().insert(PendingError(parts));
        response
    }
}

struct PendingError(ErrorParts);

impl Clone for PendingError {
    fn clone(&self) -> Self {
        Self(ErrorParts {
            status: self.0.status,
            error: self.0.error,
            message: self.0.message.clone(),
            field_errors: self.0.field_errors.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    timestamp: String,
    status: u16,
    error: &'static str,
    message: String,
    path: String,
    method: String,
    #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
    field_errors: Option<HashMap<String, String>>,
}

/// Wraps every error response in the common envelope. Runs outermost
/// so it sees the request path and method that handlers no longer have.
pub async fn error_envelope(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().to_string();

    let mut response = next.run(request).await;

    let Some(PendingError(parts)) = response.extensions_mut().remove::<PendingError>() else {
        return response;
    };

    let body = ErrorBody {
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        status: parts.status.as_u16(),
        error: parts.error,
        message: parts.message,
        path,
        method,
        field_errors: parts.field_errors,
    };
    (parts.status, Json(body)).into_response()
}

/// Fallback for unmatched routes, shaped like every other error.
pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_statuses() {
        let parts = ApiError::from(CatalogError::Conflict("dup".to_string())).into_parts();
        assert_eq!(parts.status, StatusCode::CONFLICT);
        assert_eq!(parts.error, "Conflict");

        let parts = ApiError::from(CatalogError::Tmdb(
            crate::clients::tmdb::TmdbError::Unavailable("timeout".to_string()),
        ))
        .into_parts();
        assert_eq!(parts.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(parts.error, "TMDB API error");
    }

    #[test]
    fn internal_errors_hide_detail() {
        let parts = ApiError::DatabaseError("disk I/O error".to_string()).into_parts();
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parts.message, "An unexpected error occurred");
    }

    #[test]
    fn validation_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("title".to_string(), "Title is required".to_string());
        let parts = ApiError::Validation {
            message: "The submitted data is not valid".to_string(),
            field_errors: fields,
        }
        .into_parts();
        assert_eq!(parts.status, StatusCode::BAD_REQUEST);
        assert!(parts.field_errors.unwrap().contains_key("title"));
    }
}
