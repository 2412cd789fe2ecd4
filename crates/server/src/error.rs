//! API errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

/// An error returned to an API client as `{ "error": message }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The addressed record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The request is missing something the caller must supply
    #[error("{0}")]
    BadRequest(String),

    /// Anything else; the message is generic and the cause is only logged
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// `404` with `message`, logged at warn level.
    pub fn not_found(message: &str) -> Self {
        warn!("{}", message);
        ApiError::NotFound(message.to_string())
    }

    /// Map any failure to a generic `500`, logging the cause.
    ///
    /// ```ignore
    /// storage.save_task(&task).await.map_err(ApiError::internal("Failed to create task"))?;
    /// ```
    pub fn internal<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> ApiError {
        move |cause| {
            error!("{}: {}", message, cause);
            ApiError::Internal(message.to_string())
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
