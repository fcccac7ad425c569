use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::dispatcher::DispatchError;

/// Everything a handler can fail with, mapped onto a status and JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("unauthenticated")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("content source not configured")]
    ContentUnavailable,
    #[error("content source failed")]
    Content(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Operation errors keep the `{result}` shape the editor reads.
            // Upstream failures never get here: `Dispatcher::respond` answers them.
            ApiError::Dispatch(e) => {
                tracing::debug!(error = %e, "rejected operation request");
                (StatusCode::BAD_REQUEST, Json(json!({ "result": e.to_string() }))).into_response()
            }
            ApiError::Unauthorized => error_response(StatusCode::UNAUTHORIZED, &self),
            ApiError::NotFound => error_response(StatusCode::NOT_FOUND, &self),
            ApiError::ContentUnavailable => error_response(StatusCode::SERVICE_UNAVAILABLE, &self),
            ApiError::Content(ref e) => {
                tracing::error!(error = %format!("{e:#}"), "content fetch failed");
                error_response(StatusCode::BAD_GATEWAY, &self)
            }
            ApiError::Internal(ref e) => {
                tracing::error!(error = %format!("{e:#}"), "internal error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &self)
            }
        }
    }
}

fn error_response(status: StatusCode, error: &ApiError) -> Response {
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
