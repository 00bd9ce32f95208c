use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fiordispino_core::ApiError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Token is required")]
    MissingToken,

    #[error("Invalid auth action")]
    InvalidAction,

    #[error(transparent)]
    Backend(#[from] ApiError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) | AppError::MissingToken | AppError::InvalidAction => {
                StatusCode::BAD_REQUEST
            }
            AppError::Backend(e) => match e {
                ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
                ApiError::Unauthorized(_) | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                ApiError::Connection(_)
                | ApiError::Status { .. }
                | ApiError::InvalidRequest(_)
                | ApiError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Backend call failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
