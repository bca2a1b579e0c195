//! API error type
//!
//! Every failure is answered with the flat `{success: false, message}`
//! body the storefront expects.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::{CloudError, ErrorBody, OrderValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a well-formed order
    #[error("Invalid order: {0}")]
    BadRequest(String),

    /// Order is well-formed but not printable
    #[error("Invalid order: {0}")]
    Validation(#[from] OrderValidationError),

    /// Id allocation failed
    #[error("Failed to process order : {0}")]
    Io(#[from] std::io::Error),

    /// Upload failed
    #[error("Failed to process order : {0}")]
    Cloud(#[from] CloudError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) | Self::Cloud(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Order processing failed");
        } else {
            tracing::warn!(error = %self, "Order rejected");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
