//! API response bodies
//!
//! The storefront reads a flat `{success, ...}` object rather than an
//! envelope:
//! ```json
//! { "success": true, "order_id": 12, "file_name": "order_12.txt", "url": "..." }
//! { "success": false, "message": "..." }
//! ```

use serde::{Deserialize, Serialize};

/// `POST /submit_order` success body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSubmitted {
    pub success: bool,
    pub order_id: u64,
    pub file_name: String,
    pub url: String,
}

impl OrderSubmitted {
    pub fn new(order_id: u64, file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            success: true,
            order_id,
            file_name: file_name.into(),
            url: url.into(),
        }
    }
}

/// Failure body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `GET /health` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
