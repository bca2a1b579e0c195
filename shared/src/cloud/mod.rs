//! Cloud storage and orders table
//!
//! The server uploads rendered tickets and inserts an order row; the
//! print client downloads tickets by name. Both talk to the cloud through
//! [`OrderCloud`] so tests can swap in [`MemoryCloud`].

mod memory;
mod supabase;

pub use memory::MemoryCloud;
pub use supabase::SupabaseClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default table receiving one row per order
pub const DEFAULT_ORDERS_TABLE: &str = "orders";

/// Cloud access errors
#[derive(Debug, Error)]
pub enum CloudError {
    /// Object does not exist (yet)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success status from the cloud API
    #[error("Cloud request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure
    #[error("Cloud request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Missing or invalid settings
    #[error("Cloud configuration error: {0}")]
    Config(String),
}

impl CloudError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type CloudResult<T> = Result<T, CloudError>;

/// Row inserted into the orders table; realtime subscribers receive it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: u64,
    pub status: String,
}

impl OrderRecord {
    pub fn new_order(id: u64) -> Self {
        Self {
            id,
            status: "new".to_string(),
        }
    }
}

/// Connection settings
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Project URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Service key, sent as bearer token and `apikey`
    pub key: String,
    pub bucket: String,
    pub orders_table: String,
}

impl CloudConfig {
    /// Load from environment variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | SUPABASE_URL | required |
    /// | SUPABASE_KEY | required |
    /// | BUCKET_NAME | required |
    /// | ORDERS_TABLE | orders |
    pub fn from_env() -> CloudResult<Self> {
        Ok(Self {
            url: required_env("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            key: required_env("SUPABASE_KEY")?,
            bucket: required_env("BUCKET_NAME")?,
            orders_table: std::env::var("ORDERS_TABLE")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_ORDERS_TABLE.to_string()),
        })
    }
}

fn required_env(name: &str) -> CloudResult<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CloudError::Config(format!("{} is not set", name)))
}

/// Object storage + orders table
#[async_trait]
pub trait OrderCloud: Send + Sync {
    /// Store `bytes` under `file_name` and return its public URL
    async fn upload(&self, file_name: &str, bytes: Vec<u8>, content_type: &str)
    -> CloudResult<String>;

    /// Fetch an object; [`CloudError::NotFound`] if it does not exist
    async fn download(&self, file_name: &str) -> CloudResult<Vec<u8>>;

    /// Insert one row into the orders table
    async fn insert_order(&self, record: &OrderRecord) -> CloudResult<()>;
}
