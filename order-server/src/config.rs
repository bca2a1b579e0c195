use shared::OrderFileNaming;
use shared::naming::{DEFAULT_EXT, DEFAULT_PREFIX};
use std::path::PathBuf;

/// order-server settings, read from the environment
///
/// Cloud credentials are loaded separately through
/// [`shared::CloudConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub http_port: u16,
    /// Directory holding `last_id.txt`
    pub orders_path: PathBuf,
    /// Ticket width in characters
    pub paper_width: usize,
    /// Currency label printed after amounts
    pub currency: String,
    /// Ticket header
    pub restaurant_name: String,
    /// Uploaded document naming
    pub naming: OrderFileNaming,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            orders_path: std::env::var("ORDERS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("orders")),
            paper_width: std::env::var("PAPER_WIDTH")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|w: &usize| *w >= 24)
                .unwrap_or(48),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "EGP".to_string()),
            restaurant_name: std::env::var("RESTAURANT_NAME")
                .unwrap_or_else(|_| "Restaurant".to_string()),
            naming: OrderFileNaming::new(
                std::env::var("ORDER_FILE_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
                std::env::var("ORDER_FILE_EXT").unwrap_or_else(|_| DEFAULT_EXT.to_string()),
            ),
        }
    }
}
