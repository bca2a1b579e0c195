use shared::OrderFileNaming;
use shared::naming::{DEFAULT_EXT, DEFAULT_PREFIX};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use ticket_printer::{BackendKind, CoordinatorConfig, PrinterPattern};

/// How new orders are noticed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TriggerMode {
    /// Ask storage for the next order id on a timer
    #[default]
    Poll,
    /// Subscribe to inserts on the orders table
    Realtime,
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poll" | "polling" | "" => Ok(Self::Poll),
            "realtime" | "subscribe" => Ok(Self::Realtime),
            other => Err(format!("unknown trigger mode: {}", other)),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poll => f.write_str("poll"),
            Self::Realtime => f.write_str("realtime"),
        }
    }
}

/// print-client settings, read from the environment
///
/// Cloud credentials are loaded separately through
/// [`shared::CloudConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub mode: TriggerMode,
    /// Wait after "not found" or an unprinted order
    pub poll_interval: Duration,
    /// Wait after an unexpected error
    pub error_backoff: Duration,
    /// Last printed order id
    pub state_file: PathBuf,
    /// Where downloaded tickets are written before printing
    pub temp_dir: PathBuf,
    /// First id to poll when there is no state file
    pub start_order_id: u64,
    pub backend: BackendKind,
    pub printer: CoordinatorConfig,
    /// Refuse to run unless every role printer is present
    pub require_dual: bool,
    pub naming: OrderFileNaming,
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = CoordinatorConfig::default();

        let pattern = std::env::var("PRINTER_PATTERNS")
            .map(|p| PrinterPattern::parse(&p))
            .ok()
            .filter(|p| !p.tokens().is_empty())
            .unwrap_or(defaults.pattern);

        let roles = std::env::var("PRINTER_ROLES")
            .map(|r| parse_list(&r))
            .ok()
            .filter(|r| !r.is_empty())
            .unwrap_or(defaults.roles);

        Self {
            mode: std::env::var("TRIGGER_MODE")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or_default(),
            poll_interval: Duration::from_secs(env_u64("POLL_INTERVAL_SECS").unwrap_or(10)),
            error_backoff: Duration::from_secs(env_u64("ERROR_BACKOFF_SECS").unwrap_or(15)),
            state_file: std::env::var("STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("last_order.txt")),
            temp_dir: std::env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("temp_orders")),
            start_order_id: env_u64("START_ORDER_ID").unwrap_or(1).max(1),
            backend: std::env::var("PRINTER_BACKEND")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or_default(),
            printer: CoordinatorConfig {
                pattern,
                roles,
                settle_delay: env_u64("SETTLE_DELAY_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.settle_delay),
                role_gap: env_u64("ROLE_GAP_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.role_gap),
            },
            require_dual: std::env::var("REQUIRE_DUAL_PRINTERS")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            naming: OrderFileNaming::new(
                std::env::var("ORDER_FILE_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
                std::env::var("ORDER_FILE_EXT").unwrap_or_else(|_| DEFAULT_EXT.to_string()),
            ),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_mode_parse() {
        assert_eq!("poll".parse::<TriggerMode>(), Ok(TriggerMode::Poll));
        assert_eq!(" Realtime ".parse::<TriggerMode>(), Ok(TriggerMode::Realtime));
        assert!("webhook".parse::<TriggerMode>().is_err());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("kitchen, cashier,,bar "), vec!["kitchen", "cashier", "bar"]);
        assert!(parse_list(" , ").is_empty());
    }
}
