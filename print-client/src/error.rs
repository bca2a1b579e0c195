//! Error types for the print client

use shared::CloudError;
use thiserror::Error;
use ticket_printer::PrintError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking print task panicked or was cancelled
    #[error("Print task failed: {0}")]
    Task(String),

    #[error("Realtime error: {0}")]
    Realtime(String),

    /// `--require-dual` is set and not every role has a printer
    #[error("Role printers missing: found {found}, need {required}")]
    PrintersNotReady { found: usize, required: usize },
}

impl ClientError {
    /// The requested order document does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Cloud(e) if e.is_not_found())
    }
}

impl From<tokio::task::JoinError> for ClientError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Realtime(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
