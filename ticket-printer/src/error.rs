//! Error types for the printer library

use std::path::PathBuf;
use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Fewer printers matched than there are roles to fill
    #[error("Printers not configured: found {found}, need {required}")]
    PrinterNotConfigured { found: usize, required: usize },

    /// Document to print does not exist on local storage
    #[error("File not found: {}", .0.display())]
    SourceFileMissing(PathBuf),

    /// OS print invocation failed for one printer
    #[error("Dispatch to {printer} failed: {reason}")]
    DispatchFailed { printer: String, reason: String },

    /// One or more roles failed during an all-roles dispatch
    #[error("Dispatch failed for roles: {}", .0.join(", "))]
    RolesFailed(Vec<String>),

    /// Previous default printer could not be put back
    #[error("Failed to restore default printer {printer}: {reason}")]
    DefaultPrinterRestoreFailed { printer: String, reason: String },

    /// Enumerating or changing registry state failed
    #[error("Printer registry error: {0}")]
    Registry(String),

    /// Printing is not supported by the selected backend
    #[error("Printing unavailable: {0}")]
    Unavailable(String),

    /// IO error while talking to the print subsystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrintError {
    pub(crate) fn dispatch(printer: impl Into<String>, reason: impl ToString) -> Self {
        Self::DispatchFailed {
            printer: printer.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
