use super::PrinterRegistry;
use crate::error::{PrintError, PrintResult};
use std::path::Path;

/// Backend for hosts without a usable print subsystem
///
/// Lists no printers and refuses every mutation, so the fallback chain
/// ends in an unprinted outcome instead of an error.
#[derive(Debug, Clone)]
pub struct DisabledRegistry {
    reason: String,
}

impl DisabledRegistry {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PrinterRegistry for DisabledRegistry {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn list_printers(&self) -> PrintResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn default_printer(&self) -> PrintResult<Option<String>> {
        Ok(None)
    }

    fn set_default_printer(&self, _name: &str) -> PrintResult<()> {
        Err(PrintError::Unavailable(self.reason.clone()))
    }

    fn dispatch(&self, path: &Path, _target: Option<&str>) -> PrintResult<()> {
        Err(PrintError::Unavailable(format!(
            "{} (skipped {})",
            self.reason,
            path.display()
        )))
    }

    fn supports_explicit_target(&self) -> bool {
        false
    }
}
