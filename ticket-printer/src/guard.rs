//! Scoped default-printer swap
//!
//! The shell print verb only targets the default printer, so sending a
//! job to a specific printer means: save the default, switch it, print,
//! switch it back. [`DefaultPrinterGuard`] owns the "switch back" part
//! and runs it on drop, covering error and panic paths.

use crate::error::{PrintError, PrintResult};
use crate::registry::PrinterRegistry;
use tracing::{debug, warn};

/// Holds the OS default printer on `target` until released or dropped
pub struct DefaultPrinterGuard<'a> {
    registry: &'a dyn PrinterRegistry,
    previous: Option<String>,
    target: String,
    restored: bool,
}

impl<'a> DefaultPrinterGuard<'a> {
    /// Save the current default and switch it to `target`
    ///
    /// If switching fails nothing was changed and no guard is returned.
    pub fn acquire(registry: &'a dyn PrinterRegistry, target: &str) -> PrintResult<Self> {
        let previous = registry.default_printer()?;
        registry.set_default_printer(target)?;
        debug!(
            printer = target,
            previous = previous.as_deref().unwrap_or("<none>"),
            "Default printer switched"
        );

        Ok(Self {
            registry,
            previous,
            target: target.to_string(),
            restored: false,
        })
    }

    /// The default printer in effect before acquisition
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Put the previous default back and report the result
    pub fn restore(mut self) -> PrintResult<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> PrintResult<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let Some(previous) = self.previous.as_deref() else {
            // Nothing to go back to; the OS offers no "unset default"
            debug!(printer = %self.target, "No previous default printer to restore");
            return Ok(());
        };

        if previous == self.target {
            return Ok(());
        }

        self.registry
            .set_default_printer(previous)
            .map_err(|e| PrintError::DefaultPrinterRestoreFailed {
                printer: previous.to_string(),
                reason: e.to_string(),
            })?;
        debug!(restored = previous, "Default printer restored");
        Ok(())
    }
}

impl Drop for DefaultPrinterGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.restore_inner() {
            warn!(error = %e, "Default printer left changed");
        }
    }
}
