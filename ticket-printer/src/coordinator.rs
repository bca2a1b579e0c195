//! Multi-printer print coordinator
//!
//! Sends one document to every role printer (kitchen, cashier, ...)
//! and degrades step by step when that is not possible:
//!
//! 1. all roles, one after another, through a scoped default-printer swap
//! 2. the first matching printer, with an explicit target when supported
//! 3. the OS default printer
//!
//! Dispatches are strictly sequential: they share the OS default printer.
//! "Sent" means the OS accepted the job, not that paper came out.

use crate::discovery::{PrinterPattern, RoleAssignment};
use crate::error::{PrintError, PrintResult};
use crate::guard::DefaultPrinterGuard;
use crate::registry::PrinterRegistry;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Default wait after each dispatch before the default printer is restored
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Default pause between two role printers
pub const DEFAULT_ROLE_GAP: Duration = Duration::from_millis(500);

/// Coordinator settings
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Which installed printers are candidates
    pub pattern: PrinterPattern,
    /// Role labels in dispatch order; one printer per role
    pub roles: Vec<String>,
    /// Blocking wait after a dispatch so the spooler picks the job up
    /// before the default printer changes again
    pub settle_delay: Duration,
    /// Blocking wait between consecutive role printers
    pub role_gap: Duration,
}

impl CoordinatorConfig {
    /// Same settings with no waits, for dry runs and tests
    pub fn without_delays(mut self) -> Self {
        self.settle_delay = Duration::ZERO;
        self.role_gap = Duration::ZERO;
        self
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            pattern: PrinterPattern::default(),
            roles: vec!["kitchen".to_string(), "cashier".to_string()],
            settle_delay: DEFAULT_SETTLE_DELAY,
            role_gap: DEFAULT_ROLE_GAP,
        }
    }
}

/// Which stage of the fallback chain delivered the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "printer", rename_all = "snake_case")]
pub enum PrintOutcome {
    /// Every role printer accepted the job
    AllRoles,
    /// One matching printer accepted the job
    Single(String),
    /// Handed to the OS default print handler
    OsDefault,
    /// Every stage failed; needs a manual reprint
    Unprinted,
}

impl PrintOutcome {
    pub fn is_printed(&self) -> bool {
        !matches!(self, Self::Unprinted)
    }
}

/// Snapshot of what the coordinator discovered
#[derive(Debug, Clone, Serialize)]
pub struct PrinterStatus {
    pub backend: &'static str,
    pub available: bool,
    pub pattern: String,
    pub matched: Vec<String>,
    pub roles: Vec<(String, Option<String>)>,
    pub all_roles_ready: bool,
}

/// Prints documents to role printers with fallback
pub struct PrintCoordinator {
    registry: Arc<dyn PrinterRegistry>,
    config: CoordinatorConfig,
    matched: Vec<String>,
    roles: RoleAssignment,
}

impl PrintCoordinator {
    /// Enumerate printers and bind roles
    ///
    /// Enumeration errors are logged and treated as "no printers"; the
    /// fallback chain still reaches the OS default stage.
    pub fn discover(registry: Arc<dyn PrinterRegistry>, config: CoordinatorConfig) -> Self {
        let installed = match registry.list_printers() {
            Ok(list) => list,
            Err(e) => {
                warn!(backend = registry.name(), error = %e, "Printer enumeration failed");
                Vec::new()
            }
        };

        let matched = config.pattern.discover(&installed);
        let roles = RoleAssignment::assign(&config.roles, &matched);

        for slot in roles.slots() {
            match &slot.printer {
                Some(printer) => info!(role = %slot.label, printer = %printer, "Role printer found"),
                None => warn!(role = %slot.label, pattern = %config.pattern, "No printer for role"),
            }
        }

        Self {
            registry,
            config,
            matched,
            roles,
        }
    }

    pub fn roles(&self) -> &RoleAssignment {
        &self.roles
    }

    /// Matching printers, sorted
    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    pub fn registry(&self) -> &Arc<dyn PrinterRegistry> {
        &self.registry
    }

    pub fn status(&self) -> PrinterStatus {
        PrinterStatus {
            backend: self.registry.name(),
            available: self.registry.is_available(),
            pattern: self.config.pattern.to_string(),
            matched: self.matched.clone(),
            roles: self
                .roles
                .slots()
                .iter()
                .map(|s| (s.label.clone(), s.printer.clone()))
                .collect(),
            all_roles_ready: self.roles.is_complete(),
        }
    }

    /// Print the file through the fallback chain
    ///
    /// Only a missing file is an error. Exhausting every stage is logged
    /// and reported as [`PrintOutcome::Unprinted`].
    #[instrument(skip(self, path), fields(file = %file_label(path)))]
    pub fn print_file(&self, path: &Path) -> PrintResult<PrintOutcome> {
        if !path.exists() {
            error!(path = %path.display(), "File to print not found");
            return Err(PrintError::SourceFileMissing(path.to_path_buf()));
        }

        if self.roles.is_complete() {
            match self.print_to_roles(path) {
                Ok(()) => return Ok(PrintOutcome::AllRoles),
                Err(e) => warn!(error = %e, "Role printing failed, falling back to single printer"),
            }
        } else {
            info!(
                found = self.roles.assigned_count(),
                required = self.roles.role_count(),
                "Role printers not configured, trying single printer"
            );
        }

        match self.print_single(path) {
            Ok(printer) => return Ok(PrintOutcome::Single(printer)),
            Err(e) => warn!(error = %e, "Single printer failed, falling back to default printer"),
        }

        match self.print_os_default(path) {
            Ok(()) => Ok(PrintOutcome::OsDefault),
            Err(e) => {
                error!(error = %e, "Order not printed, reprint manually");
                Ok(PrintOutcome::Unprinted)
            }
        }
    }

    /// Send the file to every role printer in role order
    ///
    /// Refuses to start, without touching OS state, unless every role has
    /// a printer and the file exists. A failing role does not stop the
    /// remaining ones; the result is `Ok` only if all succeeded.
    #[instrument(skip(self, path), fields(file = %file_label(path)))]
    pub fn print_to_roles(&self, path: &Path) -> PrintResult<()> {
        if !self.roles.is_complete() {
            warn!("Not all role printers are available");
            return Err(PrintError::PrinterNotConfigured {
                found: self.roles.assigned_count(),
                required: self.roles.role_count(),
            });
        }
        if !path.exists() {
            return Err(PrintError::SourceFileMissing(path.to_path_buf()));
        }

        info!(roles = self.roles.role_count(), "Printing to all role printers");

        let mut failed = Vec::new();
        let assigned = self
            .roles
            .slots()
            .iter()
            .filter_map(|s| s.printer.as_deref().map(|p| (s.label.as_str(), p)));

        for (i, (role, printer)) in assigned.enumerate() {
            if i > 0 {
                pause(self.config.role_gap);
            }
            match self.print_via_default(path, printer) {
                Ok(()) => info!(role, printer, "Sent to printer"),
                Err(e) => {
                    error!(role, printer, error = %e, "Printing to role failed");
                    failed.push(role.to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(PrintError::RolesFailed(failed))
        }
    }

    /// Send the file to the first matching printer
    ///
    /// Returns the printer used.
    pub fn print_single(&self, path: &Path) -> PrintResult<String> {
        let printer = self
            .matched
            .first()
            .ok_or(PrintError::PrinterNotConfigured {
                found: 0,
                required: 1,
            })?;

        if self.registry.supports_explicit_target() {
            self.registry.dispatch(path, Some(printer))?;
        } else {
            self.print_via_default(path, printer)?;
        }

        info!(printer = %printer, "Sent to single printer");
        Ok(printer.clone())
    }

    /// Hand the file to the OS default print handler
    pub fn print_os_default(&self, path: &Path) -> PrintResult<()> {
        self.registry.dispatch(path, None)?;
        info!("Sent to default printer");
        Ok(())
    }

    /// Switch default -> dispatch -> settle -> restore
    ///
    /// The guard restores the default on every path. A failed restore is
    /// logged and does not turn a successful dispatch into a failure.
    fn print_via_default(&self, path: &Path, printer: &str) -> PrintResult<()> {
        let guard = DefaultPrinterGuard::acquire(self.registry.as_ref(), printer)?;

        let dispatched = self.registry.dispatch(path, None);
        if dispatched.is_ok() {
            pause(self.config.settle_delay);
        }

        if let Err(e) = guard.restore() {
            warn!(error = %e, "Default printer not restored");
        }

        dispatched
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
