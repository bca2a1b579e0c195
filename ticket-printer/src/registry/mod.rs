//! OS printer registry backends
//!
//! A registry can enumerate installed printers, read and change the
//! system default printer, and hand a file to the OS print verb.
//!
//! Backends:
//! - [`WindowsRegistry`]: Win32 spooler + `ShellExecuteW` (Windows only)
//! - [`CupsRegistry`]: `lpstat` / `lpoptions` / `lp` (Unix)
//! - [`MemoryRegistry`]: in-process state, records every call (dry runs, tests)
//! - [`DisabledRegistry`]: reports printing as unavailable

mod disabled;
mod memory;

#[cfg(unix)]
mod cups;
#[cfg(windows)]
mod windows;

pub use disabled::DisabledRegistry;
pub use memory::{MemoryRegistry, RegistryEvent};

#[cfg(unix)]
pub use cups::CupsRegistry;
#[cfg(windows)]
pub use windows::WindowsRegistry;

use crate::error::PrintResult;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Access to the operating system's printer state
///
/// Implementations are synchronous; callers that live on an async
/// runtime should run them on a blocking task.
pub trait PrinterRegistry: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Whether this backend can print at all
    fn is_available(&self) -> bool {
        true
    }

    /// Names of the printers currently registered with the OS
    fn list_printers(&self) -> PrintResult<Vec<String>>;

    /// Current system default printer, if one is set
    fn default_printer(&self) -> PrintResult<Option<String>>;

    /// Make `name` the system default printer
    fn set_default_printer(&self, name: &str) -> PrintResult<()>;

    /// Hand `path` to the OS print verb
    ///
    /// With `target = None` the job goes to the current default printer.
    fn dispatch(&self, path: &Path, target: Option<&str>) -> PrintResult<()>;

    /// Whether [`dispatch`](Self::dispatch) honours an explicit target
    /// without touching the default printer
    fn supports_explicit_target(&self) -> bool;
}

/// Backend selection, usually from `PRINTER_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Pick the platform backend, or disabled if none is usable
    #[default]
    Auto,
    Windows,
    Cups,
    Memory,
    Disabled,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "windows" | "win32" => Ok(Self::Windows),
            "cups" => Ok(Self::Cups),
            "memory" | "dry-run" => Ok(Self::Memory),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(format!("unknown printer backend: {}", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Windows => "windows",
            Self::Cups => "cups",
            Self::Memory => "memory",
            Self::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

/// Build the registry for `kind`
///
/// Unsupported choices fall back to [`DisabledRegistry`] with a warning,
/// so a misconfigured machine keeps running and logs that nothing prints.
pub fn select_backend(kind: BackendKind) -> Arc<dyn PrinterRegistry> {
    let registry: Arc<dyn PrinterRegistry> = match kind {
        BackendKind::Auto => detect(),
        BackendKind::Windows => windows_backend(),
        BackendKind::Cups => cups_backend(),
        BackendKind::Memory => Arc::new(MemoryRegistry::new()),
        BackendKind::Disabled => Arc::new(DisabledRegistry::new("disabled by configuration")),
    };

    if registry.is_available() {
        info!(backend = registry.name(), "Printer backend selected");
    } else {
        warn!(
            backend = registry.name(),
            "Printer support disabled, orders will not be printed"
        );
    }
    registry
}

fn detect() -> Arc<dyn PrinterRegistry> {
    #[cfg(windows)]
    {
        windows_backend()
    }

    #[cfg(unix)]
    {
        if CupsRegistry::probe() {
            return Arc::new(CupsRegistry::new());
        }
        Arc::new(DisabledRegistry::new("no print subsystem found"))
    }

    #[cfg(not(any(windows, unix)))]
    {
        Arc::new(DisabledRegistry::new("unsupported platform"))
    }
}

#[cfg(windows)]
fn windows_backend() -> Arc<dyn PrinterRegistry> {
    Arc::new(WindowsRegistry::new())
}

#[cfg(not(windows))]
fn windows_backend() -> Arc<dyn PrinterRegistry> {
    Arc::new(DisabledRegistry::new("windows backend requires Windows"))
}

#[cfg(unix)]
fn cups_backend() -> Arc<dyn PrinterRegistry> {
    Arc::new(CupsRegistry::new())
}

#[cfg(not(unix))]
fn cups_backend() -> Arc<dyn PrinterRegistry> {
    Arc::new(DisabledRegistry::new("cups backend requires a Unix host"))
}
