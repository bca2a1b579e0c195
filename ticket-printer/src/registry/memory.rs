use super::PrinterRegistry;
use crate::error::{PrintError, PrintResult};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A call observed by [`MemoryRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    ListPrinters,
    GetDefault,
    SetDefault(String),
    /// `printer` is the printer the job landed on (explicit target or
    /// the default at dispatch time)
    Dispatch {
        path: PathBuf,
        target: Option<String>,
        printer: Option<String>,
    },
}

#[derive(Debug, Default)]
struct State {
    printers: Vec<String>,
    default: Option<String>,
    explicit_target: bool,
    failing_printers: HashSet<String>,
    fail_default_dispatch: bool,
    fail_set_default: HashSet<String>,
    events: Vec<RegistryEvent>,
}

/// In-process printer registry
///
/// Keeps a printer list and a default printer in memory and records
/// every call. Used for `PRINTER_BACKEND=memory` dry runs and as the
/// test double for the coordinator.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: Mutex<State>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the given installed printers and default
    pub fn with_printers<S: AsRef<str>>(printers: &[S], default: Option<&str>) -> Self {
        let registry = Self::new();
        {
            let mut state = registry.state.lock();
            state.printers = printers.iter().map(|p| p.as_ref().to_string()).collect();
            state.default = default.map(str::to_string);
            state.explicit_target = true;
        }
        registry
    }

    /// Toggle support for explicit-target dispatch
    pub fn set_explicit_target(&self, supported: bool) {
        self.state.lock().explicit_target = supported;
    }

    /// Make every dispatch that lands on `printer` fail
    pub fn fail_dispatch_to(&self, printer: &str) {
        self.state.lock().failing_printers.insert(printer.to_string());
    }

    /// Make dispatches with no target and no default printer fail
    pub fn fail_default_dispatch(&self) {
        self.state.lock().fail_default_dispatch = true;
    }

    /// Make setting `printer` as default fail
    pub fn fail_set_default_to(&self, printer: &str) {
        self.state.lock().fail_set_default.insert(printer.to_string());
    }

    /// Remove a printer, as if it was unplugged after discovery
    pub fn remove_printer(&self, printer: &str) {
        self.state.lock().printers.retain(|p| p != printer);
    }

    pub fn current_default(&self) -> Option<String> {
        self.state.lock().default.clone()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.lock().events.clone()
    }

    /// Every `SetDefault` call, in order
    pub fn default_changes(&self) -> Vec<String> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                RegistryEvent::SetDefault(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Printers that received a job, in order
    pub fn dispatched_to(&self) -> Vec<Option<String>> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                RegistryEvent::Dispatch { printer, .. } => Some(printer.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }
}

impl PrinterRegistry for MemoryRegistry {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn list_printers(&self) -> PrintResult<Vec<String>> {
        let mut state = self.state.lock();
        state.events.push(RegistryEvent::ListPrinters);
        Ok(state.printers.clone())
    }

    fn default_printer(&self) -> PrintResult<Option<String>> {
        let mut state = self.state.lock();
        state.events.push(RegistryEvent::GetDefault);
        Ok(state.default.clone())
    }

    fn set_default_printer(&self, name: &str) -> PrintResult<()> {
        let mut state = self.state.lock();
        state.events.push(RegistryEvent::SetDefault(name.to_string()));

        if state.fail_set_default.contains(name) {
            return Err(PrintError::Registry(format!(
                "cannot set default printer: {}",
                name
            )));
        }
        if !state.printers.iter().any(|p| p == name) {
            return Err(PrintError::Registry(format!("Printer not found: {}", name)));
        }
        state.default = Some(name.to_string());
        Ok(())
    }

    fn dispatch(&self, path: &Path, target: Option<&str>) -> PrintResult<()> {
        let mut state = self.state.lock();
        let printer = match target {
            Some(t) if state.explicit_target => Some(t.to_string()),
            _ => state.default.clone(),
        };
        state.events.push(RegistryEvent::Dispatch {
            path: path.to_path_buf(),
            target: target.map(str::to_string),
            printer: printer.clone(),
        });

        match printer {
            Some(p) if state.failing_printers.contains(&p) => {
                Err(PrintError::dispatch(p, "simulated spooler failure"))
            }
            Some(p) if !state.printers.contains(&p) => {
                Err(PrintError::dispatch(p, "printer not installed"))
            }
            None if state.fail_default_dispatch => {
                Err(PrintError::dispatch("<default>", "no application registered"))
            }
            _ => Ok(()),
        }
    }

    fn supports_explicit_target(&self) -> bool {
        self.state.lock().explicit_target
    }
}
