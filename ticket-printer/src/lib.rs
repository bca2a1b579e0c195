//! # ticket-printer
//!
//! Receipt printing through the operating system's print subsystem.
//!
//! ## Scope
//!
//! This crate handles HOW a ticket reaches paper:
//! - Printer discovery by name pattern and role assignment (kitchen, cashier)
//! - Scoped default-printer swaps ([`DefaultPrinterGuard`])
//! - Multi-printer dispatch with fallback ([`PrintCoordinator`])
//! - OS backends: Windows spooler, CUPS, in-memory, disabled
//! - Plain-text ticket layout ([`TicketBuilder`])
//!
//! WHAT goes on the ticket stays in application code (order-server).
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use ticket_printer::{BackendKind, CoordinatorConfig, PrintCoordinator, select_backend};
//!
//! let registry = select_backend(BackendKind::Auto);
//! let coordinator = PrintCoordinator::discover(registry, CoordinatorConfig::default());
//!
//! let outcome = coordinator.print_file(Path::new("temp_orders/order_12.txt"))?;
//! if !outcome.is_printed() {
//!     eprintln!("order 12 needs a manual reprint");
//! }
//! # Ok::<(), ticket_printer::PrintError>(())
//! ```

mod coordinator;
mod discovery;
mod error;
mod guard;
mod receipt;
pub mod registry;
pub mod text;

// Re-exports
pub use coordinator::{
    CoordinatorConfig, DEFAULT_ROLE_GAP, DEFAULT_SETTLE_DELAY, PrintCoordinator, PrintOutcome,
    PrinterStatus,
};
pub use discovery::{PrinterPattern, RoleAssignment, RoleSlot};
pub use error::{PrintError, PrintResult};
pub use guard::DefaultPrinterGuard;
pub use receipt::TicketBuilder;
pub use registry::{BackendKind, MemoryRegistry, PrinterRegistry, RegistryEvent, select_backend};
