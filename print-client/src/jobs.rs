//! Fetch-and-print
//!
//! Poll and realtime triggers both end up here. Printing is blocking (the
//! coordinator sleeps while the spooler picks up each job), so it runs on
//! a blocking task; a lock keeps one print in flight at a time since every
//! dispatch goes through the shared OS default printer.

use crate::error::ClientResult;
use shared::{OrderCloud, OrderFileNaming};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ticket_printer::{
    CoordinatorConfig, PrintCoordinator, PrintOutcome, PrinterRegistry, PrinterStatus,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

pub struct PrintJobRunner {
    cloud: Arc<dyn OrderCloud>,
    registry: Arc<dyn PrinterRegistry>,
    printer: CoordinatorConfig,
    naming: OrderFileNaming,
    temp_dir: PathBuf,
    print_lock: Mutex<()>,
}

impl PrintJobRunner {
    pub fn new(
        cloud: Arc<dyn OrderCloud>,
        registry: Arc<dyn PrinterRegistry>,
        printer: CoordinatorConfig,
        naming: OrderFileNaming,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cloud,
            registry,
            printer,
            naming,
            temp_dir: temp_dir.into(),
            print_lock: Mutex::new(()),
        }
    }

    /// Download order `order_id` into the temp directory
    pub async fn fetch(&self, order_id: u64) -> ClientResult<PathBuf> {
        let file_name = self.naming.file_name(order_id);
        let bytes = self.cloud.download(&file_name).await?;

        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let path = self.temp_dir.join(&file_name);
        tokio::fs::write(&path, &bytes).await?;

        info!(order_id, file = %file_name, size = bytes.len(), "Order downloaded");
        Ok(path)
    }

    /// Run the fallback chain on a local file
    ///
    /// Printers are rediscovered for every job, so a printer plugged in
    /// after startup is picked up.
    pub async fn print_path(&self, path: &Path) -> ClientResult<PrintOutcome> {
        let _guard = self.print_lock.lock().await;

        let registry = self.registry.clone();
        let config = self.printer.clone();
        let path = path.to_path_buf();
        let outcome = tokio::task::spawn_blocking(move || {
            PrintCoordinator::discover(registry, config).print_file(&path)
        })
        .await??;
        Ok(outcome)
    }

    /// Download and print one order
    #[instrument(skip(self))]
    pub async fn fetch_and_print(&self, order_id: u64) -> ClientResult<PrintOutcome> {
        let path = self.fetch(order_id).await?;
        let outcome = self.print_path(&path).await?;

        if outcome.is_printed() {
            info!(?outcome, "Order printed");
        } else {
            warn!("Order downloaded but not printed");
        }
        Ok(outcome)
    }

    /// Current printer discovery result
    pub async fn printer_status(&self) -> ClientResult<PrinterStatus> {
        let registry = self.registry.clone();
        let config = self.printer.clone();
        let status =
            tokio::task::spawn_blocking(move || PrintCoordinator::discover(registry, config).status())
                .await?;
        Ok(status)
    }
}
