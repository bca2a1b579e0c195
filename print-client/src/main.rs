//! # print-client
//!
//! ## Usage
//!
//! ```bash
//! # Poll storage for new orders (default)
//! print-client
//!
//! # Print orders as they are inserted
//! print-client run --mode realtime
//!
//! # Show discovered printers and role assignment
//! print-client printers
//!
//! # Print a local file through the fallback chain
//! print-client print temp_orders/order_12.txt
//!
//! # Download and print order 12 again
//! print-client reprint 12
//! ```

use clap::{Parser, Subcommand};
use print_client::logger::init_logger;
use print_client::{
    ClientConfig, ClientError, PollState, Poller, PrintJobRunner, RealtimeListener, TriggerMode,
};
use shared::{CloudConfig, OrderCloud, SupabaseClient};
use std::path::PathBuf;
use std::sync::Arc;
use ticket_printer::{
    BackendKind, CoordinatorConfig, PrintCoordinator, PrintOutcome, PrinterRegistry,
    PrinterStatus, select_backend,
};
use tokio_util::sync::CancellationToken;

/// print-client - prints restaurant orders on the kitchen and cashier printers
#[derive(Parser, Debug)]
#[command(name = "print-client")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Refuse to start unless every role has a printer
    #[arg(long, global = true)]
    require_dual: bool,

    /// Printer backend (auto, windows, cups, memory, disabled)
    #[arg(long, global = true)]
    backend: Option<BackendKind>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch for new orders and print them
    Run {
        /// How new orders are noticed
        #[arg(long, value_enum, env = "TRIGGER_MODE")]
        mode: Option<TriggerMode>,
    },

    /// Show discovered printers and role assignment
    Printers,

    /// Print a local file through the fallback chain
    Print {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Download and print one order, without touching the poll state
    Reprint {
        #[arg(value_name = "ID")]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    config.require_dual |= cli.require_dual;

    init_logger(&config.log_level, config.log_dir.as_deref());

    let registry = select_backend(config.backend);

    match cli.command.unwrap_or(Commands::Run { mode: None }) {
        Commands::Run { mode } => {
            config.mode = mode.unwrap_or(config.mode);
            run(config, registry).await
        }
        Commands::Printers => {
            let status = discover_status(registry, config.printer).await?;
            print_status(&status);
            Ok(())
        }
        Commands::Print { file } => {
            let printer = config.printer;
            let outcome = tokio::task::spawn_blocking(move || {
                PrintCoordinator::discover(registry, printer).print_file(&file)
            })
            .await??;
            report(outcome)
        }
        Commands::Reprint { id } => {
            let jobs = job_runner(&config, registry)?;
            let outcome = jobs.fetch_and_print(id).await?;
            report(outcome)
        }
    }
}

async fn run(config: ClientConfig, registry: Arc<dyn PrinterRegistry>) -> anyhow::Result<()> {
    let cloud = SupabaseClient::new(CloudConfig::from_env()?)?;
    let realtime_url = cloud.realtime_url();
    let access_token = cloud.config().key.clone();
    let table = cloud.config().orders_table.clone();

    let jobs = Arc::new(PrintJobRunner::new(
        Arc::new(cloud),
        registry,
        config.printer.clone(),
        config.naming.clone(),
        config.temp_dir.clone(),
    ));

    let status = jobs.printer_status().await?;
    if !status.all_roles_ready {
        let found = status.roles.iter().filter(|(_, p)| p.is_some()).count();
        if config.require_dual {
            return Err(ClientError::PrintersNotReady {
                found,
                required: status.roles.len(),
            }
            .into());
        }
        tracing::warn!(
            found,
            required = status.roles.len(),
            "Not every role has a printer, orders will use the fallback stages"
        );
    }

    tracing::info!(
        mode = %config.mode,
        backend = status.backend,
        matched = ?status.matched,
        "Starting print-client"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to listen for shutdown signal: {e}"),
            }
            shutdown.cancel();
        }
    });

    let state = PollState::new(&config.state_file);
    match config.mode {
        TriggerMode::Poll => {
            Poller::new(
                jobs,
                state,
                config.start_order_id,
                config.poll_interval,
                config.error_backoff,
            )
            .await
            .run(shutdown)
            .await
        }
        TriggerMode::Realtime => {
            RealtimeListener::new(realtime_url, access_token, table, jobs, state)
                .run(shutdown)
                .await
        }
    }

    tracing::info!("print-client stopped");
    Ok(())
}

fn job_runner(
    config: &ClientConfig,
    registry: Arc<dyn PrinterRegistry>,
) -> anyhow::Result<PrintJobRunner> {
    let cloud: Arc<dyn OrderCloud> = Arc::new(SupabaseClient::new(CloudConfig::from_env()?)?);
    Ok(PrintJobRunner::new(
        cloud,
        registry,
        config.printer.clone(),
        config.naming.clone(),
        config.temp_dir.clone(),
    ))
}

async fn discover_status(
    registry: Arc<dyn PrinterRegistry>,
    printer: CoordinatorConfig,
) -> anyhow::Result<PrinterStatus> {
    let status =
        tokio::task::spawn_blocking(move || PrintCoordinator::discover(registry, printer).status())
            .await?;
    Ok(status)
}

fn print_status(status: &PrinterStatus) {
    println!(
        "Backend: {} ({})",
        status.backend,
        if status.available { "available" } else { "unavailable" }
    );
    println!("Pattern: {}", status.pattern);

    println!("\nMatching printers:");
    if status.matched.is_empty() {
        println!("  (none)");
    }
    for name in &status.matched {
        println!("  {}", name);
    }

    println!("\nRoles:");
    for (role, printer) in &status.roles {
        println!("  {:<10} {}", role, printer.as_deref().unwrap_or("-"));
    }
    if !status.all_roles_ready {
        println!("\nNot every role has a printer; jobs will use the fallback stages.");
    }
}

fn report(outcome: PrintOutcome) -> anyhow::Result<()> {
    match outcome {
        PrintOutcome::AllRoles => println!("Printed on every role printer"),
        PrintOutcome::Single(printer) => println!("Printed on {}", printer),
        PrintOutcome::OsDefault => println!("Sent to the default print handler"),
        PrintOutcome::Unprinted => anyhow::bail!("every print stage failed"),
    }
    Ok(())
}
