//! Poll loop against the in-memory cloud and printer registry

use print_client::{PollState, PollStep, Poller, PrintJobRunner};
use shared::{MemoryCloud, OrderFileNaming};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use ticket_printer::{CoordinatorConfig, MemoryRegistry};

const KITCHEN: &str = "Kitchen-XP-80C-Copy1";
const CASHIER: &str = "Cashier-XP-80C-Copy2";

const POLL_INTERVAL: Duration = Duration::from_secs(10);
const ERROR_BACKOFF: Duration = Duration::from_secs(15);

fn jobs(cloud: &Arc<MemoryCloud>, registry: &Arc<MemoryRegistry>, dir: &TempDir) -> Arc<PrintJobRunner> {
    Arc::new(PrintJobRunner::new(
        cloud.clone(),
        registry.clone(),
        CoordinatorConfig::default().without_delays(),
        OrderFileNaming::default(),
        dir.path().join("temp_orders"),
    ))
}

fn state(dir: &TempDir) -> PollState {
    PollState::new(dir.path().join("last_order.txt"))
}

async fn poller(jobs: Arc<PrintJobRunner>, state: PollState) -> Poller {
    Poller::new(jobs, state, 1, POLL_INTERVAL, ERROR_BACKOFF).await
}

fn dual_registry() -> Arc<MemoryRegistry> {
    Arc::new(MemoryRegistry::with_printers(&[KITCHEN, CASHIER], Some(KITCHEN)))
}

#[tokio::test]
async fn test_printed_orders_advance_state() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    cloud.put("order_1.txt", "Order #1\n");
    cloud.put("order_2.txt", "Order #2\n");
    let registry = dual_registry();

    let mut poller = poller(jobs(&cloud, &registry, &dir), state(&dir)).await;

    let step = poller.step().await;
    assert_eq!(step, PollStep::Printed(1));
    assert_eq!(poller.delay_after(step), Duration::ZERO);
    assert_eq!(state(&dir).load().await, Some(1));

    assert_eq!(poller.step().await, PollStep::Printed(2));
    assert_eq!(state(&dir).load().await, Some(2));

    // Both role printers got each order
    assert_eq!(registry.dispatched_to().len(), 4);
    assert_eq!(registry.current_default().as_deref(), Some(KITCHEN));

    let downloaded = dir.path().join("temp_orders/order_2.txt");
    assert_eq!(std::fs::read_to_string(downloaded).unwrap(), "Order #2\n");
}

#[tokio::test]
async fn test_not_found_keeps_waiting_on_same_id() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    let registry = dual_registry();
    let mut poller = poller(jobs(&cloud, &registry, &dir), state(&dir)).await;

    let step = poller.step().await;
    assert_eq!(step, PollStep::NotFound(1));
    assert_eq!(poller.delay_after(step), POLL_INTERVAL);
    assert_eq!(poller.next_id(), 1);
    assert_eq!(state(&dir).load().await, None);
    assert!(registry.dispatched_to().is_empty());

    // The order shows up later
    cloud.put("order_1.txt", "Order #1\n");
    assert_eq!(poller.step().await, PollStep::Printed(1));
    assert_eq!(poller.next_id(), 2);
}

#[tokio::test]
async fn test_resumes_after_stored_id() {
    let dir = TempDir::new().unwrap();
    state(&dir).save(41).await.unwrap();

    let cloud = Arc::new(MemoryCloud::new());
    cloud.put("order_42.txt", "Order #42\n");
    let registry = dual_registry();
    let mut poller = poller(jobs(&cloud, &registry, &dir), state(&dir)).await;

    assert_eq!(poller.next_id(), 42);
    assert_eq!(poller.step().await, PollStep::Printed(42));
    assert_eq!(state(&dir).load().await, Some(42));
}

#[tokio::test]
async fn test_unprinted_order_is_retried_not_skipped() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    cloud.put("order_1.txt", "Order #1\n");

    // No printers and the default handler fails: every stage fails
    let registry = Arc::new(MemoryRegistry::new());
    registry.fail_default_dispatch();

    let mut poller = poller(jobs(&cloud, &registry, &dir), state(&dir)).await;

    let step = poller.step().await;
    assert_eq!(step, PollStep::Unprinted(1));
    assert_eq!(poller.delay_after(step), POLL_INTERVAL);
    assert_eq!(poller.next_id(), 1);
    assert_eq!(state(&dir).load().await, None);
}

#[tokio::test]
async fn test_download_error_backs_off() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    cloud.put("order_1.txt", "Order #1\n");
    cloud.fail_downloads(true);
    let registry = dual_registry();

    let mut poller = poller(jobs(&cloud, &registry, &dir), state(&dir)).await;

    let step = poller.step().await;
    assert_eq!(step, PollStep::Failed(1));
    assert_eq!(poller.delay_after(step), ERROR_BACKOFF);
    assert_eq!(poller.next_id(), 1);

    cloud.fail_downloads(false);
    assert_eq!(poller.step().await, PollStep::Printed(1));
}

#[tokio::test]
async fn test_run_stops_on_cancel() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    cloud.put("order_1.txt", "Order #1\n");
    let registry = dual_registry();
    let poller = poller(jobs(&cloud, &registry, &dir), state(&dir)).await;

    let shutdown = tokio_util::sync::CancellationToken::new();
    let handle = tokio::spawn(poller.run(shutdown.clone()));

    // Order 1 prints, then the loop waits on order 2
    for _ in 0..100 {
        if state(&dir).load().await == Some(1) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    shutdown.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state(&dir).load().await, Some(1));
}
