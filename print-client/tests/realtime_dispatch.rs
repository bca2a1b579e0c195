//! Realtime frames driving fetch-and-print

use print_client::{ClientError, PollState, PrintJobRunner, RealtimeListener};
use shared::{MemoryCloud, OrderFileNaming};
use std::sync::Arc;
use tempfile::TempDir;
use ticket_printer::{CoordinatorConfig, MemoryRegistry};

fn insert_frame(id: u64) -> String {
    format!(
        r#"{{"topic":"realtime:public:orders","event":"postgres_changes","payload":{{"data":{{"type":"INSERT","schema":"public","table":"orders","record":{{"id":{id},"status":"new"}}}}}},"ref":null}}"#
    )
}

struct Fixture {
    dir: TempDir,
    cloud: Arc<MemoryCloud>,
    registry: Arc<MemoryRegistry>,
    listener: RealtimeListener,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let cloud = Arc::new(MemoryCloud::new());
        let registry = Arc::new(MemoryRegistry::with_printers(
            &["XP-80C (kitchen)", "XP-80C (cashier)"],
            None,
        ));
        let jobs = Arc::new(PrintJobRunner::new(
            cloud.clone(),
            registry.clone(),
            CoordinatorConfig::default().without_delays(),
            OrderFileNaming::default(),
            dir.path().join("temp_orders"),
        ));
        let listener = RealtimeListener::new(
            "ws://localhost:1/realtime/v1/websocket",
            "service-key",
            "orders",
            jobs,
            PollState::new(dir.path().join("last_order.txt")),
        );
        Self {
            dir,
            cloud,
            registry,
            listener,
        }
    }

    async fn last_printed(&self) -> Option<u64> {
        PollState::new(self.dir.path().join("last_order.txt")).load().await
    }
}

#[tokio::test]
async fn test_insert_prints_and_records_id() {
    let f = Fixture::new();
    f.cloud.put("order_7.txt", "Order #7\n");

    let printed = f.listener.handle_text(&insert_frame(7)).await.unwrap();
    assert_eq!(printed, Some(7));
    assert_eq!(f.registry.dispatched_to().len(), 2);
    assert_eq!(f.last_printed().await, Some(7));
}

#[tokio::test]
async fn test_state_only_moves_forward() {
    let f = Fixture::new();
    f.cloud.put("order_5.txt", "Order #5\n");
    f.cloud.put("order_9.txt", "Order #9\n");

    assert_eq!(f.listener.handle_text(&insert_frame(9)).await.unwrap(), Some(9));
    // Late delivery of an older insert still prints
    assert_eq!(f.listener.handle_text(&insert_frame(5)).await.unwrap(), Some(5));
    assert_eq!(f.last_printed().await, Some(9));
}

#[tokio::test]
async fn test_missing_document_keeps_session() {
    let f = Fixture::new();

    let printed = f.listener.handle_text(&insert_frame(3)).await.unwrap();
    assert_eq!(printed, None);
    assert_eq!(f.last_printed().await, None);
    assert!(f.registry.dispatched_to().is_empty());
}

#[tokio::test]
async fn test_join_replies() {
    let f = Fixture::new();

    let ok = r#"{"topic":"realtime:public:orders","event":"phx_reply","payload":{"status":"ok","response":{"postgres_changes":[]}},"ref":"1"}"#;
    assert_eq!(f.listener.handle_text(ok).await.unwrap(), None);

    let refused = r#"{"topic":"realtime:public:orders","event":"phx_reply","payload":{"status":"error","response":{"reason":"Invalid JWT"}},"ref":"1"}"#;
    let err = f.listener.handle_text(refused).await.unwrap_err();
    assert!(matches!(err, ClientError::Realtime(ref m) if m.contains("Invalid JWT")));
}

#[tokio::test]
async fn test_other_tables_and_heartbeats_ignored() {
    let f = Fixture::new();
    f.cloud.put("order_1.txt", "Order #1\n");

    let other = r#"{"topic":"realtime:public:payments","event":"postgres_changes","payload":{"data":{"type":"INSERT","record":{"id":1}}},"ref":null}"#;
    assert_eq!(f.listener.handle_text(other).await.unwrap(), None);

    let heartbeat = r#"{"topic":"phoenix","event":"phx_reply","payload":{"status":"ok","response":{}},"ref":"2"}"#;
    assert_eq!(f.listener.handle_text(heartbeat).await.unwrap(), None);

    assert!(f.registry.dispatched_to().is_empty());
}
