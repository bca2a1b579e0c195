//! Sequential order ids
//!
//! The last allocated id lives in `<orders_path>/last_id.txt`. Allocation
//! is read, increment, write under an async mutex, so concurrent requests
//! inside one process never share an id.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Counter file name inside the orders directory
pub const COUNTER_FILE: &str = "last_id.txt";

pub struct OrderIdAllocator {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl OrderIdAllocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn counter_path(&self) -> PathBuf {
        self.dir.join(COUNTER_FILE)
    }

    /// Last allocated id; 0 if none yet
    pub async fn last(&self) -> std::io::Result<u64> {
        let _guard = self.lock.lock().await;
        read_counter(&self.counter_path()).await
    }

    /// Allocate and persist the next id
    pub async fn next(&self) -> std::io::Result<u64> {
        let _guard = self.lock.lock().await;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.counter_path();
        let id = read_counter(&path).await? + 1;
        tokio::fs::write(&path, id.to_string()).await?;

        tracing::debug!(order_id = id, "Order id allocated");
        Ok(id)
    }

    /// Hand back `id` after its order failed to store
    ///
    /// Only rolls the counter back while `id` is still the last allocated
    /// one; otherwise a later order already took the next id and the gap
    /// stays. Returns whether the counter moved.
    pub async fn release(&self, id: u64) -> std::io::Result<bool> {
        let _guard = self.lock.lock().await;

        let path = self.counter_path();
        if id == 0 || read_counter(&path).await? != id {
            return Ok(false);
        }
        tokio::fs::write(&path, (id - 1).to_string()).await?;

        tracing::debug!(order_id = id, "Order id released");
        Ok(true)
    }
}

/// Missing or non-numeric counter counts as 0
async fn read_counter(path: &Path) -> std::io::Result<u64> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content.trim().parse().unwrap_or(0)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sequential_and_persisted() {
        let dir = TempDir::new().unwrap();
        let orders = dir.path().join("orders");

        let ids = OrderIdAllocator::new(&orders);
        assert_eq!(ids.last().await.unwrap(), 0);
        assert_eq!(ids.next().await.unwrap(), 1);
        assert_eq!(ids.next().await.unwrap(), 2);

        // A new allocator continues from the file
        let ids = OrderIdAllocator::new(&orders);
        assert_eq!(ids.next().await.unwrap(), 3);
        let on_disk = std::fs::read_to_string(orders.join(COUNTER_FILE)).unwrap();
        assert_eq!(on_disk, "3");
    }

    #[tokio::test]
    async fn test_release_reuses_last_id() {
        let dir = TempDir::new().unwrap();
        let ids = OrderIdAllocator::new(dir.path());

        assert_eq!(ids.next().await.unwrap(), 1);
        assert_eq!(ids.next().await.unwrap(), 2);
        assert!(ids.release(2).await.unwrap());
        assert_eq!(ids.last().await.unwrap(), 1);
        assert_eq!(ids.next().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_release_after_newer_allocation_keeps_counter() {
        let dir = TempDir::new().unwrap();
        let ids = OrderIdAllocator::new(dir.path());

        assert_eq!(ids.next().await.unwrap(), 1);
        assert_eq!(ids.next().await.unwrap(), 2);
        assert!(!ids.release(1).await.unwrap());
        assert_eq!(ids.last().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_garbage_counter_restarts_at_one() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(COUNTER_FILE), "not a number").unwrap();

        let ids = OrderIdAllocator::new(dir.path());
        assert_eq!(ids.next().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_allocation_is_unique() {
        let dir = TempDir::new().unwrap();
        let ids = Arc::new(OrderIdAllocator::new(dir.path()));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let ids = ids.clone();
                tokio::spawn(async move { ids.next().await.unwrap() })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            assert!(seen.insert(h.await.unwrap()));
        }
        assert_eq!(seen.len(), 20);
        assert_eq!(ids.last().await.unwrap(), 20);
    }
}
