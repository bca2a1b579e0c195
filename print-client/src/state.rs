//! Last printed order id, persisted as plain text

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PollState {
    path: PathBuf,
}

impl PollState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last printed id, if the file exists and holds a number
    pub async fn load(&self) -> Option<u64> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match content.trim().parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(path = %self.path.display(), "State file unreadable, ignoring it");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read state file");
                None
            }
        }
    }

    /// Id to poll next: one past the last printed, or `start_id`
    pub async fn next_id(&self, start_id: u64) -> u64 {
        match self.load().await {
            Some(last) => last + 1,
            None => {
                info!(start_id, "No usable state file, starting fresh");
                start_id
            }
        }
    }

    /// Record `id` as the last printed order
    pub async fn save(&self, id: u64) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, id.to_string()).await
    }

    /// Save `id` only if it is newer than the stored one
    ///
    /// Returns whether the file changed.
    pub async fn advance_to(&self, id: u64) -> std::io::Result<bool> {
        if self.load().await.is_some_and(|last| last >= id) {
            return Ok(false);
        }
        self.save(id).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_next_id_without_file() {
        let dir = TempDir::new().unwrap();
        let state = PollState::new(dir.path().join("last_order.txt"));
        assert_eq!(state.load().await, None);
        assert_eq!(state.next_id(1).await, 1);
        assert_eq!(state.next_id(40).await, 40);
    }

    #[tokio::test]
    async fn test_save_and_resume() {
        let dir = TempDir::new().unwrap();
        let state = PollState::new(dir.path().join("nested/last_order.txt"));
        state.save(7).await.unwrap();
        assert_eq!(state.next_id(1).await, 8);
    }

    #[tokio::test]
    async fn test_garbage_falls_back_to_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_order.txt");
        std::fs::write(&path, "seven").unwrap();
        assert_eq!(PollState::new(path).next_id(3).await, 3);
    }

    #[tokio::test]
    async fn test_advance_is_monotonic() {
        let dir = TempDir::new().unwrap();
        let state = PollState::new(dir.path().join("last_order.txt"));
        assert!(state.advance_to(5).await.unwrap());
        assert!(!state.advance_to(3).await.unwrap());
        assert!(!state.advance_to(5).await.unwrap());
        assert!(state.advance_to(6).await.unwrap());
        assert_eq!(state.load().await, Some(6));
    }
}
