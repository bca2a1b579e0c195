use super::{CloudError, CloudResult, OrderCloud, OrderRecord};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct State {
    objects: HashMap<String, Vec<u8>>,
    records: Vec<OrderRecord>,
    fail_uploads: bool,
    fail_inserts: bool,
    fail_downloads: bool,
}

/// In-process cloud
///
/// Objects and rows live in memory. Used as the test double for the
/// server and the client, and for offline runs.
#[derive(Debug, Default)]
pub struct MemoryCloud {
    state: Mutex<State>,
}

impl MemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly
    pub fn put(&self, file_name: &str, bytes: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .objects
            .insert(file_name.to_string(), bytes.into());
    }

    pub fn object(&self, file_name: &str) -> Option<Vec<u8>> {
        self.state.lock().objects.get(file_name).cloned()
    }

    pub fn records(&self) -> Vec<OrderRecord> {
        self.state.lock().records.clone()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.state.lock().fail_uploads = fail;
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.state.lock().fail_inserts = fail;
    }

    /// Make downloads fail with a server error instead of not-found
    pub fn fail_downloads(&self, fail: bool) {
        self.state.lock().fail_downloads = fail;
    }
}

fn simulated(status: u16) -> CloudError {
    CloudError::Http {
        status,
        body: "simulated failure".to_string(),
    }
}

#[async_trait]
impl OrderCloud for MemoryCloud {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> CloudResult<String> {
        let mut state = self.state.lock();
        if state.fail_uploads {
            return Err(simulated(503));
        }
        if state.objects.contains_key(file_name) {
            return Err(CloudError::Http {
                status: 409,
                body: format!("The resource already exists: {}", file_name),
            });
        }
        state.objects.insert(file_name.to_string(), bytes);
        Ok(format!("memory://{}", file_name))
    }

    async fn download(&self, file_name: &str) -> CloudResult<Vec<u8>> {
        let state = self.state.lock();
        if state.fail_downloads {
            return Err(simulated(500));
        }
        state
            .objects
            .get(file_name)
            .cloned()
            .ok_or_else(|| CloudError::NotFound(file_name.to_string()))
    }

    async fn insert_order(&self, record: &OrderRecord) -> CloudResult<()> {
        let mut state = self.state.lock();
        if state.fail_inserts {
            return Err(simulated(500));
        }
        state.records.push(record.clone());
        Ok(())
    }
}
