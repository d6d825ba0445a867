// ABOUTME: Test doubles for the gateway's collaborators: host API, key-value store and file sink.
// ABOUTME: Used in tests to exercise both backends and failure paths without touching disk.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use perfectwood_core::{Dataset, TransactionKind, TransactionLog};

use crate::error::StoreError;
use crate::host::{HostApi, HostSnapshot};
use crate::kv::KeyValueStore;
use crate::sink::FileSink;

/// An in-memory host that records which calls were made.
///
/// Call `set_failing(true)` to make every subsequent call reject with
/// `StorageUnavailable`.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    snapshot: Mutex<HostSnapshot>,
    calls: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host that already holds `snapshot`.
    pub fn with_snapshot(snapshot: HostSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current stored state.
    pub fn snapshot(&self) -> HostSnapshot {
        self.snapshot.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Names of the host calls made so far, e.g. `save_transactions(customer)`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) -> Result<(), StoreError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::StorageUnavailable("host rejected the call".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl HostApi for InMemoryHost {
    async fn load_data(&self) -> Result<HostSnapshot, StoreError> {
        self.record("load_data".to_string())?;
        Ok(self.snapshot())
    }

    async fn save_data(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.record("save_data".to_string())?;
        let mut snapshot = self.snapshot.lock().map_err(StoreError::unavailable)?;
        snapshot.data = Some(dataset.clone());
        Ok(())
    }

    async fn save_transactions(
        &self,
        kind: TransactionKind,
        data: &TransactionLog,
    ) -> Result<(), StoreError> {
        self.record(format!("save_transactions({kind})"))?;
        let mut snapshot = self.snapshot.lock().map_err(StoreError::unavailable)?;
        match kind {
            TransactionKind::Customer => snapshot.customer_transactions = Some(data.clone()),
            TransactionKind::Supplier => snapshot.supplier_transactions = Some(data.clone()),
        }
        Ok(())
    }

    async fn clear_all_data(&self) -> Result<(), StoreError> {
        self.record("clear_all_data".to_string())?;
        let mut snapshot = self.snapshot.lock().map_err(StoreError::unavailable)?;
        *snapshot = HostSnapshot::default();
        Ok(())
    }
}

/// A key-value store whose every operation fails, for exercising fallback paths.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::StorageUnavailable("store is unavailable".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::StorageUnavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::StorageUnavailable("store is unavailable".to_string()))
    }
}

/// A sink that keeps delivered files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files delivered so far, in order, as `(name, content)`.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl FileSink for MemorySink {
    fn deliver_file(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        let mut files = self.files.lock().map_err(StoreError::unavailable)?;
        files.push((name.to_string(), content.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn in_memory_host_records_calls_and_state() {
        let host = InMemoryHost::new();
        host.save_transactions(TransactionKind::Customer, &vec![json!(1)])
            .await
            .unwrap();

        let snapshot = host.load_data().await.unwrap();
        assert_eq!(snapshot.customer_transactions, Some(vec![json!(1)]));
        assert_eq!(
            host.calls(),
            vec!["save_transactions(customer)".to_string(), "load_data".to_string()]
        );
    }

    #[tokio::test]
    async fn failing_host_rejects_without_changing_state() {
        let host = InMemoryHost::new();
        host.set_failing(true);

        assert!(host.save_data(&Dataset::empty()).await.is_err());
        host.set_failing(false);
        assert!(host.snapshot().data.is_none());
    }

    #[test]
    fn memory_sink_keeps_files_in_order() {
        let sink = MemorySink::new();
        sink.deliver_file("a.json", b"1").unwrap();
        sink.deliver_file("b.json", b"2").unwrap();

        let names: Vec<String> = sink.files().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
