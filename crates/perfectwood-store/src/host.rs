// ABOUTME: Host capability contract: an async API that persists data outside this process.
// ABOUTME: Includes FsHost, a filesystem implementation keeping one JSON file per dataset.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use perfectwood_core::{Dataset, TransactionKind, TransactionLog};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StoreError;

/// Everything the host returns from a single `load_data` call.
/// Absent fields mean the host has nothing stored for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostSnapshot {
    pub data: Option<Dataset>,
    pub customer_transactions: Option<TransactionLog>,
    pub supplier_transactions: Option<TransactionLog>,
}

impl HostSnapshot {
    /// The log for `kind`, if the host returned one.
    pub fn into_transactions(self, kind: TransactionKind) -> Option<TransactionLog> {
        match kind {
            TransactionKind::Customer => self.customer_transactions,
            TransactionKind::Supplier => self.supplier_transactions,
        }
    }
}

/// Externally supplied persistence API. Calls may suspend; none are retried.
#[async_trait]
pub trait HostApi: Send + Sync {
    async fn load_data(&self) -> Result<HostSnapshot, StoreError>;

    async fn save_data(&self, dataset: &Dataset) -> Result<(), StoreError>;

    async fn save_transactions(
        &self,
        kind: TransactionKind,
        data: &TransactionLog,
    ) -> Result<(), StoreError>;

    async fn clear_all_data(&self) -> Result<(), StoreError>;
}

const DATA_FILE: &str = "perfectWoodData.json";
const CUSTOMER_TRANSACTIONS_FILE: &str = "customerTransactions.json";
const SUPPLIER_TRANSACTIONS_FILE: &str = "supplierTransactions.json";

fn transactions_file(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Customer => CUSTOMER_TRANSACTIONS_FILE,
        TransactionKind::Supplier => SUPPLIER_TRANSACTIONS_FILE,
    }
}

/// Host backed by a data directory, the layout a desktop host process uses.
#[derive(Debug, Clone)]
pub struct FsHost {
    data_dir: PathBuf,
}

impl FsHost {
    /// Create a host writing into `data_dir`. The directory is created lazily on first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        file_name: &str,
    ) -> Result<Option<T>, StoreError> {
        let path = self.data_dir.join(file_name);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::unavailable(e)),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(
        &self,
        file_name: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)?;
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(StoreError::unavailable)?;

        let final_path = self.data_dir.join(file_name);
        let tmp_path = self.data_dir.join(format!("{file_name}.tmp"));

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(StoreError::unavailable)?;
        file.write_all(json.as_bytes())
            .await
            .map_err(StoreError::unavailable)?;
        file.sync_all().await.map_err(StoreError::unavailable)?;
        drop(file);

        fs::rename(&tmp_path, &final_path)
            .await
            .map_err(StoreError::unavailable)?;
        Ok(())
    }

    /// Read one file of the snapshot. An unreadable or corrupt file only
    /// empties its own field.
    async fn read_field<T: DeserializeOwned>(&self, file_name: &str) -> Option<T> {
        match self.read_json(file_name).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "ignoring unreadable {} in {}: {}",
                    file_name,
                    self.data_dir.display(),
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl HostApi for FsHost {
    async fn load_data(&self) -> Result<HostSnapshot, StoreError> {
        Ok(HostSnapshot {
            data: self.read_field(DATA_FILE).await,
            customer_transactions: self.read_field(CUSTOMER_TRANSACTIONS_FILE).await,
            supplier_transactions: self.read_field(SUPPLIER_TRANSACTIONS_FILE).await,
        })
    }

    async fn save_data(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.write_json(DATA_FILE, dataset).await
    }

    async fn save_transactions(
        &self,
        kind: TransactionKind,
        data: &TransactionLog,
    ) -> Result<(), StoreError> {
        self.write_json(transactions_file(kind), data).await
    }

    async fn clear_all_data(&self) -> Result<(), StoreError> {
        for file_name in [DATA_FILE, CUSTOMER_TRANSACTIONS_FILE, SUPPLIER_TRANSACTIONS_FILE] {
            match fs::remove_file(self.data_dir.join(file_name)).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::unavailable(e)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn empty_directory_loads_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path().join("data"));

        let snapshot = host.load_data().await.unwrap();
        assert_eq!(snapshot, HostSnapshot::default());
    }

    #[tokio::test]
    async fn saves_are_visible_in_the_next_load() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path().join("data"));

        let dataset = Dataset {
            products: vec![json!({"id": 1, "name": "Walnut board"})],
            customers: vec![],
            sellers: vec![],
        };
        host.save_data(&dataset).await.unwrap();
        host.save_transactions(TransactionKind::Supplier, &vec![json!({"qty": 4})])
            .await
            .unwrap();

        let snapshot = host.load_data().await.unwrap();
        assert_eq!(snapshot.data, Some(dataset));
        assert!(snapshot.customer_transactions.is_none());
        assert_eq!(
            snapshot.into_transactions(TransactionKind::Supplier),
            Some(vec![json!({"qty": 4})])
        );
        assert!(host.data_dir().join("supplierTransactions.json").exists());
    }

    #[tokio::test]
    async fn corrupt_file_empties_only_its_own_field() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path());
        host.save_transactions(TransactionKind::Customer, &vec![json!({"id": 2})])
            .await
            .unwrap();
        std::fs::write(dir.path().join(DATA_FILE), "{not json").unwrap();

        let snapshot = host.load_data().await.unwrap();
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.customer_transactions, Some(vec![json!({"id": 2})]));
    }

    #[tokio::test]
    async fn corrupt_log_leaves_dataset_and_other_log_intact() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path());
        let dataset = Dataset {
            products: vec![json!({"id": 1})],
            customers: vec![],
            sellers: vec![],
        };
        host.save_data(&dataset).await.unwrap();
        host.save_transactions(TransactionKind::Customer, &vec![json!("c")])
            .await
            .unwrap();
        std::fs::write(dir.path().join(SUPPLIER_TRANSACTIONS_FILE), "{broken").unwrap();

        let snapshot = host.load_data().await.unwrap();
        assert_eq!(snapshot.data, Some(dataset));
        assert_eq!(snapshot.customer_transactions, Some(vec![json!("c")]));
        assert!(snapshot.supplier_transactions.is_none());
    }

    #[tokio::test]
    async fn clear_removes_all_files_and_tolerates_missing_ones() {
        let dir = TempDir::new().unwrap();
        let host = FsHost::new(dir.path());

        host.clear_all_data().await.unwrap();

        host.save_data(&Dataset::empty()).await.unwrap();
        host.save_transactions(TransactionKind::Customer, &vec![])
            .await
            .unwrap();
        host.clear_all_data().await.unwrap();

        assert_eq!(host.load_data().await.unwrap(), HostSnapshot::default());
    }
}
