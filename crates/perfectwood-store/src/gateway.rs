// ABOUTME: The persistence gateway: one load/save contract over the host and key-value backends.
// ABOUTME: Loads never fail outward, saves report success as a bool, backups round-trip as JSON.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use perfectwood_core::keys::{ALL_KEYS, DATA_KEY};
use perfectwood_core::{Backup, Dataset, TransactionKind, TransactionLog, backup_file_name};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::backend::{Backend, BackendKind};
use crate::error::StoreError;
use crate::host::HostApi;
use crate::kv::KeyValueStore;
use crate::migration::migrate_legacy_keys;
use crate::sink::FileSink;

/// Fields an imported backup must carry.
const REQUIRED_BACKUP_FIELDS: [&str; 3] = ["products", "customers", "sellers"];

/// Transaction logs an imported backup may carry.
const OPTIONAL_BACKUP_LOGS: [&str; 2] = ["customerTransactions", "supplierTransactions"];

/// Routes every persistence call to the backend chosen at construction.
///
/// Nothing is cached: each load re-reads the backend, and every returned
/// value is independently owned by the caller.
#[derive(Debug, Clone)]
pub struct PersistenceGateway {
    backend: Backend,
}

impl PersistenceGateway {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Build a gateway on the host backend if `host` is supplied, on `store` otherwise.
    pub fn detect(host: Option<Arc<dyn HostApi>>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(Backend::detect(host, store))
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Process-start hook. On the key-value backend this copies legacy keys to
    /// their current names; on the host backend it does nothing. Safe to call
    /// repeatedly. Returns the number of keys copied.
    pub fn init(&self) -> usize {
        match &self.backend {
            Backend::Host(_) => 0,
            Backend::Browser(store) => match migrate_legacy_keys(store.as_ref()) {
                Ok(copied) => copied,
                Err(e) => {
                    tracing::error!("legacy key migration failed: {}", e);
                    0
                }
            },
        }
    }

    /// Load the core dataset, falling back to an empty one when nothing is
    /// stored or the backend fails.
    pub async fn load_dataset(&self) -> Dataset {
        match self.try_load_dataset().await {
            Ok(Some(dataset)) => dataset,
            Ok(None) => Dataset::empty(),
            Err(e) => {
                tracing::error!(
                    "failed to load dataset from {} backend: {}",
                    self.backend_kind(),
                    e
                );
                Dataset::empty()
            }
        }
    }

    async fn try_load_dataset(&self) -> Result<Option<Dataset>, StoreError> {
        match &self.backend {
            Backend::Host(host) => Ok(host.load_data().await?.data),
            Backend::Browser(store) => read_json(store.as_ref(), DATA_KEY),
        }
    }

    /// Persist the core dataset. Returns `false` if the backend failed.
    pub async fn save_dataset(&self, dataset: &Dataset) -> bool {
        let result = match &self.backend {
            Backend::Host(host) => host.save_data(dataset).await,
            Backend::Browser(store) => write_json(store.as_ref(), DATA_KEY, dataset),
        };
        self.report("save dataset", result)
    }

    /// Load one transaction log, falling back to an empty log.
    pub async fn load_transactions(&self, kind: TransactionKind) -> TransactionLog {
        let result = match &self.backend {
            Backend::Host(host) => host
                .load_data()
                .await
                .map(|snapshot| snapshot.into_transactions(kind)),
            Backend::Browser(store) => read_json(store.as_ref(), kind.storage_key()),
        };
        match result {
            Ok(log) => log.unwrap_or_default(),
            Err(e) => {
                tracing::error!(
                    "failed to load {} transactions from {} backend: {}",
                    kind,
                    self.backend_kind(),
                    e
                );
                TransactionLog::new()
            }
        }
    }

    /// Persist one transaction log. Returns `false` if the backend failed.
    pub async fn save_transactions(&self, kind: TransactionKind, log: &TransactionLog) -> bool {
        let result = match &self.backend {
            Backend::Host(host) => host.save_transactions(kind, log).await,
            Backend::Browser(store) => write_json(store.as_ref(), kind.storage_key(), log),
        };
        self.report(&format!("save {kind} transactions"), result)
    }

    pub async fn load_customer_transactions(&self) -> TransactionLog {
        self.load_transactions(TransactionKind::Customer).await
    }

    pub async fn load_supplier_transactions(&self) -> TransactionLog {
        self.load_transactions(TransactionKind::Supplier).await
    }

    pub async fn save_customer_transactions(&self, log: &TransactionLog) -> bool {
        self.save_transactions(TransactionKind::Customer, log).await
    }

    pub async fn save_supplier_transactions(&self, log: &TransactionLog) -> bool {
        self.save_transactions(TransactionKind::Supplier, log).await
    }

    /// Remove the dataset and both transaction logs.
    pub async fn clear_all(&self) -> bool {
        let result = match &self.backend {
            Backend::Host(host) => host.clear_all_data().await,
            Backend::Browser(store) => ALL_KEYS.iter().try_for_each(|key| store.remove(key)),
        };
        self.report("clear all data", result)
    }

    /// Snapshot the current dataset and both logs into a backup stamped `exported_at`.
    pub async fn build_backup(&self, exported_at: DateTime<Utc>) -> Backup {
        let dataset = self.load_dataset().await;
        let customer = self.load_customer_transactions().await;
        let supplier = self.load_supplier_transactions().await;
        Backup::new(dataset, customer, supplier, exported_at)
    }

    /// Export everything as a pretty-printed JSON file delivered through `sink`
    /// as `perfect-wood-backup-<date>.json`. Returns `false` on any failure.
    pub async fn export_backup(&self, sink: &dyn FileSink) -> bool {
        let now = Utc::now();
        let backup = self.build_backup(now).await;
        let name = backup_file_name(now);
        let result = backup
            .to_pretty_json()
            .map_err(StoreError::from)
            .and_then(|json| sink.deliver_file(&name, json.as_bytes()));
        self.report(&format!("export backup {name}"), result)
    }

    /// Read a backup from `reader` and restore it.
    ///
    /// Fails without writing anything if the content cannot be read, is not
    /// JSON, or lacks `products`, `customers` or `sellers`. Transaction logs
    /// are only replaced when the backup carries them. Returns `Ok(false)` if
    /// a backend write failed after validation passed.
    pub async fn import_backup<R>(&self, mut reader: R) -> Result<bool, StoreError>
    where
        R: AsyncRead + Unpin,
    {
        let mut text = String::new();
        if let Err(e) = reader.read_to_string(&mut text).await {
            tracing::warn!("failed to read backup: {}", e);
            return Err(StoreError::Io(e));
        }

        let backup = parse_backup(&text).inspect_err(|e| {
            tracing::warn!("rejected backup import: {}", e);
        })?;

        let mut ok = self.save_dataset(&backup.dataset()).await;
        if let Some(log) = &backup.customer_transactions {
            ok &= self.save_customer_transactions(log).await;
        }
        if let Some(log) = &backup.supplier_transactions {
            ok &= self.save_supplier_transactions(log).await;
        }

        tracing::info!(
            "imported backup: {} products, {} customers, {} sellers",
            backup.products.len(),
            backup.customers.len(),
            backup.sellers.len()
        );
        Ok(ok)
    }

    /// Open `path` and import it as a backup.
    pub async fn import_backup_file(&self, path: &Path) -> Result<bool, StoreError> {
        let file = tokio::fs::File::open(path).await.inspect_err(|e| {
            tracing::warn!("failed to open backup {}: {}", path.display(), e);
        })?;
        self.import_backup(file).await
    }

    fn report(&self, operation: &str, result: Result<(), StoreError>) -> bool {
        match result {
            Ok(()) => {
                tracing::debug!("{} on {} backend", operation, self.backend_kind());
                true
            }
            Err(e) => {
                tracing::error!(
                    "failed to {} on {} backend: {}",
                    operation,
                    self.backend_kind(),
                    e
                );
                false
            }
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

fn write_json<T: serde::Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

/// Parse and validate backup text. `exportDate`, unknown fields and
/// transaction logs that are not arrays are ignored.
fn parse_backup(text: &str) -> Result<Backup, StoreError> {
    let mut value: Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object_mut() else {
        return Err(StoreError::Validation);
    };

    if REQUIRED_BACKUP_FIELDS
        .iter()
        .any(|field| object.get(*field).is_none_or(Value::is_null))
    {
        return Err(StoreError::Validation);
    }
    object.remove("exportDate");
    for field in OPTIONAL_BACKUP_LOGS {
        if object.get(field).is_some_and(|log| !log.is_array()) {
            tracing::warn!("ignoring {} in backup: not an array", field);
            object.remove(field);
        }
    }

    serde_json::from_value(value).map_err(|_| StoreError::Validation)
}
