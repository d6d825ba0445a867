// ABOUTME: One-time copy of data stored under pre-`data/` legacy keys to the current keys.
// ABOUTME: Non-destructive and safe to repeat; legacy keys are never removed.

use perfectwood_core::keys::LEGACY_KEY_MAP;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Copy every populated legacy key onto its current key.
///
/// The destination is overwritten whether or not it already holds data, so
/// running this twice yields the same state as running it once. Returns the
/// number of keys copied.
pub fn migrate_legacy_keys(store: &dyn KeyValueStore) -> Result<usize, StoreError> {
    let mut copied = 0;
    for (legacy, current) in LEGACY_KEY_MAP {
        if let Some(value) = store.get(legacy)? {
            store.set(current, &value)?;
            tracing::info!("migrated legacy key {} to {}", legacy, current);
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use perfectwood_core::keys::{
        CUSTOMER_TRANSACTIONS_KEY, DATA_KEY, LEGACY_DATA_KEY, SUPPLIER_TRANSACTIONS_KEY,
    };

    #[test]
    fn no_legacy_keys_is_a_no_op() {
        let store = MemoryStore::new();
        assert_eq!(migrate_legacy_keys(&store).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn copies_without_removing_the_legacy_key() {
        let store = MemoryStore::new();
        store.set(LEGACY_DATA_KEY, r#"{"products":[1]}"#).unwrap();

        assert_eq!(migrate_legacy_keys(&store).unwrap(), 1);
        assert_eq!(
            store.get(DATA_KEY).unwrap().as_deref(),
            Some(r#"{"products":[1]}"#)
        );
        assert!(store.get(LEGACY_DATA_KEY).unwrap().is_some());
        assert!(store.get(CUSTOMER_TRANSACTIONS_KEY).unwrap().is_none());
        assert!(store.get(SUPPLIER_TRANSACTIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn repeated_runs_converge() {
        let store = MemoryStore::new();
        store.set("customerTransactions", "[1,2]").unwrap();
        store.set("supplierTransactions", "[3]").unwrap();

        assert_eq!(migrate_legacy_keys(&store).unwrap(), 2);
        assert_eq!(migrate_legacy_keys(&store).unwrap(), 2);
        assert_eq!(
            store.get(CUSTOMER_TRANSACTIONS_KEY).unwrap().as_deref(),
            Some("[1,2]")
        );
        assert_eq!(
            store.get(SUPPLIER_TRANSACTIONS_KEY).unwrap().as_deref(),
            Some("[3]")
        );
        assert_eq!(store.len(), 4);
    }
}
