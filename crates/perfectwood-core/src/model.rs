// ABOUTME: Data model for the records persisted by the gateway.
// ABOUTME: Records are opaque JSON values; only the collection shape is owned here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::keys;

/// A product record. Its shape is owned by the application, not by storage.
pub type Product = Value;
/// A customer record.
pub type Customer = Value;
/// A seller (supplier) record.
pub type Seller = Value;
/// A single entry of a transaction log.
pub type Transaction = Value;

/// Ordered sequence of transactions for one counterparty type.
pub type TransactionLog = Vec<Transaction>;

/// The core product/customer/seller collection, excluding transaction logs.
///
/// Missing fields in stored data deserialize as empty sequences so that a
/// partially written value still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub sellers: Vec<Seller>,
}

impl Dataset {
    /// An empty dataset. Every call returns an independently owned value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when all three collections are empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.customers.is_empty() && self.sellers.is_empty()
    }
}

/// Which counterparty a transaction log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Customer,
    Supplier,
}

impl TransactionKind {
    /// Wire literal passed to the host when saving this log.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Customer => "customer",
            TransactionKind::Supplier => "supplier",
        }
    }

    /// Fixed key-value store key holding this log.
    pub fn storage_key(&self) -> &'static str {
        match self {
            TransactionKind::Customer => keys::CUSTOMER_TRANSACTIONS_KEY,
            TransactionKind::Supplier => keys::SUPPLIER_TRANSACTIONS_KEY,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
