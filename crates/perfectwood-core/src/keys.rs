// ABOUTME: Fixed key-value store keys for the browser backend.
// ABOUTME: Includes the pre-migration legacy keys and the legacy-to-current mapping.

/// Key holding the serialized core dataset.
pub const DATA_KEY: &str = "data/perfectWoodData.json";
/// Key holding the customer transaction log.
pub const CUSTOMER_TRANSACTIONS_KEY: &str = "data/customerTransactions.json";
/// Key holding the supplier transaction log.
pub const SUPPLIER_TRANSACTIONS_KEY: &str = "data/supplierTransactions.json";

pub const LEGACY_DATA_KEY: &str = "perfectWoodData";
pub const LEGACY_CUSTOMER_TRANSACTIONS_KEY: &str = "customerTransactions";
pub const LEGACY_SUPPLIER_TRANSACTIONS_KEY: &str = "supplierTransactions";

/// Every key the gateway writes. `clear_all` removes exactly these.
pub const ALL_KEYS: [&str; 3] = [DATA_KEY, CUSTOMER_TRANSACTIONS_KEY, SUPPLIER_TRANSACTIONS_KEY];

/// `(legacy, current)` pairs copied by the one-time migration.
pub const LEGACY_KEY_MAP: [(&str, &str); 3] = [
    (LEGACY_DATA_KEY, DATA_KEY),
    (LEGACY_CUSTOMER_TRANSACTIONS_KEY, CUSTOMER_TRANSACTIONS_KEY),
    (LEGACY_SUPPLIER_TRANSACTIONS_KEY, SUPPLIER_TRANSACTIONS_KEY),
];
