// ABOUTME: The backup file format shared by export and import.
// ABOUTME: Carries the dataset, optional transaction logs and an informational export timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Customer, Dataset, Product, Seller, TransactionLog};

/// Whole-dataset backup as written to and read from a `.json` file.
///
/// `exportDate` is only written on export; import ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub sellers: Vec<Seller>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_transactions: Option<TransactionLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_transactions: Option<TransactionLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
}

impl Backup {
    /// Compose a full backup stamped with `exported_at`.
    pub fn new(
        dataset: Dataset,
        customer_transactions: TransactionLog,
        supplier_transactions: TransactionLog,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            products: dataset.products,
            customers: dataset.customers,
            sellers: dataset.sellers,
            customer_transactions: Some(customer_transactions),
            supplier_transactions: Some(supplier_transactions),
            export_date: Some(exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    /// The core dataset part of this backup.
    pub fn dataset(&self) -> Dataset {
        Dataset {
            products: self.products.clone(),
            customers: self.customers.clone(),
            sellers: self.sellers.clone(),
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// File name offered for a backup exported at `exported_at`.
pub fn backup_file_name(exported_at: DateTime<Utc>) -> String {
    format!("perfect-wood-backup-{}.json", exported_at.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap()
    }

    #[test]
    fn file_name_uses_calendar_date() {
        assert_eq!(
            backup_file_name(fixed_time()),
            "perfect-wood-backup-2024-03-09.json"
        );
    }

    #[test]
    fn new_backup_uses_camel_case_fields_and_iso_timestamp() {
        let dataset = Dataset {
            products: vec![json!({"id": 1})],
            customers: vec![],
            sellers: vec![json!({"name": "Oak & Co"})],
        };
        let backup = Backup::new(dataset, vec![json!({"amount": 10})], vec![], fixed_time());

        let value = serde_json::to_value(&backup).unwrap();
        assert_eq!(value["products"], json!([{"id": 1}]));
        assert_eq!(value["sellers"], json!([{"name": "Oak & Co"}]));
        assert_eq!(value["customerTransactions"], json!([{"amount": 10}]));
        assert_eq!(value["supplierTransactions"], json!([]));
        assert_eq!(value["exportDate"], json!("2024-03-09T14:05:30.000Z"));
    }

    #[test]
    fn pretty_json_is_indented() {
        let backup = Backup::new(Dataset::empty(), vec![], vec![], fixed_time());
        let text = backup.to_pretty_json().unwrap();
        assert!(text.starts_with("{\n  \"products\": []"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let backup: Backup =
            serde_json::from_str(r#"{"products":[],"customers":[],"sellers":[]}"#).unwrap();
        assert!(backup.customer_transactions.is_none());
        assert!(backup.supplier_transactions.is_none());
        assert!(backup.export_date.is_none());
        assert_eq!(backup.dataset(), Dataset::empty());
    }
}
