// ABOUTME: Core library for Perfect Wood persistence, containing the shared data model.
// ABOUTME: Defines datasets, transaction logs, fixed storage keys and the backup file format.

pub mod backup;
pub mod keys;
pub mod model;

pub use backup::{Backup, backup_file_name};
pub use model::{Customer, Dataset, Product, Seller, Transaction, TransactionKind, TransactionLog};
