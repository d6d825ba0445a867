// ABOUTME: Persistence gateway for Perfect Wood, routing load/save calls to one storage backend.
// ABOUTME: Provides host and key-value backends, backup export/import and legacy key migration.

pub mod backend;
pub mod error;
pub mod gateway;
pub mod host;
pub mod kv;
pub mod migration;
pub mod sink;
pub mod testing;

pub use backend::{Backend, BackendKind};
pub use error::StoreError;
pub use gateway::PersistenceGateway;
pub use host::{FsHost, HostApi, HostSnapshot};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use migration::migrate_legacy_keys;
pub use sink::{DirectorySink, FileSink};
