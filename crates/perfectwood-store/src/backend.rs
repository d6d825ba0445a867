// ABOUTME: Backend strategy for the gateway: the host API or a key-value store.
// ABOUTME: Selection is a pure function of whether a host capability was supplied.

use std::fmt;
use std::sync::Arc;

use crate::host::HostApi;
use crate::kv::KeyValueStore;

/// The storage backend a gateway routes every call to.
#[derive(Clone)]
pub enum Backend {
    /// Delegate to an externally supplied async host API.
    Host(Arc<dyn HostApi>),
    /// Read and write strings under fixed keys in a synchronous store.
    Browser(Arc<dyn KeyValueStore>),
}

/// Which backend variant is in use, for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Host,
    Browser,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Host => f.write_str("host"),
            BackendKind::Browser => f.write_str("browser"),
        }
    }
}

impl Backend {
    /// Pick the host backend when a host capability is present, the key-value
    /// store otherwise. Has no side effects.
    pub fn detect(host: Option<Arc<dyn HostApi>>, store: Arc<dyn KeyValueStore>) -> Self {
        match host {
            Some(host) => Backend::Host(host),
            None => Backend::Browser(store),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Host(_) => BackendKind::Host,
            Backend::Browser(_) => BackendKind::Browser,
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Backend").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::testing::InMemoryHost;

    #[test]
    fn detect_prefers_host_when_present() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let host: Arc<dyn HostApi> = Arc::new(InMemoryHost::new());

        assert_eq!(
            Backend::detect(Some(host), Arc::clone(&store)).kind(),
            BackendKind::Host
        );
        assert_eq!(Backend::detect(None, store).kind(), BackendKind::Browser);
    }

    #[test]
    fn detect_is_repeatable_when_the_host_is_swapped() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let host: Arc<dyn HostApi> = Arc::new(InMemoryHost::new());

        let first = Backend::detect(Some(host), Arc::clone(&store));
        let second = Backend::detect(None, Arc::clone(&store));
        let third = Backend::detect(Some(Arc::new(InMemoryHost::new())), store);

        assert_eq!(first.kind(), BackendKind::Host);
        assert_eq!(second.kind(), BackendKind::Browser);
        assert_eq!(third.kind(), BackendKind::Host);
        assert_eq!(format!("{:?}", second), "Backend(Browser)");
        assert_eq!(BackendKind::Host.to_string(), "host");
    }
}
