// ABOUTME: Configuration loading for the perfectwood binary.
// ABOUTME: Reads environment variables (optionally from .env) and picks the storage backend.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PERFECTWOOD_BACKEND must be \"host\" or \"browser\", got {0:?}")]
    InvalidBackend(String),
}

/// Which storage backend the binary wires into the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    Host,
    Browser,
}

/// Binary configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub home: PathBuf,
    pub backend: BackendChoice,
    pub export_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - PERFECTWOOD_HOME: data directory (default: ~/.perfectwood)
    /// - PERFECTWOOD_BACKEND: `host` or `browser` (default: host)
    /// - PERFECTWOOD_EXPORT_DIR: where backups are written (default: current directory)
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = std::env::var("PERFECTWOOD_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".perfectwood")
            });

        let backend = match std::env::var("PERFECTWOOD_BACKEND") {
            Err(_) => BackendChoice::Host,
            Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
                "" | "host" => BackendChoice::Host,
                "browser" => BackendChoice::Browser,
                _ => return Err(ConfigError::InvalidBackend(v)),
            },
        };

        let export_dir = std::env::var("PERFECTWOOD_EXPORT_DIR")
            .ok()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            home,
            backend,
            export_dir,
        })
    }

    /// Directory the host backend keeps its JSON files in.
    pub fn host_data_dir(&self) -> PathBuf {
        self.home.join("data")
    }

    /// Root of the key-value store used by the browser backend.
    pub fn local_storage_dir(&self) -> PathBuf {
        self.home.join("local-storage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::remove_var("PERFECTWOOD_HOME");
            std::env::remove_var("PERFECTWOOD_BACKEND");
            std::env::remove_var("PERFECTWOOD_EXPORT_DIR");
        }
    }

    #[test]
    fn config_loads_defaults_and_rejects_unknown_backend() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.backend, BackendChoice::Host);
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert!(config.home.to_string_lossy().contains(".perfectwood"));
        assert_eq!(config.host_data_dir(), config.home.join("data"));

        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::set_var("PERFECTWOOD_HOME", "/srv/wood");
            std::env::set_var("PERFECTWOOD_BACKEND", "Browser");
        }
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.backend, BackendChoice::Browser);
        assert_eq!(config.local_storage_dir(), PathBuf::from("/srv/wood/local-storage"));

        // SAFETY: test-only code, single-threaded test execution
        unsafe {
            std::env::set_var("PERFECTWOOD_BACKEND", "sqlite");
        }
        let result = AppConfig::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("PERFECTWOOD_BACKEND"), "{err}");
    }
}
