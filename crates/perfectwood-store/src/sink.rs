// ABOUTME: Delivery capability for exported backup files.
// ABOUTME: The gateway produces bytes; a sink decides where the user receives them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Hands a finished file to the user (a download, a save dialog, a directory).
pub trait FileSink: Send + Sync {
    fn deliver_file(&self, name: &str, content: &[u8]) -> Result<(), StoreError>;
}

/// Writes delivered files into a directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn deliver_file(&self, name: &str, content: &[u8]) -> Result<(), StoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(StoreError::InvalidKey(name.to_string()));
        }
        fs::create_dir_all(&self.dir).map_err(StoreError::unavailable)?;
        fs::write(self.dir.join(name), content).map_err(StoreError::unavailable)?;
        tracing::debug!("delivered {} ({} bytes) to {}", name, content.len(), self.dir.display());
        Ok(())
    }
}
