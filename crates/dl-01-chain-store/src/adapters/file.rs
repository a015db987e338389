use crate::domain::errors::ChainStoreError;
use crate::ports::outbound::LedgerFile;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(feature = "locking")]
use super::lock::{LedgerLock, DEFAULT_LOCK_TIMEOUT};

/// JSON ledger document on the local filesystem.
///
/// Writes go to a sibling temp file which is synced and then renamed over
/// the ledger, so a reader sees either the old or the new document. With the
/// `locking` feature the adapter holds `<ledger>.lock` for its lifetime.
#[derive(Debug)]
pub struct JsonLedgerFile {
    path: PathBuf,
    #[cfg(feature = "locking")]
    _lock: LedgerLock,
}

impl JsonLedgerFile {
    /// Open the ledger at `path`, creating the parent directory if needed.
    ///
    /// The file itself is not created; absence means "uninitialized".
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ChainStoreError> {
        #[cfg(feature = "locking")]
        {
            Self::open_with_timeout(path, DEFAULT_LOCK_TIMEOUT)
        }
        #[cfg(not(feature = "locking"))]
        {
            let path = path.as_ref().to_path_buf();
            Self::ensure_parent(&path)?;
            Ok(Self { path })
        }
    }

    /// Open with an explicit lock wait.
    #[cfg(feature = "locking")]
    pub fn open_with_timeout<P: AsRef<Path>>(
        path: P,
        timeout: std::time::Duration,
    ) -> Result<Self, ChainStoreError> {
        let path = path.as_ref().to_path_buf();
        Self::ensure_parent(&path)?;
        let lock = LedgerLock::acquire(&path.with_extension("lock"), timeout)?;

        match std::fs::metadata(&path) {
            Ok(metadata) => tracing::info!(
                "[dl-01] 💾 Found existing ledger file: {} ({} bytes)",
                path.display(),
                metadata.len()
            ),
            Err(_) => tracing::info!("[dl-01] 📁 No existing ledger file at {}", path.display()),
        }

        Ok(Self { path, _lock: lock })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), ChainStoreError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(ChainStoreError::io)
            }
            _ => Ok(()),
        }
    }
}

impl LedgerFile for JsonLedgerFile {
    fn read(&self) -> Result<Option<Vec<u8>>, ChainStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ChainStoreError::io(e)),
        }
    }

    fn replace(&self, content: &[u8]) -> Result<(), ChainStoreError> {
        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(ChainStoreError::io)?;
        file.write_all(content).map_err(ChainStoreError::io)?;
        file.sync_all().map_err(ChainStoreError::io)?;
        drop(file);

        std::fs::rename(&temp_path, &self.path).map_err(ChainStoreError::io)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
