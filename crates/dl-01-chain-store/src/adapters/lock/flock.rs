//! # File Lock Implementation
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

use crate::domain::errors::ChainStoreError;

/// How long `acquire` keeps retrying before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors from ledger locking
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created
    #[error("Failed to create lock file: {0}")]
    CreateFailed(io::Error),
    /// Ledger is already locked by another holder
    #[error("Ledger already in use ({})", path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },
    /// Failed to write PID to lock file
    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(io::Error),
}

impl From<LockError> for ChainStoreError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::AlreadyLocked { pid, path } => ChainStoreError::LedgerLocked { path, pid },
            other => ChainStoreError::io(other),
        }
    }
}

// =============================================================================
// LEDGER LOCK
// =============================================================================

/// Exclusive lock guarding one ledger file.
///
/// Held for the lifetime of the value, released on drop (RAII).
///
/// # Example
///
/// ```ignore
/// let lock = LedgerLock::acquire(Path::new("data/blockchain.lock"), DEFAULT_LOCK_TIMEOUT)?;
/// // Lock is held until `lock` goes out of scope
/// ```
#[derive(Debug)]
pub struct LedgerLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
    /// PID of this process
    pid: u32,
}

impl LedgerLock {
    /// Acquire an exclusive lock at `lock_path`.
    ///
    /// Retries with exponential backoff until `timeout` expires.
    ///
    /// # Errors
    ///
    /// Returns `LockError::AlreadyLocked` if another holder keeps the lock
    /// past the timeout.
    pub fn acquire(lock_path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let deadline = Instant::now() + timeout;
        let mut retry_delay = Duration::from_millis(25);

        loop {
            // Do not truncate before holding the lock: the holder's PID stays readable
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(lock_path)
                .map_err(LockError::CreateFailed)?;

            match file.try_lock_exclusive() {
                Ok(()) => {
                    let pid = std::process::id();
                    let mut locked_file = file;
                    locked_file.set_len(0).map_err(LockError::WriteFailed)?;
                    writeln!(locked_file, "{}", pid).map_err(LockError::WriteFailed)?;
                    locked_file.sync_all().map_err(LockError::WriteFailed)?;

                    tracing::debug!("[dl-01] 🔒 Acquired ledger lock {}", lock_path.display());
                    return Ok(Self {
                        file: locked_file,
                        path: lock_path.to_path_buf(),
                        pid,
                    });
                }
                Err(_) => {
                    drop(file);

                    if Instant::now() >= deadline {
                        return Err(LockError::AlreadyLocked {
                            pid: Self::read_existing_pid(lock_path),
                            path: lock_path.to_path_buf(),
                        });
                    }

                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
            }
        }
    }

    /// Get the PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read PID from existing lock file (for error messages)
    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
