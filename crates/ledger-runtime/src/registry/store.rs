use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    AcademicRecord, ApprovalVote, Approver, ApproverId, BlockId, BlockRow, LedgerBlock, Owner,
    OwnerId, RecordId,
};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::state::{RecordDraft, RegistryState};
use super::{RecordRegistry, RegistryError, RegistryResult};

/// Where a registry writes its state after each mutation.
pub trait Snapshotter: Send + Sync {
    fn persist(&self, state: &RegistryState) -> RegistryResult<()>;
}

/// Keeps state in memory only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPersistence;

impl Snapshotter for NoPersistence {
    fn persist(&self, _state: &RegistryState) -> RegistryResult<()> {
        Ok(())
    }
}

/// Writes state as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RegistryResult<RegistryState> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RegistryState::default()),
            Err(e) => return Err(io_error(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RegistryState::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| RegistryError::Corrupted {
            reason: e.to_string(),
        })
    }
}

impl Snapshotter for JsonSnapshot {
    fn persist(&self, state: &RegistryState) -> RegistryResult<()> {
        let bytes = serde_json::to_vec_pretty(state).map_err(io_error)?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        drop(file);

        std::fs::rename(&temp_path, &self.path).map_err(io_error)
    }
}

fn io_error(err: impl std::fmt::Display) -> RegistryError {
    RegistryError::Io {
        message: err.to_string(),
    }
}

/// Registry over a [`RegistryState`] guarded by a mutex.
///
/// A mutation runs on a copy of the state; the copy replaces the live state
/// only after it has been persisted, so a failed write changes nothing.
pub struct StateRegistry<S: Snapshotter> {
    state: Mutex<RegistryState>,
    snapshotter: S,
}

/// Process-local registry for tests and dry runs.
pub type InMemoryRegistry = StateRegistry<NoPersistence>;

/// Registry persisted to a JSON document.
pub type JsonFileRegistry = StateRegistry<JsonSnapshot>;

impl StateRegistry<NoPersistence> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            snapshotter: NoPersistence,
        }
    }
}

impl Default for StateRegistry<NoPersistence> {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRegistry<JsonSnapshot> {
    /// Open the document at `path`, creating the parent directory if needed.
    ///
    /// An absent file is an empty registry; an undecodable one is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> RegistryResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let snapshotter = JsonSnapshot { path };
        let state = snapshotter.load()?;
        tracing::info!(
            "[runtime] 💾 Registry {} loaded ({} records, {} block rows)",
            snapshotter.path.display(),
            state.records.len(),
            state.block_rows.len()
        );

        Ok(Self {
            state: Mutex::new(state),
            snapshotter,
        })
    }
}

impl<S: Snapshotter> StateRegistry<S> {
    /// Copy of the whole state.
    pub fn snapshot(&self) -> RegistryState {
        self.state.lock().clone()
    }

    fn read<T>(&self, f: impl FnOnce(&RegistryState) -> T) -> T {
        f(&self.state.lock())
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut RegistryState) -> RegistryResult<T>) -> RegistryResult<T> {
        let mut guard = self.state.lock();
        let mut next = guard.clone();
        let value = f(&mut next)?;
        self.snapshotter.persist(&next)?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl<S: Snapshotter> RecordRegistry for StateRegistry<S> {
    async fn insert_owner(&self, owner: Owner) -> RegistryResult<Owner> {
        self.mutate(|s| s.insert_owner(owner))
    }

    async fn owner(&self, id: &OwnerId) -> RegistryResult<Option<Owner>> {
        Ok(self.read(|s| s.owner(id).cloned()))
    }

    async fn create_record(&self, draft: RecordDraft) -> RegistryResult<AcademicRecord> {
        self.mutate(|s| s.create_record(draft))
    }

    async fn insert_record(&self, record: AcademicRecord) -> RegistryResult<AcademicRecord> {
        self.mutate(|s| s.insert_record(record))
    }

    async fn record(&self, id: RecordId) -> RegistryResult<Option<AcademicRecord>> {
        Ok(self.read(|s| s.record(id).cloned()))
    }

    async fn records_of(&self, owner: &OwnerId) -> RegistryResult<Vec<AcademicRecord>> {
        Ok(self.read(|s| s.records_of(owner)))
    }

    async fn create_approver(&self, username: &str) -> RegistryResult<Approver> {
        self.mutate(|s| s.create_approver(username))
    }

    async fn approver(&self, id: ApproverId) -> RegistryResult<Option<Approver>> {
        Ok(self.read(|s| s.approver(id).cloned()))
    }

    async fn approver_by_username(&self, username: &str) -> RegistryResult<Option<Approver>> {
        Ok(self.read(|s| s.approver_by_username(username).cloned()))
    }

    async fn insert_block_row(
        &self,
        record_id: RecordId,
        block: LedgerBlock,
        approved: bool,
    ) -> RegistryResult<BlockRow> {
        self.mutate(|s| s.insert_block_row(record_id, block, approved))
    }

    async fn block_row(&self, id: BlockId) -> RegistryResult<Option<BlockRow>> {
        Ok(self.read(|s| s.block_row(id).cloned()))
    }

    async fn block_row_for_record(&self, record_id: RecordId) -> RegistryResult<Option<BlockRow>> {
        Ok(self.read(|s| s.block_row_for_record(record_id).cloned()))
    }

    async fn rebase_block_row(&self, id: BlockId, block: LedgerBlock) -> RegistryResult<BlockRow> {
        self.mutate(|s| s.rebase_block_row(id, block))
    }

    async fn block_rows(&self) -> RegistryResult<Vec<BlockRow>> {
        Ok(self.read(|s| s.block_rows.clone()))
    }

    async fn mark_block_approved(&self, id: BlockId) -> RegistryResult<()> {
        self.mutate(|s| s.mark_block_approved(id))
    }

    async fn insert_vote(&self, vote: ApprovalVote) -> RegistryResult<()> {
        self.mutate(|s| s.insert_vote(vote))
    }

    async fn votes_for_block(&self, id: BlockId) -> RegistryResult<Vec<ApprovalVote>> {
        Ok(self.read(|s| s.votes_for_block(id)))
    }

    async fn votes_by_approver(&self, id: ApproverId) -> RegistryResult<Vec<ApprovalVote>> {
        Ok(self.read(|s| s.votes_by_approver(id)))
    }
}
