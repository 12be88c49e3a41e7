use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ddb_core::core_api::{
    ActorId, CharacterStore, ImportMetadata, InMemoryStore, NoticeLevel, Notifier, StoreError,
    UpsertRequest,
};
use tracing::debug;

/// Character records kept in a single JSON file, rewritten after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: InMemoryStore,
}

impl JsonFileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let records = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                StoreError::Backend(format!("{} is not a character store: {e}", path.display()))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => InMemoryStore::new(),
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        debug!(path = %path.display(), records = records.actors().len(), "opened store");

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    fn save(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.records)
            .map_err(|e| StoreError::Backend(format!("failed to serialize store: {e}")))?;
        fs::write(&self.path, text).map_err(|e| {
            StoreError::Backend(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

impl CharacterStore for JsonFileStore {
    fn find_existing(&self, name: &str, actor_type: &str) -> Result<Option<ActorId>, StoreError> {
        self.records.find_existing(name, actor_type)
    }

    fn upsert(&mut self, request: UpsertRequest<'_>) -> Result<ActorId, StoreError> {
        let id = self.records.upsert(request)?;
        self.save()?;
        Ok(id)
    }

    fn stored_metadata(
        &self,
        id: &ActorId,
        flag_scope: &str,
    ) -> Result<Option<ImportMetadata>, StoreError> {
        self.records.stored_metadata(id, flag_scope)
    }
}

/// Writes import notices to stderr so stdout stays machine-readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        eprintln!("[{}] {message}", level.as_str());
    }
}
