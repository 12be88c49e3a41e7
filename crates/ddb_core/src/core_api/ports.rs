//! Capabilities the import workflow needs from its host.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::error::{CoreError, CoreErrorCode};
use super::types::{ActorId, ImportMetadata, NormalizedSheet};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no character record with id {0}")]
    NotFound(ActorId),
    #[error("stored import flags are unreadable: {0}")]
    CorruptFlags(String),
    #[error("character store failed: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::new(CoreErrorCode::Store, err.to_string())
    }
}

/// Everything a store needs to create or update one record.
#[derive(Debug, Clone, Copy)]
pub struct UpsertRequest<'a> {
    /// Record to update; `None` creates a new one named after the sheet.
    pub existing: Option<&'a ActorId>,
    pub actor_type: &'a str,
    pub flag_scope: &'a str,
    pub sheet: &'a NormalizedSheet,
    pub metadata: &'a ImportMetadata,
}

pub trait CharacterStore {
    fn find_existing(&self, name: &str, actor_type: &str) -> Result<Option<ActorId>, StoreError>;

    /// Creates or updates a record. Updates merge the new flags over the
    /// record's existing ones.
    fn upsert(&mut self, request: UpsertRequest<'_>) -> Result<ActorId, StoreError>;

    fn stored_metadata(
        &self,
        id: &ActorId,
        flag_scope: &str,
    ) -> Result<Option<ImportMetadata>, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// User-facing notifications (the host's toast area, a terminal, ...).
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);
}

#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
