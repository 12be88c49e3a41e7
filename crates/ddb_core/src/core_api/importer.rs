use tracing::{debug, error, info, warn};

use crate::envelope::parse_envelope;

use super::config::ImportConfig;
use super::engine::Translator;
use super::error::{CoreError, CoreErrorCode};
use super::ports::{CharacterStore, Clock, NoticeLevel, Notifier, SystemClock, UpsertRequest};
use super::types::{ActorId, SyncStatus};

pub const EMPTY_INPUT_NOTICE: &str = "Please paste character data from D&D Beyond extension";
pub const INVALID_FORMAT_NOTICE: &str =
    "Invalid data format. Please use 'Copy Character Data' from the extension.";
pub const IMPORTING_NOTICE: &str = "Importing character...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub actor_id: ActorId,
    pub name: String,
    pub created: bool,
}

/// Runs one import: parse, translate, find-or-create, notify.
///
/// Translation always completes before the store is touched, so a rejected
/// payload never leaves a partial record behind.
#[derive(Debug)]
pub struct Importer<S, N, C = SystemClock> {
    translator: Translator,
    store: S,
    notifier: N,
    clock: C,
    config: ImportConfig,
}

impl<S, N> Importer<S, N, SystemClock>
where
    S: CharacterStore,
    N: Notifier,
{
    pub fn new(store: S, notifier: N, config: ImportConfig) -> Self {
        Self::with_clock(store, notifier, SystemClock, config)
    }
}

impl<S, N, C> Importer<S, N, C>
where
    S: CharacterStore,
    N: Notifier,
    C: Clock,
{
    pub fn with_clock(store: S, notifier: N, clock: C, config: ImportConfig) -> Self {
        Self {
            translator: Translator::new(),
            store,
            notifier,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Imports pasted envelope text. With `target`, that record is updated
    /// regardless of its name; otherwise a record is looked up by name and
    /// type and created when none exists.
    pub fn import_text(
        &mut self,
        raw: &str,
        target: Option<&ActorId>,
    ) -> Result<ImportOutcome, CoreError> {
        if raw.trim().is_empty() {
            warn!("import requested without any pasted data");
            self.notifier.notify(NoticeLevel::Error, EMPTY_INPUT_NOTICE);
            return Err(CoreError::new(
                CoreErrorCode::InvalidPayload,
                "no character data was supplied",
            ));
        }

        let envelope = match parse_envelope(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "rejected import payload");
                if err.is_wrong_format() {
                    self.notifier.notify(NoticeLevel::Error, INVALID_FORMAT_NOTICE);
                } else {
                    self.notifier
                        .notify(NoticeLevel::Error, &format!("Import failed: {err}"));
                }
                return Err(err.into());
            }
        };

        self.notifier.notify(NoticeLevel::Info, IMPORTING_NOTICE);

        let translation = self.translator.open_envelope(envelope);
        let name = translation.character_name().to_string();
        debug!(
            name = %name,
            character_id = translation.character_id().unwrap_or("-"),
            "translated character"
        );

        let existing = match target {
            Some(id) => Some(id.clone()),
            None => match self.store.find_existing(&name, &self.config.actor_type) {
                Ok(found) => found,
                Err(err) => return Err(self.report_failure(err.into())),
            },
        };

        let metadata = translation.metadata(self.clock.now());
        let request = UpsertRequest {
            existing: existing.as_ref(),
            actor_type: &self.config.actor_type,
            flag_scope: &self.config.flag_scope,
            sheet: translation.sheet(),
            metadata: &metadata,
        };
        let actor_id = match self.store.upsert(request) {
            Ok(id) => id,
            Err(err) => return Err(self.report_failure(err.into())),
        };

        let created = existing.is_none();
        if created {
            info!(actor = %actor_id, name = %name, "created character record");
            self.notifier.notify(
                NoticeLevel::Info,
                &format!("Created new character: {name}"),
            );
        } else {
            info!(actor = %actor_id, name = %name, "updated character record");
            self.notifier
                .notify(NoticeLevel::Info, &format!("Updated character: {name}"));
        }
        self.notifier.notify(
            NoticeLevel::Success,
            &format!("Character \"{name}\" imported successfully!"),
        );

        Ok(ImportOutcome {
            actor_id,
            name,
            created,
        })
    }

    /// Source URL and last sync time stored on a record by earlier imports.
    pub fn sync_status(&self, actor: &ActorId) -> Result<SyncStatus, CoreError> {
        let metadata = self.store.stored_metadata(actor, &self.config.flag_scope)?;
        Ok(metadata.map_or_else(SyncStatus::never, SyncStatus::from))
    }

    fn report_failure(&self, err: CoreError) -> CoreError {
        error!(error = %err, "character import failed");
        self.notifier
            .notify(NoticeLevel::Error, &format!("Import failed: {}", err.message));
        err
    }
}
