mod config;
mod engine;
mod error;
mod importer;
mod ports;
mod store;
mod types;

pub use config::ImportConfig;
pub use engine::{Translation, Translator, proficiency_bonus};
pub use error::{CoreError, CoreErrorCode};
pub use importer::{
    EMPTY_INPUT_NOTICE, IMPORTING_NOTICE, INVALID_FORMAT_NOTICE, ImportOutcome, Importer,
};
pub use ports::{
    CharacterStore, Clock, NoticeLevel, Notifier, StoreError, SystemClock, UpsertRequest,
};
pub use store::{InMemoryStore, StoredActor};
pub use types::{
    AbilityScore, ActorId, ArmorClass, Attributes, ClassLevel, DEFAULT_ABILITY_SCORE,
    DEFAULT_ARMOR_CLASS, DEFAULT_CLASS_KEY, DEFAULT_SIZE, DEFAULT_WALK_SPEED, Details,
    FALLBACK_CHARACTER_NAME, HitPoints, ImportMetadata, NormalizedSheet, Speed, SyncStatus,
    Traits,
};
