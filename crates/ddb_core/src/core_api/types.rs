use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ability::Ability;

pub const DEFAULT_ABILITY_SCORE: i32 = 10;
pub const DEFAULT_ARMOR_CLASS: i32 = 10;
pub const DEFAULT_WALK_SPEED: i32 = 30;
pub const DEFAULT_SIZE: &str = "med";
pub const DEFAULT_CLASS_KEY: &str = "class";
pub const FALLBACK_CHARACTER_NAME: &str = "Imported Character";

/// A character translated into the host sheet schema.
///
/// Every key is always present; absent source data is filled with the
/// documented defaults. `abilities` only carries the abilities the source
/// listed, so a missing key means "unset" rather than a default score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizedSheet {
    pub name: String,
    pub abilities: BTreeMap<Ability, AbilityScore>,
    pub attributes: Attributes,
    pub details: Details,
    pub traits: Traits,
    pub classes: BTreeMap<String, ClassLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbilityScore {
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attributes {
    pub hp: HitPoints,
    pub ac: ArmorClass,
    pub speed: Speed,
    pub prof: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HitPoints {
    pub value: i32,
    pub max: i32,
    pub temp: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmorClass {
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Speed {
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Details {
    pub race: String,
    pub background: String,
    pub alignment: String,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Traits {
    pub size: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassLevel {
    pub level: i32,
}

impl NormalizedSheet {
    pub fn ability(&self, ability: Ability) -> Option<i32> {
        self.abilities.get(&ability).map(|score| score.value)
    }
}

/// Opaque identity of a record in the character store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Import flags attached to a stored record. Stored verbatim, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    #[serde(default)]
    pub character_url: Option<String>,
    #[serde(default)]
    pub character_id: Option<String>,
    pub last_sync: DateTime<Utc>,
}

impl ImportMetadata {
    pub fn last_sync_iso(&self) -> String {
        self.last_sync.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub character_url: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
}

impl SyncStatus {
    pub fn never() -> Self {
        Self {
            character_url: None,
            last_sync: None,
        }
    }

    pub fn has_stored_url(&self) -> bool {
        self.character_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn last_sync_display(&self) -> String {
        match self.last_sync {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "Never".to_string(),
        }
    }
}

impl From<ImportMetadata> for SyncStatus {
    fn from(metadata: ImportMetadata) -> Self {
        Self {
            character_url: metadata.character_url,
            last_sync: Some(metadata.last_sync),
        }
    }
}
