use serde::{Deserialize, Serialize};

pub const DEFAULT_FLAG_SCOPE: &str = "nevelish-ddb-importer";
pub const DEFAULT_ACTOR_TYPE: &str = "character";

/// Persistence keys the import workflow hands to the character store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Namespace the import flags (`characterUrl`, `characterId`, `lastSync`) live under.
    pub flag_scope: String,
    /// Record type looked up and created by the importer.
    pub actor_type: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            flag_scope: DEFAULT_FLAG_SCOPE.to_string(),
            actor_type: DEFAULT_ACTOR_TYPE.to_string(),
        }
    }
}
