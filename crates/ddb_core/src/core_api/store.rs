use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::ports::{CharacterStore, StoreError, UpsertRequest};
use super::types::{ActorId, ImportMetadata, NormalizedSheet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoredActor {
    pub id: ActorId,
    pub name: String,
    #[serde(rename = "type")]
    pub actor_type: String,
    pub system: NormalizedSheet,
    #[serde(default)]
    pub flags: BTreeMap<String, JsonMap<String, JsonValue>>,
}

/// A `CharacterStore` that keeps records in memory.
///
/// Serializable, so front ends can persist it between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InMemoryStore {
    actors: Vec<StoredActor>,
    next_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actors(&self) -> &[StoredActor] {
        &self.actors
    }

    pub fn get(&self, id: &ActorId) -> Option<&StoredActor> {
        self.actors.iter().find(|actor| actor.id == *id)
    }

    fn allocate_id(&mut self) -> ActorId {
        self.next_id += 1;
        ActorId(format!("actor{:04}", self.next_id))
    }
}

impl CharacterStore for InMemoryStore {
    fn find_existing(&self, name: &str, actor_type: &str) -> Result<Option<ActorId>, StoreError> {
        Ok(self
            .actors
            .iter()
            .find(|actor| actor.name == name && actor.actor_type == actor_type)
            .map(|actor| actor.id.clone()))
    }

    fn upsert(&mut self, request: UpsertRequest<'_>) -> Result<ActorId, StoreError> {
        let flags = metadata_flags(request.metadata)?;

        match request.existing {
            Some(id) => {
                let actor = self
                    .actors
                    .iter_mut()
                    .find(|actor| actor.id == *id)
                    .ok_or_else(|| StoreError::NotFound(id.clone()))?;
                // An update keeps the record's own name.
                actor.system = request.sheet.clone();
                actor
                    .flags
                    .entry(request.flag_scope.to_string())
                    .or_default()
                    .extend(flags);
                Ok(actor.id.clone())
            }
            None => {
                let id = self.allocate_id();
                let mut all_flags = BTreeMap::new();
                all_flags.insert(request.flag_scope.to_string(), flags);
                self.actors.push(StoredActor {
                    id: id.clone(),
                    name: request.sheet.name.clone(),
                    actor_type: request.actor_type.to_string(),
                    system: request.sheet.clone(),
                    flags: all_flags,
                });
                Ok(id)
            }
        }
    }

    fn stored_metadata(
        &self,
        id: &ActorId,
        flag_scope: &str,
    ) -> Result<Option<ImportMetadata>, StoreError> {
        let actor = self
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let Some(scope) = actor.flags.get(flag_scope) else {
            return Ok(None);
        };
        if !scope.contains_key("lastSync") {
            return Ok(None);
        }
        serde_json::from_value(JsonValue::Object(scope.clone()))
            .map(Some)
            .map_err(|e| StoreError::CorruptFlags(e.to_string()))
    }
}

fn metadata_flags(metadata: &ImportMetadata) -> Result<JsonMap<String, JsonValue>, StoreError> {
    match serde_json::to_value(metadata) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(_) => Err(StoreError::Backend(
            "import flags did not serialize to an object".to_string(),
        )),
        Err(e) => Err(StoreError::Backend(e.to_string())),
    }
}
