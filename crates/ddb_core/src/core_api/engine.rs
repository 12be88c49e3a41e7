use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::ability::Ability;
use crate::alignment::Alignment;
use crate::envelope::{Envelope, parse_envelope};
use crate::source::SourceCharacter;

use super::error::CoreError;
use super::types::{
    AbilityScore, ArmorClass, Attributes, ClassLevel, DEFAULT_ABILITY_SCORE, DEFAULT_ARMOR_CLASS,
    DEFAULT_CLASS_KEY, DEFAULT_SIZE, DEFAULT_WALK_SPEED, Details, FALLBACK_CHARACTER_NAME,
    HitPoints, ImportMetadata, NormalizedSheet, Speed, Traits,
};

/// Maps D&D Beyond character documents onto the host sheet schema.
///
/// Stateless: translating the same document twice yields identical sheets.
#[derive(Debug, Default, Clone, Copy)]
pub struct Translator;

/// A translated envelope: the sheet plus the opaque source identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    sheet: NormalizedSheet,
    character_url: Option<String>,
    character_id: Option<String>,
}

impl Translator {
    pub fn new() -> Self {
        Self
    }

    pub fn open_str(&self, raw: &str) -> Result<Translation, CoreError> {
        let envelope = parse_envelope(raw)?;
        Ok(self.open_envelope(envelope))
    }

    pub fn open_envelope(&self, envelope: Envelope) -> Translation {
        Translation {
            sheet: self.translate(&envelope.character),
            character_url: envelope.character_url,
            character_id: envelope.character_id,
        }
    }

    pub fn translate(&self, source: &SourceCharacter) -> NormalizedSheet {
        let classes = source.classes();
        let primary_level = classes
            .first()
            .and_then(|c| present(c.level))
            .unwrap_or(1);

        NormalizedSheet {
            name: source
                .name
                .as_deref()
                .filter(|name| !name.is_empty())
                .unwrap_or(FALLBACK_CHARACTER_NAME)
                .to_string(),
            abilities: collect_abilities(source),
            attributes: Attributes {
                hp: hit_points(source),
                ac: ArmorClass {
                    value: present(source.armor_class).unwrap_or(DEFAULT_ARMOR_CLASS),
                },
                speed: Speed {
                    value: present(source.walk_speed()).unwrap_or(DEFAULT_WALK_SPEED),
                },
                prof: proficiency_bonus(primary_level),
            },
            details: Details {
                race: source.race_name().unwrap_or_default().to_string(),
                background: source.background_name().unwrap_or_default().to_string(),
                alignment: Alignment::code_for(source.alignment_id).to_string(),
                level: classes
                    .iter()
                    .map(|c| c.level.unwrap_or(0))
                    .fold(0, i32::saturating_add),
            },
            traits: Traits {
                size: source
                    .race_size()
                    .filter(|size| !size.is_empty())
                    .unwrap_or(DEFAULT_SIZE)
                    .to_string(),
            },
            classes: collect_classes(source),
        }
    }
}

impl Translation {
    pub fn sheet(&self) -> &NormalizedSheet {
        &self.sheet
    }

    pub fn into_sheet(self) -> NormalizedSheet {
        self.sheet
    }

    pub fn character_name(&self) -> &str {
        &self.sheet.name
    }

    pub fn character_url(&self) -> Option<&str> {
        self.character_url.as_deref()
    }

    pub fn character_id(&self) -> Option<&str> {
        self.character_id.as_deref()
    }

    pub fn metadata(&self, imported_at: DateTime<Utc>) -> ImportMetadata {
        ImportMetadata {
            character_url: self.character_url.clone(),
            character_id: self.character_id.clone(),
            last_sync: imported_at,
        }
    }
}

/// `ceil(level / 4) + 1`.
pub fn proficiency_bonus(level: i32) -> i32 {
    (f64::from(level) / 4.0).ceil() as i32 + 1
}

// The extension writes 0 where it has no value; such fields fall back to
// their defaults just like absent ones.
fn present(value: Option<i32>) -> Option<i32> {
    value.filter(|&v| v != 0)
}

fn collect_abilities(source: &SourceCharacter) -> BTreeMap<Ability, AbilityScore> {
    let mut out = BTreeMap::new();
    for stat in source.stats() {
        let Some(ability) = stat.id.and_then(Ability::from_id) else {
            continue;
        };
        out.insert(
            ability,
            AbilityScore {
                value: present(stat.value).unwrap_or(DEFAULT_ABILITY_SCORE),
            },
        );
    }
    out
}

fn hit_points(source: &SourceCharacter) -> HitPoints {
    let max = source
        .base_hit_points
        .unwrap_or(0)
        .saturating_add(source.bonus_hit_points.unwrap_or(0));
    // Presence of `removedHitPoints` picks the formula. Negative results are
    // kept; only the i32 range bounds them.
    let value = match source.removed_hit_points {
        Some(removed) => max.saturating_sub(removed),
        None => max,
    };
    HitPoints {
        value,
        max,
        temp: source.temporary_hit_points.unwrap_or(0),
    }
}

// Keys are lowercased class names, so two classes that differ only in case
// share a key and the later entry replaces the earlier one.
fn collect_classes(source: &SourceCharacter) -> BTreeMap<String, ClassLevel> {
    let mut out = BTreeMap::new();
    for class in source.classes() {
        let key = class
            .name()
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_CLASS_KEY.to_string());
        out.insert(
            key,
            ClassLevel {
                level: present(class.level).unwrap_or(1),
            },
        );
    }
    out
}
