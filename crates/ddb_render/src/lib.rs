use std::fmt::Write as _;

use ddb_core::ability::Ability;
use ddb_core::core_api::{ImportConfig, ImportMetadata, NormalizedSheet};
use serde_json::{Map as JsonMap, Value as JsonValue};

const LABEL_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: bool,
    pub abilities: bool,
    pub hp: bool,
    pub max_hp: bool,
    pub temp_hp: bool,
    pub ac: bool,
    pub speed: bool,
    pub prof: bool,
    pub race: bool,
    pub background: bool,
    pub alignment: bool,
    pub level: bool,
    pub size: bool,
    pub classes: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.name
            || self.abilities
            || self.hp
            || self.max_hp
            || self.temp_hp
            || self.ac
            || self.speed
            || self.prof
            || self.race
            || self.background
            || self.alignment
            || self.level
            || self.size
            || self.classes
    }
}

/// The whole sheet, top-level keys in canonical order.
pub fn render_json_full(sheet: &NormalizedSheet, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(sheet)),
    }
}

/// The record shape the host stores: sheet data under `system` and the
/// import flags under the configured scope.
pub fn render_actor_document(
    sheet: &NormalizedSheet,
    metadata: Option<&ImportMetadata>,
    config: &ImportConfig,
) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("name".to_string(), JsonValue::String(sheet.name.clone()));
    out.insert(
        "type".to_string(),
        JsonValue::String(config.actor_type.clone()),
    );
    out.insert("system".to_string(), system_json(sheet));

    let mut flags = JsonMap::new();
    if let Some(metadata) = metadata {
        flags.insert(
            config.flag_scope.clone(),
            JsonValue::Object(metadata_json(metadata)),
        );
    }
    out.insert("flags".to_string(), JsonValue::Object(flags));

    JsonValue::Object(out)
}

pub fn render_json_selected(
    sheet: &NormalizedSheet,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(fields, sheet)),
    }
}

/// `key=value` pairs for the selected fields, in canonical order.
pub fn selected_pairs(
    sheet: &NormalizedSheet,
    fields: &FieldSelection,
) -> Vec<(&'static str, String)> {
    let hp = &sheet.attributes.hp;
    let mut out = Vec::new();

    if fields.name {
        out.push(("name", sheet.name.clone()));
    }
    if fields.abilities {
        for (ability, score) in &sheet.abilities {
            out.push(("ability", format!("{}={}", ability.key(), score.value)));
        }
    }
    if fields.hp {
        out.push(("hp", hp.value.to_string()));
    }
    if fields.max_hp {
        out.push(("max_hp", hp.max.to_string()));
    }
    if fields.temp_hp {
        out.push(("temp_hp", hp.temp.to_string()));
    }
    if fields.ac {
        out.push(("ac", sheet.attributes.ac.value.to_string()));
    }
    if fields.speed {
        out.push(("speed", sheet.attributes.speed.value.to_string()));
    }
    if fields.prof {
        out.push(("prof", sheet.attributes.prof.to_string()));
    }
    if fields.race {
        out.push(("race", sheet.details.race.clone()));
    }
    if fields.background {
        out.push(("background", sheet.details.background.clone()));
    }
    if fields.alignment {
        out.push(("alignment", sheet.details.alignment.clone()));
    }
    if fields.level {
        out.push(("level", sheet.details.level.to_string()));
    }
    if fields.size {
        out.push(("size", sheet.traits.size.clone()));
    }
    if fields.classes {
        for (name, class) in &sheet.classes {
            out.push(("class", format!("{name}={}", class.level)));
        }
    }

    out
}

pub fn render_text(sheet: &NormalizedSheet) -> String {
    let details = &sheet.details;
    let attributes = &sheet.attributes;
    let mut out = String::new();

    let _ = writeln!(out, "{}", sheet.name);
    let _ = writeln!(out, "{}", "=".repeat(sheet.name.chars().count().max(1)));
    push_row(&mut out, "Race", or_dash(&details.race));
    push_row(&mut out, "Background", or_dash(&details.background));
    push_row(&mut out, "Alignment", or_dash(&details.alignment));
    push_row(&mut out, "Size", &sheet.traits.size);
    push_row(&mut out, "Level", &details.level.to_string());
    push_row(&mut out, "Classes", &format_classes(sheet));
    out.push('\n');

    for ability in Ability::ALL {
        let value = match sheet.ability(ability) {
            Some(score) => format!("{score:>2} ({})", format_modifier(score)),
            None => "--".to_string(),
        };
        push_row(&mut out, ability.label(), &value);
    }
    out.push('\n');

    let hp = &attributes.hp;
    let hp_value = if hp.temp > 0 {
        format!("{}/{} (+{} temp)", hp.value, hp.max, hp.temp)
    } else {
        format!("{}/{}", hp.value, hp.max)
    };
    push_row(&mut out, "Hit Points", &hp_value);
    push_row(&mut out, "Armor Class", &attributes.ac.value.to_string());
    push_row(&mut out, "Speed", &format!("{} ft.", attributes.speed.value));
    push_row(&mut out, "Proficiency", &format!("+{}", attributes.prof));

    out
}

fn default_json(sheet: &NormalizedSheet) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert("name".to_string(), JsonValue::String(sheet.name.clone()));
    out.insert("abilities".to_string(), abilities_to_json(sheet));
    out.insert("attributes".to_string(), attributes_to_json(sheet));
    out.insert("details".to_string(), details_to_json(sheet));
    out.insert("traits".to_string(), traits_to_json(sheet));
    out.insert("classes".to_string(), classes_to_json(sheet));
    out
}

fn system_json(sheet: &NormalizedSheet) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("abilities".to_string(), abilities_to_json(sheet));
    out.insert("attributes".to_string(), attributes_to_json(sheet));
    out.insert("details".to_string(), details_to_json(sheet));
    out.insert("traits".to_string(), traits_to_json(sheet));
    JsonValue::Object(out)
}

fn selected_json(fields: &FieldSelection, sheet: &NormalizedSheet) -> JsonMap<String, JsonValue> {
    let hp = &sheet.attributes.hp;
    let mut out = JsonMap::new();

    if fields.name {
        out.insert("name".to_string(), JsonValue::String(sheet.name.clone()));
    }
    if fields.abilities {
        out.insert("abilities".to_string(), abilities_to_json(sheet));
    }
    if fields.hp {
        out.insert("hp".to_string(), JsonValue::from(hp.value));
    }
    if fields.max_hp {
        out.insert("max_hp".to_string(), JsonValue::from(hp.max));
    }
    if fields.temp_hp {
        out.insert("temp_hp".to_string(), JsonValue::from(hp.temp));
    }
    if fields.ac {
        out.insert(
            "ac".to_string(),
            JsonValue::from(sheet.attributes.ac.value),
        );
    }
    if fields.speed {
        out.insert(
            "speed".to_string(),
            JsonValue::from(sheet.attributes.speed.value),
        );
    }
    if fields.prof {
        out.insert("prof".to_string(), JsonValue::from(sheet.attributes.prof));
    }
    if fields.race {
        out.insert(
            "race".to_string(),
            JsonValue::String(sheet.details.race.clone()),
        );
    }
    if fields.background {
        out.insert(
            "background".to_string(),
            JsonValue::String(sheet.details.background.clone()),
        );
    }
    if fields.alignment {
        out.insert(
            "alignment".to_string(),
            JsonValue::String(sheet.details.alignment.clone()),
        );
    }
    if fields.level {
        out.insert("level".to_string(), JsonValue::from(sheet.details.level));
    }
    if fields.size {
        out.insert(
            "size".to_string(),
            JsonValue::String(sheet.traits.size.clone()),
        );
    }
    if fields.classes {
        out.insert("classes".to_string(), classes_to_json(sheet));
    }

    out
}

fn abilities_to_json(sheet: &NormalizedSheet) -> JsonValue {
    let mut out = JsonMap::new();
    for (ability, score) in &sheet.abilities {
        out.insert(ability.key().to_string(), value_object(score.value));
    }
    JsonValue::Object(out)
}

fn attributes_to_json(sheet: &NormalizedSheet) -> JsonValue {
    let attributes = &sheet.attributes;

    let mut hp = JsonMap::new();
    hp.insert("value".to_string(), JsonValue::from(attributes.hp.value));
    hp.insert("max".to_string(), JsonValue::from(attributes.hp.max));
    hp.insert("temp".to_string(), JsonValue::from(attributes.hp.temp));

    let mut out = JsonMap::new();
    out.insert("hp".to_string(), JsonValue::Object(hp));
    out.insert("ac".to_string(), value_object(attributes.ac.value));
    out.insert("speed".to_string(), value_object(attributes.speed.value));
    out.insert("prof".to_string(), JsonValue::from(attributes.prof));
    JsonValue::Object(out)
}

fn details_to_json(sheet: &NormalizedSheet) -> JsonValue {
    let details = &sheet.details;
    let mut out = JsonMap::new();
    out.insert("race".to_string(), JsonValue::String(details.race.clone()));
    out.insert(
        "background".to_string(),
        JsonValue::String(details.background.clone()),
    );
    out.insert(
        "alignment".to_string(),
        JsonValue::String(details.alignment.clone()),
    );
    out.insert("level".to_string(), JsonValue::from(details.level));
    JsonValue::Object(out)
}

fn traits_to_json(sheet: &NormalizedSheet) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "size".to_string(),
        JsonValue::String(sheet.traits.size.clone()),
    );
    JsonValue::Object(out)
}

fn classes_to_json(sheet: &NormalizedSheet) -> JsonValue {
    let mut out = JsonMap::new();
    for (name, class) in &sheet.classes {
        let mut m = JsonMap::new();
        m.insert("level".to_string(), JsonValue::from(class.level));
        out.insert(name.clone(), JsonValue::Object(m));
    }
    JsonValue::Object(out)
}

fn metadata_json(metadata: &ImportMetadata) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert(
        "characterUrl".to_string(),
        metadata
            .character_url
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    out.insert(
        "characterId".to_string(),
        metadata
            .character_id
            .clone()
            .map_or(JsonValue::Null, JsonValue::String),
    );
    out.insert(
        "lastSync".to_string(),
        JsonValue::String(metadata.last_sync_iso()),
    );
    out
}

fn value_object(value: i32) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("value".to_string(), JsonValue::from(value));
    JsonValue::Object(m)
}

fn push_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{label:>width$}: {value}", width = LABEL_WIDTH);
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn format_classes(sheet: &NormalizedSheet) -> String {
    if sheet.classes.is_empty() {
        return "none".to_string();
    }
    sheet
        .classes
        .iter()
        .map(|(name, class)| format!("{name} {}", class.level))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_modifier(score: i32) -> String {
    let modifier = score.saturating_sub(10).div_euclid(2);
    if modifier >= 0 {
        format!("+{modifier}")
    } else {
        modifier.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_modifier;

    #[test]
    fn modifiers_round_down() {
        assert_eq!(format_modifier(10), "+0");
        assert_eq!(format_modifier(11), "+0");
        assert_eq!(format_modifier(17), "+3");
        assert_eq!(format_modifier(9), "-1");
        assert_eq!(format_modifier(1), "-5");
        assert_eq!(format_modifier(i32::MIN), (-1_073_741_824).to_string());
        assert_eq!(format_modifier(i32::MAX), "+1073741818");
    }
}
