use std::path::PathBuf;

use ddb_core::ability::Ability;
use ddb_core::core_api::{CoreErrorCode, Translator};
use ddb_core::source::{SourceCharacter, SourceClass, SourceStat};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture(name: &str) -> String {
    let path = workspace_root().join("tests/fixtures").join(name);
    std::fs::read_to_string(&path).expect("fixture should be readable")
}

fn source_from_json(data: &str) -> SourceCharacter {
    serde_json::from_str(data).expect("source should deserialize")
}

fn level(level: i32) -> SourceClass {
    SourceClass {
        level: Some(level),
        definition: None,
    }
}

#[test]
fn full_fixture_maps_every_field() {
    let translation = Translator::new()
        .open_str(&fixture("full_character.json"))
        .expect("fixture should translate");
    let sheet = translation.sheet();

    assert_eq!(translation.character_name(), "Keyleth");
    assert_eq!(
        translation.character_url(),
        Some("https://www.dndbeyond.com/characters/48213377")
    );
    assert_eq!(translation.character_id(), Some("48213377"));

    let scores: Vec<(Ability, i32)> = sheet
        .abilities
        .iter()
        .map(|(ability, score)| (*ability, score.value))
        .collect();
    assert_eq!(
        scores,
        vec![
            (Ability::Str, 10),
            (Ability::Dex, 14),
            (Ability::Con, 13),
            (Ability::Int, 12),
            (Ability::Wis, 17),
            (Ability::Cha, 11),
        ]
    );
    assert_eq!(sheet.attributes.hp.max, 40);
    assert_eq!(sheet.attributes.hp.value, 33);
    assert_eq!(sheet.attributes.hp.temp, 5);
    assert_eq!(sheet.attributes.ac.value, 15);
    assert_eq!(sheet.attributes.speed.value, 35);
    assert_eq!(sheet.attributes.prof, 3);
    assert_eq!(sheet.details.race, "Wood Elf");
    assert_eq!(sheet.details.background, "Outlander");
    assert_eq!(sheet.details.alignment, "ng");
    assert_eq!(sheet.details.level, 8);
    assert_eq!(sheet.traits.size, "med");
    assert_eq!(sheet.classes["druid"].level, 5);
    assert_eq!(sheet.classes["ranger"].level, 3);
}

#[test]
fn no_classes_gives_level_zero_and_level_two_proficiency() {
    let sheet = Translator::new().translate(&SourceCharacter::default());
    assert_eq!(sheet.details.level, 0);
    assert_eq!(sheet.attributes.prof, 2);
}

#[test]
fn primary_class_drives_proficiency_and_all_classes_sum_level() {
    let source = SourceCharacter {
        classes: Some(vec![level(5), level(3)]),
        ..SourceCharacter::default()
    };
    let sheet = Translator::new().translate(&source);

    assert_eq!(sheet.attributes.prof, 3);
    assert_eq!(sheet.details.level, 8);
}

#[test]
fn current_hp_without_removed_field_is_base_plus_bonus() {
    let sheet = Translator::new()
        .translate(&source_from_json(r#"{"baseHitPoints": 10, "bonusHitPoints": 2}"#));
    assert_eq!(sheet.attributes.hp.value, 12);
    assert_eq!(sheet.attributes.hp.max, 12);
}

#[test]
fn explicit_zero_removed_matches_absent_removed() {
    let source =
        source_from_json(r#"{"baseHitPoints": 10, "bonusHitPoints": 2, "removedHitPoints": 0}"#);
    assert_eq!(source.removed_hit_points, Some(0));

    let sheet = Translator::new().translate(&source);
    assert_eq!(sheet.attributes.hp.value, 12);
    assert_eq!(sheet.attributes.hp.max, 12);
}

#[test]
fn removed_hit_points_are_subtracted_without_clamping() {
    let wounded = Translator::new().translate(&source_from_json(
        r#"{"baseHitPoints": 10, "bonusHitPoints": 2, "removedHitPoints": 5}"#,
    ));
    assert_eq!(wounded.attributes.hp.value, 7);
    assert_eq!(wounded.attributes.hp.max, 12);

    let overkill = Translator::new().translate(&source_from_json(
        r#"{"baseHitPoints": 10, "bonusHitPoints": 2, "removedHitPoints": 20}"#,
    ));
    assert_eq!(overkill.attributes.hp.value, -8);
}

#[test]
fn unknown_stat_ids_are_dropped() {
    let source = SourceCharacter {
        stats: Some(vec![
            SourceStat {
                id: Some(1),
                value: Some(16),
            },
            SourceStat {
                id: Some(7),
                value: Some(99),
            },
        ]),
        ..SourceCharacter::default()
    };
    let value = serde_json::to_value(Translator::new().translate(&source)).expect("serialize");

    assert_eq!(value["abilities"], serde_json::json!({"str": {"value": 16}}));
}

#[test]
fn repeated_stat_id_keeps_the_later_value() {
    let sheet = Translator::new().translate(&source_from_json(
        r#"{"stats": [{"id": 1, "value": 8}, {"id": 1, "value": 15}]}"#,
    ));

    assert_eq!(sheet.abilities.len(), 1);
    assert_eq!(sheet.ability(Ability::Str), Some(15));
}

#[test]
fn hit_points_at_the_i32_limits_saturate() {
    let sheet = Translator::new().translate(&source_from_json(
        r#"{"baseHitPoints": 2147483647, "bonusHitPoints": 1, "removedHitPoints": -5}"#,
    ));
    assert_eq!(sheet.attributes.hp.max, i32::MAX);
    assert_eq!(sheet.attributes.hp.value, i32::MAX);

    let drained = Translator::new().translate(&source_from_json(
        r#"{"baseHitPoints": -2147483648, "removedHitPoints": 1}"#,
    ));
    assert_eq!(drained.attributes.hp.value, i32::MIN);
}

#[test]
fn total_level_saturates_instead_of_overflowing() {
    let source = SourceCharacter {
        classes: Some(vec![level(i32::MAX), level(1)]),
        ..SourceCharacter::default()
    };
    let sheet = Translator::new().translate(&source);

    assert_eq!(sheet.details.level, i32::MAX);
}

#[test]
fn float_encoded_numbers_translate_like_integers() {
    let sheet = Translator::new().translate(&source_from_json(
        r#"{
            "armorClass": 15.0,
            "speed": {"walk": 30.0},
            "baseHitPoints": 20.0,
            "stats": [{"id": 3.0, "value": 14.0}],
            "classes": [{"level": 5.0, "definition": {"name": "Druid"}}]
        }"#,
    ));

    assert_eq!(sheet.attributes.ac.value, 15);
    assert_eq!(sheet.attributes.speed.value, 30);
    assert_eq!(sheet.attributes.hp.max, 20);
    assert_eq!(sheet.ability(Ability::Con), Some(14));
    assert_eq!(sheet.classes["druid"].level, 5);
    assert_eq!(sheet.attributes.prof, 3);
}

#[test]
fn alignment_codes_follow_the_fixed_table() {
    let translator = Translator::new();
    let code = |raw: &str| translator.translate(&source_from_json(raw)).details.alignment;

    assert_eq!(code(r#"{"alignmentId": 4}"#), "ln");
    assert_eq!(code(r#"{"alignmentId": 99}"#), "");
    assert_eq!(code(r#"{}"#), "");
}

#[test]
fn translating_twice_is_byte_identical() {
    let raw = fixture("full_character.json");
    let translator = Translator::new();
    let first = serde_json::to_vec(translator.open_str(&raw).expect("first").sheet())
        .expect("serialize");
    let second = serde_json::to_vec(translator.open_str(&raw).expect("second").sheet())
        .expect("serialize");

    assert_eq!(first, second);
}

#[test]
fn minimal_fixture_uses_defaults() {
    let translation = Translator::new()
        .open_str(&fixture("minimal_character.json"))
        .expect("minimal should translate");

    assert_eq!(translation.character_name(), "Imported Character");
    assert_eq!(translation.character_url(), None);
    assert_eq!(translation.sheet().attributes.ac.value, 10);
    assert_eq!(translation.sheet().attributes.speed.value, 30);
}

#[test]
fn missing_character_data_is_invalid_payload() {
    let err = Translator::new()
        .open_str(&fixture("missing_character_data.json"))
        .expect_err("should be rejected");
    assert_eq!(err.code, CoreErrorCode::InvalidPayload);
}

#[test]
fn missing_data_section_is_malformed_character() {
    let err = Translator::new()
        .open_str(&fixture("no_data_section.json"))
        .expect_err("should be rejected");
    assert_eq!(err.code, CoreErrorCode::MalformedCharacter);
}
