//! Parsing of the transport envelope produced by the browser extension's
//! "Copy Character Data" action.

use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use crate::core_api::{CoreError, CoreErrorCode};
use crate::source::SourceCharacter;

pub const CHARACTER_DATA_KEY: &str = "characterData";
pub const DATA_KEY: &str = "data";
pub const CHARACTER_URL_KEY: &str = "characterUrl";
pub const CHARACTER_ID_KEY: &str = "characterId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub character: SourceCharacter,
    pub character_url: Option<String>,
    pub character_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("input is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("envelope must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("envelope has no `characterData` object")]
    MissingCharacterData,
    #[error("`characterData` has no `data` object")]
    MissingData,
    #[error("`characterData.data` must be an object, found {0}")]
    DataNotAnObject(&'static str),
    #[error("character data does not match the expected shape: {0}")]
    CharacterShape(#[source] serde_json::Error),
}

impl EnvelopeError {
    pub fn code(&self) -> CoreErrorCode {
        match self {
            Self::Syntax(_) | Self::NotAnObject(_) | Self::MissingCharacterData => {
                CoreErrorCode::InvalidPayload
            }
            Self::MissingData | Self::DataNotAnObject(_) | Self::CharacterShape(_) => {
                CoreErrorCode::MalformedCharacter
            }
        }
    }

    /// True when the text was JSON but not what the extension produces.
    pub fn is_wrong_format(&self) -> bool {
        matches!(self, Self::NotAnObject(_) | Self::MissingCharacterData)
    }
}

impl From<EnvelopeError> for CoreError {
    fn from(err: EnvelopeError) -> Self {
        CoreError::new(err.code(), err.to_string())
    }
}

pub fn parse_envelope(raw: &str) -> Result<Envelope, EnvelopeError> {
    let root: JsonValue = serde_json::from_str(raw).map_err(EnvelopeError::Syntax)?;
    let root = match root {
        JsonValue::Object(map) => map,
        other => return Err(EnvelopeError::NotAnObject(json_kind(&other))),
    };

    let character_data = match root.get(CHARACTER_DATA_KEY) {
        Some(JsonValue::Object(map)) => map,
        _ => return Err(EnvelopeError::MissingCharacterData),
    };

    let data = match character_data.get(DATA_KEY) {
        Some(value @ JsonValue::Object(_)) => value,
        None | Some(JsonValue::Null) => return Err(EnvelopeError::MissingData),
        Some(other) => return Err(EnvelopeError::DataNotAnObject(json_kind(other))),
    };

    let character =
        SourceCharacter::deserialize(data).map_err(EnvelopeError::CharacterShape)?;

    Ok(Envelope {
        character,
        character_url: opaque_string(character_data, CHARACTER_URL_KEY),
        character_id: opaque_string(character_data, CHARACTER_ID_KEY),
    })
}

// The extension is not consistent about ids: numbers and strings both occur.
fn opaque_string(map: &JsonMap<String, JsonValue>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{EnvelopeError, parse_envelope};
    use crate::core_api::CoreErrorCode;

    #[test]
    fn parses_url_and_numeric_character_id() {
        let raw = r#"{"characterData": {
            "data": {"name": "Vex"},
            "characterUrl": "https://www.dndbeyond.com/characters/123",
            "characterId": 123
        }}"#;
        let envelope = parse_envelope(raw).expect("should parse");

        assert_eq!(envelope.character.name.as_deref(), Some("Vex"));
        assert_eq!(
            envelope.character_url.as_deref(),
            Some("https://www.dndbeyond.com/characters/123")
        );
        assert_eq!(envelope.character_id.as_deref(), Some("123"));
    }

    #[test]
    fn missing_character_data_is_an_invalid_payload() {
        let err = parse_envelope(r#"{"data": {"name": "Vex"}}"#).expect_err("should fail");
        assert!(matches!(err, EnvelopeError::MissingCharacterData));
        assert!(err.is_wrong_format());
        assert_eq!(err.code(), CoreErrorCode::InvalidPayload);
    }

    #[test]
    fn null_character_data_counts_as_missing() {
        let err = parse_envelope(r#"{"characterData": null}"#).expect_err("should fail");
        assert!(matches!(err, EnvelopeError::MissingCharacterData));
    }

    #[test]
    fn non_json_text_is_an_invalid_payload() {
        let err = parse_envelope("Strength 16, Dex 12").expect_err("should fail");
        assert!(matches!(err, EnvelopeError::Syntax(_)));
        assert!(!err.is_wrong_format());
        assert_eq!(err.code(), CoreErrorCode::InvalidPayload);
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = parse_envelope("[1, 2]").expect_err("should fail");
        assert_eq!(err.to_string(), "envelope must be a JSON object, found an array");
    }

    #[test]
    fn absent_or_scalar_data_is_a_malformed_character() {
        for raw in [
            r#"{"characterData": {}}"#,
            r#"{"characterData": {"data": null}}"#,
            r#"{"characterData": {"data": "Vex"}}"#,
            r#"{"characterData": {"data": {"stats": {"id": 1}}}}"#,
        ] {
            let err = parse_envelope(raw).expect_err("should fail");
            assert_eq!(err.code(), CoreErrorCode::MalformedCharacter, "{raw}");
        }
    }
}
