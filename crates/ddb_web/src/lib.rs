use chrono::{DateTime, Utc};
use ddb_core::core_api::{CoreErrorCode, ImportConfig, Translator};
use ddb_render::{JsonStyle, render_actor_document, render_json_full, render_text};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebTranslateOptions {
    /// Return the bare sheet instead of the host record.
    pub sheet_only: bool,
    /// Return the plain-text summary instead of JSON.
    pub text_output: bool,
    pub flag_scope: Option<String>,
    pub actor_type: Option<String>,
    /// RFC 3339 timestamp supplied by the host; without it no import flags are emitted.
    pub imported_at: Option<String>,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

#[wasm_bindgen]
pub fn translate_envelope(raw: &str, options: JsValue) -> Result<String, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    translate_envelope_impl(raw, &parsed_options).map_err(|err| err.to_js_value())
}

fn translate_envelope_impl(raw: &str, options: &WebTranslateOptions) -> Result<String, WebError> {
    if raw.trim().is_empty() {
        return Err(WebError::new(
            "invalid_payload",
            "Please paste character data from D&D Beyond extension",
        ));
    }

    let imported_at = parse_imported_at(options.imported_at.as_deref())?;
    let translation = Translator::new().open_str(raw).map_err(|err| {
        let code = match err.code {
            CoreErrorCode::InvalidPayload => "invalid_payload",
            CoreErrorCode::MalformedCharacter => "malformed_character",
            CoreErrorCode::Store => "store_failed",
        };
        WebError::new(code, err.message)
    })?;
    let sheet = translation.sheet();

    if options.text_output {
        return Ok(render_text(sheet));
    }

    let value = if options.sheet_only {
        render_json_full(sheet, JsonStyle::CanonicalV1)
    } else {
        let mut config = ImportConfig::default();
        if let Some(scope) = &options.flag_scope {
            config.flag_scope = scope.clone();
        }
        if let Some(actor_type) = &options.actor_type {
            config.actor_type = actor_type.clone();
        }
        let metadata = imported_at.map(|at| translation.metadata(at));
        render_actor_document(sheet, metadata.as_ref(), &config)
    };

    serde_json::to_string_pretty(&value).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to serialize rendered JSON output: {err}"),
        )
    })
}

fn parse_options(options: JsValue) -> Result<WebTranslateOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebTranslateOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web translate options: {err}"),
        )
    })
}

fn parse_imported_at(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, WebError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(raw)
        .map(|at| Some(at.with_timezone(&Utc)))
        .map_err(|err| {
            WebError::new(
                "invalid_options",
                format!("Invalid imported_at '{raw}': {err}"),
            )
        })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{WebTranslateOptions, parse_imported_at, translate_envelope_impl};

    #[test]
    fn parse_imported_at_accepts_iso_timestamps() {
        let at = parse_imported_at(Some("2024-04-01T10:00:00.000Z"))
            .expect("should parse")
            .expect("should be present");
        assert_eq!(at.to_rfc3339(), "2024-04-01T10:00:00+00:00");
        assert_eq!(parse_imported_at(Some("  ")).expect("blank is allowed"), None);
        assert_eq!(parse_imported_at(None).expect("none is allowed"), None);
    }

    #[test]
    fn parse_imported_at_rejects_invalid_values() {
        let err = parse_imported_at(Some("yesterday")).expect_err("should fail");
        assert_eq!(err.code, "invalid_options");
        assert!(err.message.contains("Invalid imported_at"));
    }

    #[test]
    fn renders_actor_document_with_flags() {
        let options = WebTranslateOptions {
            imported_at: Some("2024-04-01T10:00:00Z".to_string()),
            ..WebTranslateOptions::default()
        };
        let rendered = translate_envelope_impl(&fixture("full_character.json"), &options)
            .expect("fixture should render");

        let parsed: serde_json::Value =
            serde_json::from_str(&rendered).expect("output should parse");
        assert_eq!(parsed["name"], "Keyleth");
        assert_eq!(
            parsed["flags"]["nevelish-ddb-importer"]["lastSync"],
            "2024-04-01T10:00:00.000Z"
        );
    }

    #[test]
    fn sheet_only_skips_host_wrapping() {
        let options = WebTranslateOptions {
            sheet_only: true,
            ..WebTranslateOptions::default()
        };
        let rendered = translate_envelope_impl(&fixture("full_character.json"), &options)
            .expect("fixture should render");

        let parsed: serde_json::Value =
            serde_json::from_str(&rendered).expect("output should parse");
        assert!(parsed.get("flags").is_none());
        assert_eq!(parsed["classes"]["druid"]["level"], 5);
    }

    #[test]
    fn text_output_renders_summary() {
        let options = WebTranslateOptions {
            text_output: true,
            ..WebTranslateOptions::default()
        };
        let rendered = translate_envelope_impl(&fixture("full_character.json"), &options)
            .expect("fixture should render");
        assert!(rendered.starts_with("Keyleth\n"));
    }

    #[test]
    fn error_codes_follow_core_taxonomy() {
        let options = WebTranslateOptions::default();
        let missing = translate_envelope_impl(&fixture("missing_character_data.json"), &options)
            .expect_err("should fail");
        assert_eq!(missing.code, "invalid_payload");

        let malformed = translate_envelope_impl(&fixture("no_data_section.json"), &options)
            .expect_err("should fail");
        assert_eq!(malformed.code, "malformed_character");

        let empty = translate_envelope_impl("", &options).expect_err("should fail");
        assert_eq!(empty.code, "invalid_payload");
    }

    fn fixture(name: &str) -> String {
        let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../tests/fixtures")
            .join(name);
        fs::read_to_string(full_path).expect("fixture should be readable")
    }
}
