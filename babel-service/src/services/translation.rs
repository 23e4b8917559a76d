//! Prompt construction and reply shaping for the translate endpoint.
//!
//! The model is asked for a JSON object but nothing guarantees it complies,
//! so replies are parsed leniently and replaced by a placeholder when they
//! are not JSON at all.

use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::services::body::text_field;

/// Message returned when any of `q`, `sl`, `dl` is missing or empty.
pub const MISSING_FIELDS_MESSAGE: &str = "q, sl, and dl are required";

/// Reply text used when the model returns no text part at all.
const EMPTY_REPLY: &str = "{}";

const PLACEHOLDER_TRANSLATION: &str = "Error parsing response";

/// Body of `POST /api/translate`.
#[derive(Debug, Clone, Default, Validate)]
pub struct TranslationRequest {
    /// Text to translate.
    #[validate(required, length(min = 1))]
    pub q: Option<String>,
    /// Source language.
    #[validate(required, length(min = 1))]
    pub sl: Option<String>,
    /// Destination language.
    #[validate(required, length(min = 1))]
    pub dl: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationInput {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    /// Read `q`, `sl` and `dl` by name from any JSON body. Falsy or missing
    /// fields are left empty; only unparseable JSON is an error.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self {
            q: text_field(&value, "q"),
            sl: text_field(&value, "sl"),
            dl: text_field(&value, "dl"),
        })
    }

    /// Returns `None` when any field is absent or empty.
    pub fn into_input(self) -> Option<TranslationInput> {
        if self.validate().is_err() {
            return None;
        }

        match (self.q, self.sl, self.dl) {
            (Some(text), Some(source_lang), Some(target_lang)) => Some(TranslationInput {
                text,
                source_lang,
                target_lang,
            }),
            _ => None,
        }
    }
}

/// Shape the model is instructed to produce. Replies are forwarded as raw JSON
/// either way; a mismatch is only logged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranslationResult {
    pub translation: String,
    pub english_transform: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// Build the instruction sent to the model.
///
/// Languages and text are interpolated as-is.
pub fn build_prompt(input: &TranslationInput) -> String {
    format!(
        r#"
You are a translation engine.
Translate the following text from {sl} to {dl}.
Respond ONLY in JSON with this exact format:
{{
  "translation": "main translation here",
  "english_transform": "the translation spelled out in Latin letters, the way नमस्ते is written as namaste",
  "alternatives": ["alt1 (in the target language) - alt1 spelled out in Latin letters", "alt2 (in the target language) - alt2 spelled out in Latin letters"]
}}
If the translation is more than 3 words long, leave "alternatives" as an empty array.
Text: "{q}"
"#,
        sl = input.source_lang,
        dl = input.target_lang,
        q = input.text,
    )
}

/// Remove every "```json" and "```" marker, then trim.
///
/// Markers are matched left to right, preferring "```json" at each position.
pub fn strip_code_fences(raw: &str) -> String {
    const FENCE_JSON: &str = "```json";
    const FENCE: &str = "```";

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix(FENCE_JSON) {
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(FENCE) {
            rest = tail;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }

    out.trim().to_string()
}

/// Outcome of interpreting a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    /// The reply was valid JSON.
    Parsed(Value),
    /// The reply was not JSON; the fixed placeholder is served instead.
    Placeholder,
}

impl ParsedReply {
    /// Interpret the model's text. `None` or empty text counts as `{}`.
    pub fn from_model_text(text: Option<&str>) -> Self {
        let raw = text.filter(|t| !t.is_empty()).unwrap_or(EMPTY_REPLY);
        let cleaned = strip_code_fences(raw);

        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => ParsedReply::Parsed(value),
            Err(_) => ParsedReply::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ParsedReply::Placeholder)
    }

    /// Whether a parsed reply deserializes as a [`TranslationResult`].
    pub fn has_expected_shape(&self) -> bool {
        match self {
            ParsedReply::Parsed(value) => TranslationResult::deserialize(value).is_ok(),
            ParsedReply::Placeholder => false,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ParsedReply::Parsed(value) => value,
            ParsedReply::Placeholder => json!({
                "translation": PLACEHOLDER_TRANSLATION,
                "alternatives": [],
            }),
        }
    }
}
