//! Parsing of the model's link classification answer.
//!
//! Parsing happens in two independent stages: [`strip_fences`] normalizes the
//! raw text by removing a surrounding markdown code fence, then
//! [`decode_classification`] decodes the result strictly.
//! [`parse_classification`] chains both.

use serde::Deserialize;
use thiserror::Error;

/// A link the model labelled as relevant.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClassifiedLink {
    /// Free-text label such as "News" or "Research".
    #[serde(rename = "type", default = "default_link_type")]
    pub kind: String,
    pub url: String,
}

fn default_link_type() -> String {
    "Article".to_string()
}

#[derive(Deserialize)]
struct Classification {
    #[serde(default)]
    links: Option<Vec<ClassifiedLink>>,
}

/// The classification answer could not be decoded.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ClassifyError(#[from] serde_json::Error);

/// Returns the content of the first ```` ```json ```` fenced block, or else of
/// the first fenced block with any (or no) language tag, or `raw` itself when
/// there is no fence. An unterminated fence yields everything after the
/// opening marker.
pub fn strip_fences(raw: &str) -> &str {
    let inner = if let Some((_, rest)) = raw.split_once("```json") {
        rest
    } else if let Some((_, rest)) = raw.split_once("```") {
        rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric())
    } else {
        return raw.trim();
    };

    inner
        .split_once("```")
        .map_or(inner, |(content, _)| content)
        .trim()
}

/// Decodes `{"links": [{"type": ..., "url": ...}, ...]}`. A missing or null
/// `links` value decodes as an empty list.
///
/// # Errors
///
/// Returns a [`ClassifyError`] if `json` is not valid JSON of that shape.
pub fn decode_classification(json: &str) -> Result<Vec<ClassifiedLink>, ClassifyError> {
    let classification: Classification = serde_json::from_str(json)?;
    Ok(classification.links.unwrap_or_default())
}

/// Fence-strips and decodes a raw model answer.
///
/// # Errors
///
/// Returns a [`ClassifyError`] if the stripped text does not decode.
pub fn parse_classification(raw: &str) -> Result<Vec<ClassifiedLink>, ClassifyError> {
    decode_classification(strip_fences(raw))
}
