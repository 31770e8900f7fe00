//! Turns a failed upstream response body into one short, readable message.

use serde_json::Value;

/// Maximum length, in characters, of a message echoed from a raw body.
pub const MAX_MESSAGE_CHARS: usize = 220;

/// Returned instead of echoing an HTML error page.
pub const HTML_FALLBACK_MESSAGE: &str = "The endpoint or request format is invalid.";

/// Returned when the body carries no text at all.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown upstream error";

/// Extract a short message from an upstream error body.
///
/// Structured JSON bodies are searched for `error.message`, then `error`, then
/// `message`. Anything else is whitespace-collapsed and truncated, except HTML
/// pages, which are replaced by [`HTML_FALLBACK_MESSAGE`].
#[must_use]
pub fn describe_upstream_error(raw: &str) -> String {
    if let Some(message) = structured_message(raw) {
        return message;
    }

    let compact = collapse_whitespace(raw);
    if looks_like_html(&compact) {
        return HTML_FALLBACK_MESSAGE.to_string();
    }
    truncated_or_unknown(&compact)
}

/// Collapse whitespace and truncate, substituting [`UNKNOWN_ERROR_MESSAGE`] when empty.
#[must_use]
pub fn summarize_raw_body(raw: &str) -> String {
    truncated_or_unknown(&collapse_whitespace(raw))
}

/// Replace every run of whitespace with a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn truncated_or_unknown(compact: &str) -> String {
    if compact.is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        truncate_chars(compact, MAX_MESSAGE_CHARS)
    }
}

fn structured_message(raw: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let map = parsed.as_object()?;

    let nested = map
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    nested
        .or_else(|| map.get("error").filter(|v| is_truthy(v)).map(stringify))
        .or_else(|| map.get("message").filter(|v| is_truthy(v)).map(stringify))
        .filter(|m| !m.is_empty())
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn looks_like_html(compact: &str) -> bool {
    let head = truncate_chars(compact, 16).to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}
