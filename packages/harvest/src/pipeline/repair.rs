//! JSON response repair.
//!
//! Model completions are supposed to be a bare JSON array but routinely
//! arrive wrapped in markdown code fences, prefixed with prose, or
//! followed by trailing commentary. This stage recovers whatever array it
//! can and never fails: unrecoverable input degrades to an empty list.

use serde_json::Value;
use tracing::debug;

use crate::types::record::RawEventRecord;

/// Recover event records from raw model text.
///
/// Attempts, in order:
/// 1. direct parse of the fence-stripped text,
/// 2. parse of the leading JSON value, ignoring trailing data,
/// 3. parse of the first `[` … last `]` span.
///
/// Array elements that fail to deserialize are skipped individually.
pub fn recover_records(raw: &str) -> Vec<RawEventRecord> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }

    if let Some(records) = parse_direct(cleaned) {
        return records;
    }
    if let Some(records) = parse_leading_value(cleaned) {
        debug!("recovered records from prefix before trailing data");
        return records;
    }
    if let Some(records) = parse_bracket_span(cleaned) {
        debug!("recovered records from bracket span");
        return records;
    }

    debug!(len = raw.len(), "no JSON array recoverable from response");
    Vec::new()
}

/// Cut markdown code fences away, keeping the fenced body.
///
/// Prose before the opening fence and after the closing fence is
/// discarded. Text without fences is returned trimmed.
fn strip_code_fences(raw: &str) -> &str {
    let raw = raw.trim();
    let Some(open) = raw.find("```") else {
        return raw;
    };

    // Skip the fence marker and its language tag line
    let after = &raw[open + 3..];
    let body = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Direct parse of the whole text.
fn parse_direct(text: &str) -> Option<Vec<RawEventRecord>> {
    let value: Value = serde_json::from_str(text).ok()?;
    value_to_records(value)
}

/// Parse only the leading JSON value, tolerating trailing non-JSON data.
fn parse_leading_value(text: &str) -> Option<Vec<RawEventRecord>> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => value_to_records(value),
        _ => None,
    }
}

/// Parse the first `[` … last `]` span.
fn parse_bracket_span(text: &str) -> Option<Vec<RawEventRecord>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    let value: Value = serde_json::from_str(&text[start..=end]).ok()?;
    value_to_records(value)
}

/// Convert a parsed value to records.
///
/// Arrays convert element-wise with malformed elements skipped; a lone
/// object is treated as a single-record array.
fn value_to_records(value: Value) -> Option<Vec<RawEventRecord>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        Value::Object(_) => serde_json::from_value(value).ok().map(|r| vec![r]),
        _ => None,
    }
}
