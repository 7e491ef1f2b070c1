// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Input sanitization for plain strings and JSON payloads.

use crate::error::GuardError;
use crate::verdict::Verdict;
use serde_json::{Map, Value};
use tracing::debug;

/// Neutralize HTML-significant characters in a plain string.
///
/// Angle brackets are dropped, then `&`, `"`, `'` and `/` are escaped in
/// that order, then surrounding whitespace (including the U+FEFF byte order
/// mark) is trimmed. Ampersands go first
/// so the later entities are not re-escaped. Running this twice on the
/// same input double-escapes.
pub fn sanitize_input(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' | '>' => {}
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_string()
}

/// Validate a JSON value and return a deep copy with every string leaf
/// passed through [`sanitize_input`].
///
/// Only objects and arrays are accepted at the top level. Object keys are
/// left untouched. Structures nested deeper than `max_depth` are rejected
/// as a whole; nothing partially sanitized is ever returned.
pub fn validate_json(data: &Value, max_depth: usize) -> Verdict<Value> {
    if !matches!(data, Value::Object(_) | Value::Array(_)) {
        debug!("Rejecting non-object JSON payload");
        return Verdict::Invalid(GuardError::InvalidJson);
    }

    match sanitize_value(data, 0, max_depth) {
        Ok(sanitized) => Verdict::Valid(sanitized),
        Err(err) => {
            debug!(max_depth, "JSON payload exceeds nesting limit");
            Verdict::Invalid(err)
        }
    }
}

/// Parse raw JSON text, then run it through [`validate_json`].
pub fn safe_json_parse(raw: &str, max_depth: usize) -> Verdict<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => validate_json(&value, max_depth),
        Err(err) => {
            debug!(error = %err, "Malformed JSON text");
            Verdict::Invalid(GuardError::MalformedJson)
        }
    }
}

fn sanitize_value(value: &Value, depth: usize, max_depth: usize) -> Result<Value, GuardError> {
    if depth > max_depth {
        return Err(GuardError::JsonProcessing);
    }

    Ok(match value {
        Value::String(s) => Value::String(sanitize_input(s)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| sanitize_value(item, depth + 1, max_depth))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, field) in fields {
                out.insert(key.clone(), sanitize_value(field, depth + 1, max_depth)?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}
