//! Key-case transcoding between client-facing snake_case and wire camelCase.
//!
//! Both directions recurse through nested objects and arrays; scalars are
//! returned unchanged. Neither function mutates its input.

use serde_json::{Map, Value};

/// Convert a snake_case key into camelCase (`public_key_ids` → `publicKeyIds`).
///
/// The first non-empty segment is lower-cased, later segments are capitalized
/// and every empty segment contributes a literal underscore.
#[must_use]
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut first = true;

    for segment in key.split('_') {
        if segment.is_empty() {
            out.push('_');
            continue;
        }

        if first {
            out.push_str(&segment.to_lowercase());
            first = false;
        } else {
            let mut chars = segment.chars();
            if let Some(head) = chars.next() {
                out.extend(head.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }

    out
}

/// Convert a camelCase key into snake_case (`publicKeyIds` → `public_key_ids`).
///
/// A leading capital produces a leading underscore.
#[must_use]
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Rewrite every object key in `value` to wire (camelCase) form.
#[must_use]
pub fn to_wire_case(value: &Value) -> Value {
    transform_keys(value, &to_camel_case)
}

/// Rewrite every object key in `value` to client (snake_case) form.
#[must_use]
pub fn to_client_case(value: &Value) -> Value {
    transform_keys(value, &to_snake_case)
}

fn transform_keys(value: &Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| (rename(key), transform_keys(inner, rename)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_keys(item, rename))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}
