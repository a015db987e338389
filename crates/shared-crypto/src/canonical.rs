//! # Canonical JSON
//!
//! The encoding every block hash is computed over:
//!
//! - object keys sorted by code point, recursively
//! - no insignificant whitespace (`,` and `:` separators only)
//! - integers printed as integers, strings as strings
//! - DEL and every non-ASCII character escaped as `\uXXXX` (UTF-16 units)
//!
//! The escaping rule keeps the pre-image pure ASCII, so ledgers written by
//! other implementations using the common `sort_keys` + compact separator
//! convention hash identically.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Encode any serializable value canonically.
///
/// # Panics
///
/// Panics if `value` cannot be represented as JSON (for example a map with
/// non-string keys). Block payloads are built internally from scalar
/// fields, so this only fires on a programming error.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> String {
    let value = serde_json::to_value(value)
        .unwrap_or_else(|e| panic!("hash engine input is not JSON-serializable: {e}"));
    canonical_json(&value)
}

/// Encode an already-built JSON value canonically.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::with_capacity(256);
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || (c as u32) >= 0x7f => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_keys_sorted_recursively() {
        let value = json!({"b": {"z": 1, "a": 2}, "a": [3, {"y": true, "x": null}]});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":[3,{"x":null,"y":true}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let mut first = HashMap::new();
        first.insert("institution", json!("MIT"));
        first.insert("year_awarded", json!(2024));
        first.insert("degree_name", json!("BSc"));

        let mut second = HashMap::new();
        second.insert("degree_name", json!("BSc"));
        second.insert("institution", json!("MIT"));
        second.insert("year_awarded", json!(2024));

        assert_eq!(to_canonical_json(&first), to_canonical_json(&second));
    }

    #[test]
    fn test_non_ascii_escaped() {
        assert_eq!(canonical_json(&json!("Zoë")), r#""Zo\u00eb""#);
        // Astral plane characters become surrogate pairs
        assert_eq!(canonical_json(&json!("𝄞")), r#""\ud834\udd1e""#);
    }

    #[test]
    fn test_control_characters_escaped() {
        assert_eq!(canonical_json(&json!("a\"b\\c\nd\u{1}")), r#""a\"b\\c\nd\u0001""#);
    }

    #[test]
    fn test_delete_escaped() {
        assert_eq!(canonical_json(&json!("a\u{7f}b")), r#""a\u007fb""#);
        assert_eq!(canonical_json(&json!("~")), r#""~""#);
    }

    #[test]
    fn test_integers_stay_integers() {
        assert_eq!(canonical_json(&json!({"n": 2024, "neg": -7})), r#"{"n":2024,"neg":-7}"#);
    }
}
