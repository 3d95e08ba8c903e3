// 🧰 Shape Coercer - Any wire shape → canonical record list
// The store returns personnel fields as whatever the last writer sent:
// a native array, a JSON-encoded string, a bare object, a comma string,
// or null. Reads must be indifferent to all of them.

use serde_json::{Map, Value};
use tracing::warn;

use crate::fields::RawRecord;

/// Coerce a raw wire value into a canonical list of records.
///
/// Total: never panics, never errors. Every malformed input degrades to a
/// smaller well-formed result with a logged reason.
pub fn coerce(raw: &Value) -> Vec<RawRecord> {
    match raw {
        Value::Null => Vec::new(),

        // The Secretary case, or a mis-shaped Director/Employee field
        Value::Object(map) => vec![map.clone()],

        Value::String(s) => coerce_string(s),

        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::Object(map) => records.push(map.clone()),
                    Value::String(s) => {
                        let trimmed = s.trim();
                        if !trimmed.is_empty() {
                            records.push(name_record(trimmed));
                        }
                    }
                    other => {
                        warn!(index = i, value = %other, "skipping uncoercible array element");
                    }
                }
            }
            records
        }

        other => {
            warn!(value = %other, "uncoercible scalar; degrading to empty list");
            Vec::new()
        }
    }
}

fn coerce_string(s: &str) -> Vec<RawRecord> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    // First choice: the string is JSON
    if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
        match parsed {
            Value::Array(_) | Value::Object(_) => return coerce(&parsed),
            _ => {
                // "123" parses as a number; fall through to name handling
            }
        }
    }

    // Second choice: comma-separated names
    if trimmed.contains(',') {
        let records: Vec<RawRecord> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(name_record)
            .collect();
        if !records.is_empty() {
            warn!(input = %trimmed, count = records.len(), "comma-split fallback applied");
            return records;
        }
    }

    // Last choice: the whole string is one name
    warn!(input = %trimmed, "bare string treated as a single name record");
    vec![name_record(trimmed)]
}

fn name_record(name: &str) -> RawRecord {
    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(name.to_string()));
    map
}

// ============================================================================
// TESTS
// ============================================================================
