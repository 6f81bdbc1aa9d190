//! Migration between the wire tree and the canonical entry store.
//!
//! The remote tree may mix two historical shapes per key:
//!
//! ```text
//! { "Aimbot": "https://...", "WallHack": { "url": "https://...", "path": "/sdcard/..." } }
//! ```
//!
//! Reading accepts both; writing only ever produces the `{url, path}` form.

use serde_json::{Map, Value};

use crate::model::{CanonicalStore, Entry, RemoteEntry, fallback_path_for};

/// Resolve one wire value into its tagged shape, or `None` when it matches neither.
pub fn classify(value: &Value) -> Option<RemoteEntry> {
    match value {
        Value::String(url) => Some(RemoteEntry::Legacy(url.clone())),
        Value::Object(fields) if fields.contains_key("url") => Some(RemoteEntry::Structured {
            url: fields.get("url").and_then(Value::as_str).map(str::to_string),
            path: fields.get("path").and_then(Value::as_str).map(str::to_string),
        }),
        _ => None,
    }
}

fn resolve(key: &str, raw: RemoteEntry) -> Entry {
    match raw {
        RemoteEntry::Legacy(url) => Entry {
            url,
            path: fallback_path_for(key),
        },
        RemoteEntry::Structured { url, path } => Entry {
            url: url.unwrap_or_default(),
            path: path.unwrap_or_else(|| fallback_path_for(key)),
        },
    }
}

/// Canonicalize an arbitrary remote tree. Never fails: unrecognized entries are dropped.
pub fn normalize(raw: &Value) -> CanonicalStore {
    let fields = match raw {
        Value::Object(fields) => fields,
        Value::Null => return CanonicalStore::new(),
        other => {
            tracing::warn!(kind = value_kind(other), "remote tree is not an object; ignoring");
            return CanonicalStore::new();
        }
    };

    let mut out = CanonicalStore::new();
    for (key, value) in fields {
        match classify(value) {
            Some(shape) => {
                out.insert(key.clone(), resolve(key, shape));
            }
            None => {
                tracing::warn!(
                    key = %key,
                    kind = value_kind(value),
                    "dropping malformed remote entry"
                );
            }
        }
    }
    out
}

/// Wire form of a canonical store, always in the structured shape.
pub fn denormalize(store: &CanonicalStore) -> Value {
    let mut fields = Map::new();
    for (key, entry) in store {
        fields.insert(
            key.clone(),
            serde_json::json!({ "url": entry.url, "path": entry.path }),
        );
    }
    Value::Object(fields)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
