//! Determinism fingerprint for snapshot documents.
//!
//! Two runs over the same input must produce byte-identical decisions once
//! run timestamps are removed. [`fingerprint`] normalizes a JSON document and
//! hashes it so runs can be compared by digest.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Keys holding run timestamps; excluded from the digest.
pub const IGNORED_KEYS: [&str; 4] = ["generated_at", "created_at", "file_generated_at", "run_timestamp"];

/// Decimal places floats are rounded to before hashing.
pub const FLOAT_PRECISION: i32 = 8;

/// Normalizes a document: drops timestamp keys, rounds floats, sorts object
/// keys, and orders arrays of objects by `game_id` (or by their serialized
/// form when no `game_id` exists).
#[must_use]
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map
                .keys()
                .filter(|k| !IGNORED_KEYS.contains(&k.as_str()))
                .collect();
            keys.sort();

            let mut out = Map::new();
            for key in keys {
                out.insert(key.clone(), normalize(&map[key]));
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            let mut normalized: Vec<Value> = items.iter().map(normalize).collect();
            if normalized.first().is_some_and(Value::is_object) {
                let keyed = normalized[0].get("game_id").is_some();
                normalized.sort_by_cached_key(|item| {
                    if keyed {
                        item.get("game_id").map(Value::to_string).unwrap_or_default()
                    } else {
                        item.to_string()
                    }
                });
            }
            Value::Array(normalized)
        }
        Value::Number(n) => match (n.is_f64(), n.as_f64()) {
            (true, Some(f)) => serde_json::Number::from_f64(round_to(f, FLOAT_PRECISION))
                .map_or(Value::Null, Value::Number),
            _ => value.clone(),
        },
        other => other.clone(),
    }
}

/// Hex SHA-256 of the normalized, compact serialization.
#[must_use]
pub fn fingerprint(value: &Value) -> String {
    let normalized = normalize(value);
    let mut hasher = Sha256::new();
    hasher.update(normalized.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Rounds to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
