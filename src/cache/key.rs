//! Cache key generation.
//!
//! Keys are the sha-256 hex digest of a canonical JSON rendering of the
//! semantic input: object keys emitted in sorted order at every level,
//! arrays kept in order, scalars via their JSON form. Two semantically
//! equal inputs (same mapping, different insertion order) hash identically.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// An opaque, fixed-width cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    hash: String,
}

impl CacheKey {
    /// Derive a key from any JSON-shaped input.
    pub fn of(input: &Value) -> Self {
        let mut canonical = String::new();
        write_canonical(input, &mut canonical);
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        let hash: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Render `value` into `out` with object keys sorted recursively.
///
/// `serde_json::Map` already iterates in key order by default, but the
/// ordering is made explicit here so the key contract does not depend on
/// the `preserve_order` feature being off.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*k).clone()).to_string());
                out.push(':');
                write_canonical(&map[k.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
