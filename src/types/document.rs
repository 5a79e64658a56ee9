//! Document types flowing between the index, the caches, and the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A retrieved passage with its similarity score.
///
/// Produced by [`crate::retrieval::RetrievalEngine::search`]; immutable once
/// returned. `score` is `1.0 - distance` for a cosine-style distance, so it
/// conceptually lives in `[-1, 1]` and typically in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(content: impl Into<String>, score: f64) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
            score,
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A document to be ingested into the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl IndexDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A raw nearest-neighbor hit as returned by a [`crate::retrieval::VectorIndex`],
/// ordered by increasing distance (best match first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    pub distance: f64,
}
