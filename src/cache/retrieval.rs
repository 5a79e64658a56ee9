//! Retrieval-result cache: a thin façade over [`CacheStore`].

use super::key::CacheKey;
use super::store::{CacheStats, CacheStore};
use crate::types::ScoredDocument;
use crate::Result;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

/// Caches ranked document lists keyed by `(query, top_k)`.
pub struct RetrievalCache {
    store: CacheStore,
}

impl RetrievalCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        Ok(Self {
            store: CacheStore::new(dir, ttl)?,
        })
    }

    pub async fn get_results(&self, query: &str, top_k: usize) -> Option<Vec<ScoredDocument>> {
        self.store.get(&Self::key(query, top_k)).await
    }

    pub async fn set_results(&self, query: &str, top_k: usize, results: &[ScoredDocument]) {
        self.store.set(&Self::key(query, top_k), &results, true).await;
    }

    pub async fn clear(&self) {
        self.store.clear().await;
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    fn key(query: &str, top_k: usize) -> CacheKey {
        CacheKey::of(&json!({ "query": query, "top_k": top_k }))
    }
}
