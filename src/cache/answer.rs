//! Generated-answer cache: a thin façade over [`CacheStore`].
//!
//! The key fingerprints the documents that were in play when the answer
//! was generated: each document contributes its first 100 characters and
//! its score rounded to 3 decimals. The truncation and rounding keep keys
//! stable against immaterial formatting and float noise while still
//! distinguishing materially different contexts.

use super::key::CacheKey;
use super::store::{CacheStats, CacheStore};
use crate::types::ScoredDocument;
use crate::Result;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

const DOC_FINGERPRINT_CHARS: usize = 100;

/// Caches answer strings keyed by `(question, document fingerprints)`.
pub struct AnswerCache {
    store: CacheStore,
}

impl AnswerCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self> {
        Ok(Self {
            store: CacheStore::new(dir, ttl)?,
        })
    }

    pub async fn get_answer(&self, question: &str, docs: &[ScoredDocument]) -> Option<String> {
        self.store.get(&Self::key(question, docs)).await
    }

    pub async fn set_answer(&self, question: &str, docs: &[ScoredDocument], answer: &str) {
        self.store.set(&Self::key(question, docs), &answer, true).await;
    }

    pub async fn clear(&self) {
        self.store.clear().await;
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    fn key(question: &str, docs: &[ScoredDocument]) -> CacheKey {
        let fingerprints: Vec<String> = docs
            .iter()
            .map(|doc| {
                let prefix: String = doc.content.chars().take(DOC_FINGERPRINT_CHARS).collect();
                format!("{}:{:.3}", prefix, doc.score)
            })
            .collect();
        CacheKey::of(&json!({ "question": question, "docs": fingerprints }))
    }
}
