//! 检索模块：包装外部向量索引，带结果缓存与失败降级。
//!
//! # Retrieval Module
//!
//! Wraps an external vector index behind the [`VectorIndex`] trait and
//! adds result caching on top. Index failures degrade to an empty result
//! list; "no documents" is a legitimate, non-error outcome and is only
//! distinguishable from "index unavailable" through logs.

use crate::cache::{CacheStats, RetrievalCache};
use crate::config::QaConfig;
use crate::types::{IndexDocument, IndexHit, ScoredDocument};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The consumed interface of the external vector index.
///
/// `query` returns hits ordered by increasing distance (best match
/// first); the distance metric is the index's own.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn add(&self, documents: &[IndexDocument]) -> Result<()>;
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexHit>>;
    async fn count(&self) -> Result<usize>;
}

/// Collection summary for the upstream info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionInfo {
    pub document_count: usize,
    pub healthy: bool,
}

/// Cache-checked similarity search over a [`VectorIndex`].
pub struct RetrievalEngine {
    index: Arc<dyn VectorIndex>,
    cache: Option<RetrievalCache>,
}

impl RetrievalEngine {
    pub fn new(config: &QaConfig, index: Arc<dyn VectorIndex>) -> Result<Self> {
        let cache = if config.enable_cache {
            Some(RetrievalCache::new(
                config.cache_dir.join("retrieval"),
                config.retrieval_ttl,
            )?)
        } else {
            None
        };
        Ok(Self { index, cache })
    }

    /// Return up to `top_k` documents relevant to `query`, best first.
    ///
    /// Scores are `1.0 - distance`, assuming a cosine-style distance in
    /// `[0, 2]`. Distances outside that range produce scores outside
    /// `[-1, 1]`; they are passed through unclamped since the index's
    /// metric is not specified here.
    pub async fn search(&self, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        if let Some(cache) = &self.cache {
            if let Some(results) = cache.get_results(query, top_k).await {
                debug!(query, top_k, "retrieval cache hit");
                return results;
            }
        }

        let hits = match self.index.query(query, top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query, error = %e, "vector index query failed, returning no documents");
                return Vec::new();
            }
        };

        let documents: Vec<ScoredDocument> = hits
            .into_iter()
            .map(|hit| ScoredDocument {
                content: hit.content,
                metadata: hit.metadata,
                score: 1.0 - hit.distance,
            })
            .collect();

        if let Some(cache) = &self.cache {
            cache.set_results(query, top_k, &documents).await;
            debug!(query, top_k, results = documents.len(), "retrieval results cached");
        }
        documents
    }

    /// Ingest documents into the underlying index. Unlike `search`, a
    /// failure here propagates: the ingestion path has no degraded mode.
    pub async fn add_documents(&self, documents: &[IndexDocument]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }
        self.index.add(documents).await?;
        info!(count = documents.len(), "documents added to vector index");
        Ok(documents.len())
    }

    pub async fn health_check(&self) -> bool {
        self.index.count().await.is_ok()
    }

    pub async fn collection_info(&self) -> CollectionInfo {
        match self.index.count().await {
            Ok(document_count) => CollectionInfo {
                document_count,
                healthy: true,
            },
            Err(e) => {
                warn!(error = %e, "failed to read collection info");
                CollectionInfo {
                    document_count: 0,
                    healthy: false,
                }
            }
        }
    }

    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }
}
