//! The QA service context object.
//!
//! One [`QaService`] per process (or per test), constructed explicitly
//! and passed by reference into request-handling code; there is no global
//! state. The HTTP layer above this crate maps routes directly onto the
//! methods here.

use crate::cache::CacheStats;
use crate::config::QaConfig;
use crate::qa::{AnswerOrchestrator, HttpLanguageModel, LanguageModel};
use crate::retrieval::{CollectionInfo, RetrievalEngine, VectorIndex};
use crate::types::{IndexDocument, ScoredDocument};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Combined result of the retrieve-then-answer flow.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub answer: String,
    pub documents: Vec<ScoredDocument>,
}

/// Cache statistics for both caches; `None` when caching is disabled.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub retrieval_cache: Option<CacheStats>,
    pub answer_cache: Option<CacheStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub index_ok: bool,
    pub model_configured: bool,
}

/// Retrieval engine + answer orchestrator behind one explicit handle.
pub struct QaService {
    config: QaConfig,
    retrieval: RetrievalEngine,
    orchestrator: AnswerOrchestrator,
    model_configured: bool,
}

impl QaService {
    /// Assemble a service from pre-built collaborators. `model` is `None`
    /// when no endpoint is configured; every answer then comes from the
    /// rule engine.
    pub fn new(
        config: QaConfig,
        index: Arc<dyn VectorIndex>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> Result<Self> {
        let retrieval = RetrievalEngine::new(&config, index)?;
        let model_configured = model.is_some();
        let orchestrator = AnswerOrchestrator::new(&config, model)?;
        if model_configured {
            info!(model = %config.model, "QA service ready with language-model endpoint");
        } else {
            info!("QA service ready, no endpoint configured, using built-in rule engine");
        }
        Ok(Self {
            config,
            retrieval,
            orchestrator,
            model_configured,
        })
    }

    /// Assemble a service wiring up the HTTP model client from the
    /// configuration when an endpoint and credential are present.
    pub fn from_config(config: QaConfig, index: Arc<dyn VectorIndex>) -> Result<Self> {
        let model = HttpLanguageModel::from_config(&config)?
            .map(|m| Arc::new(m) as Arc<dyn LanguageModel>);
        Self::new(config, index, model)
    }

    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Cache-checked similarity search.
    pub async fn search(&self, question: &str, top_k: usize) -> Vec<ScoredDocument> {
        self.retrieval.search(question, top_k).await
    }

    /// Cache-checked, strategy-selected answer generation.
    pub async fn generate(&self, question: &str, documents: &[ScoredDocument]) -> String {
        self.orchestrator.generate(question, documents).await
    }

    /// The full flow: retrieve (honoring the retrieval switch), then answer.
    pub async fn ask(&self, question: &str) -> QueryOutcome {
        let documents = if self.config.retrieval_enabled {
            self.search(question, self.config.top_k).await
        } else {
            Vec::new()
        };
        let answer = self.generate(question, &documents).await;
        QueryOutcome { answer, documents }
    }

    /// Ingest documents; returns the number added.
    pub async fn add_documents(&self, documents: &[IndexDocument]) -> Result<usize> {
        self.retrieval.add_documents(documents).await
    }

    pub async fn collection_info(&self) -> CollectionInfo {
        self.retrieval.collection_info().await
    }

    pub async fn health(&self) -> ServiceHealth {
        ServiceHealth {
            index_ok: self.retrieval.health_check().await,
            model_configured: self.model_configured,
        }
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            retrieval_cache: self.retrieval.cache_stats(),
            answer_cache: self.orchestrator.cache_stats(),
        }
    }

    pub async fn clear_caches(&self) {
        self.retrieval.clear_cache().await;
        self.orchestrator.clear_cache().await;
    }
}
