//! 问答编排模块：分级回答策略 + LLM 调用 + 规则引擎降级 + 答案缓存。
//!
//! # Answer Orchestration Module
//!
//! Turns a question and a (possibly empty) ranked document list into an
//! answer string. Per call: answer-cache check, confidence-tiered
//! strategy selection, prompt assembly, language-model call with bounded
//! timeout, rule-based fallback on any model failure, and a cache update
//! only when the model path succeeded.
//!
//! `generate` never fails: every failure mode degrades to either the
//! deterministic rule engine or, for anything unexpected, a fixed
//! apology string.

mod fallback;
mod llm;
mod strategy;

pub use fallback::{rule_based_answer, rule_based_answer_from_prompt};
pub use llm::{HttpLanguageModel, LanguageModel, LlmError};
pub use strategy::{build_prompt, select_strategy, AnswerStrategy, StrategyPlan};

use crate::cache::{AnswerCache, CacheStats};
use crate::config::QaConfig;
use crate::types::ScoredDocument;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, error, info};

const APOLOGY: &str = "抱歉，暂时无法回答这个问题。请稍后再试。";

/// Strategy-selecting, cache-aware answer generator.
pub struct AnswerOrchestrator {
    model: Option<Arc<dyn LanguageModel>>,
    cache: Option<AnswerCache>,
}

impl AnswerOrchestrator {
    pub fn new(config: &QaConfig, model: Option<Arc<dyn LanguageModel>>) -> Result<Self> {
        let cache = if config.enable_cache {
            Some(AnswerCache::new(
                config.cache_dir.join("answers"),
                config.answer_ttl,
            )?)
        } else {
            None
        };
        Ok(Self { model, cache })
    }

    /// Generate an answer. Infallible from the caller's perspective: any
    /// unexpected internal failure becomes a fixed apology string.
    pub async fn generate(&self, question: &str, documents: &[ScoredDocument]) -> String {
        match self.generate_inner(question, documents).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(question, error = %e, "answer generation failed unexpectedly");
                APOLOGY.to_string()
            }
        }
    }

    async fn generate_inner(
        &self,
        question: &str,
        documents: &[ScoredDocument],
    ) -> Result<String> {
        if let Some(cache) = &self.cache {
            if let Some(answer) = cache.get_answer(question, documents).await {
                info!(question, "answer served from cache");
                return Ok(answer);
            }
        }

        let plan = select_strategy(documents);
        debug!(question, strategy = ?plan.strategy, "answer strategy selected");
        let prompt = build_prompt(question, &plan);

        let Some(model) = &self.model else {
            // No endpoint configured: rule engine, never cached.
            return Ok(rule_based_answer(question, documents));
        };

        match model.complete(&prompt).await {
            Ok(answer) => {
                if let Some(cache) = &self.cache {
                    cache.set_answer(question, documents, &answer).await;
                    debug!(question, "model answer cached");
                }
                Ok(answer)
            }
            Err(e) => {
                // Fallback answers are deterministic and cheap; caching
                // them would mask a model coming back online.
                error!(question, error = %e, "language-model call failed, using rule engine");
                Ok(rule_based_answer_from_prompt(&prompt))
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
