//! # fireqa
//!
//! 火灾预防知识问答管线核心：双层 TTL 缓存 + 分级置信度回答编排。
//!
//! Caching and confidence-tiered orchestration core for a
//! retrieval-augmented QA service. Questions are answered by optionally
//! retrieving semantically relevant passages and forwarding them, with
//! the question, to a remote language-model endpoint; when no endpoint is
//! configured or the call fails, a deterministic rule engine answers
//! instead.
//!
//! ## Core Pieces
//!
//! - **Two-tier cache**: an in-process fast tier plus a per-key-file
//!   durable tier, both with lazy TTL expiry and deterministic keys
//!   derived from canonicalized inputs.
//! - **Retrieval engine**: wraps an external vector index behind the
//!   [`retrieval::VectorIndex`] trait, converts distances to similarity
//!   scores, and degrades index failures to an empty document list.
//! - **Answer orchestrator**: picks a response strategy from the best
//!   similarity score, builds a context-aware prompt, calls the model
//!   with a bounded timeout, and falls back to canned answers on any
//!   failure. Only model-generated answers are cached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fireqa::{QaConfig, QaService};
//! use std::sync::Arc;
//!
//! # async fn run(index: Arc<dyn fireqa::retrieval::VectorIndex>) -> fireqa::Result<()> {
//! let config = QaConfig::from_env("deepseek");
//! let service = QaService::from_config(config, index)?;
//!
//! let outcome = service.ask("如何使用灭火器？").await;
//! println!("{}", outcome.answer);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Two-tier TTL cache, key generation, domain façades |
//! | [`retrieval`] | Vector-index interface and cache-checked search |
//! | [`qa`] | Strategy selection, LLM client, rule-based fallback |
//! | [`service`] | The explicit per-process service context object |
//! | [`config`] | Environment-driven configuration |
//! | [`types`] | Documents and scored search results |

pub mod cache;
pub mod config;
pub mod error;
pub mod qa;
pub mod retrieval;
pub mod service;
pub mod types;

pub use config::QaConfig;
pub use error::Error;
pub use qa::{AnswerOrchestrator, AnswerStrategy, HttpLanguageModel, LanguageModel, LlmError};
pub use retrieval::{RetrievalEngine, VectorIndex};
pub use service::{QaService, QueryOutcome, ServiceHealth, ServiceStats};
pub use types::{IndexDocument, IndexHit, ScoredDocument};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
