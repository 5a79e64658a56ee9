//! 缓存模块：双层（内存 + 磁盘）TTL 缓存，用于加速检索与减少 LLM API 调用。
//!
//! # Caching Module
//!
//! Two-tier (in-process + persisted) key/value caching with time-to-live
//! expiry, plus the domain façades used by the retrieval engine and the
//! answer orchestrator.
//!
//! Caching is valuable for:
//! - Reducing API costs by avoiding duplicate LLM requests
//! - Skipping repeated vector-index queries for identical searches
//! - Surviving process restarts via the durable tier
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheStore`] | Generic two-tier store with TTL and statistics |
//! | [`CacheKey`] | Deterministic digest of canonicalized key material |
//! | [`RetrievalCache`] | Ranked-document lists keyed by `(query, top_k)` |
//! | [`AnswerCache`] | Answer strings keyed by `(question, document fingerprints)` |
//!
//! ## Cache Key Generation
//!
//! Keys are derived from a canonical JSON form of the semantic input
//! (mappings sorted, sequences in order), so identical requests hit the
//! same entry regardless of field insertion order.

mod answer;
mod key;
mod retrieval;
mod store;

pub use answer::AnswerCache;
pub use key::CacheKey;
pub use retrieval::RetrievalCache;
pub use store::{CacheStats, CacheStore};
