use crate::qa::LlmError;
use thiserror::Error;

/// Unified error type for the QA pipeline core.
///
/// Most degraded conditions never surface here: cache misses are silent,
/// durable-cache I/O failures and index-query failures are logged and
/// absorbed, and LLM failures trigger the rule-based fallback. What
/// remains is the small set of conditions callers can act on, chiefly on
/// the construction and ingestion paths.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
