//! Pipeline configuration.
//!
//! Everything is env-overridable with production-friendly defaults. The
//! LLM credential is resolved keyring-first, then from the provider's
//! `*_API_KEY` environment variable.

use keyring::Entry;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_LLM_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-chat";

/// Configuration for the QA pipeline core.
#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Chat-completions endpoint; `None` disables the model path entirely
    /// and every answer comes from the rule engine.
    pub llm_api_url: Option<String>,
    /// Bearer token for the endpoint; the model path also requires this.
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Per-request timeout for the LLM call. No retries: a single failure
    /// triggers fallback.
    pub llm_timeout: Duration,
    /// Default number of documents to retrieve.
    pub top_k: usize,
    /// When off, `ask` skips retrieval and generates from the question alone.
    pub retrieval_enabled: bool,
    pub enable_cache: bool,
    pub cache_dir: PathBuf,
    pub retrieval_ttl: Duration,
    pub answer_ttl: Duration,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            llm_api_url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.3,
            llm_timeout: Duration::from_secs(30),
            top_k: 3,
            retrieval_enabled: true,
            enable_cache: true,
            cache_dir: PathBuf::from("./cache"),
            retrieval_ttl: Duration::from_secs(7200),
            answer_ttl: Duration::from_secs(3600),
        }
    }
}

impl QaConfig {
    /// Build a configuration from the environment.
    ///
    /// The model path is enabled only when a credential resolves for the
    /// provider; without one the pipeline runs on the rule engine alone.
    pub fn from_env(provider: &str) -> Self {
        let defaults = Self::default();
        let api_key = resolve_api_key(provider);
        let llm_api_url = env::var("FIREQA_LLM_API_URL")
            .ok()
            .or_else(|| api_key.is_some().then(|| DEFAULT_LLM_API_URL.to_string()));
        Self {
            llm_api_url,
            api_key,
            model: env::var("FIREQA_LLM_MODEL").unwrap_or(defaults.model),
            max_tokens: env_parse("FIREQA_MAX_TOKENS", defaults.max_tokens),
            temperature: env_parse("FIREQA_TEMPERATURE", defaults.temperature),
            llm_timeout: Duration::from_secs(env_parse("FIREQA_LLM_TIMEOUT_SECS", 30)),
            top_k: env_parse("FIREQA_TOP_K", defaults.top_k),
            retrieval_enabled: env::var("FIREQA_ENABLE_RAG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.retrieval_enabled),
            enable_cache: env::var("FIREQA_ENABLE_CACHE")
                .map(|v| !v.eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.enable_cache),
            cache_dir: env::var("FIREQA_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            retrieval_ttl: Duration::from_secs(env_parse("FIREQA_RETRIEVAL_TTL_SECS", 7200)),
            answer_ttl: Duration::from_secs(env_parse("FIREQA_ANSWER_TTL_SECS", 3600)),
        }
    }

    /// True when both an endpoint and a credential are configured.
    pub fn llm_configured(&self) -> bool {
        self.llm_api_url.is_some() && self.api_key.is_some()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn resolve_api_key(provider: &str) -> Option<String> {
    // 1. Try the OS keyring
    if let Ok(entry) = Entry::new("fireqa", provider) {
        if let Ok(key) = entry.get_password() {
            return Some(key);
        }
    }

    // 2. Try <PROVIDER>_API_KEY
    let env_var = format!("{}_API_KEY", provider.to_uppercase());
    env::var(env_var).ok()
}
