//! Language-model endpoint client.
//!
//! The endpoint is an OpenAI-compatible chat-completions API reached over
//! HTTP POST with bearer-token auth. The call has a bounded timeout and
//! no retry policy: a single failure is surfaced as an [`LlmError`] and
//! the orchestrator falls back to the rule engine.

use crate::config::QaConfig;
use crate::Error;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error as ThisError;
use tracing::warn;

const SYSTEM_PROMPT: &str = "你是一个专业的火灾预防安全专家。";

/// Failure modes of the model path. All of them trigger fallback; none
/// propagate to the caller of `generate`.
#[derive(Debug, ThisError)]
pub enum LlmError {
    #[error("no language-model endpoint or credential configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("unrecognized response shape")]
    UnrecognizedShape,
}

/// The consumed generation interface; a trait seam so tests can inject
/// scripted or failing models.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Known response shapes, tried as a tagged union. Anything else is an
/// [`LlmError::UnrecognizedShape`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseShape {
    /// OpenAI-compatible: `choices[0].message.content`.
    Chat { choices: Vec<Choice> },
    /// Flat: a top-level `output` field holding the generated text.
    Flat { output: String },
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ResponseShape {
    fn into_text(self) -> Result<String, LlmError> {
        match self {
            ResponseShape::Chat { choices } => choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or(LlmError::UnrecognizedShape),
            ResponseShape::Flat { output } => Ok(output),
        }
    }
}

/// Reqwest-backed [`LanguageModel`] speaking the chat-completions protocol.
pub struct HttpLanguageModel {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl HttpLanguageModel {
    /// Build a client from the configuration; `None` when no endpoint or
    /// credential is configured.
    pub fn from_config(config: &QaConfig) -> crate::Result<Option<Self>> {
        let (Some(api_url), Some(api_key)) = (&config.llm_api_url, &config.api_key) else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(config.llm_timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Some(Self {
            client,
            api_url: api_url.clone(),
            api_key: api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }))
    }
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "stream": false,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        match serde_json::from_value::<ResponseShape>(payload) {
            Ok(shape) => shape.into_text(),
            Err(e) => {
                warn!(error = %e, "language-model response did not match any known shape");
                Err(LlmError::UnrecognizedShape)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_for(server: &mockito::ServerGuard) -> HttpLanguageModel {
        let config = QaConfig {
            llm_api_url: Some(format!("{}/v1/chat/completions", server.url())),
            api_key: Some("sk-test".into()),
            ..QaConfig::default()
        };
        HttpLanguageModel::from_config(&config).unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_openai_shape_is_extracted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"定期检查灭火器。"}}]}"#,
            )
            .create_async()
            .await;
        let model = model_for(&server);
        let answer = model.complete("如何使用灭火器？").await.unwrap();
        assert_eq!(answer, "定期检查灭火器。");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_flat_output_shape_is_extracted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"output":"保持疏散通道畅通。"}"#)
            .create_async()
            .await;
        let model = model_for(&server);
        let answer = model.complete("疏散通道？").await.unwrap();
        assert_eq!(answer, "保持疏散通道畅通。");
    }

    #[tokio::test]
    async fn test_unknown_shape_is_an_error_not_a_panic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"result":"unexpected"}"#)
            .create_async()
            .await;
        let model = model_for(&server);
        let err = model.complete("q").await.unwrap_err();
        assert!(matches!(err, LlmError::UnrecognizedShape));
    }

    #[tokio::test]
    async fn test_empty_choices_is_unrecognized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;
        let model = model_for(&server);
        let err = model.complete("q").await.unwrap_err();
        assert!(matches!(err, LlmError::UnrecognizedShape));
    }

    #[tokio::test]
    async fn test_http_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;
        let model = model_for(&server);
        let err = model.complete("q").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 503 }));
    }

    #[test]
    fn test_unconfigured_endpoint_yields_no_client() {
        let model = HttpLanguageModel::from_config(&QaConfig::default()).unwrap();
        assert!(model.is_none());
    }
}
