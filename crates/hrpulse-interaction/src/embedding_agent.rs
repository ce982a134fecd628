//! Gemini `embedContent` REST client.

use async_trait::async_trait;
use hrpulse_core::agent::{AgentError, EmbeddingAgent};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EMBEDDING_MODEL, GEMINI_BASE_URL};

/// Embedding agent backed by the Gemini embedding endpoint.
#[derive(Clone)]
pub struct GeminiEmbeddingAgent {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiEmbeddingAgent {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl EmbeddingAgent for GeminiEmbeddingAgent {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AgentError> {
        let url = format!(
            "{}/{model}:embedContent?key={api_key}",
            GEMINI_BASE_URL,
            model = self.model,
            api_key = self.api_key
        );

        let request = EmbedContentRequest {
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| AgentError::ProcessError {
                status_code: None,
                message: format!("Embedding request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AgentError::ProcessError {
                status_code: Some(status.as_u16()),
                message: format!("Embedding endpoint returned {status}"),
                is_retryable: status.is_server_error() || status.as_u16() == 429,
                retry_after: None,
            });
        }

        let parsed: EmbedContentResponse = response.json().await.map_err(|err| {
            AgentError::Other(format!("Failed to parse embedding response: {err}"))
        })?;

        if parsed.embedding.values.is_empty() {
            return Err(AgentError::ExecutionFailed(
                "Embedding endpoint returned an empty vector".into(),
            ));
        }

        Ok(parsed.embedding.values)
    }
}

#[derive(Serialize)]
struct EmbedContentRequest {
    content: EmbedContent,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}
