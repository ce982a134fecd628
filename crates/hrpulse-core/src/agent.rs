//! Agent seams for the external model providers.
//!
//! The generation and embedding backends are opaque capabilities: the
//! application layer only sees these traits, and the interaction crate
//! provides the REST implementations. Tests substitute their own.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a remote model or index call.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    /// The call ran but the provider rejected or mangled it.
    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    /// An HTTP-level failure with retry metadata.
    #[error("Agent process error ({status_code:?}): {message}")]
    ProcessError {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// Anything else (response parsing, local I/O).
    #[error("Agent error: {0}")]
    Other(String),
}

impl AgentError {
    /// Builds a `ProcessError` carrying a provider-supplied retry delay.
    pub fn process_error_with_retry_after(
        status_code: u16,
        message: impl Into<String>,
        is_retryable: bool,
        retry_after: Duration,
    ) -> Self {
        AgentError::ProcessError {
            status_code: Some(status_code),
            message: message.into(),
            is_retryable,
            retry_after: Some(retry_after),
        }
    }

    /// True when the same call may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::ProcessError {
                is_retryable: true,
                ..
            }
        )
    }

    /// True when the provider signalled a quota or rate-limit condition.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            AgentError::ProcessError {
                status_code: Some(429),
                ..
            }
        )
    }
}

/// A text-generation model: prompt in, text out.
#[async_trait]
pub trait GenerationAgent: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

/// An embedding model: text in, vector out.
#[async_trait]
pub trait EmbeddingAgent: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AgentError>;
}
