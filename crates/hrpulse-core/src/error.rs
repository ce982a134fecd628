//! Error types for the HRPulse assistant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the assistant pipeline.
///
/// Every variant here is recoverable: the orchestrator degrades to a
/// fallback response rather than letting any of these reach the caller
/// as a raw failure. Only `InvalidInput` is surfaced directly, as a
/// validation error before any external call is attempted.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AssistantError {
    /// The caller sent an empty or malformed message.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote intent classifier was unavailable or timed out.
    #[error("Classification failed: {0}")]
    Classification(String),

    /// The vector search backend was unavailable or returned garbage.
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// The generation model call failed, timed out, or was rate limited.
    #[error("Generation failed: {message}")]
    Generation { message: String, retryable: bool },

    /// Configuration error (missing keys, unparseable files).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssistantError {
    /// Returns true when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssistantError::Generation { retryable, .. } => *retryable,
            AssistantError::Classification(_) | AssistantError::Retrieval(_) => true,
            _ => false,
        }
    }
}

/// Convenience alias used across the assistant crates.
pub type Result<T> = std::result::Result<T, AssistantError>;
