//! Configuration types.
//!
//! `RootConfig` is loaded from `config.toml` by the infrastructure
//! crate; `SecretConfig` comes from `secret.json` and must never be
//! logged.

use serde::{Deserialize, Serialize};

use crate::intent::IntentCategory;

/// Root configuration for the assistant service.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chatbot: ChatbotConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
}

/// HTTP listener settings.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Orchestration tunables.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChatbotConfig {
    /// Name the assistant introduces itself with.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    /// Hard bound on the remote classification call.
    #[serde(default = "default_classification_timeout")]
    pub classification_timeout_secs: u64,
    /// Hard bound on the generation call.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
    /// Time-to-live for cached responses.
    #[serde(default = "default_response_cache_ttl")]
    pub response_cache_ttl_secs: u64,
    /// Time-to-live for cached context bundles.
    #[serde(default = "default_context_ttl")]
    pub context_ttl_secs: u64,
    /// Maximum passages retrieved per policy query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Passages scoring below this are dropped.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Category assumed when classification fails outright.
    #[serde(default = "default_fallback_category")]
    pub fallback_category: IntentCategory,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            classification_timeout_secs: default_classification_timeout(),
            generation_timeout_secs: default_generation_timeout(),
            response_cache_ttl_secs: default_response_cache_ttl(),
            context_ttl_secs: default_context_ttl(),
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
            fallback_category: default_fallback_category(),
        }
    }
}

/// Gemini model selection. API keys live in [`SecretConfig`].
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

/// Remote vector index endpoint. When `url` is absent the server falls
/// back to the in-process passage index.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct VectorIndexConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// API keys, loaded from `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
    #[serde(default)]
    pub vector_index: Option<VectorIndexSecret>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiSecret {
    pub api_key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VectorIndexSecret {
    pub api_key: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8620
}

fn default_assistant_name() -> String {
    "Pulse".to_string()
}

fn default_classification_timeout() -> u64 {
    30
}

fn default_generation_timeout() -> u64 {
    40
}

fn default_response_cache_ttl() -> u64 {
    1800
}

fn default_context_ttl() -> u64 {
    1800
}

fn default_top_k() -> usize {
    5
}

fn default_similarity_threshold() -> f32 {
    0.35
}

fn default_fallback_category() -> IntentCategory {
    IntentCategory::OutOfScope
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}
