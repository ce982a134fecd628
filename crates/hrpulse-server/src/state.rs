//! Shared application state and collaborator wiring.

use async_trait::async_trait;
use hrpulse_application::{
    ChatOrchestrator, ContextStore, DocumentRetriever, IntentClassifier, ResponseCache,
};
use hrpulse_core::agent::{AgentError, EmbeddingAgent, GenerationAgent};
use hrpulse_core::config::{RootConfig, SecretConfig};
use hrpulse_core::retrieval::VectorIndex;
use hrpulse_infrastructure::{HashingEmbedder, InMemoryEmployeeDirectory, StaticPassageIndex};
use hrpulse_interaction::{GeminiApiAgent, GeminiEmbeddingAgent, VectorIndexClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// State shared by all request handlers.
pub struct AppState {
    pub orchestrator: ChatOrchestrator,
}

impl AppState {
    /// Wires the orchestrator from config and secrets.
    ///
    /// With a Gemini key the real generation/embedding agents are used;
    /// without one the server still runs in local mode: canned intents
    /// answer normally and generation intents degrade to fallbacks.
    /// Retrieval uses the remote index when configured, otherwise the
    /// seeded in-process corpus.
    pub fn from_config(config: &RootConfig, secrets: &SecretConfig) -> Self {
        let gemini_key = secrets.gemini.as_ref().map(|g| g.api_key.clone());

        let generator: Arc<dyn GenerationAgent> = match &gemini_key {
            Some(key) => {
                info!(model = %config.gemini.model, "using Gemini generation agent");
                Arc::new(
                    GeminiApiAgent::new(key.clone()).with_model(config.gemini.model.clone()),
                )
            }
            None => {
                info!("no Gemini key configured, generation runs degraded");
                Arc::new(OfflineGenerator)
            }
        };

        let embedder: Arc<dyn EmbeddingAgent> = match &gemini_key {
            Some(key) => Arc::new(
                GeminiEmbeddingAgent::new(key.clone())
                    .with_model(config.gemini.embedding_model.clone()),
            ),
            None => Arc::new(HashingEmbedder::new()),
        };

        let index: Arc<dyn VectorIndex> = match (&config.vector_index.url, &secrets.vector_index) {
            (Some(url), Some(secret)) => {
                info!(url = %url, "using remote vector index");
                Arc::new(VectorIndexClient::new(url.clone(), secret.api_key.clone()))
            }
            _ => {
                info!("using in-process policy passage index");
                Arc::new(StaticPassageIndex::seeded())
            }
        };

        let chatbot = &config.chatbot;
        let classifier = match &gemini_key {
            Some(key) => IntentClassifier::with_remote(
                Arc::new(
                    GeminiApiAgent::new(key.clone()).with_model(config.gemini.model.clone()),
                ),
                Duration::from_secs(chatbot.classification_timeout_secs),
                chatbot.fallback_category,
            ),
            None => IntentClassifier::rules_only(chatbot.fallback_category),
        };

        let orchestrator = ChatOrchestrator::new(
            classifier,
            ContextStore::new(
                Arc::new(InMemoryEmployeeDirectory::seeded()),
                Duration::from_secs(chatbot.context_ttl_secs),
            ),
            DocumentRetriever::new(embedder, index, chatbot.similarity_threshold),
            ResponseCache::new(Duration::from_secs(chatbot.response_cache_ttl_secs)),
            generator,
            chatbot,
        );

        Self { orchestrator }
    }
}

/// Stand-in generation agent for keyless local mode. Always errors, so
/// the orchestrator serves its fallback templates.
struct OfflineGenerator;

#[async_trait]
impl GenerationAgent for OfflineGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AgentError> {
        Err(AgentError::ExecutionFailed(
            "no generation backend configured".to_string(),
        ))
    }
}
