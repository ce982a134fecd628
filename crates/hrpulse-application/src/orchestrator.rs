//! Request orchestration.
//!
//! One request moves through a fixed sequence: classify, check the
//! response cache, assemble context (and retrieve passages for policy
//! questions), invoke the generation model, write the cache, respond.
//! A cache hit short-circuits straight to the response. Every external
//! call is bounded by a timeout and every failure path degrades to a
//! canned reply; the only error a caller ever sees is input validation.

use hrpulse_core::agent::GenerationAgent;
use hrpulse_core::config::ChatbotConfig;
use hrpulse_core::error::AssistantError;
use hrpulse_core::intent::IntentCategory;
use hrpulse_core::query::ChatQuery;
use hrpulse_core::response::{ChatResponse, SourceRef};
use hrpulse_core::retrieval::RetrievedPassage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::classifier::IntentClassifier;
use crate::context_store::ContextStore;
use crate::fallback::FallbackLibrary;
use crate::prompt::PromptBuilder;
use crate::response_cache::{ResponseCache, cache_key, scope_for};
use crate::retriever::DocumentRetriever;

/// Progress marker for one request, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    Classified,
    CacheChecked,
    ContextAssembled,
    ModelInvoked,
    CacheWritten,
    Responded,
}

/// Sequences one chat request end to end.
pub struct ChatOrchestrator {
    classifier: IntentClassifier,
    context_store: ContextStore,
    retriever: DocumentRetriever,
    cache: ResponseCache,
    fallbacks: FallbackLibrary,
    prompts: PromptBuilder,
    generator: Arc<dyn GenerationAgent>,
    generation_timeout: Duration,
    top_k: usize,
}

impl ChatOrchestrator {
    pub fn new(
        classifier: IntentClassifier,
        context_store: ContextStore,
        retriever: DocumentRetriever,
        cache: ResponseCache,
        generator: Arc<dyn GenerationAgent>,
        config: &ChatbotConfig,
    ) -> Self {
        Self {
            classifier,
            context_store,
            retriever,
            cache,
            fallbacks: FallbackLibrary::new(&config.assistant_name),
            prompts: PromptBuilder::new(&config.assistant_name),
            generator,
            generation_timeout: Duration::from_secs(config.generation_timeout_secs),
            top_k: config.top_k,
        }
    }

    /// Handles one query.
    ///
    /// Returns `Err` only for invalid input; every downstream failure
    /// is absorbed into a degraded textual response.
    pub async fn handle(&self, query: &ChatQuery) -> Result<ChatResponse, AssistantError> {
        let started = Instant::now();
        debug!(stage = ?Stage::Received, user_id = %query.user_id);

        let text = query.trimmed();
        if text.is_empty() {
            return Err(AssistantError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }

        let intent = self.classifier.classify(query).await;
        debug!(stage = ?Stage::Classified, category = %intent.category, confidence = intent.confidence);

        let scope = scope_for(intent.category, query);
        let key = cache_key(intent.category, text, &scope);
        if let Some(mut hit) = self.cache.get(&key).await {
            debug!(stage = ?Stage::CacheChecked, hit = true);
            hit.cached = true;
            hit.response_time_ms = elapsed_ms(started);
            debug!(stage = ?Stage::Responded, cached = true);
            return Ok(hit);
        }
        debug!(stage = ?Stage::CacheChecked, hit = false);

        let (message, sources, degraded) = match self.fallbacks.canned(intent.category) {
            Some(canned) => (canned, Vec::new(), false),
            None => self.generate_answer(query, text, intent.category).await,
        };

        let response = ChatResponse {
            message,
            intent: intent.category,
            confidence: intent.confidence,
            cached: false,
            response_time_ms: elapsed_ms(started),
            sources,
        };

        // Degraded replies are transient by nature; caching one would
        // pin an apology for the whole TTL window.
        if !degraded {
            self.cache.put(key, response.clone()).await;
            debug!(stage = ?Stage::CacheWritten);
        }

        debug!(stage = ?Stage::Responded, cached = false, degraded);
        Ok(response)
    }

    /// The cache-miss path: context, optional retrieval, generation.
    /// The bool in the result marks a degraded (fallback) answer.
    async fn generate_answer(
        &self,
        query: &ChatQuery,
        text: &str,
        category: IntentCategory,
    ) -> (String, Vec<SourceRef>, bool) {
        let bundle = self.context_store.get_context(category, query).await;

        let passages: Vec<RetrievedPassage> = if category.needs_retrieval() {
            match self
                .retriever
                .search(text, query.role.access_level(), self.top_k)
                .await
            {
                Ok(passages) => passages,
                Err(err) => {
                    // Zero passages is an answerable state; the model
                    // is told the material may not cover the question.
                    warn!(error = %err, "retrieval unavailable, continuing without passages");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        debug!(stage = ?Stage::ContextAssembled, passages = passages.len());

        let prompt = self.prompts.answer_prompt(text, &bundle, &passages);
        let outcome = tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(&prompt),
        )
        .await;
        debug!(stage = ?Stage::ModelInvoked);

        match outcome {
            Ok(Ok(answer)) => {
                let sources = passages
                    .iter()
                    .map(|p| SourceRef {
                        document_id: p.source_document_id.clone(),
                        score: p.score,
                    })
                    .collect();
                (answer, sources, false)
            }
            Ok(Err(err)) => {
                warn!(error = %err, rate_limited = err.is_rate_limited(), "generation failed, serving fallback");
                (self.fallbacks.degraded(category), Vec::new(), true)
            }
            Err(_) => {
                // The outstanding call is abandoned; its eventual
                // result, if any, is discarded.
                warn!(
                    timeout_secs = self.generation_timeout.as_secs(),
                    "generation timed out, serving fallback"
                );
                (self.fallbacks.degraded(category), Vec::new(), true)
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
