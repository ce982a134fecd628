//! End-to-end orchestrator behavior with mock collaborators.

use async_trait::async_trait;
use hrpulse_application::{
    ChatOrchestrator, ContextStore, DocumentRetriever, IntentClassifier, ResponseCache,
};
use hrpulse_core::agent::{AgentError, EmbeddingAgent, GenerationAgent};
use hrpulse_core::config::ChatbotConfig;
use hrpulse_core::error::AssistantError;
use hrpulse_core::intent::IntentCategory;
use hrpulse_core::query::{ChatQuery, Role};
use hrpulse_core::retrieval::{RetrievedPassage, VectorIndex};
use hrpulse_infrastructure::{HashingEmbedder, InMemoryEmployeeDirectory, StaticPassageIndex};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Clone, Copy)]
enum GeneratorMode {
    Reply,
    Fail,
    Hang,
}

struct MockGenerator {
    mode: GeneratorMode,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockGenerator {
    fn replying(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            mode: GeneratorMode::Reply,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            mode: GeneratorMode::Fail,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    fn hanging() -> Arc<Self> {
        Arc::new(Self {
            mode: GeneratorMode::Hang,
            delay: Duration::from_secs(30),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationAgent for MockGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match self.mode {
            GeneratorMode::Reply => Ok("Here is your answer, grounded in policy.".to_string()),
            GeneratorMode::Fail => Err(AgentError::ProcessError {
                status_code: Some(429),
                message: "quota exceeded".to_string(),
                is_retryable: true,
                retry_after: None,
            }),
            GeneratorMode::Hang => Ok("too late".to_string()),
        }
    }
}

struct CountingEmbedder {
    inner: HashingEmbedder,
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingAgent for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }
}

struct BrokenIndex;

#[async_trait]
impl VectorIndex for BrokenIndex {
    async fn query(
        &self,
        _vector: &[f32],
        _max_access_level: u8,
        _top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, AgentError> {
        Err(AgentError::Other("index offline".to_string()))
    }
}

struct Fixture {
    orchestrator: ChatOrchestrator,
    generator: Arc<MockGenerator>,
    embedder: Arc<CountingEmbedder>,
}

fn fixture(generator: Arc<MockGenerator>, cache_ttl: Duration, timeout_secs: u64) -> Fixture {
    fixture_with_index(generator, cache_ttl, timeout_secs, Arc::new(StaticPassageIndex::seeded()))
}

fn fixture_with_index(
    generator: Arc<MockGenerator>,
    cache_ttl: Duration,
    timeout_secs: u64,
    index: Arc<dyn VectorIndex>,
) -> Fixture {
    let config = ChatbotConfig {
        generation_timeout_secs: timeout_secs,
        ..ChatbotConfig::default()
    };
    let embedder = Arc::new(CountingEmbedder {
        inner: HashingEmbedder::new(),
        calls: AtomicUsize::new(0),
    });

    let orchestrator = ChatOrchestrator::new(
        IntentClassifier::rules_only(config.fallback_category),
        ContextStore::new(
            Arc::new(InMemoryEmployeeDirectory::seeded()),
            Duration::from_secs(config.context_ttl_secs),
        ),
        DocumentRetriever::new(embedder.clone(), index, 0.05),
        ResponseCache::new(cache_ttl),
        generator.clone(),
        &config,
    );

    Fixture {
        orchestrator,
        generator,
        embedder,
    }
}

fn query(text: &str) -> ChatQuery {
    ChatQuery::new(text, "emp-001", Role::Employee)
}

#[tokio::test]
async fn hello_is_greeted_by_name_and_cached_on_repeat() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);

    let first = f.orchestrator.handle(&query("Hello")).await.unwrap();
    assert_eq!(first.intent, IntentCategory::GreetingSimple);
    assert!(first.confidence > 0.8);
    assert!(first.message.contains("Pulse"));
    assert!(!first.cached);

    let second = f.orchestrator.handle(&query("Hello")).await.unwrap();
    assert!(second.cached);
    assert_eq!(second.message, first.message);

    // Greetings are answered from templates, never from the model.
    assert_eq!(f.generator.call_count(), 0);
}

#[tokio::test]
async fn repeat_query_within_ttl_hits_cache_and_is_faster() {
    let f = fixture(
        MockGenerator::replying(Duration::from_millis(80)),
        Duration::from_secs(60),
        40,
    );
    let q = query("What is the annual leave policy?");

    let first = f.orchestrator.handle(&q).await.unwrap();
    assert!(!first.cached);
    assert!(first.response_time_ms >= 80);

    let second = f.orchestrator.handle(&q).await.unwrap();
    assert!(second.cached);
    assert!(second.response_time_ms < first.response_time_ms);
    assert_eq!(second.message, first.message);
    assert_eq!(f.generator.call_count(), 1);
}

#[tokio::test]
async fn case_and_whitespace_variants_share_one_cache_entry() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);

    let first = f
        .orchestrator
        .handle(&query("What is the annual leave policy?"))
        .await
        .unwrap();
    assert!(!first.cached);

    let variant = f
        .orchestrator
        .handle(&query("  what IS the   annual leave POLICY? "))
        .await
        .unwrap();
    assert!(variant.cached);
    assert_eq!(f.generator.call_count(), 1);
}

#[tokio::test]
async fn expired_entry_forces_recomputation() {
    let f = fixture(
        MockGenerator::replying(Duration::ZERO),
        Duration::from_millis(50),
        40,
    );
    let q = query("What is the annual leave policy?");

    let first = f.orchestrator.handle(&q).await.unwrap();
    assert!(!first.cached);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let after_expiry = f.orchestrator.handle(&q).await.unwrap();
    assert!(!after_expiry.cached);
    assert_eq!(f.generator.call_count(), 2);
}

#[tokio::test]
async fn another_employees_salary_is_refused_without_leaking_data() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);

    let response = f
        .orchestrator
        .handle(&query("What is Daniel's salary?"))
        .await
        .unwrap();

    assert_eq!(response.intent, IntentCategory::UnauthorizedAccess);
    assert!(!response.message.contains("Daniel"));
    assert!(!response.message.contains("Mensah"));
    // Refusals come from templates; no model or retrieval call happens.
    assert_eq!(f.generator.call_count(), 0);
    assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn greeting_prefixed_restricted_query_is_still_refused() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);

    let response = f
        .orchestrator
        .handle(&query("Hi, what is Daniel's salary?"))
        .await
        .unwrap();

    assert_eq!(response.intent, IntentCategory::UnauthorizedAccess);
    assert!(!response.message.contains("Daniel"));
    assert_eq!(f.generator.call_count(), 0);
}

#[tokio::test]
async fn empty_input_is_rejected_before_any_external_call() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);

    for text in ["", "   ", "\n\t"] {
        let err = f.orchestrator.handle(&query(text)).await.unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput(_)), "input: {text:?}");
    }

    assert_eq!(f.generator.call_count(), 0);
    assert_eq!(f.embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_timeout_degrades_to_apology_within_bound() {
    let f = fixture(MockGenerator::hanging(), Duration::from_secs(60), 1);

    let started = Instant::now();
    let response = f
        .orchestrator
        .handle(&query("What is the annual leave policy?"))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(response.message.contains("slower than usual"));
    assert!(!response.cached);
    assert!(response.sources.is_empty());
}

#[tokio::test]
async fn degraded_responses_are_not_cached() {
    let f = fixture(MockGenerator::failing(), Duration::from_secs(60), 40);
    let q = query("What is the annual leave policy?");

    let first = f.orchestrator.handle(&q).await.unwrap();
    assert!(!first.cached);

    // A repeat recomputes instead of replaying the apology as a hit.
    let second = f.orchestrator.handle(&q).await.unwrap();
    assert!(!second.cached);
    assert_eq!(f.generator.call_count(), 2);
}

#[tokio::test]
async fn retrieval_outage_still_produces_an_answer() {
    let f = fixture_with_index(
        MockGenerator::replying(Duration::ZERO),
        Duration::from_secs(60),
        40,
        Arc::new(BrokenIndex),
    );

    let response = f
        .orchestrator
        .handle(&query("What is the annual leave policy?"))
        .await
        .unwrap();

    assert_eq!(response.intent, IntentCategory::PolicyQuery);
    assert!(response.sources.is_empty());
    assert_eq!(f.generator.call_count(), 1);
}

#[tokio::test]
async fn policy_answers_cite_sources_in_rank_order() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);

    let response = f
        .orchestrator
        .handle(&query("What does the annual leave policy say about carry-over days?"))
        .await
        .unwrap();

    assert_eq!(response.intent, IntentCategory::PolicyQuery);
    assert!(!response.sources.is_empty());
    for pair in response.sources.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn personal_answers_are_scoped_per_user_in_cache() {
    let f = fixture(MockGenerator::replying(Duration::ZERO), Duration::from_secs(60), 40);
    let text = "How many leaves do I have left?";

    let first = f
        .orchestrator
        .handle(&ChatQuery::new(text, "emp-001", Role::Employee))
        .await
        .unwrap();
    assert_eq!(first.intent, IntentCategory::PersonalDataLeave);
    assert!(!first.cached);

    // Same text from a different user must not reuse the entry.
    let other_user = f
        .orchestrator
        .handle(&ChatQuery::new(text, "emp-002", Role::Employee))
        .await
        .unwrap();
    assert!(!other_user.cached);
    assert_eq!(f.generator.call_count(), 2);
}
