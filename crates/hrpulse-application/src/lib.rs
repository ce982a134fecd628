//! Application services for the HRPulse assistant: intent
//! classification, context assembly, retrieval, response caching, and
//! the orchestrator that sequences them.

pub mod classifier;
pub mod context_store;
pub mod fallback;
pub mod orchestrator;
pub mod prompt;
pub mod response_cache;
pub mod retriever;

pub use classifier::IntentClassifier;
pub use context_store::ContextStore;
pub use fallback::FallbackLibrary;
pub use orchestrator::ChatOrchestrator;
pub use prompt::PromptBuilder;
pub use response_cache::{ResponseCache, cache_key, scope_for};
pub use retriever::DocumentRetriever;
