pub mod agent;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod intent;
pub mod query;
pub mod response;
pub mod retrieval;
pub mod secret;

// Re-export common error type
pub use error::{AssistantError, Result};

pub use agent::{AgentError, EmbeddingAgent, GenerationAgent};
pub use context::ContextBundle;
pub use directory::{EmployeeDirectory, EmployeeSnapshot};
pub use intent::{Intent, IntentCategory};
pub use query::{ChatQuery, Role};
pub use response::{ChatResponse, SourceRef};
pub use retrieval::{RetrievedPassage, VectorIndex};
