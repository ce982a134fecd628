//! Terminal response model.

use serde::{Deserialize, Serialize};

use crate::intent::IntentCategory;

/// A reference to a policy document that grounded an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub document_id: String,
    pub score: f32,
}

/// The artifact returned to the caller for one query.
///
/// Not persisted: conversation history is not a first-class store in
/// this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's textual answer.
    pub message: String,
    /// Classified intent category.
    pub intent: IntentCategory,
    /// Classifier confidence for that intent.
    pub confidence: f32,
    /// True only when this response was served from an actual cache
    /// hit recorded in the same request.
    pub cached: bool,
    /// Wall-clock time spent producing this response.
    pub response_time_ms: u64,
    /// Documents that grounded the answer, if retrieval ran.
    pub sources: Vec<SourceRef>,
}
