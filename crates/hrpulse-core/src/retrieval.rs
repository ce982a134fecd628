//! Retrieval model and the vector index seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::AgentError;

/// One passage returned by vector-similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage text as stored in the index.
    pub text: String,
    /// Similarity score; higher is more relevant.
    pub score: f32,
    /// Identifier of the source policy document.
    pub source_document_id: String,
}

/// Vector-similarity search over policy-document embeddings.
///
/// Implementations must apply the access-level filter to the candidate
/// set *before* scoring, so that content above the caller's level can
/// never appear in the result, not even at a low rank. An empty result
/// is a valid, non-error outcome.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Runs a similarity query.
    ///
    /// # Arguments
    /// * `vector` - The query embedding
    /// * `max_access_level` - Only passages at or below this level are candidates
    /// * `top_k` - Maximum number of passages to return
    ///
    /// # Returns
    /// Passages ordered by non-increasing score.
    async fn query(
        &self,
        vector: &[f32],
        max_access_level: u8,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, AgentError>;
}
