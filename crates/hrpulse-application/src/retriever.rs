//! Policy-document retrieval.

use hrpulse_core::agent::{AgentError, EmbeddingAgent};
use hrpulse_core::retrieval::{RetrievedPassage, VectorIndex};
use std::sync::Arc;
use tracing::debug;

/// Retrieves ranked policy passages for a query.
///
/// The caller's access level is passed through to the index, which
/// filters candidates before scoring. Passages under the similarity
/// threshold are dropped here; an empty result is not an error.
pub struct DocumentRetriever {
    embedder: Arc<dyn EmbeddingAgent>,
    index: Arc<dyn VectorIndex>,
    similarity_threshold: f32,
}

impl DocumentRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingAgent>,
        index: Arc<dyn VectorIndex>,
        similarity_threshold: f32,
    ) -> Self {
        Self {
            embedder,
            index,
            similarity_threshold,
        }
    }

    /// Embeds `query_text` and runs the filtered similarity query.
    pub async fn search(
        &self,
        query_text: &str,
        access_level: u8,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, AgentError> {
        let vector = self.embedder.embed(query_text).await?;
        let mut passages = self.index.query(&vector, access_level, top_k).await?;

        passages.retain(|p| p.score >= self.similarity_threshold);
        // The index contract already orders results; re-sorting here
        // keeps the guarantee independent of the backend.
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            count = passages.len(),
            access_level, "retrieval completed"
        );
        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedIndex(Vec<RetrievedPassage>);

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _max_access_level: u8,
            _top_k: usize,
        ) -> Result<Vec<RetrievedPassage>, AgentError> {
            Ok(self.0.clone())
        }
    }

    struct NullEmbedder;

    #[async_trait]
    impl EmbeddingAgent for NullEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, AgentError> {
            Ok(vec![0.0; 8])
        }
    }

    fn passage(id: &str, score: f32) -> RetrievedPassage {
        RetrievedPassage {
            text: format!("text of {id}"),
            score,
            source_document_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn results_are_thresholded_and_sorted() {
        let retriever = DocumentRetriever::new(
            Arc::new(NullEmbedder),
            Arc::new(FixedIndex(vec![
                passage("low", 0.1),
                passage("best", 0.9),
                passage("mid", 0.5),
            ])),
            0.3,
        );

        let results = retriever.search("question", 1, 10).await.unwrap();
        let ids: Vec<&str> = results
            .iter()
            .map(|p| p.source_document_id.as_str())
            .collect();
        assert_eq!(ids, vec!["best", "mid"]);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn nothing_above_threshold_is_empty_not_error() {
        let retriever = DocumentRetriever::new(
            Arc::new(NullEmbedder),
            Arc::new(FixedIndex(vec![passage("weak", 0.05)])),
            0.3,
        );
        assert!(retriever.search("question", 1, 10).await.unwrap().is_empty());
    }
}
