//! In-process vector index over seeded policy passages.
//!
//! Used when no remote index endpoint is configured, and as the test
//! double for retrieval. Pairs with [`HashingEmbedder`] so the whole
//! retrieval path runs without network access: both sides hash tokens
//! into the same fixed-dimension space, so lexical overlap produces a
//! meaningful cosine score.

use async_trait::async_trait;
use hrpulse_core::agent::{AgentError, EmbeddingAgent};
use hrpulse_core::retrieval::{RetrievedPassage, VectorIndex};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const EMBEDDING_DIM: usize = 256;

/// Deterministic feature-hashing embedder.
///
/// Tokens are hashed into a fixed-dimension bag-of-words vector which
/// is then L2-normalized, so dot product equals cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn new() -> Self {
        Self
    }

    /// Embeds synchronously; the trait impl defers to this.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBEDDING_DIM];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let slot = (hasher.finish() as usize) % EMBEDDING_DIM;
            vector[slot] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingAgent for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AgentError> {
        Ok(self.embed_sync(text))
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

struct StoredPassage {
    embedding: Vec<f32>,
    text: String,
    document_id: String,
    access_level: u8,
}

/// In-process [`VectorIndex`] with pre-scoring access filtering.
#[derive(Default)]
pub struct StaticPassageIndex {
    embedder: HashingEmbedder,
    passages: Vec<StoredPassage>,
}

impl StaticPassageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one passage; builder-style for seeding.
    pub fn with_passage(
        mut self,
        text: impl Into<String>,
        document_id: impl Into<String>,
        access_level: u8,
    ) -> Self {
        let text = text.into();
        self.passages.push(StoredPassage {
            embedding: self.embedder.embed_sync(&text),
            text,
            document_id: document_id.into(),
            access_level,
        });
        self
    }

    /// A small HR policy corpus for local mode and tests.
    pub fn seeded() -> Self {
        Self::new()
            .with_passage(
                "Employees accrue 1.5 days of annual leave per month. Unused leave up to \
                 10 days carries over to the next calendar year.",
                "policy-leave-001",
                1,
            )
            .with_passage(
                "Sick leave requires a medical certificate when the absence exceeds two \
                 consecutive working days.",
                "policy-leave-002",
                1,
            )
            .with_passage(
                "Standard working hours are 9:00 to 18:00 with a one hour lunch break. \
                 Arrival after 9:30 is recorded as a late arrival.",
                "policy-attendance-001",
                1,
            )
            .with_passage(
                "Performance reviews run twice a year. Ratings use a 1 to 5 scale and are \
                 calibrated within each department.",
                "policy-performance-001",
                1,
            )
            .with_passage(
                "Managers may view attendance summaries for their direct reports but not \
                 individual clock timestamps.",
                "policy-manager-001",
                2,
            )
            .with_passage(
                "Salary band adjustments and severance terms are restricted to HR \
                 administrators and must not be disclosed to other employees.",
                "policy-compensation-001",
                3,
            )
    }
}

#[async_trait]
impl VectorIndex for StaticPassageIndex {
    async fn query(
        &self,
        vector: &[f32],
        max_access_level: u8,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, AgentError> {
        // Access filter narrows the candidate set before any scoring.
        let mut scored: Vec<RetrievedPassage> = self
            .passages
            .iter()
            .filter(|p| p.access_level <= max_access_level)
            .map(|p| RetrievedPassage {
                text: p.text.clone(),
                score: dot(&p.embedding, vector),
                source_document_id: p.document_id.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new();
        let a = embedder.embed_sync("annual leave policy");
        let b = embedder.embed_sync("annual leave policy");
        assert_eq!(a, b);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn scores_are_sorted_non_increasing() {
        let index = StaticPassageIndex::seeded();
        let query = HashingEmbedder::new().embed_sync("how many days of annual leave do I have");
        let passages = index.query(&query, 3, 10).await.unwrap();
        assert!(passages.len() > 1);
        for pair in passages.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn restricted_passages_never_surface_below_their_level() {
        let index = StaticPassageIndex::seeded();
        // Query worded to be maximally similar to the restricted passage.
        let query = HashingEmbedder::new()
            .embed_sync("salary band adjustments severance terms HR administrators");
        let passages = index.query(&query, 1, 10).await.unwrap();
        assert!(
            passages
                .iter()
                .all(|p| p.source_document_id != "policy-compensation-001")
        );

        let admin_view = index.query(&query, 3, 10).await.unwrap();
        assert_eq!(
            admin_view.first().unwrap().source_document_id,
            "policy-compensation-001"
        );
    }

    #[tokio::test]
    async fn empty_index_returns_empty_not_error() {
        let index = StaticPassageIndex::new();
        let query = HashingEmbedder::new().embed_sync("anything");
        assert!(index.query(&query, 3, 5).await.unwrap().is_empty());
    }
}
