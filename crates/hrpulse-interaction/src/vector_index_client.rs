//! VectorIndexClient - REST client for a Pinecone-style vector index.
//!
//! The index holds policy-document passage embeddings. Each stored
//! vector carries `text`, `document_id` and `access_level` metadata;
//! the access-level constraint is sent as a metadata filter in the
//! query body so the index narrows the candidate set *before* scoring.

use async_trait::async_trait;
use hrpulse_core::agent::AgentError;
use hrpulse_core::retrieval::{RetrievedPassage, VectorIndex};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

/// Remote vector index over the `/query` REST endpoint.
#[derive(Clone)]
pub struct VectorIndexClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl VectorIndexClient {
    /// Creates a client for the given index endpoint.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl VectorIndex for VectorIndexClient {
    async fn query(
        &self,
        vector: &[f32],
        max_access_level: u8,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, AgentError> {
        let request = QueryRequest {
            vector: vector.to_vec(),
            top_k,
            include_metadata: true,
            filter: json!({ "access_level": { "$lte": max_access_level } }),
        };

        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| AgentError::ProcessError {
                status_code: None,
                message: format!("Vector index request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AgentError::ProcessError {
                status_code: Some(status.as_u16()),
                message: format!("Vector index returned {status}"),
                is_retryable: status.is_server_error() || status.as_u16() == 429,
                retry_after: None,
            });
        }

        let parsed: QueryResponse = response.json().await.map_err(|err| {
            AgentError::Other(format!("Failed to parse vector index response: {err}"))
        })?;

        let mut passages: Vec<RetrievedPassage> = parsed
            .matches
            .into_iter()
            .filter_map(|m| {
                let Some(metadata) = m.metadata else {
                    // A vector without metadata cannot be rendered into
                    // a prompt; skip it rather than fail the query.
                    warn!(match_id = %m.id, "vector match missing metadata, skipping");
                    return None;
                };
                Some(RetrievedPassage {
                    text: metadata.text,
                    score: m.score,
                    source_document_id: metadata.document_id.unwrap_or(m.id),
                })
            })
            .collect();

        // The index already ranks matches, but the ordering contract
        // belongs to this side of the seam.
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(passages)
    }
}

#[derive(Serialize)]
struct QueryRequest {
    vector: Vec<f32>,
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
    filter: serde_json::Value,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    score: f32,
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    text: String,
    document_id: Option<String>,
}
