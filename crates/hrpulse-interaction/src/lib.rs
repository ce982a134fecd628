//! REST clients for the assistant's external collaborators.
//!
//! Everything here implements a seam trait from `hrpulse-core`:
//! generation and embedding against the Gemini API, and
//! vector-similarity search against a Pinecone-style index.

pub mod config;
mod embedding_agent;
mod gemini_api_agent;
mod vector_index_client;

pub use embedding_agent::GeminiEmbeddingAgent;
pub use gemini_api_agent::GeminiApiAgent;
pub use vector_index_client::VectorIndexClient;
