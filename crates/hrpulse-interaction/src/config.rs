//! Interaction-level defaults for the remote providers.

/// Default generation model. Flash keeps chat latency low.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default embedding model used for retrieval queries.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Base URL for the Gemini REST API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
