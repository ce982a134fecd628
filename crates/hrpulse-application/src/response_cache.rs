//! TTL-based response cache.
//!
//! Keys are derived deterministically from (intent category, normalized
//! query text, scope discriminator), so two queries differing only in
//! case or whitespace land on the same entry. Expired entries behave as
//! misses and are removed lazily on read.
//!
//! Concurrent identical requests may each compute and overwrite the
//! same key; last-writer-wins is the intended policy and there is no
//! single-flight de-duplication.

use hrpulse_core::intent::IntentCategory;
use hrpulse_core::query::ChatQuery;
use hrpulse_core::response::ChatResponse;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// One cached response payload.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: ChatResponse,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// In-memory response cache with per-entry TTL.
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl ResponseCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Looks up a key, treating expired entries as misses.
    pub async fn get(&self, key: &str) -> Option<ChatResponse> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: drop it so the map does not accumulate stale entries.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired()) {
            entries.remove(key);
            debug!(key, "evicted expired cache entry");
        }
        None
    }

    /// Stores a response under the default TTL. Overwrites silently.
    pub async fn put(&self, key: String, value: ChatResponse) {
        self.put_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores a response under an explicit TTL.
    pub async fn put_with_ttl(&self, key: String, value: ChatResponse, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Clears all cached responses.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }
}

/// Derives the deterministic cache key for a query.
///
/// Normalization: trim, lowercase, collapse runs of whitespace to a
/// single space.
pub fn cache_key(category: IntentCategory, query_text: &str, scope: &str) -> String {
    format!("{category}|{}|{scope}", normalize(query_text))
}

/// The scoping discriminator for a query.
///
/// Personal-data intents key on user and role so one user's cached
/// answer can never serve another; everything else keys on role alone,
/// which also separates retrieval access levels.
pub fn scope_for(category: IntentCategory, query: &ChatQuery) -> String {
    if category.needs_personal_context() {
        format!("{}:{}", query.user_id, query.role.as_str())
    } else {
        query.role.as_str().to_string()
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
