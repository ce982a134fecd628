//! Secret service implementation.
//!
//! Reads API keys from `secret.json` under the hrpulse config
//! directory. Error messages deliberately carry paths and parse
//! positions only, never file contents.

use async_trait::async_trait;
use hrpulse_core::config::SecretConfig;
use hrpulse_core::secret::SecretService;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Service for managing secret configuration.
///
/// Loads `secret.json` once and caches it to avoid repeated file I/O.
#[derive(Clone)]
pub struct SecretServiceImpl {
    /// Cached secret config loaded from storage.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    path: PathBuf,
}

impl SecretServiceImpl {
    /// Creates a service reading from the default location
    /// (`~/.config/hrpulse/secret.json`, overridable with
    /// `HRPULSE_SECRET`).
    pub fn new_default() -> anyhow::Result<Self> {
        let path = if let Ok(explicit) = std::env::var("HRPULSE_SECRET") {
            PathBuf::from(explicit)
        } else {
            let base = dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("No config directory found for secret.json"))?;
            base.join("hrpulse").join("secret.json")
        };
        Ok(Self::with_path(path))
    }

    /// Creates a service reading from an explicit path.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_internal(&self) -> Result<SecretConfig, String> {
        {
            let read_lock = self.secrets.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {e}", self.path.display()))?;
        let parsed: SecretConfig = serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse {}: {e}", self.path.display()))?;

        {
            let mut write_lock = self.secrets.write().unwrap();
            *write_lock = Some(parsed.clone());
        }
        Ok(parsed)
    }
}

#[async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.path.exists()
    }
}
