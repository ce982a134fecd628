//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/hrpulse/config.toml`
//! (overridable with `HRPULSE_CONFIG`), caching it to avoid repeated
//! file I/O.

use hrpulse_core::config::RootConfig;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<RootConfig>>>,
    /// Explicit path override, used by tests.
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a new ConfigService.
    ///
    /// The configuration is loaded lazily on first access to avoid
    /// blocking during initialization.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: None,
        }
    }

    /// Creates a service reading from an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: Some(path.into()),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing or unparseable file yields the defaults; the service
    /// never fails the caller over configuration.
    pub fn get_config(&self) -> RootConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load config.toml, using defaults");
            RootConfig::default()
        });

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<RootConfig, String> {
        let config_path = match &self.path {
            Some(path) => path.clone(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(RootConfig::default());
        }

        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read {}: {e}", config_path.display()))?;
        toml::from_str(&raw).map_err(|e| format!("Failed to parse {}: {e}", config_path.display()))
    }

    fn default_config_path() -> Result<PathBuf, String> {
        if let Ok(explicit) = std::env::var("HRPULSE_CONFIG") {
            return Ok(PathBuf::from(explicit));
        }
        let base = dirs::config_dir().ok_or_else(|| "No config directory found".to_string())?;
        Ok(base.join("hrpulse").join("config.toml"))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("absent.toml"));
        let config = service.get_config();
        assert_eq!(config.chatbot.generation_timeout_secs, 40);
    }

    #[test]
    fn file_values_are_loaded_and_cached() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().server.port, 9000);

        // Cached value survives file removal until invalidated.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(service.get_config().server.port, 9000);
        service.invalidate_cache();
        assert_eq!(service.get_config().server.port, 8620);
    }
}
