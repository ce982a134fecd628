//! HRPulse assistant HTTP server.

use anyhow::Result;
use hrpulse_server::routes;
use hrpulse_server::state::AppState;
use hrpulse_core::config::SecretConfig;
use hrpulse_core::secret::SecretService;
use hrpulse_infrastructure::{ConfigService, SecretServiceImpl};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ConfigService::new().get_config();

    let secrets = match SecretServiceImpl::new_default() {
        Ok(service) if service.secret_file_exists().await => {
            service.load_secrets().await.unwrap_or_else(|e| {
                warn!(error = %e, "failed to load secret.json, running keyless");
                SecretConfig::default()
            })
        }
        _ => {
            warn!("no secret.json found, running keyless");
            SecretConfig::default()
        }
    };

    let state = Arc::new(AppState::from_config(&config, &secrets));
    let router = routes::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "hrpulse server listening");

    axum::serve(listener, router).await?;
    Ok(())
}
