mod blocking;
mod config;
mod error;
mod locks;
mod merge;
pub mod provider;
mod provider_leetcode;
mod routes;
mod routes_admin;
mod routes_data;
mod routes_status;
mod scheduler;
mod state;
mod update;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use roster::{DiskStorage, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::provider_leetcode::LeetCodeProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = AppConfig::from_env()?;

    let storage: Arc<dyn Storage> = Arc::new(DiskStorage::new(&cfg.data_dir));
    let provider = LeetCodeProvider::new(cfg.graphql_url.clone(), cfg.fetch_timeout)
        .context("Failed to build LeetCode HTTP client")?;

    let app_state = Arc::new(AppState::new(cfg.clone(), storage, Arc::new(provider)));

    // Refresh all datasets now, then every interval
    tokio::spawn(crate::scheduler::run_scheduler(app_state.clone()));

    let app = crate::routes::router(app_state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, datasets = ?cfg.datasets, "tracker listening");
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
