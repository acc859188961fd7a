use async_trait::async_trait;
use roster::{DifficultyStats, RecentSubmission};
use thiserror::Error;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub base_url: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemoteStats {
    pub stats: DifficultyStats,
    pub recent_submissions: Vec<RecentSubmission>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api: {0}")]
    Api(String),
    #[error("no such user: {0}")]
    NotFound(String),
}

/// Source of per-account solve statistics.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch_stats(&self, username: &str) -> Result<RemoteStats, FetchError>;
    fn info(&self) -> ProviderInfo;
}
