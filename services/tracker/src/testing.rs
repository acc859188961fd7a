use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use roster::{
    column_path, DifficultyStats, DocumentStore, IdentityRow, InMemoryStorage, RecentSubmission,
    RosterStore, Storage, DAY_FILE, NAME_FILE, PHONE_FILE, ROLL_FILE, SECTION_FILE, URL_FILE,
};

use crate::locks::DatasetLocks;
use crate::merge::MergeService;
use crate::provider::{FetchError, ProviderInfo, RemoteStats, StatsProvider};
use crate::update::UpdateService;

#[derive(Clone, Default)]
pub struct FakeProvider {
    answers: Arc<HashMap<String, RemoteStats>>,
    failing: Arc<HashSet<String>>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn with(mut self, username: &str, stats: RemoteStats) -> Self {
        Arc::make_mut(&mut self.answers).insert(username.to_string(), stats);
        self
    }

    pub fn failing(mut self, username: &str) -> Self {
        Arc::make_mut(&mut self.failing).insert(username.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsProvider for FakeProvider {
    async fn fetch_stats(&self, username: &str) -> Result<RemoteStats, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.failing.contains(username) {
            return Err(FetchError::Api(format!("{username}: upstream error")));
        }
        self.answers
            .get(username)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(username.to_string()))
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo { name: "fake".to_string(), base_url: "memory://".to_string() }
    }
}

pub fn fake_stats(total: u64) -> RemoteStats {
    RemoteStats {
        stats: DifficultyStats { total_solved: total, easy_solved: total, medium_solved: 0, hard_solved: 0 },
        recent_submissions: vec![RecentSubmission(serde_json::json!({
            "id": "1", "title": "Two Sum", "timestamp": "1700000000",
            "statusDisplay": "Accepted", "runtime": "4 ms", "memory": "2 MB", "lang": "rust"
        }))],
    }
}

pub fn row_with_url(identifier: &str, url: &str) -> IdentityRow {
    IdentityRow {
        identifier: identifier.to_string(),
        name: format!("Student {identifier}"),
        profile_url: url.to_string(),
        section: "A".to_string(),
        day: "Mon".to_string(),
        phone: "9000000000".to_string(),
    }
}

/// Writes a six-column roster without counting as storage writes.
pub fn seed_roster(mem: &InMemoryStorage, dataset: &str, rows: &[(&str, &str)]) {
    let rows: Vec<IdentityRow> = rows.iter().map(|(id, url)| row_with_url(id, url)).collect();
    let column = |f: fn(&IdentityRow) -> &str| rows.iter().map(f).collect::<Vec<_>>().join("\n");
    mem.insert(&column_path(dataset, ROLL_FILE), &column(|r| r.identifier.as_str()));
    mem.insert(&column_path(dataset, NAME_FILE), &column(|r| r.name.as_str()));
    mem.insert(&column_path(dataset, URL_FILE), &column(|r| r.profile_url.as_str()));
    mem.insert(&column_path(dataset, SECTION_FILE), &column(|r| r.section.as_str()));
    mem.insert(&column_path(dataset, DAY_FILE), &column(|r| r.day.as_str()));
    mem.insert(&column_path(dataset, PHONE_FILE), &column(|r| r.phone.as_str()));
}

pub fn datasets(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn services(
    mem: &InMemoryStorage,
    provider: FakeProvider,
    names: &[&str],
) -> (MergeService, UpdateService) {
    let storage: Arc<dyn Storage> = Arc::new(mem.clone());
    let names = datasets(names);
    let locks = DatasetLocks::new(&names);
    let roster = RosterStore::new(storage.clone());
    let documents = DocumentStore::new(storage);
    let provider: Arc<dyn StatsProvider> = Arc::new(provider);
    let merge = MergeService::new(roster.clone(), documents.clone(), provider.clone(), locks.clone());
    let update = UpdateService::new(names, roster, documents, provider, locks);
    (merge, update)
}

pub fn test_config(names: &[&str]) -> crate::config::AppConfig {
    crate::config::AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        data_dir: ".".to_string(),
        datasets: datasets(names),
        refresh_interval: Duration::from_secs(7200),
        graphql_url: "http://127.0.0.1/graphql".to_string(),
        fetch_timeout: Duration::from_secs(1),
        admin_password: "letmein".to_string(),
    }
}

pub fn test_state(mem: &InMemoryStorage, provider: FakeProvider, names: &[&str]) -> crate::state::AppState {
    crate::state::AppState::new(test_config(names), Arc::new(mem.clone()), Arc::new(provider))
}
