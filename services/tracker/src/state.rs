use std::sync::Arc;

use roster::{DocumentStore, RosterStore, Storage};
use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::locks::DatasetLocks;
use crate::merge::MergeService;
use crate::provider::StatsProvider;
use crate::scheduler::CycleReport;
use crate::update::UpdateService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AppConfig,
    pub documents: DocumentStore,
    pub merge: MergeService,
    pub update: UpdateService,
    pub provider: Arc<dyn StatsProvider>,
    pub last_cycle: RwLock<Option<CycleReport>>,
    /// Held for the whole of a refresh cycle.
    pub cycle_guard: Mutex<()>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Arc<dyn Storage>, provider: Arc<dyn StatsProvider>) -> Self {
        let locks = DatasetLocks::new(&config.datasets);
        let roster = RosterStore::new(storage.clone());
        let documents = DocumentStore::new(storage);
        let merge = MergeService::new(roster.clone(), documents.clone(), provider.clone(), locks.clone());
        let update = UpdateService::new(
            config.datasets.clone(),
            roster,
            documents.clone(),
            provider.clone(),
            locks,
        );
        Self {
            config,
            documents,
            merge,
            update,
            provider,
            last_cycle: RwLock::new(None),
            cycle_guard: Mutex::new(()),
        }
    }

    pub fn knows(&self, dataset: &str) -> bool {
        self.config.datasets.iter().any(|d| d == dataset)
    }
}
