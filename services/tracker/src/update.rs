//! Single-row profile repair: rewrite one URL, refetch one record, re-rank.

use std::sync::Arc;

use roster::{column_value, rank_by_solved, solved_count, DocumentStore, RosterStore};
use tracing::{info, warn};

use crate::blocking::run_blocking;
use crate::error::ServiceError;
use crate::locks::DatasetLocks;
use crate::merge::{build_record, SolvedCount};
use crate::provider::StatsProvider;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedUpdate {
    pub dataset: String,
    pub name: String,
    pub solved: SolvedCount,
}

impl AppliedUpdate {
    /// `None` when the URL is not a profile or the fetch failed open.
    pub fn new_total_solved(&self) -> Option<u64> {
        self.solved.value()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied(AppliedUpdate),
    NotFound,
}

#[derive(Clone)]
pub struct UpdateService {
    datasets: Vec<String>,
    roster: RosterStore,
    documents: DocumentStore,
    provider: Arc<dyn StatsProvider>,
    locks: DatasetLocks,
}

impl UpdateService {
    pub fn new(
        datasets: Vec<String>,
        roster: RosterStore,
        documents: DocumentStore,
        provider: Arc<dyn StatsProvider>,
        locks: DatasetLocks,
    ) -> Self {
        Self { datasets, roster, documents, provider, locks }
    }

    /// Points `identifier`'s profile at `new_url` in the first dataset (in
    /// configured order) whose roster contains it.
    ///
    /// `new_url` is trimmed; a blank value or one with line breaks is
    /// rejected with `RosterError::InvalidValue` before any file is touched.
    pub async fn update_profile(
        &self,
        identifier: &str,
        new_url: &str,
    ) -> Result<UpdateOutcome, ServiceError> {
        // same normalization the roster loader applies on the next merge
        let new_url = column_value(new_url)?;

        for dataset in &self.datasets {
            // unlocked lookup; a running merge may hold the lock for a while
            let unlocked = match self.load_roster(dataset).await {
                Ok(roster) => roster,
                Err(e) => {
                    warn!(dataset = %dataset, "update: skipping unreadable roster: {e}");
                    continue;
                }
            };
            if unlocked.find(identifier).is_none() {
                continue;
            }

            let _guard = self.locks.lock(dataset).await?;
            let roster = self.load_roster(dataset).await?;
            let Some(index) = roster.find(identifier) else {
                warn!(dataset = %dataset, roll = %identifier, "update: row vanished before lock");
                continue;
            };

            // document first: a bad document must fail before anything is written
            let docs = self.documents.clone();
            let name = dataset.clone();
            let mut entries = run_blocking(move || docs.load_entries(&name))
                .await?
                .unwrap_or_default();

            let store = self.roster.clone();
            let (name, url) = (dataset.clone(), new_url.to_string());
            run_blocking(move || store.replace_profile_url(&name, index, &url)).await?;

            entries.retain(|e| e.get("roll").and_then(|v| v.as_str()) != Some(identifier));

            let mut row = roster.rows[index].clone();
            row.profile_url = new_url.to_string();
            let person = row.name.clone();
            let (record, solved) = build_record(self.provider.as_ref(), row).await;

            entries.push(serde_json::to_value(&record)?);
            rank_by_solved(&mut entries, solved_count);

            let docs = self.documents.clone();
            let name = dataset.clone();
            run_blocking(move || docs.save(&name, &entries)).await?;

            let applied = AppliedUpdate { dataset: dataset.clone(), name: person, solved };
            info!(
                dataset = %dataset,
                roll = %identifier,
                new_total = ?applied.new_total_solved(),
                "update: profile url replaced"
            );
            return Ok(UpdateOutcome::Applied(applied));
        }

        info!(roll = %identifier, "update: identifier not found in any dataset");
        Ok(UpdateOutcome::NotFound)
    }

    async fn load_roster(&self, dataset: &str) -> Result<roster::Roster, ServiceError> {
        let store = self.roster.clone();
        let name = dataset.to_string();
        run_blocking(move || store.load(&name)).await
    }
}
