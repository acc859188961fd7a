//! Full-dataset refresh: roster rows -> remote stats -> ranked document.

use std::sync::Arc;

use roster::{
    profile_handle, rank_by_solved, DocumentStore, FetchedProfile, IdentityRow, MergedRecord,
    ProfileData, RosterStore,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::blocking::run_blocking;
use crate::error::ServiceError;
use crate::locks::DatasetLocks;
use crate::provider::{RemoteStats, StatsProvider};

/// What a single row's merge produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolvedCount {
    Fetched(u64),
    /// The remote call failed; the record carries zero stats.
    FetchFailed,
    /// Profile URL is not a recognized form; the record carries `info`.
    NoProfile,
}

impl SolvedCount {
    pub fn value(self) -> Option<u64> {
        match self {
            SolvedCount::Fetched(n) => Some(n),
            SolvedCount::FetchFailed | SolvedCount::NoProfile => None,
        }
    }
}

/// Builds one merged record. Remote failures are absorbed here.
pub async fn build_record(
    provider: &dyn StatsProvider,
    identity: IdentityRow,
) -> (MergedRecord, SolvedCount) {
    let Some(username) = profile_handle(&identity.profile_url).map(str::to_string) else {
        debug!(roll = %identity.identifier, "not a profile url; skipping remote call");
        let record = MergedRecord { identity, profile: ProfileData::unavailable() };
        return (record, SolvedCount::NoProfile);
    };

    let (remote, solved) = match provider.fetch_stats(&username).await {
        Ok(remote) => {
            let total = remote.stats.total_solved;
            (remote, SolvedCount::Fetched(total))
        }
        Err(e) => {
            warn!(roll = %identity.identifier, %username, "stats fetch failed: {e}");
            (RemoteStats::default(), SolvedCount::FetchFailed)
        }
    };

    let record = MergedRecord {
        identity,
        profile: ProfileData::Fetched(FetchedProfile {
            username,
            stats: remote.stats,
            recent_submissions: remote.recent_submissions,
        }),
    };
    (record, solved)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub dataset: String,
    pub rows: usize,
    pub fetched: usize,
    pub failed: usize,
    pub no_profile: usize,
}

#[derive(Clone)]
pub struct MergeService {
    roster: RosterStore,
    documents: DocumentStore,
    provider: Arc<dyn StatsProvider>,
    locks: DatasetLocks,
}

impl MergeService {
    pub fn new(
        roster: RosterStore,
        documents: DocumentStore,
        provider: Arc<dyn StatsProvider>,
        locks: DatasetLocks,
    ) -> Self {
        Self { roster, documents, provider, locks }
    }

    /// Rebuilds the dataset's document from scratch.
    ///
    /// The dataset lock is held from roster load to document write, so a
    /// concurrent profile update either lands before the roster is read or
    /// after the new document is written. On any error the previous
    /// document is left as it was.
    pub async fn run(&self, dataset: &str) -> Result<MergeSummary, ServiceError> {
        let _guard = self.locks.lock(dataset).await?;

        let store = self.roster.clone();
        let name = dataset.to_string();
        let roster = run_blocking(move || store.load(&name)).await?;
        info!(dataset, rows = roster.rows.len(), "merge: roster loaded");

        let mut summary = MergeSummary {
            dataset: dataset.to_string(),
            rows: roster.rows.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(roster.rows.len());
        for row in roster.rows {
            let (record, solved) = build_record(self.provider.as_ref(), row).await;
            match solved {
                SolvedCount::Fetched(_) => summary.fetched += 1,
                SolvedCount::FetchFailed => summary.failed += 1,
                SolvedCount::NoProfile => summary.no_profile += 1,
            }
            records.push(record);
        }

        rank_by_solved(&mut records, MergedRecord::total_solved);

        let docs = self.documents.clone();
        let name = dataset.to_string();
        run_blocking(move || docs.save(&name, &records)).await?;

        info!(
            dataset,
            fetched = summary.fetched,
            failed = summary.failed,
            no_profile = summary.no_profile,
            "merge: document written"
        );
        Ok(summary)
    }
}
