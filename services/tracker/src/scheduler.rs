use serde::Serialize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::merge::MergeSummary;
use crate::state::{AppState, SharedState};

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetRun {
    Merged(MergeSummary),
    Failed { dataset: String, error: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct CycleReport {
    pub started_at: u64,
    pub finished_at: u64,
    pub datasets: Vec<DatasetRun>,
}

pub fn now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Refreshes every dataset now and then once per interval.
///
/// The interval must comfortably exceed a cycle's duration: rows are fetched
/// one at a time, so a cycle takes roughly rows x per-call latency.
pub async fn run_scheduler(state: SharedState) {
    let mut ticker = interval(state.config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(every_secs = state.config.refresh_interval.as_secs(), "scheduler: started");

    loop {
        ticker.tick().await;
        run_cycle(&state).await;
    }
}

/// One pass over all datasets in configured order. Returns `None` if a
/// cycle was already in flight.
pub async fn run_cycle(state: &AppState) -> Option<CycleReport> {
    let Ok(_guard) = state.cycle_guard.try_lock() else {
        warn!("scheduler: previous cycle still running; skipping tick");
        return None;
    };

    let started_at = now();
    let mut datasets = Vec::with_capacity(state.config.datasets.len());
    for dataset in &state.config.datasets {
        match state.merge.run(dataset).await {
            Ok(summary) => datasets.push(DatasetRun::Merged(summary)),
            Err(e) => {
                error!(dataset = %dataset, "merge failed: {e}");
                datasets.push(DatasetRun::Failed { dataset: dataset.clone(), error: e.to_string() });
            }
        }
    }

    let report = CycleReport { started_at, finished_at: now(), datasets };
    info!(
        failed = report.datasets.iter().filter(|d| matches!(d, DatasetRun::Failed { .. })).count(),
        "scheduler: cycle done"
    );
    *state.last_cycle.write().await = Some(report.clone());
    Some(report)
}
