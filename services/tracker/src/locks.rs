use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::ServiceError;

/// One exclusive lock per dataset, guarding its roster and document files.
#[derive(Clone, Default)]
pub struct DatasetLocks {
    locks: Arc<HashMap<String, Arc<Mutex<()>>>>,
}

impl DatasetLocks {
    pub fn new(datasets: &[String]) -> Self {
        let locks = datasets
            .iter()
            .map(|d| (d.clone(), Arc::new(Mutex::new(()))))
            .collect();
        Self { locks: Arc::new(locks) }
    }

    pub async fn lock(&self, dataset: &str) -> Result<OwnedMutexGuard<()>, ServiceError> {
        let lock = self
            .locks
            .get(dataset)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownDataset(dataset.to_string()))?;
        Ok(lock.lock_owned().await)
    }
}
