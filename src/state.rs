use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::sync::{BestEffortSynchronizer, StatusSynchronizer};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub synchronizer: Arc<dyn StatusSynchronizer>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            synchronizer: Arc::new(BestEffortSynchronizer),
        }
    }

    /// Swap the synchronizer, e.g. for tests that force the side updates to
    /// fail.
    pub fn with_synchronizer(mut self, synchronizer: Arc<dyn StatusSynchronizer>) -> Self {
        self.synchronizer = synchronizer;
        self
    }
}
