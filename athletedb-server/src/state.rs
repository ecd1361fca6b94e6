//! Shared application state for the athletedb server

use std::sync::Arc;

use athletedb_core::{AssessmentService, SqliteStore, StatsEngine, StoreError};
use chrono::{DateTime, Utc};

/// Shared application state accessible by all handlers
pub struct AppState {
    /// Raw store; registry and athlete CRUD go straight through it
    pub store: Arc<SqliteStore>,
    /// Assessment writes and the athlete cascade go through the service
    pub assessments: AssessmentService<SqliteStore>,
    /// Derived statistics
    pub stats: StatsEngine<SqliteStore>,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wrap an opened store
    pub fn new(store: SqliteStore) -> Self {
        let store = Arc::new(store);
        Self {
            assessments: AssessmentService::new(Arc::clone(&store)),
            stats: StatsEngine::new(Arc::clone(&store)),
            store,
            started_at: Utc::now(),
        }
    }

    /// In-memory state (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(SqliteStore::open_in_memory()?))
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
