use common::db::DbPool;
use metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across all handlers
///
/// Holds no mutable data of its own; each request opens its own session
/// from `db_pool`.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(db_pool: DbPool, metrics: PrometheusHandle) -> Self {
        Self { db_pool, metrics }
    }
}
