//! Application state containing the registry and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infrastructure::Registry;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        self.registry.db()
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.registry.db().clone()
    }
}
