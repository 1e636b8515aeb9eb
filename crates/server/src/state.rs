//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::InventoryStore;

/// Application state shared across all handlers.
///
/// Cheap to clone; the inner data is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn InventoryStore>,
}

impl AppState {
    /// Build state from configuration and a storage backend.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn InventoryStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Storage backend.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn InventoryStore> {
        &self.inner.store
    }
}
