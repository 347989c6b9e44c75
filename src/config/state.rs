// Application state module
// Configuration plus the injected submission store, shared by both services

use crate::forms::store::SharedStore;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(config: &Config, store: SharedStore) -> Self {
        Self {
            config: config.clone(),
            store,
        }
    }
}
