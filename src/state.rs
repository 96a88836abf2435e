// src/state.rs

use crate::config::Config;
use crate::storage::Storage;
use axum::extract::FromRef;

/// Shared application state: the persistence gateway and the configuration,
/// constructed once at startup and handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub config: Config,
}

impl FromRef<AppState> for Storage {
    fn from_ref(state: &AppState) -> Self {
        state.storage.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
