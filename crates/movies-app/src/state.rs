use std::sync::Arc;

use movies_dal::MovieStore;

use crate::origin::AllowedOrigins;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, store: MovieStore) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, store }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn store(&self) -> &MovieStore {
        &self.state.store
    }
}

struct AppStateInner {
    store: MovieStore,
    app_config: AppConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub allowed_origins: AllowedOrigins,
}
