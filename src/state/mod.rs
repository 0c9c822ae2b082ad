use std::sync::Arc;

use crate::{
    config::AppConfig, dao::player_store::PlayerStore, services::upload_staging::UploadStaging,
};

pub type SharedState = Arc<AppState>;

/// Central application state: immutable configuration plus the storage handle.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn PlayerStore>,
    uploads: UploadStaging,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, store: Arc<dyn PlayerStore>) -> SharedState {
        let uploads = UploadStaging::new(config.upload_dir());
        Arc::new(Self {
            config,
            store,
            uploads,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the player store shared by every request.
    pub fn store(&self) -> Arc<dyn PlayerStore> {
        Arc::clone(&self.store)
    }

    /// Staging area for uploaded import files.
    pub fn uploads(&self) -> &UploadStaging {
        &self.uploads
    }
}
