//! Wires the local adapters into a running session manager.

use std::sync::Arc;

use anyhow::Result;
use tgt_application::SessionManager;
use tgt_core::config::AppConfig;
use tgt_core::session::SessionView;
use tgt_infrastructure::{
    FileSnapshotStore, JsonFileProfileRepository, LocalIdentityProvider, TgtPaths,
};
use tokio::task::JoinHandle;

pub struct App {
    pub identity_provider: Arc<LocalIdentityProvider>,
    pub profile_repository: Arc<JsonFileProfileRepository>,
    pub manager: Arc<SessionManager>,
    runner: JoinHandle<()>,
}

impl App {
    /// Opens the stores under `paths` and starts the manager.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn open(paths: &TgtPaths, config: &AppConfig) -> Result<Self> {
        let identity_provider = Arc::new(LocalIdentityProvider::from_paths(
            paths,
            config.auth.min_password_length,
        )?);
        let profile_repository = Arc::new(JsonFileProfileRepository::from_paths(paths)?);
        let snapshot_store = Arc::new(FileSnapshotStore::from_paths(paths)?);

        let manager = Arc::new(SessionManager::new(
            identity_provider.clone(),
            profile_repository.clone(),
            snapshot_store,
        ));
        let runner = manager.start();

        Ok(Self {
            identity_provider,
            profile_repository,
            manager,
            runner,
        })
    }

    /// Waits for startup restore and the provider's first report.
    pub async fn ready(&self) -> Result<SessionView> {
        Ok(self.manager.wait_until_initialized().await?)
    }

    pub fn shutdown(self) {
        self.runner.abort();
    }
}
