use std::sync::Arc;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::services::{AuthService, LedgerService, RecordStore};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store.as_ref(), self.config.auth.bcrypt_cost)
    }

    pub fn ledger(&self) -> LedgerService<'_> {
        LedgerService::new(self.store.as_ref())
    }

    /// Runs file scans and password hashing on the blocking pool so they
    /// don't hold up the async workers.
    pub async fn blocking<T, F>(&self, task: F) -> AppResult<T>
    where
        F: FnOnce(&AppState) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || task(&state))
            .await
            .map_err(|e| AppError::Task(e.to_string()))?
    }
}
