//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::ConsoleConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; the configuration and backend client are shared.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ConsoleConfig,
    backend: BackendClient,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend client cannot be constructed.
    pub fn new(config: ConsoleConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, backend }),
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// The backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }
}
