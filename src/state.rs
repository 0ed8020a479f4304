//! Application state management
//!
//! This module contains the shared application state constructed once at
//! startup and passed to the core services by dependency injection.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Backend client (document store + authentication service)
    pub backend: Backend,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(backend: Backend, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { backend, config }),
        }
    }

    /// Get a reference to the backend client
    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
