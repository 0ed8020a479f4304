//! Backend collaborator surface
//!
//! This module defines the abstract document-store and authentication
//! interfaces the core services are written against, plus the [`Backend`]
//! client value that bundles them. The client is constructed explicitly at
//! application startup and passed by dependency injection; there is no
//! ambient global.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

use crate::config::BackendConfig;
use crate::constants::DEFAULT_BACKEND_PROJECT;
use crate::error::{AppError, AppResult};

pub use memory::MemoryBackend;

/// A stored document together with its backend-assigned id
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Deserialize the document into a model, injecting the id into the
    /// model's `id` field
    pub fn into_model<T: DeserializeOwned>(mut self) -> AppResult<T> {
        if let Value::Object(map) = &mut self.data {
            map.insert("id".to_string(), Value::String(self.id));
        }
        Ok(serde_json::from_value(self.data)?)
    }
}

/// Supported query operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    /// Field equals the given value
    Eq,
    /// Field is an array containing the given value
    ArrayContains,
}

/// Ordering applied by [`DocumentStore::query`]
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }
}

/// Generic CRUD interface over a remote document database.
///
/// `write` has upsert-with-merge semantics: top-level fields of the patch
/// replace or extend the stored object, untouched fields survive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    async fn write(&self, collection: &str, id: &str, patch: Value) -> AppResult<()>;

    async fn create(&self, collection: &str, record: Value) -> AppResult<String>;

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Full scan; no pagination and no server-side filtering
    async fn list_all(&self, collection: &str) -> AppResult<Vec<Document>>;

    async fn query(
        &self,
        collection: &str,
        field: &str,
        op: QueryOp,
        value: Value,
        order_by: Option<OrderBy>,
    ) -> AppResult<Vec<Document>>;
}

/// Authenticated principal issued by the authentication service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque identity key
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Authentication service issuing session identity and state-change events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Identity>;

    async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<Identity>;

    async fn sign_out(&self) -> AppResult<()>;

    /// The currently signed-in identity, if any
    fn current_identity(&self) -> Option<Identity>;

    /// Subscribe to authentication state changes. The receiver observes the
    /// current state immediately and every subsequent sign-in/sign-out;
    /// dropping it unsubscribes.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Backend client bundling the document store and the authentication service
#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthService>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}

impl Backend {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthService>) -> Self {
        Self { store, auth }
    }

    /// Backend backed entirely by in-process state, for local development
    /// and tests
    pub fn in_memory() -> Self {
        let memory = Arc::new(MemoryBackend::new());
        Self {
            store: memory.clone(),
            auth: memory,
        }
    }

    /// Build the backend named by the configuration.
    ///
    /// Only the local in-memory backend ships with this crate; a hosted
    /// project needs a client supplied by the embedding application through
    /// [`Backend::new`].
    pub fn from_config(config: &BackendConfig) -> AppResult<Self> {
        if config.project == DEFAULT_BACKEND_PROJECT {
            return Ok(Self::in_memory());
        }
        Err(AppError::Configuration(format!(
            "no client available for backend project '{}'",
            config.project
        )))
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn auth(&self) -> &dyn AuthService {
        self.auth.as_ref()
    }
}
