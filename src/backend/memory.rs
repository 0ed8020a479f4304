//! In-memory backend
//!
//! A process-local implementation of [`DocumentStore`] and [`AuthService`]
//! used for local development and tests. Documents live in per-collection
//! maps behind a `tokio` RwLock; authentication state is published on a
//! watch channel so subscribers observe sign-in/sign-out transitions.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

use super::{AuthService, Document, DocumentStore, Identity, OrderBy, QueryOp};
use crate::error::{AppError, AppResult};

/// Registered account record
struct Account {
    uid: String,
    password_hash: String,
    display_name: String,
}

/// In-memory document store and authentication service
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
    accounts: RwLock<HashMap<String, Account>>,
    auth_state: watch::Sender<Option<Identity>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (auth_state, _) = watch::channel(None);
        Self {
            collections: RwLock::new(HashMap::new()),
            accounts: RwLock::new(HashMap::new()),
            auth_state,
        }
    }

    /// Hash password using Argon2
    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Shallow merge: top-level fields of `patch` replace or extend `target`
    fn merge_into(target: &mut Value, patch: Value) {
        match (target, patch) {
            (Value::Object(existing), Value::Object(incoming)) => {
                for (key, value) in incoming {
                    existing.insert(key, value);
                }
            }
            (target, patch) => *target = patch,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn read(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn write(&self, collection: &str, id: &str, patch: Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.entry(id.to_string()) {
            Entry::Occupied(mut existing) => Self::merge_into(existing.get_mut(), patch),
            Entry::Vacant(slot) => {
                slot.insert(patch);
            }
        }
        Ok(())
    }

    async fn create(&self, collection: &str, record: Value) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list_all(&self, collection: &str) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        op: QueryOp,
        value: Value,
        order_by: Option<OrderBy>,
    ) -> AppResult<Vec<Document>> {
        let mut matches: Vec<Document> = self
            .list_all(collection)
            .await?
            .into_iter()
            .filter(|doc| match (op, doc.data.get(field)) {
                (QueryOp::Eq, Some(stored)) => *stored == value,
                (QueryOp::ArrayContains, Some(Value::Array(items))) => items.contains(&value),
                _ => false,
            })
            .collect();

        if let Some(order) = order_by {
            matches.sort_by(|a, b| {
                let left = a.data.get(&order.field).map(value_sort_key);
                let right = b.data.get(&order.field).map(value_sort_key);
                let ordering = left.cmp(&right);
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(matches)
    }
}

/// Comparable key for ordering; RFC 3339 timestamps order correctly as strings
fn value_sort_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl AuthService for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Identity> {
        let accounts = self.accounts.read().await;
        let account = accounts.get(email).ok_or(AppError::InvalidCredentials)?;

        if !Self::verify_password(password, &account.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let identity = Identity {
            uid: account.uid.clone(),
            email: email.to_string(),
            display_name: Some(account.display_name.clone()),
        };
        self.auth_state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<Identity> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AppError::EmailTaken);
        }

        let account = Account {
            uid: Uuid::new_v4().to_string(),
            password_hash: Self::hash_password(password)?,
            display_name: display_name.to_string(),
        };
        let identity = Identity {
            uid: account.uid.clone(),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
        };
        accounts.insert(email.to_string(), account);
        self.auth_state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.auth_state.send_replace(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.auth_state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.auth_state.subscribe()
    }
}
