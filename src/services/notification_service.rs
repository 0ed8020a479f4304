//! Notification relay
//!
//! Writes persisted notification records when administrative actions affect
//! a user, shows a transient banner to the acting admin, and renders unread
//! notifications with explicit mark-as-read transitions.
//!
//! Notifications are advisory and at-least-once: the banner appears and the
//! triggering action stands whether or not the persisted write lands. A
//! failed write is logged, never surfaced, and never rolled back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, RwLock};

use crate::{
    backend::{Backend, OrderBy, QueryOp},
    config::NotificationConfig,
    constants::collections,
    error::AppResult,
    models::{Banner, Notification, NotificationKind},
};

/// Notification relay bound to the acting session
pub struct NotificationService {
    backend: Backend,
    banner: watch::Sender<Option<Banner>>,
    banner_secs: u64,
    /// Generation guard so an old auto-dismiss never clears a newer banner
    banner_generation: Arc<AtomicU64>,
    /// Local copy of the last fetched unread notifications, mutated
    /// optimistically by mark-as-read
    inbox: RwLock<Vec<Notification>>,
}

impl NotificationService {
    pub fn new(backend: Backend, config: &NotificationConfig) -> Self {
        let (banner, _) = watch::channel(None);
        Self {
            backend,
            banner,
            banner_secs: config.banner_secs,
            banner_generation: Arc::new(AtomicU64::new(0)),
            inbox: RwLock::new(Vec::new()),
        }
    }

    /// Watch channel the embedding UI renders the transient banner from
    pub fn banner(&self) -> watch::Receiver<Option<Banner>> {
        self.banner.subscribe()
    }

    /// Show a banner immediately and write one persisted notification,
    /// addressed to `target` or, when omitted, to the acting identity
    /// (self-confirmation of an admin action).
    ///
    /// Fire-and-forget with respect to the UI: the persisted write is
    /// best-effort and its failure does not undo the banner or the action
    /// that triggered it.
    pub async fn notify(&self, target: Option<&str>, message: &str, kind: NotificationKind) {
        self.show_banner(message, kind);

        let user_id = match target {
            Some(uid) => Some(uid.to_string()),
            None => self.backend.auth().current_identity().map(|id| id.uid),
        };
        let Some(user_id) = user_id else {
            return;
        };

        let record = Notification {
            id: String::new(),
            user_id,
            message: message.to_string(),
            kind,
            timestamp: Utc::now(),
            read: false,
        };
        let value = match serde_json::to_value(&record) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize notification");
                return;
            }
        };

        if let Err(e) = self
            .backend
            .store()
            .create(collections::NOTIFICATIONS, value)
            .await
        {
            tracing::warn!(user_id = %record.user_id, error = %e, "Error saving notification");
        }
    }

    /// All unread notifications for `user_id`, newest first. The result
    /// becomes the local inbox snapshot.
    pub async fn list_unread(&self, user_id: &str) -> AppResult<Vec<Notification>> {
        let docs = self
            .backend
            .store()
            .query(
                collections::NOTIFICATIONS,
                "user_id",
                QueryOp::Eq,
                serde_json::Value::String(user_id.to_string()),
                Some(OrderBy::desc("timestamp")),
            )
            .await?;

        let mut unread = Vec::new();
        for doc in docs {
            let notification: Notification = doc.into_model()?;
            if !notification.read {
                unread.push(notification);
            }
        }

        *self.inbox.write().await = unread.clone();
        Ok(unread)
    }

    /// Mark a notification read. The local inbox entry flips in the same
    /// operation so the banner disappears without a re-fetch; the persisted
    /// write is best-effort. Idempotent on already-read notifications.
    pub async fn mark_read(&self, notification_id: &str) {
        {
            let mut inbox = self.inbox.write().await;
            if let Some(entry) = inbox.iter_mut().find(|n| n.id == notification_id) {
                entry.read = true;
            }
        }

        if let Err(e) = self
            .backend
            .store()
            .write(
                collections::NOTIFICATIONS,
                notification_id,
                serde_json::json!({ "read": true }),
            )
            .await
        {
            tracing::warn!(notification_id, error = %e, "Error marking notification as read");
        }
    }

    /// Snapshot of the local inbox, still-unread entries only
    pub async fn inbox(&self) -> Vec<Notification> {
        self.inbox
            .read()
            .await
            .iter()
            .filter(|n| !n.read)
            .cloned()
            .collect()
    }

    fn show_banner(&self, message: &str, kind: NotificationKind) {
        let generation = self.banner_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.banner.send_replace(Some(Banner {
            message: message.to_string(),
            kind,
        }));

        let banner = self.banner.clone();
        let current = self.banner_generation.clone();
        let dismiss_after = Duration::from_secs(self.banner_secs);
        tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            if current.load(Ordering::SeqCst) == generation {
                banner.send_replace(None);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DocumentStore;

    fn service(backend: &Backend) -> NotificationService {
        NotificationService::new(
            backend.clone(),
            &NotificationConfig { banner_secs: 1 },
        )
    }

    #[tokio::test]
    async fn test_notify_persists_unread_record_for_target() {
        let backend = Backend::in_memory();
        let relay = service(&backend);

        relay
            .notify(Some("u1"), "You have been added", NotificationKind::Success)
            .await;

        let unread = relay.list_unread("u1").await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "You have been added");
        assert!(!unread[0].read);
    }

    #[tokio::test]
    async fn test_notify_defaults_to_acting_identity() {
        let backend = Backend::in_memory();
        let identity = backend
            .auth()
            .sign_up_with_password("admin@example.com", "hunter22", "Admin")
            .await
            .unwrap();
        let relay = service(&backend);

        relay.notify(None, "Saved", NotificationKind::Success).await;

        let unread = relay.list_unread(&identity.uid).await.unwrap();
        assert_eq!(unread.len(), 1);
    }

    #[tokio::test]
    async fn test_notify_without_session_or_target_skips_write() {
        let backend = Backend::in_memory();
        let relay = service(&backend);

        relay.notify(None, "Saved", NotificationKind::Success).await;

        let docs = backend
            .store()
            .list_all(collections::NOTIFICATIONS)
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_list_unread_is_newest_first_and_excludes_read() {
        let backend = Backend::in_memory();
        let relay = service(&backend);

        relay.notify(Some("u1"), "first", NotificationKind::Success).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        relay.notify(Some("u1"), "second", NotificationKind::Error).await;
        relay.notify(Some("u2"), "other user", NotificationKind::Success).await;

        let unread = relay.list_unread("u1").await.unwrap();
        assert_eq!(unread.len(), 2);
        assert_eq!(unread[0].message, "second");
        assert_eq!(unread[1].message, "first");

        relay.mark_read(&unread[0].id).await;
        let unread = relay.list_unread("u1").await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].message, "first");
    }

    #[tokio::test]
    async fn test_mark_read_is_optimistic_and_idempotent() {
        let backend = Backend::in_memory();
        let relay = service(&backend);

        relay.notify(Some("u1"), "hello", NotificationKind::Success).await;
        let unread = relay.list_unread("u1").await.unwrap();
        let id = unread[0].id.clone();

        relay.mark_read(&id).await;
        // Local inbox updated without a re-fetch
        assert!(relay.inbox().await.is_empty());

        // Marking again changes nothing and does not error
        relay.mark_read(&id).await;
        let doc = backend
            .store()
            .read(collections::NOTIFICATIONS, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["read"], true);
    }

    #[tokio::test]
    async fn test_banner_shows_then_auto_dismisses() {
        tokio::time::pause();
        let backend = Backend::in_memory();
        let relay = service(&backend);
        let banner_rx = relay.banner();

        relay.notify(Some("u1"), "Saved", NotificationKind::Success).await;
        assert_eq!(
            banner_rx.borrow().as_ref().map(|b| b.message.clone()),
            Some("Saved".to_string())
        );

        // Let the spawned auto-dismiss task register its sleep before the
        // paused clock advances past it
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(banner_rx.borrow().is_none());
    }
}
