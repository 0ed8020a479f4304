//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted notification addressed to a single user.
///
/// Notifications are advisory, created by the system on behalf of an admin
/// action; only the owning user's read action mutates them, and they are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Identity key of the addressed user
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

/// Notification severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

/// Transient in-memory banner shown immediately on an admin action,
/// independent of whether the persisted notification write succeeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub kind: NotificationKind,
}
