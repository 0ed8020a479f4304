//! Competition model

use serde::{Deserialize, Serialize};

/// Competition document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Positive ordering key; stage 1 is the campus round
    pub stage: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Local wall-clock date, "YYYY-MM-DD"
    pub date: String,
    /// Local wall-clock time, "HH:MM"
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Prize amount in Rand, kept as entered
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub status: CompetitionStatus,
    /// Roster of participant identity keys. Ordered, uniqueness expected
    /// but not enforced by the storage layer.
    #[serde(default)]
    pub participants: Vec<String>,
    /// Identity key of the admin who created the competition
    #[serde(default)]
    pub owner_id: String,
}

impl Competition {
    /// Check whether a user id is on the roster
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|id| id == user_id)
    }
}

/// Competition lifecycle status.
///
/// Transitions are admin-driven only. The write path accepts any
/// transition, including out-of-order ones such as completed -> upcoming;
/// the UI simply does not offer them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    #[default]
    Upcoming,
    Locked,
    Completed,
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Locked => write!(f, "locked"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// New competition payload; the roster starts empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompetition {
    pub stage: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub status: CompetitionStatus,
}

/// Partial competition update applied by the owning admin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompetitionStatus>,
}

impl CompetitionPatch {
    /// Human-readable summary of the notification-worthy changes this patch
    /// makes to `current`: schedule, venue, prize and status. Returns `None`
    /// when none of those fields change.
    pub fn change_summary(&self, current: &Competition) -> Option<String> {
        let mut changes = Vec::new();

        let date = self.date.as_deref().unwrap_or(&current.date);
        let time = self.time.as_deref().unwrap_or(&current.time);
        if date != current.date || time != current.time {
            changes.push(format!("scheduled for {} at {}", date, time));
        }
        if let Some(venue) = &self.venue {
            if current.venue.as_deref() != Some(venue.as_str()) {
                changes.push(format!("venue changed to {}", venue));
            }
        }
        if let Some(prize) = &self.prize {
            if *prize != current.prize {
                changes.push(format!("prize updated to R{}", prize));
            }
        }
        if let Some(status) = self.status {
            if status != current.status {
                changes.push(format!("status changed to {}", status));
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join(", "))
        }
    }
}
