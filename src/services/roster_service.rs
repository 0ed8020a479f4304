//! Roster and competition management
//!
//! Maintains the many-to-many association between competitions and
//! participant identities. Only paid registrants are offered as candidates;
//! the denormalized `participants` array on each competition document is
//! kept in sync by read-modify-write, and every roster or schedule change
//! notifies the affected users through the notification relay.
//!
//! The read-modify-write pattern carries no concurrency token: two admin
//! sessions mutating the same roster can lose an update (last writer wins).
//! That race is an accepted property of this design given its low-concurrency
//! administrative usage, not an invariant violation.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;

use crate::{
    backend::{Backend, QueryOp},
    constants::{collections, UNKNOWN_USER_PLACEHOLDER},
    error::{AppError, AppResult},
    models::{Competition, CompetitionPatch, NewCompetition, NotificationKind, UserProfile},
    services::NotificationService,
};

/// Roster entry resolved for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntry {
    pub user_id: String,
    /// Display name, or a placeholder when the profile no longer exists
    pub display_name: String,
}

/// Competition and roster service
pub struct RosterService {
    backend: Backend,
    notifications: Arc<NotificationService>,
}

impl RosterService {
    pub fn new(backend: Backend, notifications: Arc<NotificationService>) -> Self {
        Self {
            backend,
            notifications,
        }
    }

    /// Users eligible for roster addition. Payment is the only eligibility
    /// rule: anything not paid (unpaid, pending) is excluded.
    pub fn list_candidates(all_users: &[UserProfile]) -> Vec<&UserProfile> {
        all_users.iter().filter(|user| user.has_paid()).collect()
    }

    /// Create a competition owned by the acting admin, with an empty roster
    pub async fn create_competition(
        &self,
        owner_id: &str,
        new: NewCompetition,
    ) -> AppResult<Competition> {
        let mut record = serde_json::to_value(&new)?;
        if let Value::Object(map) = &mut record {
            map.insert("participants".to_string(), Value::Array(Vec::new()));
            map.insert("owner_id".to_string(), Value::String(owner_id.to_string()));
        }

        let id = self
            .backend
            .store()
            .create(collections::COMPETITIONS, record)
            .await?;

        Ok(Competition {
            id,
            stage: new.stage,
            name: new.name,
            description: new.description,
            date: new.date,
            time: new.time,
            venue: new.venue,
            prize: new.prize,
            status: new.status,
            participants: Vec::new(),
            owner_id: owner_id.to_string(),
        })
    }

    /// Delete a competition, confirming to the acting admin by banner
    pub async fn delete_competition(&self, competition_id: &str) -> AppResult<()> {
        let competition = self.fetch(competition_id).await?;

        match self
            .backend
            .store()
            .delete(collections::COMPETITIONS, competition_id)
            .await
        {
            Ok(()) => {
                let message =
                    format!("Competition \"{}\" has been deleted.", competition.name);
                self.notifications
                    .notify(None, &message, NotificationKind::Success)
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(competition_id, error = %e, "Error deleting competition");
                self.notifications
                    .notify(None, "Failed to delete competition", NotificationKind::Error)
                    .await;
                Err(e)
            }
        }
    }

    /// Competitions created by this admin, ordered by stage.
    ///
    /// Full scan with client-side filtering, as the small dataset warrants.
    pub async fn list_owned(&self, owner_id: &str) -> AppResult<Vec<Competition>> {
        let mut owned: Vec<Competition> = self
            .backend
            .store()
            .list_all(collections::COMPETITIONS)
            .await?
            .into_iter()
            .map(|doc| doc.into_model::<Competition>())
            .collect::<AppResult<Vec<_>>>()?
            .into_iter()
            .filter(|comp| comp.owner_id == owner_id)
            .collect();

        owned.sort_by_key(|comp| comp.stage);
        Ok(owned)
    }

    /// Competitions whose roster contains this user
    pub async fn list_for_participant(&self, user_id: &str) -> AppResult<Vec<Competition>> {
        self.backend
            .store()
            .query(
                collections::COMPETITIONS,
                "participants",
                QueryOp::ArrayContains,
                Value::String(user_id.to_string()),
                None,
            )
            .await?
            .into_iter()
            .map(|doc| doc.into_model())
            .collect()
    }

    /// Add a user to a competition's roster and notify them.
    ///
    /// Idempotent: adding an id already on the roster is a no-op, not an
    /// error, and sends no notification.
    pub async fn add_participant(&self, competition_id: &str, user_id: &str) -> AppResult<Competition> {
        let competition = self.fetch(competition_id).await?;
        if competition.has_participant(user_id) {
            return Ok(competition);
        }

        let mut updated = competition.participants.clone();
        updated.push(user_id.to_string());
        self.write_roster(competition_id, &updated).await?;

        let venue_clause = competition
            .venue
            .as_deref()
            .map(|venue| format!(" at {}", venue))
            .unwrap_or_default();
        let message = format!(
            "You have been added to {} (Stage {}). Competition scheduled for {} at {}{}.",
            competition.name, competition.stage, competition.date, competition.time, venue_clause
        );
        self.notifications
            .notify(Some(user_id), &message, NotificationKind::Success)
            .await;

        Ok(Competition {
            participants: updated,
            ..competition
        })
    }

    /// Remove a user from a competition's roster and notify them.
    /// Removing an id not on the roster leaves the sequence unchanged.
    pub async fn remove_participant(
        &self,
        competition_id: &str,
        user_id: &str,
    ) -> AppResult<Competition> {
        let competition = self.fetch(competition_id).await?;
        if !competition.has_participant(user_id) {
            return Ok(competition);
        }

        let updated: Vec<String> = competition
            .participants
            .iter()
            .filter(|id| *id != user_id)
            .cloned()
            .collect();
        self.write_roster(competition_id, &updated).await?;

        let message = format!(
            "You have been removed from {} (Stage {}). Please contact admin if you believe this was done in error.",
            competition.name, competition.stage
        );
        self.notifications
            .notify(Some(user_id), &message, NotificationKind::Success)
            .await;

        Ok(Competition {
            participants: updated,
            ..competition
        })
    }

    /// Apply a partial edit and notify every current participant with a
    /// human-readable summary of the notification-worthy changes, one write
    /// per participant, sequentially. The acting admin gets the same summary
    /// as a self-confirmation banner.
    pub async fn edit_competition(
        &self,
        competition_id: &str,
        patch: CompetitionPatch,
    ) -> AppResult<Competition> {
        let current = self.fetch(competition_id).await?;

        self.backend
            .store()
            .write(
                collections::COMPETITIONS,
                competition_id,
                serde_json::to_value(&patch)?,
            )
            .await?;

        let name = patch.name.clone().unwrap_or_else(|| current.name.clone());
        let message = format!(
            "Competition \"{}\" {}",
            name,
            patch
                .change_summary(&current)
                .unwrap_or_else(|| "details were reviewed".to_string())
        );

        for participant_id in &current.participants {
            self.notifications
                .notify(Some(participant_id), &message, NotificationKind::Success)
                .await;
        }
        self.notifications
            .notify(None, &message, NotificationKind::Success)
            .await;

        self.fetch(competition_id).await
    }

    /// Resolve the roster to display entries. A participant id that no
    /// longer references a profile renders as a placeholder rather than
    /// breaking the view; the dangling reference is left in place.
    pub async fn participant_profiles(
        &self,
        competition: &Competition,
    ) -> AppResult<Vec<ParticipantEntry>> {
        let reads = competition.participants.iter().map(|user_id| async move {
            let resolved = self
                .backend
                .store()
                .read(collections::USERS, user_id)
                .await
                .ok()
                .flatten()
                .and_then(|doc| doc.into_model::<UserProfile>().ok());

            ParticipantEntry {
                user_id: user_id.clone(),
                display_name: resolved
                    .map(|profile| profile.display_name())
                    .unwrap_or_else(|| UNKNOWN_USER_PLACEHOLDER.to_string()),
            }
        });

        Ok(join_all(reads).await)
    }

    async fn fetch(&self, competition_id: &str) -> AppResult<Competition> {
        self.backend
            .store()
            .read(collections::COMPETITIONS, competition_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Competition not found".to_string()))?
            .into_model()
    }

    async fn write_roster(&self, competition_id: &str, participants: &[String]) -> AppResult<()> {
        self.backend
            .store()
            .write(
                collections::COMPETITIONS,
                competition_id,
                serde_json::json!({ "participants": participants }),
            )
            .await
    }
}
