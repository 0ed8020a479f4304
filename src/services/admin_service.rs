//! Admin service
//!
//! Registration management for the administrative console: the full user
//! list, profile edits with change notifications, and summary statistics.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    backend::Backend,
    config::RegistrationConfig,
    constants::collections,
    error::{AppError, AppResult},
    models::{NotificationKind, UserProfile, UserProfilePatch},
    services::NotificationService,
};

/// Registration summary for the console header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationStats {
    pub total_registrations: usize,
    pub paid_registrations: usize,
    /// Paid registrations times the configured fee, in Rand
    pub total_revenue_rand: u64,
    pub universities: usize,
    pub tvet_colleges: usize,
    pub active_campuses: usize,
}

/// Admin service for registration management
pub struct AdminService {
    backend: Backend,
    notifications: Arc<NotificationService>,
}

impl AdminService {
    pub fn new(backend: Backend, notifications: Arc<NotificationService>) -> Self {
        Self {
            backend,
            notifications,
        }
    }

    /// Every registered profile. Full collection scan, filtered client-side
    /// by the console.
    pub async fn list_all_users(&self) -> AppResult<Vec<UserProfile>> {
        self.backend
            .store()
            .list_all(collections::USERS)
            .await?
            .into_iter()
            .map(|doc| doc.into_model())
            .collect()
    }

    /// Apply an admin edit to a user's profile and notify the user with a
    /// summary of what changed. The profile write is authoritative and its
    /// failure aborts the flow; the notification is advisory best-effort.
    pub async fn edit_user(&self, user_id: &str, patch: UserProfilePatch) -> AppResult<()> {
        let current: UserProfile = self
            .backend
            .store()
            .read(collections::USERS, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            .into_model()?;

        self.backend
            .store()
            .write(collections::USERS, user_id, serde_json::to_value(&patch)?)
            .await?;

        let message = profile_change_message(&current, &patch);
        self.notifications
            .notify(Some(user_id), &message, NotificationKind::Success)
            .await;

        Ok(())
    }

    /// Pure summary over a fetched user list
    pub fn registration_stats(
        users: &[UserProfile],
        config: &RegistrationConfig,
    ) -> RegistrationStats {
        let paid = users.iter().filter(|u| u.has_paid()).count();

        let universities: HashSet<&str> = users
            .iter()
            .filter(|u| u.institution_type.eq_ignore_ascii_case("university"))
            .map(|u| u.institution.as_str())
            .collect();
        let tvet_colleges: HashSet<&str> = users
            .iter()
            .filter(|u| u.institution_type.eq_ignore_ascii_case("tvet"))
            .map(|u| u.institution.as_str())
            .collect();
        let campuses: HashSet<&str> = users.iter().map(|u| u.campus.as_str()).collect();

        RegistrationStats {
            total_registrations: users.len(),
            paid_registrations: paid,
            total_revenue_rand: paid as u64 * config.fee_rand as u64,
            universities: universities.len(),
            tvet_colleges: tvet_colleges.len(),
            active_campuses: campuses.len(),
        }
    }
}

/// Summary of the fields an admin edit changed, in the wording users see
fn profile_change_message(current: &UserProfile, patch: &UserProfilePatch) -> String {
    let mut changes = Vec::new();

    let first_name = patch.first_name.as_deref().unwrap_or(&current.first_name);
    let last_name = patch.last_name.as_deref().unwrap_or(&current.last_name);
    if first_name != current.first_name || last_name != current.last_name {
        changes.push(format!("name to {} {}", first_name, last_name));
    }
    if let Some(status) = patch.registration_status {
        if status != current.registration_status {
            changes.push(format!("registration status to {}", status));
        }
    }
    if let Some(institution) = &patch.institution {
        if *institution != current.institution {
            changes.push(format!("institution to {}", institution));
        }
    }
    if let Some(campus) = &patch.campus {
        if *campus != current.campus {
            changes.push(format!("campus to {}", campus));
        }
    }

    if changes.is_empty() {
        "Admin reviewed your profile".to_string()
    } else {
        format!("Admin updated your {}", changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::DocumentStore;
    use crate::config::NotificationConfig;
    use crate::models::{RegistrationStatus, Role};

    fn services(backend: &Backend) -> (AdminService, Arc<NotificationService>) {
        let notifications = Arc::new(NotificationService::new(
            backend.clone(),
            &NotificationConfig { banner_secs: 1 },
        ));
        (
            AdminService::new(backend.clone(), notifications.clone()),
            notifications,
        )
    }

    fn user(institution_type: &str, institution: &str, campus: &str, paid: bool) -> UserProfile {
        UserProfile {
            id: String::new(),
            first_name: "Thandi".to_string(),
            last_name: "Nkosi".to_string(),
            email: String::new(),
            student_number: String::new(),
            id_passport_number: String::new(),
            institution_type: institution_type.to_string(),
            institution: institution.to_string(),
            campus: campus.to_string(),
            registration_status: if paid {
                RegistrationStatus::Paid
            } else {
                RegistrationStatus::Unpaid
            },
            current_stage: 1,
            stage_status: "upcoming".to_string(),
            agree_marketing: false,
            created_at: String::new(),
            role: Role::User,
            banned: false,
        }
    }

    #[tokio::test]
    async fn test_edit_user_notifies_with_change_summary() {
        let backend = Backend::in_memory();
        let (admin, notifications) = services(&backend);
        backend
            .store()
            .write(
                collections::USERS,
                "u1",
                json!({
                    "first_name": "Thandi",
                    "last_name": "Nkosi",
                    "institution": "UCT",
                    "campus": "Main",
                    "registration_status": "pending",
                }),
            )
            .await
            .unwrap();

        admin
            .edit_user(
                "u1",
                UserProfilePatch {
                    registration_status: Some(RegistrationStatus::Paid),
                    campus: Some("North".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let unread = notifications.list_unread("u1").await.unwrap();
        assert_eq!(
            unread[0].message,
            "Admin updated your registration status to paid, campus to North"
        );

        let stored = backend
            .store()
            .read(collections::USERS, "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.data["registration_status"], "paid");
        assert_eq!(stored.data["first_name"], "Thandi");
    }

    #[tokio::test]
    async fn test_edit_without_changes_reports_review() {
        let backend = Backend::in_memory();
        let (admin, notifications) = services(&backend);
        backend
            .store()
            .write(collections::USERS, "u1", json!({ "first_name": "Thandi" }))
            .await
            .unwrap();

        admin.edit_user("u1", UserProfilePatch::default()).await.unwrap();

        let unread = notifications.list_unread("u1").await.unwrap();
        assert_eq!(unread[0].message, "Admin reviewed your profile");
    }

    #[tokio::test]
    async fn test_edit_missing_user_is_not_found() {
        let backend = Backend::in_memory();
        let (admin, _) = services(&backend);
        let err = admin
            .edit_user("ghost", UserProfilePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_registration_stats() {
        let users = vec![
            user("university", "UCT", "Main", true),
            user("university", "UCT", "North", true),
            user("University", "Wits", "Braamfontein", false),
            user("tvet", "False Bay College", "Muizenberg", true),
        ];
        let stats = AdminService::registration_stats(
            &users,
            &RegistrationConfig { fee_rand: 200 },
        );

        assert_eq!(stats.total_registrations, 4);
        assert_eq!(stats.paid_registrations, 3);
        assert_eq!(stats.total_revenue_rand, 600);
        assert_eq!(stats.universities, 2);
        assert_eq!(stats.tvet_colleges, 1);
        assert_eq!(stats.active_campuses, 4);
    }
}
