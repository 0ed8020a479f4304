//! Account service
//!
//! Registration, login and profile self-service over the backend
//! authentication service. These are form flows: unlike administrative
//! mutations, their errors are surfaced to the caller.
//!
//! No role check happens here. Authorization is derived from the stored
//! profile by the session gate, never at sign-in.

use serde::Deserialize;
use validator::Validate;

use crate::{
    backend::{Backend, Identity},
    constants::{collections, INITIAL_STAGE, INITIAL_STAGE_STATUS},
    error::AppResult,
    models::{Role, UserProfile, UserProfilePatch},
    utils::validation::validate_form,
};

/// Registration form payload
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub id_passport_number: String,
    #[validate(length(min = 1, message = "Institution type is required"))]
    pub institution_type: String,
    #[validate(length(min = 1, message = "Institution is required"))]
    pub institution: String,
    #[serde(default)]
    pub campus: String,
    #[serde(default)]
    pub agree_marketing: bool,
}

/// Account registration and session service
pub struct AccountService {
    backend: Backend,
}

impl AccountService {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Register a new participant: create the authentication account, then
    /// initialize the profile document under the new identity key. Every
    /// registrant starts unpaid, at stage 1, with the non-admin role.
    pub async fn register(&self, form: RegistrationForm) -> AppResult<Identity> {
        validate_form(&form)?;

        let display_name = format!("{} {}", form.first_name, form.last_name);
        let identity = self
            .backend
            .auth()
            .sign_up_with_password(&form.email, &form.password, &display_name)
            .await?;

        let profile = UserProfile {
            id: String::new(),
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            student_number: form.student_number,
            id_passport_number: form.id_passport_number,
            institution_type: form.institution_type,
            institution: form.institution,
            campus: form.campus,
            registration_status: Default::default(),
            current_stage: INITIAL_STAGE,
            stage_status: INITIAL_STAGE_STATUS.to_string(),
            agree_marketing: form.agree_marketing,
            created_at: chrono::Utc::now().to_rfc3339(),
            role: Role::User,
            banned: false,
        };
        self.backend
            .store()
            .write(
                collections::USERS,
                &identity.uid,
                serde_json::to_value(&profile)?,
            )
            .await?;

        Ok(identity)
    }

    /// Sign in with email and password. Failures surface as error text on
    /// the login form.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Identity> {
        self.backend.auth().sign_in_with_password(email, password).await
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.backend.auth().sign_out().await
    }

    /// Merge self-service fields onto the caller's own profile
    pub async fn update_profile(&self, uid: &str, patch: UserProfilePatch) -> AppResult<()> {
        self.backend
            .store()
            .write(collections::USERS, uid, serde_json::to_value(&patch)?)
            .await
    }
}
