//! User profile model

use serde::{Deserialize, Serialize};

/// User profile document, stored under the authentication uid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity key assigned by the authentication service
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub id_passport_number: String,
    /// "university" or "tvet"
    #[serde(default)]
    pub institution_type: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub campus: String,
    #[serde(default)]
    pub registration_status: RegistrationStatus,
    #[serde(default = "default_stage")]
    pub current_stage: i32,
    #[serde(default = "default_stage_status")]
    pub stage_status: String,
    #[serde(default)]
    pub agree_marketing: bool,
    /// RFC 3339 creation timestamp
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub banned: bool,
}

fn default_stage() -> i32 {
    crate::constants::INITIAL_STAGE
}

fn default_stage_status() -> String {
    crate::constants::INITIAL_STAGE_STATUS.to_string()
}

impl UserProfile {
    /// Check if the user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if the user has completed payment and is roster-eligible
    pub fn has_paid(&self) -> bool {
        self.registration_status == RegistrationStatus::Paid
    }

    /// Full display name
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Authorization role stored on the profile record, not on the identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Registration payment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Unpaid,
    Pending,
    Paid,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpaid => write!(f, "unpaid"),
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// Partial profile update applied by an admin or by the user (self-service)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_passport_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_status: Option<RegistrationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned: Option<bool>,
}
