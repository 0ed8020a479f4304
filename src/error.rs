//! Custom error types and handling
//!
//! This module defines the application's error taxonomy and the policy
//! helpers that decide how an error is propagated to the embedding UI.

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Backend errors (network or remote rejection)
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether this error is handled by redirecting to the login view.
    ///
    /// Authentication failures are never rendered as error text; the
    /// session gate fails closed and navigates away.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Whether a mutating flow swallows this error after logging it.
    ///
    /// Administrative mutations (roster edits, notification writes, message
    /// status updates) assume success locally; only form-submission flows
    /// (login, registration, contact) surface errors to the end user.
    pub fn is_swallowed_in_admin_flows(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::NotFound(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
