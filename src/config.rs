//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. Configuration is loaded once at startup by the embedding
//! application and threaded through [`crate::state::AppState`].

use std::env;

use crate::constants::{
    DEFAULT_BACKEND_PROJECT, DEFAULT_BANNER_SECS, DEFAULT_REGISTRATION_FEE_RAND,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub notifications: NotificationConfig,
    pub registration: RegistrationConfig,
}

/// Remote backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend project identifier
    pub project: String,
    /// API key for a hosted backend; not needed for the local in-memory
    /// backend
    pub api_key: Option<String>,
}

/// Notification banner configuration
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Seconds a transient banner stays visible before auto-dismiss
    pub banner_secs: u64,
}

/// Registration configuration
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Fee in Rand per paid registration (used for revenue stats)
    pub fee_rand: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            backend: BackendConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
            registration: RegistrationConfig::from_env()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                project: DEFAULT_BACKEND_PROJECT.to_string(),
                api_key: None,
            },
            notifications: NotificationConfig {
                banner_secs: DEFAULT_BANNER_SECS,
            },
            registration: RegistrationConfig {
                fee_rand: DEFAULT_REGISTRATION_FEE_RAND,
            },
        }
    }
}

impl BackendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            env::var("BACKEND_PROJECT").ok(),
            env::var("BACKEND_API_KEY").ok(),
        )
    }

    /// A hosted project cannot be reached anonymously, so naming one without
    /// an api key is a configuration error rather than a runtime failure.
    fn resolve(
        project: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let project = project.unwrap_or_else(|| DEFAULT_BACKEND_PROJECT.to_string());
        if project != DEFAULT_BACKEND_PROJECT && api_key.is_none() {
            return Err(ConfigError::Missing("BACKEND_API_KEY".to_string()));
        }
        Ok(Self { project, api_key })
    }
}

impl NotificationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            banner_secs: env::var("NOTIFICATION_BANNER_SECS")
                .unwrap_or_else(|_| DEFAULT_BANNER_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NOTIFICATION_BANNER_SECS".to_string()))?,
        })
    }
}

impl RegistrationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            fee_rand: env::var("REGISTRATION_FEE_RAND")
                .unwrap_or_else(|_| DEFAULT_REGISTRATION_FEE_RAND.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REGISTRATION_FEE_RAND".to_string()))?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
