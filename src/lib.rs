//! Spellbound - Spelling Competition Registration Platform Core
//!
//! This library provides the core functionality behind the Spellbound
//! registration platform: participant registration and login, the admin
//! console's roster and message management, and the notification relay,
//! all over an abstract remote document database and authentication
//! service.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Services**: Business logic (session gate, roster, notifications)
//! - **Backend**: Document store and authentication abstractions
//! - **Models**: Domain models and form payloads
//!
//! The backend client is constructed once at startup and threaded through
//! [`state::AppState`] by dependency injection; authorization is derived
//! from the stored profile exactly once per session by the session gate
//! and shared with every protected view.

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use backend::Backend;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Initialize tracing for the embedding application.
///
/// Honors `RUST_LOG`, falling back to the given default filter.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
