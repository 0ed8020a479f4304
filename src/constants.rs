//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// BACKEND DEFAULTS
// =============================================================================

/// Default backend project identifier (local development)
pub const DEFAULT_BACKEND_PROJECT: &str = "spellbound-local";

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Document collection names
pub mod collections {
    pub const USERS: &str = "users";
    pub const COMPETITIONS: &str = "competitions";
    pub const MESSAGES: &str = "messages";
    pub const NOTIFICATIONS: &str = "notifications";
}

// =============================================================================
// REGISTRATION
// =============================================================================

/// Registration fee in Rand, charged per paid registration
pub const DEFAULT_REGISTRATION_FEE_RAND: u32 = 200;

/// Stage every new registrant starts at
pub const INITIAL_STAGE: i32 = 1;

/// Stage status every new registrant starts with
pub const INITIAL_STAGE_STATUS: &str = "upcoming";

// =============================================================================
// COMPETITION SETTINGS
// =============================================================================

/// Placeholder shown when a roster id no longer resolves to a profile
pub const UNKNOWN_USER_PLACEHOLDER: &str = "Unknown User";

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Seconds a transient notification banner stays visible before auto-dismiss
pub const DEFAULT_BANNER_SECS: u64 = 3;
