//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod competition;
pub mod message;
pub mod notification;
pub mod user;

pub use competition::*;
pub use message::*;
pub use notification::*;
pub use user::*;
