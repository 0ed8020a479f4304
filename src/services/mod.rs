//! Business logic services

pub mod account_service;
pub mod admin_service;
pub mod message_service;
pub mod notification_service;
pub mod roster_service;
pub mod session_service;

pub use account_service::AccountService;
pub use admin_service::AdminService;
pub use message_service::MessageService;
pub use notification_service::NotificationService;
pub use roster_service::RosterService;
pub use session_service::SessionGate;
