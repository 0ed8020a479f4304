//! Contact message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact-form submission stored in the messages collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub subject: String,
    /// Free-text body
    #[serde(rename = "message")]
    pub body: String,
    #[serde(default)]
    pub status: MessageStatus,
    pub timestamp: DateTime<Utc>,
}

impl ContactMessage {
    /// Whether the message has not yet been opened by an admin
    pub fn is_new(&self) -> bool {
        self.status == MessageStatus::New
    }
}

/// Message status; transitions new -> read exactly once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    New,
    Read,
}

/// Contact form payload submitted by an anonymous visitor
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_requires_all_fields() {
        let form = ContactForm {
            name: "Sipho".to_string(),
            email: "sipho@example.com".to_string(),
            phone: String::new(),
            subject: "Payment query".to_string(),
            body: "Hello".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_message_defaults_to_new() {
        let msg: ContactMessage = serde_json::from_value(serde_json::json!({
            "name": "Sipho",
            "email": "sipho@example.com",
            "subject": "Hi",
            "message": "Hello",
            "timestamp": "2026-08-30T10:00:00Z",
        }))
        .unwrap();
        assert!(msg.is_new());
        assert_eq!(msg.body, "Hello");
    }
}
