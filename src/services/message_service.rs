//! Contact message service
//!
//! Contact-form submissions from anonymous visitors, listed and opened by
//! admins. Submission is a form flow: validation and write failures are
//! surfaced to the visitor. Opening a message is an administrative flow:
//! the new -> read status write is optimistic and its failure is logged,
//! not surfaced.

use chrono::Utc;

use crate::{
    backend::Backend,
    constants::collections,
    error::AppResult,
    models::{ContactForm, ContactMessage, MessageStatus},
    utils::validation::validate_form,
};

/// Contact message service
pub struct MessageService {
    backend: Backend,
}

impl MessageService {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Submit a contact-form message. Errors are returned to the visitor.
    pub async fn submit(&self, form: ContactForm) -> AppResult<ContactMessage> {
        validate_form(&form)?;

        let message = ContactMessage {
            id: String::new(),
            name: form.name,
            email: form.email,
            phone: form.phone,
            subject: form.subject,
            body: form.body,
            status: MessageStatus::New,
            timestamp: Utc::now(),
        };

        let id = self
            .backend
            .store()
            .create(collections::MESSAGES, serde_json::to_value(&message)?)
            .await?;

        Ok(ContactMessage { id, ..message })
    }

    /// All messages, newest first. Read-once snapshot; concurrent writes
    /// appear on the next fetch.
    pub async fn list_all(&self) -> AppResult<Vec<ContactMessage>> {
        let mut messages: Vec<ContactMessage> = self
            .backend
            .store()
            .list_all(collections::MESSAGES)
            .await?
            .into_iter()
            .map(|doc| doc.into_model())
            .collect::<AppResult<Vec<_>>>()?;

        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    /// An admin opened a message: transition new -> read exactly once and
    /// return the optimistic local copy. An already-read message is left
    /// untouched; a failed status write is logged and the local copy still
    /// reads as read.
    pub async fn open(&self, message: &ContactMessage) -> ContactMessage {
        let mut opened = message.clone();
        if !message.is_new() {
            return opened;
        }
        opened.status = MessageStatus::Read;

        if let Err(e) = self
            .backend
            .store()
            .write(
                collections::MESSAGES,
                &message.id,
                serde_json::json!({ "status": "read" }),
            )
            .await
        {
            tracing::warn!(message_id = %message.id, error = %e, "Error marking message as read");
        }

        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DocumentStore;
    use crate::error::AppError;

    fn form() -> ContactForm {
        ContactForm {
            name: "Sipho".to_string(),
            email: "sipho@example.com".to_string(),
            phone: "0821234567".to_string(),
            subject: "Payment query".to_string(),
            body: "I paid by transfer last week.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_persists_new_message() {
        let backend = Backend::in_memory();
        let service = MessageService::new(backend.clone());

        let message = service.submit(form()).await.unwrap();
        assert!(message.is_new());
        assert!(!message.id.is_empty());

        let listed = service.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].subject, "Payment query");
    }

    #[tokio::test]
    async fn test_submit_surfaces_validation_errors() {
        let backend = Backend::in_memory();
        let service = MessageService::new(backend);

        let mut blank = form();
        blank.subject = String::new();
        let err = service.submit(blank).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_open_transitions_new_to_read_once() {
        let backend = Backend::in_memory();
        let service = MessageService::new(backend.clone());
        let message = service.submit(form()).await.unwrap();

        let opened = service.open(&message).await;
        assert_eq!(opened.status, MessageStatus::Read);

        let stored = backend
            .store()
            .read(collections::MESSAGES, &message.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.data["status"], "read");

        // Opening again leaves everything as-is
        let reopened = service.open(&opened).await;
        assert_eq!(reopened.status, MessageStatus::Read);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let backend = Backend::in_memory();
        let service = MessageService::new(backend);

        service.submit(form()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut second = form();
        second.subject = "Venue question".to_string();
        service.submit(second).await.unwrap();

        let listed = service.list_all().await.unwrap();
        assert_eq!(listed[0].subject, "Venue question");
        assert_eq!(listed[1].subject, "Payment query");
    }
}
