//! Contact form messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rmt_core::{ContactId, ContactStatus, Email, EmailError};

/// A stored contact message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub application_name: String,
}

/// Errors from validating a contact submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactValidationError {
    #[error("Name is required")]
    MissingName,
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),
    #[error("Subject is required")]
    MissingSubject,
    #[error("Message is required")]
    MissingMessage,
}

/// Raw submission, from JSON or the HTML form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// A validated submission ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    /// Validate the submission. Optional fields that are blank become `None`.
    ///
    /// # Errors
    ///
    /// Returns the first failing check: name, email, subject (only when
    /// `require_subject`), then message.
    pub fn validate(self, require_subject: bool) -> Result<NewContact, ContactValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::MissingName);
        }
        let email = Email::parse(&self.email)?;
        let subject = non_blank(self.subject);
        if require_subject && subject.is_none() {
            return Err(ContactValidationError::MissingSubject);
        }
        let message = self.message.trim();
        if message.is_empty() {
            return Err(ContactValidationError::MissingMessage);
        }

        Ok(NewContact {
            name: name.to_owned(),
            email,
            phone: non_blank(self.phone),
            company: non_blank(self.company),
            subject,
            message: message.to_owned(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_owned(),
            email: "ada@quarry.co".to_owned(),
            phone: Some("  ".to_owned()),
            company: Some(" Granite Works ".to_owned()),
            subject: None,
            message: "Need a quote".to_owned(),
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_optionals() {
        let contact = submission().validate(false).unwrap();
        assert_eq!(contact.phone, None);
        assert_eq!(contact.company.as_deref(), Some("Granite Works"));
        assert_eq!(contact.email.as_str(), "ada@quarry.co");
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut s = submission();
        s.email = "not-an-email".to_owned();
        assert!(matches!(
            s.validate(false),
            Err(ContactValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_requires_name_and_message() {
        let mut s = submission();
        s.name = " ".to_owned();
        assert_eq!(s.validate(false), Err(ContactValidationError::MissingName));

        let mut s = submission();
        s.message = String::new();
        assert_eq!(s.validate(false), Err(ContactValidationError::MissingMessage));
    }

    #[test]
    fn test_subject_only_required_for_form() {
        assert!(submission().validate(false).is_ok());
        assert_eq!(
            submission().validate(true),
            Err(ContactValidationError::MissingSubject)
        );
    }
}
