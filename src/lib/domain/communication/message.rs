//! Message payload

use super::{errors::ValidationError, Attachment};

/// The subject, body and optional attachment sent to every recipient of a batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagePayload {
    subject: String,
    body: String,
    attachment: Option<Attachment>,
}

impl MessagePayload {
    /// Creates a payload, rejecting a blank subject or body
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Result<Self, ValidationError> {
        let subject = subject.into();
        let body = body.into();

        if subject.trim().is_empty() {
            return Err(ValidationError::MissingSubject);
        }

        if body.trim().is_empty() {
            return Err(ValidationError::MissingBody);
        }

        Ok(Self {
            subject,
            body,
            attachment,
        })
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The plain text body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The attachment, if any
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }
}
