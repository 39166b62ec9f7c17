//! Assembling a batch from raw form input

use tracing::info;

use super::{
    errors::{AssembleError, ValidationError},
    AttachmentSource, MessagePayload, RecipientList,
};

/// Raw input for one send action, as entered by the user
#[derive(Clone, Debug, Default)]
pub struct ComposeRequest {
    /// Comma separated recipient addresses
    pub recipients: String,

    /// The subject line
    pub subject: String,

    /// The plain text body
    pub body: String,

    /// Optional CC address, sent to as an additional recipient
    pub cc: Option<String>,

    /// Optional BCC address, sent to as an additional recipient
    pub bcc: Option<String>,

    /// Where to take the attachment from; `None` when no attachment is wanted
    pub attachment: Option<AttachmentSource>,
}

/// A validated batch, ready for dispatch
#[derive(Clone, Debug)]
pub struct Batch {
    /// Everyone the message is sent to, in order
    pub recipients: RecipientList,

    /// The message sent to each recipient
    pub payload: MessagePayload,
}

impl ComposeRequest {
    /// Validates the input, parses the recipients and resolves the attachment.
    ///
    /// Required fields are checked before the attachment is read.
    pub fn assemble(self) -> Result<Batch, AssembleError> {
        if self.recipients.trim().is_empty() {
            return Err(ValidationError::MissingRecipients.into());
        }

        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingSubject.into());
        }

        if self.body.trim().is_empty() {
            return Err(ValidationError::MissingBody.into());
        }

        let recipients = RecipientList::parse(&self.recipients)
            .with_copies(self.cc.as_deref(), self.bcc.as_deref());

        if recipients.is_empty() {
            return Err(ValidationError::MissingRecipients.into());
        }

        let attachment = self
            .attachment
            .map(AttachmentSource::resolve)
            .transpose()?;

        let payload = MessagePayload::new(self.subject, self.body, attachment)?;

        info!(
            recipients = recipients.len(),
            attachment = payload.attachment().map(|a| a.filename()),
            "assembled batch"
        );

        Ok(Batch {
            recipients,
            payload,
        })
    }
}
