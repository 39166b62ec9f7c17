//! Composing messages and submitting them to a mail server.

mod attachment;
mod compose;
mod mailer;
mod message;
mod recipients;

pub mod errors;
pub mod templates;

pub use attachment::{Attachment, AttachmentSource};
pub use compose::{Batch, ComposeRequest};
pub use mailer::{MailSession, Mailer};
pub use message::MessagePayload;
pub use recipients::{Recipient, RecipientList};

#[cfg(test)]
pub mod tests {
    pub use super::mailer::{MockMailSession, MockMailer};
}
