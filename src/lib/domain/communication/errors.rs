//! Error types for composing and submitting messages

use std::{io, path::PathBuf};

use lettre::error::Error;
use thiserror::Error;
use tracing::debug;

/// An error that can occur when creating a recipient
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipientError {
    /// The recipient is empty once whitespace is trimmed
    #[error("recipient is empty")]
    EmptyRecipient,
}

/// A required field was left blank
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No recipient was given
    #[error("at least one recipient is required")]
    MissingRecipients,

    /// The subject is blank
    #[error("a subject is required")]
    MissingSubject,

    /// The message body is blank
    #[error("a message body is required")]
    MissingBody,
}

/// An attachment was requested but could not be resolved
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The configured attachment file does not exist
    #[error("attachment not found at \"{}\"", .0.display())]
    NotFound(PathBuf),

    /// The configured attachment file exists but could not be read
    #[error("could not read attachment \"{}\": {source}", path.display())]
    Unreadable {
        /// Path of the attachment
        path: PathBuf,

        /// The underlying I/O error
        source: io::Error,
    },

    /// An uploaded attachment was selected but no file was provided
    #[error("attachment missing: no file was provided")]
    Missing,
}

/// Errors that stop a batch from being assembled
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A required field is blank
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The attachment could not be resolved
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// Errors raised while talking to the mail submission server
#[derive(Debug, Error)]
pub enum MailerError {
    /// The server could not be reached
    #[error("could not connect to {server}: {reason}")]
    ConnectionFailed {
        /// `host:port` of the server
        server: String,

        /// Why the connection failed
        reason: String,
    },

    /// The STARTTLS upgrade failed
    #[error("TLS upgrade failed: {0}")]
    TlsUpgradeFailed(String),

    /// The server refused the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// An address could not be used as a mailbox
    #[error("invalid email address \"{address}\"")]
    InvalidAddress {
        /// The offending address
        address: String,
    },

    /// The server did not accept the message
    #[error("{0}")]
    Rejected(String),

    /// The connection dropped; nothing more can be sent over this session
    #[error("submission session lost: {0}")]
    SessionLost(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<Error> for MailerError {
    fn from(err: Error) -> Self {
        debug!("lettre::error::Error -> MailerError");

        MailerError::UnknownError(err.into())
    }
}
