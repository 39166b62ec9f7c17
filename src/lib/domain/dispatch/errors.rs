//! Errors that abort a whole batch

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::errors::{AssembleError, MailerError};

/// Errors that stop a batch before any message is sent.
///
/// Failures for individual recipients are never reported here; they are recorded in the
/// outcome stream instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input could not be turned into a batch
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    /// The submission session could not be established
    #[error("could not open a submission session: {0}")]
    Authentication(MailerError),
}

impl From<MailerError> for DispatchError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> DispatchError");

        DispatchError::Authentication(err)
    }
}
