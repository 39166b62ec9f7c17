//! Mail submission seam

#[cfg(test)]
use mockall::mock;

use super::{errors::MailerError, MessagePayload, Recipient};

/// An open, authenticated submission session.
///
/// One session is used for a whole batch and is owned by whoever opened it.
pub trait MailSession {
    /// Submits the payload for delivery to a single recipient.
    ///
    /// # Arguments
    /// * `to` - The [`Recipient`] the message is addressed to.
    /// * `payload` - The subject, body and attachment of the message.
    ///
    /// # Returns
    /// [`Ok`] once the server has accepted the message, or a [`MailerError`] describing why
    /// it was not.
    fn send(&mut self, to: &Recipient, payload: &MessagePayload) -> Result<(), MailerError>;

    /// Ends the session. Calling it more than once is harmless.
    fn close(&mut self) -> Result<(), MailerError>;
}

/// Opens submission sessions
pub trait Mailer {
    /// The session type produced by this mailer
    type Session: MailSession;

    /// Connects, upgrades to TLS and authenticates.
    ///
    /// # Returns
    /// The authenticated session, or a [`MailerError`] if any step failed. A partially
    /// established connection is released before the error is returned.
    fn open_session(&self) -> Result<Self::Session, MailerError>;
}

#[cfg(test)]
mock! {
    pub MailSession {}

    impl MailSession for MailSession {
        fn send(&mut self, to: &Recipient, payload: &MessagePayload) -> Result<(), MailerError>;
        fn close(&mut self) -> Result<(), MailerError>;
    }
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Mailer for Mailer {
        type Session = MockMailSession;

        fn open_session(&self) -> Result<MockMailSession, MailerError>;
    }
}
