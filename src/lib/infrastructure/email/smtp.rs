//! SMTP submission over a STARTTLS-upgraded connection

use std::{fmt, time::Duration};

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use lettre::{
    address::Envelope,
    message::{header::ContentType, Attachment as AttachmentPart, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{SmtpConnection, TlsParameters},
        commands::{Data, Mail, Rcpt, Rset},
        extension::{ClientId, Extension, MailBodyParameter, MailParameter},
        Error as SmtpError,
    },
    Message,
};
use tracing::{debug, info, warn};

use crate::domain::communication::{
    errors::MailerError, MailSession, Mailer, MessagePayload, Recipient,
};

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub host: String,

    /// The SMTP submission port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username, if different from the sender address
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password or app password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// The sender email address
    #[clap(long, env = "SMTP_SENDER")]
    pub sender: String,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true", action = ArgAction::Set)]
    pub verify_tls: bool,

    /// Connection timeout in seconds
    #[clap(long = "smtp-timeout-secs", env = "SMTP_TIMEOUT_SECS", default_value = "60")]
    pub timeout_secs: u64,
}

impl fmt::Debug for SMTPConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("sender", &self.sender)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// SMTP mailer
#[derive(Debug, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    fn credentials(&self) -> Credentials {
        let username = self
            .config
            .username
            .clone()
            .unwrap_or_else(|| self.config.sender.clone());

        Credentials::new(username, self.config.password.clone())
    }

    fn tls_parameters(&self) -> Result<TlsParameters, MailerError> {
        TlsParameters::builder(self.config.host.clone())
            .dangerous_accept_invalid_certs(!self.config.verify_tls)
            .build()
            .map_err(|e| MailerError::TlsUpgradeFailed(e.to_string()))
    }

    /// Upgrades a plaintext connection to TLS and logs in
    fn establish(
        &self,
        connection: &mut SmtpConnection,
        hello: &ClientId,
    ) -> Result<(), MailerError> {
        if !connection.can_starttls() {
            return Err(MailerError::TlsUpgradeFailed(
                "server does not offer STARTTLS".to_string(),
            ));
        }

        connection
            .starttls(&self.tls_parameters()?, hello)
            .map_err(|e| MailerError::TlsUpgradeFailed(e.to_string()))?;

        debug!("connection upgraded to TLS");

        connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &self.credentials())
            .map_err(|e| MailerError::AuthenticationFailed(e.to_string()))?;

        Ok(())
    }
}

impl Mailer for SMTPMailer {
    type Session = SMTPSession;

    fn open_session(&self) -> Result<SMTPSession, MailerError> {
        let sender = parse_mailbox(&self.config.sender)?;
        let server = format!("{}:{}", self.config.host, self.config.port);
        let timeout = Some(Duration::from_secs(self.config.timeout_secs));
        let hello = ClientId::default();

        info!(%server, "connecting to SMTP server");

        let mut connection = SmtpConnection::connect(
            (self.config.host.as_str(), self.config.port),
            timeout,
            &hello,
            None,
            None,
        )
        .map_err(|e| MailerError::ConnectionFailed {
            server: server.clone(),
            reason: e.to_string(),
        })?;

        if let Err(e) = self.establish(&mut connection, &hello) {
            connection.abort();

            return Err(e);
        }

        info!(%server, sender = %sender, "authenticated");

        Ok(SMTPSession {
            connection: Some(connection),
            sender,
        })
    }
}

/// An authenticated SMTP session.
///
/// Sends `QUIT` on [`MailSession::close`], or when dropped without being closed.
pub struct SMTPSession {
    connection: Option<SmtpConnection>,
    sender: Mailbox,
}

impl fmt::Debug for SMTPSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPSession")
            .field("sender", &self.sender)
            .field("open", &self.connection.is_some())
            .finish()
    }
}

impl MailSession for SMTPSession {
    fn send(&mut self, to: &Recipient, payload: &MessagePayload) -> Result<(), MailerError> {
        let email = build_message(&self.sender, to, payload)?;

        let connection = self.connection.as_mut().ok_or_else(|| {
            MailerError::SessionLost("submission session is no longer connected".to_string())
        })?;

        match submit(connection, email.envelope(), &email.formatted()) {
            Ok(()) => Ok(()),
            Err(e) if e.is_permanent() || e.is_transient() => {
                // The server answered; the connection is still usable once the transaction is reset.
                if let Err(reset) = connection.command(Rset) {
                    debug!(error = %reset, "RSET after rejected message failed");
                }

                Err(MailerError::Rejected(e.to_string()))
            }
            Err(e) => {
                warn!(error = %e, "submission session lost");

                connection.abort();
                self.connection = None;

                Err(MailerError::SessionLost(e.to_string()))
            }
        }
    }

    fn close(&mut self) -> Result<(), MailerError> {
        if let Some(mut connection) = self.connection.take() {
            connection
                .quit()
                .map_err(|e| MailerError::UnknownError(e.into()))?;

            debug!("submission session closed");
        }

        Ok(())
    }
}

impl Drop for SMTPSession {
    fn drop(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            debug!("closing submission session on drop");

            connection.abort();
        }
    }
}

/// Runs one MAIL/RCPT/DATA transaction.
///
/// Unlike [`SmtpConnection::send`], a negative reply leaves the connection open.
fn submit(
    connection: &mut SmtpConnection,
    envelope: &Envelope,
    email: &[u8],
) -> Result<(), SmtpError> {
    let mut parameters = Vec::new();

    if connection
        .server_info()
        .supports_feature(Extension::EightBitMime)
    {
        parameters.push(MailParameter::Body(MailBodyParameter::EightBitMime));
    }

    connection.command(Mail::new(envelope.from().cloned(), parameters))?;

    for address in envelope.to() {
        connection.command(Rcpt::new(address.clone(), vec![]))?;
    }

    connection.command(Data)?;
    connection.message(email)?;

    Ok(())
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailerError> {
    address.parse().map_err(|_| MailerError::InvalidAddress {
        address: address.to_string(),
    })
}

/// Builds the message for one recipient: a plain text part, plus the attachment if there is one
pub fn build_message(
    sender: &Mailbox,
    to: &Recipient,
    payload: &MessagePayload,
) -> Result<Message, MailerError> {
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(payload.body().to_string()));

    if let Some(attachment) = payload.attachment() {
        let content_type = ContentType::parse(attachment.content_type())
            .map_err(|_| anyhow!("invalid content type \"{}\"", attachment.content_type()))?;

        parts = parts.singlepart(
            AttachmentPart::new(attachment.filename().to_string())
                .body(attachment.bytes().to_vec(), content_type),
        );
    }

    Ok(Message::builder()
        .from(sender.clone())
        .to(parse_mailbox(to.as_str())?)
        .subject(payload.subject())
        .multipart(parts)?)
}
