//! Terminal presentation of a batch

use std::io::{self, Write};

use tracing::debug;

use crate::domain::{
    communication::errors::AssembleError,
    dispatch::{
        errors::DispatchError, DispatchObserver, DispatchSummary, Progress, SendOutcome,
        SendStatus,
    },
};

/// Prints per-recipient results and progress as a batch is sent
#[derive(Debug)]
pub struct TerminalReporter<W: Write> {
    out: W,
    sender: String,
}

impl<W: Write> TerminalReporter<W> {
    /// Creates a reporter writing to `out` for a batch sent from `sender`
    pub fn new(out: W, sender: impl Into<String>) -> Self {
        Self {
            out,
            sender: sender.into(),
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}") {
            debug!(error = %e, "could not write progress");
        }
    }
}

impl<W: Write> DispatchObserver for TerminalReporter<W> {
    fn on_session_opened(&mut self, total: usize) {
        let sender = self.sender.clone();

        self.print(&format!("ℹ️ Using sender account: {sender}"));
        self.print(&format!("🔑 Connected. Sending {total} emails..."));
    }

    fn on_outcome(&mut self, outcome: &SendOutcome, progress: &Progress) {
        match &outcome.status {
            SendStatus::Success => self.print(&format!("✅ Sent to {}", outcome.recipient)),
            SendStatus::Failure(reason) => self.print(&format!(
                "❌ Failed to send to {}: {reason}",
                outcome.recipient
            )),
        }

        self.print(&format!(
            "Progress: {}/{} emails processed | ✅ {} sent | ❌ {} errors",
            progress.processed, progress.total, progress.success_count, progress.error_count
        ));
    }
}

/// Prints the aggregate result of a finished batch.
///
/// A mixed batch gets both the success line and the failure details.
pub fn render_summary(out: &mut impl Write, summary: &DispatchSummary) -> io::Result<()> {
    if summary.success_count > 0 {
        writeln!(
            out,
            "✅ Successfully sent {}/{} emails!",
            summary.success_count, summary.total_count
        )?;
    }

    if summary.error_count > 0 {
        writeln!(out, "❌ Failed to send {} emails", summary.error_count)?;
        writeln!(out, "Failed emails:")?;

        for (recipient, reason) in &summary.failures {
            writeln!(out, "  {recipient}: {reason}")?;
        }
    }

    Ok(())
}

/// Explains why a batch was not sent
pub fn render_abort(out: &mut impl Write, err: &DispatchError) -> io::Result<()> {
    match err {
        DispatchError::Assemble(AssembleError::Validation(e)) => {
            writeln!(out, "❌ Please fill all required fields: {e}")
        }
        DispatchError::Assemble(AssembleError::Attachment(e)) => {
            writeln!(out, "❌ {e}")?;
            writeln!(
                out,
                "Set ATTACHMENT_FILE_PATH, choose another source, or pass --no-attach"
            )
        }
        DispatchError::Authentication(e) => {
            writeln!(out, "🔐 Authentication failed: {e}")?;
            writeln!(out, "Troubleshooting tips:")?;
            writeln!(
                out,
                "  1. Verify SMTP_SENDER and SMTP_PASSWORD in your environment or .env file"
            )?;
            writeln!(out, "  2. Use an app password if two-factor authentication is enabled")?;
            writeln!(out, "  3. Check that the server accepts STARTTLS on the configured port")
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::communication::{
        errors::{AttachmentError, MailerError, ValidationError},
        Recipient,
    };

    use super::*;

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_reporter_prints_outcomes_and_progress() -> TestResult {
        let mut reporter = TerminalReporter::new(Vec::new(), "me@example.com");

        let mut progress = Progress::new(2);
        let sent = SendOutcome::success(Recipient::new("ok@example.com")?);
        progress.record(&sent);
        reporter.on_session_opened(2);
        reporter.on_outcome(&sent, &progress);

        let failed = SendOutcome::failure(Recipient::new("bad@example.com")?, "550 no such user");
        progress.record(&failed);
        reporter.on_outcome(&failed, &progress);

        let text = output(reporter.into_inner());

        assert!(text.contains("Using sender account: me@example.com"));
        assert!(text.contains("Sending 2 emails"));
        assert!(text.contains("✅ Sent to ok@example.com"));
        assert!(text.contains("❌ Failed to send to bad@example.com: 550 no such user"));
        assert!(text.contains("Progress: 2/2 emails processed | ✅ 1 sent | ❌ 1 errors"));

        Ok(())
    }

    #[test]
    fn test_summary_of_mixed_batch_shows_both_blocks() -> TestResult {
        let summary = DispatchSummary::from_outcomes(&[
            SendOutcome::success(Recipient::new("ok@example.com")?),
            SendOutcome::failure(Recipient::new("bad@example.com")?, "550 no such user"),
        ]);
        let mut out = Vec::new();

        render_summary(&mut out, &summary)?;
        let text = output(out);

        assert!(text.contains("Successfully sent 1/2 emails!"));
        assert!(text.contains("Failed to send 1 emails"));
        assert!(text.contains("  bad@example.com: 550 no such user"));

        Ok(())
    }

    #[test]
    fn test_summary_without_failures_has_no_failure_block() -> TestResult {
        let summary =
            DispatchSummary::from_outcomes(&[SendOutcome::success(Recipient::new("ok@example.com")?)]);
        let mut out = Vec::new();

        render_summary(&mut out, &summary)?;

        assert!(!output(out).contains("Failed"));

        Ok(())
    }

    #[test]
    fn test_authentication_abort_includes_tips() -> TestResult {
        let err = DispatchError::Authentication(MailerError::AuthenticationFailed(
            "535 bad credentials".to_string(),
        ));
        let mut out = Vec::new();

        render_abort(&mut out, &err)?;
        let text = output(out);

        assert!(text.contains("535 bad credentials"));
        assert!(text.contains("app password"));

        Ok(())
    }

    #[test]
    fn test_validation_abort() -> TestResult {
        let err = DispatchError::Assemble(ValidationError::MissingSubject.into());
        let mut out = Vec::new();

        render_abort(&mut out, &err)?;

        assert!(output(out).contains("a subject is required"));

        Ok(())
    }

    #[test]
    fn test_attachment_abort_suggests_sending_without_it() -> TestResult {
        let err = DispatchError::Assemble(AttachmentError::Missing.into());
        let mut out = Vec::new();

        render_abort(&mut out, &err)?;
        let text = output(out);

        assert!(text.contains("no file was provided"));
        assert!(text.contains("--no-attach"));

        Ok(())
    }
}
