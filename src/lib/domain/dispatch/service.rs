//! Dispatch service

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::communication::{Batch, ComposeRequest, MailSession, Mailer};

use super::{errors::DispatchError, DispatchReport, DispatchSummary, Progress, SendOutcome};

/// Receives notifications while a batch is being sent
pub trait DispatchObserver {
    /// Called once the submission session is authenticated, before the first send
    fn on_session_opened(&mut self, _total: usize) {}

    /// Called after each recipient, successful or not
    fn on_outcome(&mut self, outcome: &SendOutcome, progress: &Progress);
}

impl DispatchObserver for () {
    fn on_outcome(&mut self, _outcome: &SendOutcome, _progress: &Progress) {}
}

/// Sends batches over sessions opened by a [`Mailer`]
#[derive(Debug, Clone)]
pub struct DispatchService<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
}

impl<M> DispatchService<M>
where
    M: Mailer,
{
    /// Creates a new dispatch service.
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }

    /// Assembles a batch from raw input and dispatches it.
    ///
    /// # Returns
    /// - [`Ok`] with the [`DispatchReport`] once every recipient has been attempted.
    /// - [`Err`] with a [`DispatchError`] if the input is invalid or the session could not be
    ///   opened; no recipient is attempted in that case.
    pub fn dispatch_request(
        &self,
        request: ComposeRequest,
        observer: &mut impl DispatchObserver,
    ) -> Result<DispatchReport, DispatchError> {
        let batch = request.assemble()?;

        self.dispatch(&batch, observer)
    }

    /// Opens one session and sends the payload to each recipient in order.
    ///
    /// A rejected recipient is recorded and the loop moves on. The session is closed when
    /// the loop ends; a failure to close is logged and otherwise ignored.
    pub fn dispatch(
        &self,
        batch: &Batch,
        observer: &mut impl DispatchObserver,
    ) -> Result<DispatchReport, DispatchError> {
        let total = batch.recipients.len();

        info!(total, "opening submission session");

        let mut session = self.mailer.open_session()?;

        observer.on_session_opened(total);

        let outcomes = send_all(&mut session, batch, observer);

        if let Err(e) = session.close() {
            debug!(error = %e, "ignoring failure to close submission session");
        }

        let summary = DispatchSummary::from_outcomes(&outcomes);

        info!(
            total = summary.total_count,
            sent = summary.success_count,
            failed = summary.error_count,
            "batch finished"
        );

        Ok(DispatchReport { outcomes, summary })
    }
}

fn send_all<S: MailSession>(
    session: &mut S,
    batch: &Batch,
    observer: &mut impl DispatchObserver,
) -> Vec<SendOutcome> {
    let mut progress = Progress::new(batch.recipients.len());
    let mut outcomes = Vec::with_capacity(progress.total);

    for recipient in &batch.recipients {
        let outcome = match session.send(recipient, &batch.payload) {
            Ok(()) => {
                debug!(%recipient, "message accepted");

                SendOutcome::success(recipient.clone())
            }
            Err(e) => {
                warn!(%recipient, error = %e, "message not accepted");

                SendOutcome::failure(recipient.clone(), e.to_string())
            }
        };

        progress.record(&outcome);
        observer.on_outcome(&outcome, &progress);
        outcomes.push(outcome);
    }

    outcomes
}
