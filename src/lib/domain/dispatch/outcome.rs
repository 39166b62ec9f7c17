//! Per-recipient outcomes and batch summaries

use crate::domain::communication::Recipient;

/// Whether a single submission was accepted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendStatus {
    /// The server accepted the message
    Success,

    /// The message was not accepted, with the reason given
    Failure(String),
}

/// The result of sending to one recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendOutcome {
    /// Who the message was addressed to
    pub recipient: Recipient,

    /// What happened
    pub status: SendStatus,
}

impl SendOutcome {
    /// A successful submission
    pub fn success(recipient: Recipient) -> Self {
        Self {
            recipient,
            status: SendStatus::Success,
        }
    }

    /// A failed submission
    pub fn failure(recipient: Recipient, reason: impl Into<String>) -> Self {
        Self {
            recipient,
            status: SendStatus::Failure(reason.into()),
        }
    }

    /// Whether the message was accepted
    pub fn is_success(&self) -> bool {
        matches!(self.status, SendStatus::Success)
    }
}

/// How far a batch has got, reported after every recipient
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Recipients processed so far
    pub processed: usize,

    /// Recipients in the batch
    pub total: usize,

    /// Messages accepted so far
    pub success_count: usize,

    /// Messages rejected so far
    pub error_count: usize,
}

impl Progress {
    /// Progress of a batch that has not sent anything yet
    pub fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
            success_count: 0,
            error_count: 0,
        }
    }

    /// Counts one more processed recipient
    pub fn record(&mut self, outcome: &SendOutcome) {
        self.processed += 1;

        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    /// The processed share of the batch, from `0.0` to exactly `1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }

        self.processed as f64 / self.total as f64
    }
}

/// Totals for a finished batch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Recipients attempted
    pub total_count: usize,

    /// Messages accepted
    pub success_count: usize,

    /// Messages rejected
    pub error_count: usize,

    /// Each rejected recipient with its reason, in send order
    pub failures: Vec<(Recipient, String)>,
}

impl DispatchSummary {
    /// Folds an outcome stream into totals
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a SendOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut summary, outcome| {
                summary.total_count += 1;

                match &outcome.status {
                    SendStatus::Success => summary.success_count += 1,
                    SendStatus::Failure(reason) => {
                        summary.error_count += 1;
                        summary
                            .failures
                            .push((outcome.recipient.clone(), reason.clone()));
                    }
                }

                summary
            })
    }
}

/// Everything a finished batch produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport {
    /// One outcome per recipient, in recipient order
    pub outcomes: Vec<SendOutcome>,

    /// Totals derived from `outcomes`
    pub summary: DispatchSummary,
}
