//! Sending one message to every recipient of a batch.

mod outcome;
mod service;

pub mod errors;

pub use outcome::{DispatchReport, DispatchSummary, Progress, SendOutcome, SendStatus};
pub use service::{DispatchObserver, DispatchService};
