//! recon-poll: scan job polling for the ReconLink client.
//!
//! Once a scan has been submitted and the backend has assigned a job id,
//! the poller queries job status on a fixed interval, surfaces estimated
//! progress, and settles on exactly one terminal outcome: completed,
//! failed as reported by the backend, or lost after sustained polling
//! failures.
//!
//! Progress is estimated from the executed-module list and capped below
//! 100 so the UI never claims completion the backend has not confirmed.
//! Transient poll failures are retried silently; only a run of
//! consecutive failures escalates, and any success resets the run.

pub mod poller;
pub mod session;

pub use poller::{
    CompleteCallback, FailureCallback, FailureReason, JobPoller, PollHandle, PollResult,
    ProgressCallback,
};
pub use session::{PollErrorOutcome, PollOutcome, PollSession};
