//! Per-job poll session state.
//!
//! Pure bookkeeping, driven by the poller task: progress estimation,
//! the consecutive-error budget, and the terminal latch that guarantees
//! at most one terminal outcome per session.

use recon_core::wire::{JobStatus, ScanStatus};

/// Progress ceiling while the backend has not confirmed completion.
pub const PROGRESS_CAP: u8 = 95;

/// What a successful status response means for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Job still running; estimated progress percent and modules done.
    InProgress { progress: u8, modules_done: usize },
    /// Job finished; the full payload, exactly as received.
    Completed(ScanStatus),
    /// The backend reported the job itself failed.
    JobFailed,
}

/// What a failed status request means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollErrorOutcome {
    /// Within budget; retry on the next tick.
    Retry { consecutive: u32 },
    /// Budget exhausted; the backend is presumed lost mid-job.
    GaveUp,
}

/// Transient state for polling a single scan job.
#[derive(Debug)]
pub struct PollSession {
    expected_modules: usize,
    error_budget: u32,
    consecutive_errors: u32,
    terminal: bool,
}

impl PollSession {
    pub fn new(expected_modules: usize, error_budget: u32) -> Self {
        Self {
            expected_modules: expected_modules.max(1),
            error_budget: error_budget.max(1),
            consecutive_errors: 0,
            terminal: false,
        }
    }

    /// Record a status response.
    ///
    /// Any response resets the consecutive-error counter; terminal
    /// statuses latch the session.
    pub fn observe(&mut self, status: ScanStatus) -> PollOutcome {
        debug_assert!(!self.terminal, "observe called after terminal outcome");
        self.consecutive_errors = 0;

        match status.status {
            JobStatus::Completed => {
                self.terminal = true;
                PollOutcome::Completed(status)
            }
            JobStatus::Failed => {
                self.terminal = true;
                PollOutcome::JobFailed
            }
            JobStatus::InProgress => {
                let done = status.modules_executed.len();
                PollOutcome::InProgress {
                    progress: self.estimate_progress(done),
                    modules_done: done,
                }
            }
        }
    }

    /// Record a failed status request (transport error or error response).
    pub fn record_error(&mut self) -> PollErrorOutcome {
        debug_assert!(!self.terminal, "record_error called after terminal outcome");
        self.consecutive_errors += 1;
        if self.consecutive_errors >= self.error_budget {
            self.terminal = true;
            PollErrorOutcome::GaveUp
        } else {
            PollErrorOutcome::Retry {
                consecutive: self.consecutive_errors,
            }
        }
    }

    /// Estimated percentage from the executed-module count, capped below
    /// 100 until the backend confirms completion.
    fn estimate_progress(&self, modules_done: usize) -> u8 {
        let raw = modules_done * 100 / self.expected_modules;
        raw.min(PROGRESS_CAP as usize) as u8
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}
