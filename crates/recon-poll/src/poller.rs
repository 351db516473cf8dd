//! Job poller: a background task that drives a poll session against the
//! backend until the job settles.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use recon_client::BackendClient;
use recon_core::PollSettings;
use recon_core::wire::ScanStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::session::{PollErrorOutcome, PollOutcome, PollSession};

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Progress callback; receives the estimated percentage (100 exactly
/// once, on confirmed completion).
pub type ProgressCallback = Arc<dyn Fn(u8) -> BoxFuture + Send + Sync>;

/// Completion callback; receives the full result payload.
pub type CompleteCallback = Arc<dyn Fn(ScanStatus) -> BoxFuture + Send + Sync>;

/// Failure callback; receives why the job is over without a result.
pub type FailureCallback = Arc<dyn Fn(FailureReason) -> BoxFuture + Send + Sync>;

/// Why a job ended without a result.
///
/// The two cases propagate distinctly: `JobFailed` means the backend ran
/// the job and said so; `BackendLost` means the poller could no longer
/// observe the job at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    JobFailed,
    BackendLost,
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    Completed(ScanStatus),
    Failed(FailureReason),
    Cancelled,
}

/// Configured but not yet started poller for one scan job.
pub struct JobPoller {
    client: BackendClient,
    base_url: String,
    scan_id: String,
    expected_modules: usize,
    settings: PollSettings,
    on_progress: Option<ProgressCallback>,
    on_complete: Option<CompleteCallback>,
    on_failure: Option<FailureCallback>,
}

impl JobPoller {
    pub fn new(
        client: BackendClient,
        base_url: impl Into<String>,
        scan_id: impl Into<String>,
        expected_modules: usize,
        settings: PollSettings,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            scan_id: scan_id.into(),
            expected_modules,
            settings,
            on_progress: None,
            on_complete: None,
            on_failure: None,
        }
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn on_complete(mut self, callback: CompleteCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    /// Spawn the polling task and return its handle.
    ///
    /// The first status request goes out immediately; subsequent ones
    /// follow the configured interval.
    pub fn start(self) -> PollHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            scan_id = %self.scan_id,
            base_url = %self.base_url,
            interval_ms = self.settings.interval.as_millis() as u64,
            "job poller started"
        );

        let task = tokio::spawn(run_poll_loop(self, shutdown_rx));

        PollHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running (or finished) poller.
pub struct PollHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<PollResult>,
}

impl PollHandle {
    /// Request cancellation. Idempotent.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Wait for the polling run to end and return how it did.
    pub async fn wait(self) -> PollResult {
        self.task.await.unwrap_or(PollResult::Cancelled)
    }

    /// Whether the polling task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run_poll_loop(poller: JobPoller, mut shutdown: watch::Receiver<bool>) -> PollResult {
    let JobPoller {
        client,
        base_url,
        scan_id,
        expected_modules,
        settings,
        on_progress,
        on_complete,
        on_failure,
    } = poller;

    let mut session = PollSession::new(expected_modules, settings.max_consecutive_errors);

    // The first tick of a tokio interval fires immediately: the first
    // status request goes out now, the rest follow the interval.
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!(scan_id = %scan_id, "job poller stopped");
                    return PollResult::Cancelled;
                }
            }
            _ = ticker.tick() => {
                match client.scan_status(&base_url, &scan_id).await {
                    Ok(status) => match session.observe(status) {
                        PollOutcome::InProgress { progress, modules_done } => {
                            debug!(
                                scan_id = %scan_id,
                                progress,
                                modules_done,
                                "scan in progress"
                            );
                            emit_progress(&on_progress, progress).await;
                        }
                        PollOutcome::Completed(payload) => {
                            info!(scan_id = %scan_id, "scan completed");
                            emit_progress(&on_progress, 100).await;
                            if let Some(cb) = &on_complete {
                                cb(payload.clone()).await;
                            }
                            return PollResult::Completed(payload);
                        }
                        PollOutcome::JobFailed => {
                            warn!(scan_id = %scan_id, "backend reported scan failed");
                            emit_failure(&on_failure, FailureReason::JobFailed).await;
                            return PollResult::Failed(FailureReason::JobFailed);
                        }
                    },
                    Err(error) => {
                        debug!(scan_id = %scan_id, %error, "status poll failed");
                        match session.record_error() {
                            PollErrorOutcome::Retry { consecutive } => {
                                debug!(
                                    scan_id = %scan_id,
                                    consecutive,
                                    budget = settings.max_consecutive_errors,
                                    "will retry on next tick"
                                );
                            }
                            PollErrorOutcome::GaveUp => {
                                warn!(
                                    scan_id = %scan_id,
                                    failures = settings.max_consecutive_errors,
                                    "giving up: backend unreachable mid-job"
                                );
                                emit_failure(&on_failure, FailureReason::BackendLost).await;
                                return PollResult::Failed(FailureReason::BackendLost);
                            }
                        }
                    }
                }
            }
        }
    }
}

async fn emit_progress(callback: &Option<ProgressCallback>, progress: u8) {
    if let Some(cb) = callback {
        cb(progress).await;
    }
}

async fn emit_failure(callback: &Option<FailureCallback>, reason: FailureReason) {
    if let Some(cb) = callback {
        cb(reason).await;
    }
}
