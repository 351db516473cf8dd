//! Reachability monitor: a background task that races liveness probes
//! across all candidate URLs until one answers or the wait budget runs
//! out.
//!
//! Probing is breadth-first on purpose. The dominant failure mode is a
//! cold backend, which is a *time* problem, not an endpoint problem;
//! probing candidates sequentially would spend the scarce wake-up window
//! on endpoints that will all succeed or all fail together.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use recon_client::BackendClient;
use recon_core::ReachSettings;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::state::{ReachState, ReachTracker};

/// Callback invoked on every state transition with the new state and,
/// when online, the winning URL.
pub type ReachCallback = Arc<dyn Fn(ReachState, Option<String>) -> BoxFuture + Send + Sync>;

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

type RoundFuture = Pin<Box<dyn Future<Output = Option<String>> + Send>>;

/// Configured but not yet started reachability monitor.
///
/// One monitor instance covers one scan session; once it reaches
/// `Online` or `Offline` it is inert and a new session builds a new one.
pub struct ReachMonitor {
    candidates: Vec<String>,
    client: BackendClient,
    settings: ReachSettings,
    on_transition: Option<ReachCallback>,
}

impl ReachMonitor {
    pub fn new(candidates: Vec<String>, client: BackendClient, settings: ReachSettings) -> Self {
        Self {
            candidates,
            client,
            settings,
            on_transition: None,
        }
    }

    /// Register a transition callback.
    pub fn with_callback(mut self, callback: ReachCallback) -> Self {
        self.on_transition = Some(callback);
        self
    }

    /// Spawn the background task and return its handle.
    pub fn start(self) -> ReachHandle {
        let (state_tx, state_rx) = watch::channel(ReachState::Checking);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            candidates = self.candidates.len(),
            max_wait_secs = self.settings.max_wait.as_secs(),
            "reachability monitor started"
        );

        let task = tokio::spawn(run_reach_loop(
            self.candidates,
            self.client,
            self.settings,
            self.on_transition,
            state_tx,
            shutdown_rx,
        ));

        ReachHandle {
            state: state_rx,
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running (or finished) reachability monitor.
pub struct ReachHandle {
    state: watch::Receiver<ReachState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReachHandle {
    /// Current state snapshot.
    pub fn state(&self) -> ReachState {
        self.state.borrow().clone()
    }

    /// The confirmed working URL, once online.
    pub fn working_url(&self) -> Option<String> {
        self.state.borrow().url().map(str::to_string)
    }

    /// Request cancellation. Idempotent; stopping an already-terminal or
    /// already-stopped monitor is a no-op.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Drive the monitor to a terminal state and return it.
    pub async fn wait(mut self) -> ReachState {
        loop {
            let current = self.state.borrow().clone();
            if current.is_terminal() {
                return current;
            }
            // A closed channel means the task ended (terminal or
            // cancelled); the last value it published stands.
            if self.state.changed().await.is_err() {
                return self.state.borrow().clone();
            }
        }
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run_reach_loop(
    candidates: Vec<String>,
    client: BackendClient,
    settings: ReachSettings,
    callback: Option<ReachCallback>,
    state_tx: watch::Sender<ReachState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tracker = ReachTracker::new(settings.max_wait);

    // The elapsed-second ticker is the sole authority for the offline
    // deadline; a slow probe round cannot extend it.
    let mut ticker = tokio::time::interval_at(
        Instant::now() + Duration::from_secs(1),
        Duration::from_secs(1),
    );

    // First round fires immediately; later rounds wait out the probe
    // interval after the previous round resolved, so rounds never
    // overlap.
    let mut round: RoundFuture = Box::pin(probe_round_after(
        client.clone(),
        candidates.clone(),
        Duration::ZERO,
        settings.probe_timeout,
    ));

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // A dropped handle counts as cancellation too.
                if changed.is_err() || *shutdown.borrow() {
                    debug!("reachability monitor stopped");
                    return;
                }
            }
            _ = ticker.tick() => {
                if let Some(next) = tracker.record_tick() {
                    warn!(
                        elapsed_secs = tracker.elapsed_secs(),
                        rounds = tracker.rounds(),
                        "backend offline: wait budget exhausted"
                    );
                    publish(&state_tx, &callback, next).await;
                    return;
                }
            }
            winner = &mut round => {
                match winner {
                    Some(url) => {
                        if let Some(next) = tracker.record_round_success(url.clone()) {
                            info!(%url, rounds = tracker.rounds(), "backend online");
                            publish(&state_tx, &callback, next).await;
                        }
                        return;
                    }
                    None => {
                        debug!(
                            rounds = tracker.rounds() + 1,
                            elapsed_secs = tracker.elapsed_secs(),
                            "probe round failed for every candidate"
                        );
                        if let Some(next) = tracker.record_round_failure() {
                            publish(&state_tx, &callback, next).await;
                        }
                        round = Box::pin(probe_round_after(
                            client.clone(),
                            candidates.clone(),
                            settings.probe_interval,
                            settings.probe_timeout,
                        ));
                    }
                }
            }
        }
    }
}

/// Deliver a transition: callback first (so observers that only watch
/// the terminal state see all callbacks complete), then the state
/// channel.
async fn publish(
    state_tx: &watch::Sender<ReachState>,
    callback: &Option<ReachCallback>,
    next: ReachState,
) {
    let url = next.url().map(str::to_string);
    if let Some(cb) = callback {
        cb(next.clone(), url).await;
    }
    let _ = state_tx.send(next);
}

/// Run one probe round after an optional delay.
///
/// All candidates are probed concurrently; the first to answer wins and
/// the remaining in-flight probes are aborted (dropping the `JoinSet`
/// cancels them). Returns the winning URL, or `None` when every
/// candidate failed or timed out.
async fn probe_round_after(
    client: BackendClient,
    candidates: Vec<String>,
    delay: Duration,
    probe_timeout: Duration,
) -> Option<String> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mut probes = JoinSet::new();
    for url in candidates {
        let client = client.clone();
        probes.spawn(async move { client.probe(&url, probe_timeout).await.then_some(url) });
    }

    while let Some(joined) = probes.join_next().await {
        if let Ok(Some(url)) = joined {
            return Some(url);
        }
    }
    None
}
