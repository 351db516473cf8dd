//! recon-reach: backend reachability for the ReconLink client.
//!
//! Determines, as quickly as possible, whether any candidate backend URL
//! is alive, tolerating the common case where the hosted backend is
//! asleep and needs a minute or two to cold-start.
//!
//! # Architecture
//!
//! ```text
//! ReachMonitor (background task)
//!   ├── ReachTracker (pure state machine + elapsed-second deadline)
//!   ├── probe rounds: JoinSet race over all candidates,
//!   │   first answer wins, losers aborted
//!   └── ReachCallback on every transition (at most once, in order)
//! ```
//!
//! The state machine moves `checking → waking → online | offline` and is
//! monotonic: `waking` never falls back to `checking`, and `online` /
//! `offline` are terminal for the monitor instance. A fresh scan session
//! constructs a fresh monitor.

pub mod monitor;
pub mod state;

pub use monitor::{ReachCallback, ReachHandle, ReachMonitor};
pub use state::{ReachState, ReachTracker};
