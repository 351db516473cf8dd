//! Reachability state machine.
//!
//! Pure transition logic, driven by the monitor task. Methods return
//! `Some(state)` only when a transition actually happened, which gives
//! the caller at-most-once, in-order delivery for free.

use std::time::Duration;

/// Reachability of the scan backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReachState {
    /// Before the first probe round has resolved.
    Checking,
    /// Every probe so far has failed but the deadline has not elapsed;
    /// the backend is presumed to be cold-starting.
    Waking,
    /// A candidate answered; carries the winning base URL.
    Online { url: String },
    /// The deadline elapsed with no answer from any candidate.
    Offline,
}

impl ReachState {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReachState::Online { .. } | ReachState::Offline)
    }

    /// The working URL, when online.
    pub fn url(&self) -> Option<&str> {
        match self {
            ReachState::Online { url } => Some(url),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReachState::Checking => "checking",
            ReachState::Waking => "waking",
            ReachState::Online { .. } => "online",
            ReachState::Offline => "offline",
        }
    }
}

/// Tracks reachability transitions and the wait deadline.
///
/// The elapsed-second counter fed through [`ReachTracker::record_tick`]
/// is the sole authority for the offline deadline; probe round timing
/// never extends or shortens it.
#[derive(Debug)]
pub struct ReachTracker {
    state: ReachState,
    elapsed_secs: u64,
    max_wait_secs: u64,
    rounds: u32,
}

impl ReachTracker {
    pub fn new(max_wait: Duration) -> Self {
        Self {
            state: ReachState::Checking,
            elapsed_secs: 0,
            max_wait_secs: max_wait.as_secs(),
            rounds: 0,
        }
    }

    pub fn state(&self) -> &ReachState {
        &self.state
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Completed probe rounds so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Record one elapsed second.
    ///
    /// Returns the forced `Offline` transition when the budget runs out
    /// before any candidate answered.
    pub fn record_tick(&mut self) -> Option<ReachState> {
        if self.state.is_terminal() {
            return None;
        }
        self.elapsed_secs += 1;
        if self.elapsed_secs >= self.max_wait_secs {
            self.state = ReachState::Offline;
            return Some(self.state.clone());
        }
        None
    }

    /// Record a probe round that found a live candidate.
    ///
    /// A success arriving after the deadline already forced `Offline` is
    /// discarded; terminal states are final for this instance.
    pub fn record_round_success(&mut self, url: String) -> Option<ReachState> {
        if self.state.is_terminal() {
            return None;
        }
        self.rounds += 1;
        self.state = ReachState::Online { url };
        Some(self.state.clone())
    }

    /// Record a probe round in which every candidate failed.
    ///
    /// The first failed round moves `Checking` to `Waking`; later failed
    /// rounds stay `Waking` silently. `Waking` never reverts to
    /// `Checking`.
    pub fn record_round_failure(&mut self) -> Option<ReachState> {
        if self.state.is_terminal() {
            return None;
        }
        self.rounds += 1;
        if self.state == ReachState::Checking {
            self.state = ReachState::Waking;
            return Some(self.state.clone());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(max_wait_secs: u64) -> ReachTracker {
        ReachTracker::new(Duration::from_secs(max_wait_secs))
    }

    #[test]
    fn starts_checking() {
        let t = tracker(120);
        assert_eq!(*t.state(), ReachState::Checking);
        assert!(!t.state().is_terminal());
    }

    #[test]
    fn first_round_success_goes_online() {
        let mut t = tracker(120);
        let transition = t.record_round_success("https://api.example.com".into());
        assert_eq!(
            transition,
            Some(ReachState::Online {
                url: "https://api.example.com".into()
            })
        );
        assert_eq!(t.state().url(), Some("https://api.example.com"));
        assert!(t.state().is_terminal());
    }

    #[test]
    fn first_failed_round_moves_to_waking_once() {
        let mut t = tracker(120);
        assert_eq!(t.record_round_failure(), Some(ReachState::Waking));
        // Further failed rounds are silent: waking never re-emits and
        // never falls back to checking.
        assert_eq!(t.record_round_failure(), None);
        assert_eq!(t.record_round_failure(), None);
        assert_eq!(*t.state(), ReachState::Waking);
        assert_eq!(t.rounds(), 3);
    }

    #[test]
    fn success_after_waking_goes_online() {
        let mut t = tracker(120);
        t.record_round_failure();
        let transition = t.record_round_success("http://127.0.0.1:8000".into());
        assert_eq!(
            transition.as_ref().and_then(|s| s.url()),
            Some("http://127.0.0.1:8000")
        );
    }

    #[test]
    fn deadline_forces_offline_at_the_budget() {
        let mut t = tracker(3);
        assert_eq!(t.record_tick(), None);
        assert_eq!(t.record_tick(), None);
        assert_eq!(t.record_tick(), Some(ReachState::Offline));
        assert_eq!(t.elapsed_secs(), 3);
    }

    #[test]
    fn ticks_after_terminal_are_no_ops() {
        let mut t = tracker(2);
        t.record_round_success("https://api.example.com".into());
        assert_eq!(t.record_tick(), None);
        assert_eq!(t.record_tick(), None);
        assert_eq!(t.state().url(), Some("https://api.example.com"));
    }

    #[test]
    fn late_success_cannot_override_offline() {
        let mut t = tracker(1);
        assert_eq!(t.record_tick(), Some(ReachState::Offline));
        assert_eq!(t.record_round_success("https://late.example.com".into()), None);
        assert_eq!(*t.state(), ReachState::Offline);
    }

    #[test]
    fn failure_after_terminal_is_a_no_op() {
        let mut t = tracker(120);
        t.record_round_success("https://api.example.com".into());
        assert_eq!(t.record_round_failure(), None);
        assert!(t.state().is_terminal());
    }
}
