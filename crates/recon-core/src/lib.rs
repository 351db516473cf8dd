//! recon-core: shared types for the ReconLink client layer.
//!
//! Provides the wire models for the scan backend API, the candidate
//! endpoint resolver, and `recon.toml` config parsing. Everything here
//! is pure data and pure functions; the async machinery lives in
//! `recon-reach` and `recon-poll`.

pub mod config;
pub mod error;
pub mod resolve;
pub mod wire;

pub use config::{PollSettings, ReachSettings, ReconConfig};
pub use error::{CoreError, CoreResult};
pub use resolve::resolve_candidates;
pub use wire::{ApiErrorBody, HealthInfo, JobStatus, ScanRequest, ScanStatus, ScanSubmitted, ScanType};
