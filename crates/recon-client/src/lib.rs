//! recon-client: HTTP access to the scan backend.
//!
//! A thin reqwest wrapper that attaches the shared `X-API-Key` secret to
//! every request and exposes the three calls the resilience layer needs:
//! the liveness probe, scan submission, and job status. All transport
//! detail stays here; the monitor and poller only see booleans and typed
//! results.

mod client;
mod error;

pub use client::{API_KEY_HEADER, BackendClient};
pub use error::{ClientError, ClientResult};
