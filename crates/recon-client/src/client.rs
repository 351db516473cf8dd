//! Backend API client.

use std::time::Duration;

use recon_core::wire::{ApiErrorBody, HealthInfo, ScanRequest, ScanStatus, ScanSubmitted};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Header carrying the shared API secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Route prefix for the scan API.
const API_PREFIX: &str = "/api/v1";

/// Default timeout for API requests (submission and status).
///
/// Liveness probes pass their own, much shorter, per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for one scan backend deployment.
///
/// Cheap to clone; every request carries the configured `X-API-Key`.
/// The base URL is an argument per call rather than construction state
/// because the reachability monitor races one client across many
/// candidate URLs.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    api_key: String,
}

impl BackendClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Liveness probe against `GET {base}/health`.
    ///
    /// Any HTTP response counts as alive, including error statuses: a
    /// backend that answers 401 or 500 is awake, which is all the
    /// reachability monitor needs to know. Only transport failures and
    /// timeouts count as dead, and they are indistinguishable here.
    pub async fn probe(&self, base_url: &str, timeout: Duration) -> bool {
        let url = self.endpoint(base_url, "/health");
        let outcome = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(timeout)
            .send()
            .await;

        match outcome {
            Ok(response) => {
                debug!(%url, status = %response.status(), "probe answered");
                true
            }
            Err(error) => {
                debug!(%url, %error, "probe failed");
                false
            }
        }
    }

    /// Fetch the backend's health payload (version, available modules).
    pub async fn health(&self, base_url: &str) -> ClientResult<HealthInfo> {
        let url = self.endpoint(base_url, "/health");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        read_json(response).await
    }

    /// Submit a scan; returns the backend-assigned job id.
    pub async fn submit_scan(
        &self,
        base_url: &str,
        request: &ScanRequest,
    ) -> ClientResult<ScanSubmitted> {
        let url = format!("{}{API_PREFIX}/scan", base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch the status envelope (and, when completed, the full result)
    /// for a scan job.
    pub async fn scan_status(&self, base_url: &str, scan_id: &str) -> ClientResult<ScanStatus> {
        let url = format!(
            "{}{API_PREFIX}/scan/{scan_id}",
            base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        read_json(response).await
    }

    fn endpoint(&self, base_url: &str, path: &str) -> String {
        format!("{}{path}", base_url.trim_end_matches('/'))
    }
}

/// Decode a response body, mapping non-success statuses to `Api` errors
/// using the backend's `detail` field when the body carries one.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        return Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_join_tolerates_trailing_slash() {
        let client = BackendClient::new("key");
        assert_eq!(
            client.endpoint("http://127.0.0.1:8000/", "/health"),
            "http://127.0.0.1:8000/health"
        );
        assert_eq!(
            client.endpoint("https://api.example.com", "/health"),
            "https://api.example.com/health"
        );
    }
}
