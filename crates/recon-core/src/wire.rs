//! Wire models for the scan backend API.
//!
//! Shapes follow the backend contract: `POST /api/v1/scan` submits a scan,
//! `GET /api/v1/scan/{id}` reports status plus the result payload once
//! completed, and `GET /health` answers the liveness probe. Result fields
//! beyond the status envelope are carried opaquely; this layer never
//! interprets scan findings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of OSINT scan to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Domain,
    Email,
    Username,
    Phone,
    Full,
}

impl ScanType {
    /// Number of backend modules a scan of this type runs.
    ///
    /// Used only to estimate progress from the executed-module list; the
    /// backend never reports this number itself.
    pub fn expected_modules(&self) -> usize {
        match self {
            ScanType::Domain => 3,
            ScanType::Email => 2,
            ScanType::Username => 1,
            ScanType::Phone => 1,
            ScanType::Full => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Domain => "domain",
            ScanType::Email => "email",
            ScanType::Username => "username",
            ScanType::Phone => "phone",
            ScanType::Full => "full",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(ScanType::Domain),
            "email" => Ok(ScanType::Email),
            "username" => Ok(ScanType::Username),
            "phone" => Ok(ScanType::Phone),
            "full" => Ok(ScanType::Full),
            other => Err(format!(
                "unknown scan type '{other}' (expected domain, email, username, phone, or full)"
            )),
        }
    }
}

/// Request body for submitting a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub target: String,
    pub scan_type: ScanType,
    pub deep_scan: bool,
}

impl ScanRequest {
    pub fn new(target: impl Into<String>, scan_type: ScanType, deep_scan: bool) -> Self {
        Self {
            target: target.into(),
            scan_type,
            deep_scan,
        }
    }
}

/// Response to a successful scan submission.
///
/// The backend echoes the target and an informational message; only
/// `scan_id` is load-bearing for the polling flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSubmitted {
    pub scan_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Lifecycle status of a scan job as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
}

impl<'de> Deserialize<'de> for JobStatus {
    // Anything the backend says that is not a terminal status counts as
    // in-progress, including the legacy "running" spelling.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::InProgress,
        })
    }
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Status envelope for `GET /api/v1/scan/{id}`.
///
/// Result fields present on a completed scan (intelligence sections,
/// timings, risk data) are collected into `extra` untouched and handed to
/// the completion callback as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    #[serde(default)]
    pub scan_id: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub modules_executed: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScanStatus {
    /// Render the full payload (envelope plus result fields) as JSON.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Error body the backend attaches to 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

/// Payload of `GET /health`.
///
/// Only informational; the liveness probe ignores the body entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthInfo {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub modules_available: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_type_on_the_wire_is_snake_case() {
        let req = ScanRequest::new("example.com", ScanType::Domain, true);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["scan_type"], "domain");
        assert_eq!(json["deep_scan"], true);
    }

    #[test]
    fn legacy_running_status_reads_as_in_progress() {
        let status: ScanStatus = serde_json::from_str(
            r#"{"scan_id": "abc", "status": "running", "modules_executed": ["domain_intel"]}"#,
        )
        .unwrap();
        assert_eq!(status.status, JobStatus::InProgress);
        assert!(!status.status.is_terminal());
    }

    #[test]
    fn unknown_status_reads_as_in_progress() {
        let status: ScanStatus =
            serde_json::from_str(r#"{"status": "initiated", "modules_executed": []}"#).unwrap();
        assert_eq!(status.status, JobStatus::InProgress);
    }

    #[test]
    fn completed_status_keeps_result_fields() {
        let status: ScanStatus = serde_json::from_str(
            r#"{
                "scan_id": "abc",
                "status": "completed",
                "modules_executed": ["domain_intel", "tech_fingerprint"],
                "target": "example.com",
                "domain_intel": {"subdomain_count": 4}
            }"#,
        )
        .unwrap();
        assert_eq!(status.status, JobStatus::Completed);
        assert_eq!(status.extra["target"], "example.com");
        assert_eq!(status.extra["domain_intel"]["subdomain_count"], 4);

        // Repeated observation of the same payload keeps the same shape.
        let round = status.to_value();
        let again: ScanStatus = serde_json::from_value(round.clone()).unwrap();
        assert_eq!(again.to_value(), round);
    }

    #[test]
    fn expected_module_counts() {
        assert_eq!(ScanType::Domain.expected_modules(), 3);
        assert_eq!(ScanType::Email.expected_modules(), 2);
        assert_eq!(ScanType::Username.expected_modules(), 1);
        assert_eq!(ScanType::Full.expected_modules(), 5);
    }

    #[test]
    fn scan_type_round_trips_from_str() {
        for name in ["domain", "email", "username", "phone", "full"] {
            let parsed: ScanType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("port-scan".parse::<ScanType>().is_err());
    }
}
