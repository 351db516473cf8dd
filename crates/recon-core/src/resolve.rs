//! Candidate endpoint resolution.
//!
//! Builds the ordered set of base URLs worth probing for a live backend.
//! Pure string/url work: malformed input is coerced, never rejected, and
//! the local loopback default guarantees the set is never empty.

use url::Url;

/// Hosting suffix under which the production frontend and backend live.
pub const HOSTING_SUFFIX: &str = ".onrender.com";

/// Frontend naming label that marks a hostname as the dashboard's own.
const FRONTEND_LABEL: &str = "-frontend";

/// Backend naming label substituted for the frontend label.
const BACKEND_LABEL: &str = "-backend";

/// Backend hostnames historically used under the hosting suffix.
///
/// Tried whenever the client is itself served from the hosting suffix,
/// even when the sibling derivation does not match.
const KNOWN_BACKEND_HOSTS: [&str; 2] = ["osint-recon-backend", "osint-platform-api"];

/// Local development backend.
pub const LOCAL_DEFAULT: &str = "http://127.0.0.1:8000";

/// Normalize a configured base URL.
///
/// Prefixes `https://` when no scheme is present and strips any trailing
/// slash. Input that still fails URL parsing is passed through coerced
/// rather than rejected; the probe will simply fail against it.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    match Url::parse(&with_scheme) {
        Ok(parsed) => parsed.as_str().trim_end_matches('/').to_string(),
        Err(_) => with_scheme.trim_end_matches('/').to_string(),
    }
}

/// Derive the backend sibling of a frontend-labeled hostname.
///
/// `osint-frontend-7g2.onrender.com` names its backend
/// `osint-backend-7g2.onrender.com` under the same suffix.
fn backend_sibling(hostname: &str) -> Option<String> {
    let label = hostname.strip_suffix(HOSTING_SUFFIX)?;
    let at = label.find(FRONTEND_LABEL)?;
    let stem = &label[..at];
    let rest = &label[at + FRONTEND_LABEL.len()..];
    Some(format!("https://{stem}{BACKEND_LABEL}{rest}{HOSTING_SUFFIX}"))
}

/// Produce the ordered, de-duplicated candidate base URLs.
///
/// Order: explicit configured URL, derived backend sibling, known backend
/// hosts under the hosting suffix, local loopback default. First-seen
/// order is kept; the result is never empty.
pub fn resolve_candidates(explicit: Option<&str>, hostname: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |url: String| {
        if !candidates.contains(&url) {
            candidates.push(url);
        }
    };

    if let Some(configured) = explicit {
        if !configured.trim().is_empty() {
            push(normalize_base_url(configured));
        }
    }

    if let Some(host) = hostname {
        let host = host.trim().to_ascii_lowercase();
        if let Some(sibling) = backend_sibling(&host) {
            push(sibling);
        }
        if host.ends_with(HOSTING_SUFFIX) {
            for known in KNOWN_BACKEND_HOSTS {
                push(format!("https://{known}{HOSTING_SUFFIX}"));
            }
        }
    }

    push(LOCAL_DEFAULT.to_string());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemeless_explicit_url_gets_https() {
        let candidates = resolve_candidates(Some("api.example.com"), None);
        assert_eq!(candidates[0], "https://api.example.com");
    }

    #[test]
    fn explicit_url_keeps_its_scheme_and_loses_trailing_slash() {
        let candidates = resolve_candidates(Some("http://10.0.0.5:8000/"), None);
        assert_eq!(candidates[0], "http://10.0.0.5:8000");
    }

    #[test]
    fn frontend_hostname_derives_backend_sibling() {
        let candidates =
            resolve_candidates(None, Some("osint-frontend-7g2.onrender.com"));
        assert!(candidates.contains(&"https://osint-backend-7g2.onrender.com".to_string()));
    }

    #[test]
    fn hosting_suffix_adds_known_backends() {
        let candidates = resolve_candidates(None, Some("something-else.onrender.com"));
        for known in KNOWN_BACKEND_HOSTS {
            assert!(candidates.contains(&format!("https://{known}.onrender.com")));
        }
    }

    #[test]
    fn loopback_default_is_always_last() {
        let candidates = resolve_candidates(None, None);
        assert_eq!(candidates, vec![LOCAL_DEFAULT.to_string()]);

        let candidates =
            resolve_candidates(Some("api.example.com"), Some("osint-frontend.onrender.com"));
        assert_eq!(candidates.last().map(String::as_str), Some(LOCAL_DEFAULT));
    }

    #[test]
    fn candidates_are_deduplicated_in_first_seen_order() {
        // Explicit config pointing at the derived sibling must not repeat it.
        let candidates = resolve_candidates(
            Some("osint-backend-7g2.onrender.com"),
            Some("osint-frontend-7g2.onrender.com"),
        );
        let unique: std::collections::HashSet<_> = candidates.iter().collect();
        assert_eq!(unique.len(), candidates.len());
        assert_eq!(candidates[0], "https://osint-backend-7g2.onrender.com");
    }

    #[test]
    fn unrelated_hostname_contributes_nothing() {
        let candidates = resolve_candidates(None, Some("dashboard.example.net"));
        assert_eq!(candidates, vec![LOCAL_DEFAULT.to_string()]);
    }

    #[test]
    fn empty_explicit_url_is_ignored() {
        let candidates = resolve_candidates(Some("   "), None);
        assert_eq!(candidates, vec![LOCAL_DEFAULT.to_string()]);
    }
}
