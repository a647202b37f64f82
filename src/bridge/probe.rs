//! bridge::probe
//!
//! Bridge endpoint discovery.
//!
//! # Design
//!
//! The bridge usually runs on the same host, but under WSL2-style split
//! network namespaces it is reachable only via the gateway between the
//! namespaces. Candidates are therefore probed in a fixed order:
//!
//! 1. An explicit override URL, when configured (config `bridge_url` or
//!    `$BRIDGE_URL`). A failed override falls through to auto-discovery
//!    rather than aborting.
//! 2. `localhost`, then `127.0.0.1`
//! 3. A non-loopback nameserver from `/etc/resolv.conf`
//! 4. The default-route gateway from `ip route`
//!
//! Probing is strictly sequential; the first candidate whose `/health`
//! answers `{"status": "ok"}` within the short timeout wins and later
//! candidates are never tried. Each candidate gets exactly one attempt.
//!
//! # Caching
//!
//! The outcome is resolved at most once per process and cached, including
//! the negative outcome: once no candidate answered, every later
//! operation fails fast instead of re-probing. "Not yet checked" is a
//! distinct state from "checked, unavailable" (an uninitialized cell vs a
//! cached `None`). A new process is required to re-probe.

use std::process::Command;
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use tokio::sync::OnceCell;

/// Port the bridge listens on.
pub const DEFAULT_BRIDGE_PORT: u16 = 19456;

/// Timeout for a single health probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for a proxied call (the remote system can be slow to activate).
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

/// A resolved bridge endpoint.
///
/// Immutable once set; `discovered_at` records when the winning probe
/// answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeEndpoint {
    /// Base URL of the bridge, without a trailing slash.
    pub base_url: String,
    /// When the endpoint answered its health check.
    pub discovered_at: DateTime<Utc>,
}

/// Health check response shape.
#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// Locates the bridge endpoint and caches the outcome for the process
/// lifetime.
///
/// The cached cell is write-once/read-many shared state; it is written
/// under the first caller's resolution and only read thereafter.
#[derive(Debug)]
pub struct BridgeLocator {
    /// Explicit override URL, probed before auto-discovery.
    override_url: Option<String>,
    /// Candidate base URLs, probed in order.
    candidates: Vec<String>,
    /// Client with the short health-check timeout.
    client: reqwest::Client,
    /// `unchecked` (uninitialized) | `unavailable` (`None`) |
    /// `available` (`Some`).
    resolved: OnceCell<Option<BridgeEndpoint>>,
}

impl BridgeLocator {
    /// Create a locator with auto-discovered candidates.
    ///
    /// `override_url` is probed first when present; its failure falls
    /// through to the discovered candidates.
    pub fn new(override_url: Option<String>) -> Self {
        let candidates = candidate_hosts()
            .into_iter()
            .map(|host| format!("http://{}:{}", host, DEFAULT_BRIDGE_PORT))
            .collect();
        Self::with_candidates(override_url, candidates)
    }

    /// Create a locator with an explicit candidate list of base URLs.
    ///
    /// Used by tests to point candidates at local mock servers.
    pub fn with_candidates(override_url: Option<String>, candidates: Vec<String>) -> Self {
        Self {
            override_url: override_url.map(|u| u.trim_end_matches('/').to_string()),
            candidates,
            client: reqwest::Client::builder()
                .timeout(HEALTH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the bridge endpoint, probing on the first call only.
    ///
    /// Returns `None` when no candidate answered; that outcome is cached
    /// and subsequent calls return it without network traffic.
    pub async fn resolve(&self) -> Option<&BridgeEndpoint> {
        self.resolved
            .get_or_init(|| async { self.probe_all().await })
            .await
            .as_ref()
    }

    /// Whether resolution has happened yet (for diagnostics only).
    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    /// Probe the override, then each candidate, strictly in order.
    async fn probe_all(&self) -> Option<BridgeEndpoint> {
        if let Some(url) = &self.override_url {
            if self.probe(url).await {
                return Some(BridgeEndpoint {
                    base_url: url.clone(),
                    discovered_at: Utc::now(),
                });
            }
            // Override did not answer; fall through to auto-discovery.
        }

        for url in &self.candidates {
            if self.probe(url).await {
                return Some(BridgeEndpoint {
                    base_url: url.clone(),
                    discovered_at: Utc::now(),
                });
            }
        }

        None
    }

    /// One health check against one candidate. Any failure (connection,
    /// timeout, unparsable body, non-"ok" status) rejects the candidate.
    async fn probe(&self, base_url: &str) -> bool {
        let url = format!("{}/health", base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => match resp.json::<HealthResponse>().await {
                Ok(health) => health.status == "ok",
                Err(_) => false,
            },
            Err(_) => false,
        }
    }
}

/// Build the ordered candidate host list.
///
/// Gateway-derived hosts are appended only if not already present.
fn candidate_hosts() -> Vec<String> {
    let mut hosts = vec!["localhost".to_string(), "127.0.0.1".to_string()];

    if let Some(ns) = resolv_conf_nameserver() {
        if !hosts.contains(&ns) {
            hosts.push(ns);
        }
    }

    if let Some(gw) = default_gateway() {
        if !hosts.contains(&gw) {
            hosts.push(gw);
        }
    }

    hosts
}

/// Read a non-loopback nameserver IP from `/etc/resolv.conf`.
///
/// Under WSL2 the nameserver entry is the Windows-side gateway, which is
/// where the bridge actually listens.
fn resolv_conf_nameserver() -> Option<String> {
    let contents = std::fs::read_to_string("/etc/resolv.conf").ok()?;
    // Compiled per call; discovery runs once per process.
    let re = Regex::new(r"nameserver\s+(\d+\.\d+\.\d+\.\d+)").ok()?;
    let ip = re.captures(&contents)?.get(1)?.as_str().to_string();
    if ip == "127.0.0.1" {
        None
    } else {
        Some(ip)
    }
}

/// Read the default-route gateway IP via `ip route`.
fn default_gateway() -> Option<String> {
    let output = Command::new("ip")
        .args(["route", "show", "default"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    // "default via 172.28.0.1 dev eth0 ..."
    let mut tokens = stdout.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "via" {
            return tokens.next().map(|ip| ip.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_outcome_is_cached() {
        // Point at a port nobody listens on; connection is refused fast.
        let locator = BridgeLocator::with_candidates(
            None,
            vec!["http://127.0.0.1:1".to_string()],
        );

        assert!(!locator.is_resolved());
        assert!(locator.resolve().await.is_none());
        assert!(locator.is_resolved());
        // Second call returns the cached outcome.
        assert!(locator.resolve().await.is_none());
    }

    #[tokio::test]
    async fn override_failure_falls_through_to_candidates() {
        let locator = BridgeLocator::with_candidates(
            Some("http://127.0.0.1:1".to_string()),
            vec!["http://127.0.0.1:2".to_string()],
        );

        // Neither answers; both must have been attempted without a panic
        // and the outcome is unavailable.
        assert!(locator.resolve().await.is_none());
    }

    #[test]
    fn candidate_hosts_start_with_loopback() {
        let hosts = candidate_hosts();
        assert_eq!(hosts[0], "localhost");
        assert_eq!(hosts[1], "127.0.0.1");
        // No duplicates regardless of environment.
        let mut deduped = hosts.clone();
        deduped.dedup();
        assert_eq!(hosts, deduped);
    }

    #[test]
    fn locator_strips_trailing_slash_from_override() {
        let locator =
            BridgeLocator::with_candidates(Some("http://bridge:19456///".to_string()), vec![]);
        assert_eq!(
            locator.override_url.as_deref(),
            Some("http://bridge:19456")
        );
    }
}
