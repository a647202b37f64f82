//! bridge::transport
//!
//! The proxy transport: one logical call relayed through the bridge.
//!
//! # Design
//!
//! A single [`ProxyCall`] becomes a single `POST {base}/proxy` carrying
//! the logical method/path/headers/body/params as a JSON envelope. The
//! bridge performs the actual call against the remote system and returns
//! its status/body/headers verbatim. This indirection exists because the
//! remote system is not independently network-reachable; the bridge is
//! the only component with a live session to it.
//!
//! # Error Semantics
//!
//! - The bridge itself unreachable or timing out: [`BridgeError::Network`]
//! - No bridge ever found by the prober: [`BridgeError::Unavailable`],
//!   raised before any network traffic
//! - The remote system answering >= 400: [`BridgeError::Api`], carrying
//!   the original status/body/headers so callers can branch on semantic
//!   conditions like "already exists"

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::probe::{BridgeLocator, PROXY_TIMEOUT};

/// Operator instruction used whenever the bridge cannot be found.
const BRIDGE_UNAVAILABLE_HINT: &str =
    "bridge not available; start Eclipse with the ADT bridge plugin (or set bridge_url)";

/// Errors from bridge operations.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// No candidate endpoint answered the health check, or the cached
    /// resolution already concluded the bridge is absent.
    #[error("{0}")]
    Unavailable(String),

    /// The bridge connection itself failed or timed out.
    #[error("bridge network error: {0}")]
    Network(String),

    /// The remote system answered with an application-level error.
    #[error("remote system returned {status}: {body}")]
    Api {
        /// HTTP status the remote system returned.
        status: u16,
        /// Response body, verbatim.
        body: String,
        /// Response headers, verbatim.
        headers: HashMap<String, String>,
    },

    /// The bridge's reply could not be decoded.
    #[error("invalid response from bridge: {0}")]
    InvalidResponse(String),
}

impl BridgeError {
    /// Construct the standard "start the bridge" error.
    pub fn unavailable() -> Self {
        BridgeError::Unavailable(BRIDGE_UNAVAILABLE_HINT.to_string())
    }

    /// Status code of an application-level error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BridgeError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The unit of work sent to the bridge.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProxyCall {
    /// Logical HTTP method to execute against the remote system.
    pub method: String,
    /// Remote path, e.g. `/sap/bc/adt/oo/classes/zcl_demo`.
    pub path: String,
    /// Headers forwarded verbatim.
    pub headers: HashMap<String, String>,
    /// Request body, when the method carries one.
    pub body: Option<String>,
    /// Query parameters, sent separately so the bridge does the encoding.
    pub params: HashMap<String, String>,
}

impl ProxyCall {
    /// Start a call with the given method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            params: HashMap::new(),
        }
    }

    /// Attach a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The `_action` query parameter, when present (LOCK/UNLOCK calls).
    pub fn action(&self) -> Option<&str> {
        self.params.get("_action").map(String::as_str)
    }
}

/// The bridge's report of what the remote system returned.
#[derive(Debug, Clone, Default)]
pub struct ProxyResult {
    /// HTTP status from the remote system.
    pub status: u16,
    /// Response body, verbatim.
    pub body: String,
    /// Response headers, verbatim.
    pub headers: HashMap<String, String>,
}

/// JSON envelope the bridge answers with.
#[derive(Deserialize)]
struct ProxyReply {
    status: u16,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
}

/// The transport seam: one logical call through the bridge.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Call Shapes
///
/// The provided `get_text`/`post`/`put` methods cover the three shapes the
/// repository protocol needs; all of them funnel into [`send`].
///
/// [`send`]: BridgeTransport::send
#[async_trait]
pub trait BridgeTransport: Send + Sync {
    /// Send one logical call through the bridge.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if no bridge endpoint was ever found
    /// - `Network` if the bridge connection fails or times out
    /// - `Api` if the remote system answered with status >= 400
    async fn send(&self, call: ProxyCall) -> Result<ProxyResult, BridgeError>;

    /// GET-style read; returns the body only.
    async fn get_text(&self, path: &str, accept: &str) -> Result<String, BridgeError> {
        let call = ProxyCall::new("GET", path).header("Accept", accept);
        Ok(self.send(call).await?.body)
    }

    /// POST-style write; returns body, headers, and status.
    async fn post(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
        accept: &str,
        params: HashMap<String, String>,
    ) -> Result<ProxyResult, BridgeError> {
        let mut call = ProxyCall::new("POST", path)
            .header("Content-Type", content_type)
            .header("Accept", accept)
            .body(body);
        call.params = params;
        self.send(call).await
    }

    /// PUT-style write; returns body, headers, and status.
    async fn put(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
        accept: &str,
        params: HashMap<String, String>,
    ) -> Result<ProxyResult, BridgeError> {
        let mut call = ProxyCall::new("PUT", path)
            .header("Content-Type", content_type)
            .header("Accept", accept)
            .body(body);
        call.params = params;
        self.send(call).await
    }
}

/// HTTP implementation of the transport, backed by the locator's cached
/// endpoint.
pub struct HttpBridge {
    /// Client with the long proxied-call timeout.
    client: reqwest::Client,
    /// Shared endpoint resolution; written once, read per call.
    locator: Arc<BridgeLocator>,
}

impl std::fmt::Debug for HttpBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBridge")
            .field("resolved", &self.locator.is_resolved())
            .finish()
    }
}

impl HttpBridge {
    /// Create a transport over a (possibly not yet resolved) locator.
    pub fn new(locator: Arc<BridgeLocator>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(PROXY_TIMEOUT)
                .build()
                .unwrap_or_default(),
            locator,
        }
    }
}

#[async_trait]
impl BridgeTransport for HttpBridge {
    async fn send(&self, call: ProxyCall) -> Result<ProxyResult, BridgeError> {
        // Availability gate first: a cached negative resolution fails fast
        // without issuing any network traffic.
        let endpoint = self
            .locator
            .resolve()
            .await
            .ok_or_else(BridgeError::unavailable)?;

        let url = format!("{}/proxy", endpoint.base_url);
        let response = self
            .client
            .post(&url)
            .json(&call)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let reply: ProxyReply = response
            .json()
            .await
            .map_err(|e| BridgeError::InvalidResponse(e.to_string()))?;

        let result = ProxyResult {
            status: reply.status,
            body: reply.body.unwrap_or_default(),
            headers: reply.headers.unwrap_or_default(),
        };

        if result.status >= 400 {
            return Err(BridgeError::Api {
                status: result.status,
                body: result.body,
                headers: result.headers,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_call_builder() {
        let call = ProxyCall::new("POST", "/sap/bc/adt/oo/classes/zcl_x")
            .header("Accept", "application/xml")
            .body("")
            .param("_action", "LOCK")
            .param("accessMode", "MODIFY");

        assert_eq!(call.method, "POST");
        assert_eq!(call.action(), Some("LOCK"));
        assert_eq!(call.params.get("accessMode").map(String::as_str), Some("MODIFY"));
        assert_eq!(call.body.as_deref(), Some(""));
    }

    #[test]
    fn api_error_exposes_status() {
        let err = BridgeError::Api {
            status: 404,
            body: "not found".to_string(),
            headers: HashMap::new(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(BridgeError::unavailable().status(), None);
    }

    #[test]
    fn api_error_display_carries_status_and_body() {
        let err = BridgeError::Api {
            status: 400,
            body: "ExceptionResourceAlreadyExists".to_string(),
            headers: HashMap::new(),
        };
        let text = format!("{}", err);
        assert!(text.contains("400"));
        assert!(text.contains("AlreadyExists"));
    }

    #[tokio::test]
    async fn unresolved_bridge_fails_fast() {
        let locator = Arc::new(BridgeLocator::with_candidates(None, vec![]));
        let bridge = HttpBridge::new(locator);

        let err = bridge
            .get_text("/sap/bc/adt/discovery", "*/*")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable(_)));
    }

    #[test]
    fn proxy_reply_defaults_missing_fields() {
        let reply: ProxyReply = serde_json::from_str(r#"{"status": 200}"#).unwrap();
        assert_eq!(reply.status, 200);
        assert!(reply.body.is_none());
        assert!(reply.headers.is_none());
    }
}
