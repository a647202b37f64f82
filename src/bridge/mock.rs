//! bridge::mock
//!
//! Recording in-memory transport for deterministic tests.
//!
//! # Design
//!
//! `MockBridge` stands in for the bridge plus the remote system. It
//! records every [`ProxyCall`] for ordering assertions, remembers which
//! objects have been created (so a second creation of the same object is
//! rejected with the remote's "already exists" body), stores written
//! sources, and allows injecting a failure at any protocol step.
//!
//! # Example
//!
//! ```
//! use abaplink::bridge::mock::MockBridge;
//! use abaplink::bridge::{BridgeTransport, ProxyCall};
//!
//! # tokio_test::block_on(async {
//! let bridge = MockBridge::new();
//!
//! let call = ProxyCall::new("POST", "/sap/bc/adt/oo/classes/zcl_x")
//!     .param("_action", "LOCK")
//!     .param("accessMode", "MODIFY");
//! let result = bridge.send(call).await.unwrap();
//!
//! assert!(result.body.contains("LOCK_HANDLE"));
//! assert_eq!(bridge.steps(), vec!["LOCK".to_string()]);
//! # });
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::transport::{BridgeError, BridgeTransport, ProxyCall, ProxyResult};

/// Default lock-result body the mock answers LOCK calls with.
const DEFAULT_LOCK_BODY: &str = "<asx:abap xmlns:asx=\"http://www.sap.com/abapxml\">\
<asx:values><DATA><LOCK_HANDLE>MOCK-HANDLE-1</LOCK_HANDLE></DATA></asx:values></asx:abap>";

/// Body the mock answers duplicate creations with.
const ALREADY_EXISTS_BODY: &str =
    "ExceptionResourceAlreadyExists: the object already exists in the repository";

/// Protocol step classification of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// POST with `_action=LOCK`.
    Lock,
    /// PUT to a `/source/main` path.
    Write,
    /// POST with `_action=UNLOCK`.
    Unlock,
    /// POST to the activation endpoint.
    Activate,
    /// POST creating an object (no `_action`, not activation).
    Create,
    /// Any GET.
    Read,
}

impl Step {
    fn classify(call: &ProxyCall) -> Step {
        match call.action() {
            Some("LOCK") => Step::Lock,
            Some("UNLOCK") => Step::Unlock,
            _ if call.method == "PUT" && call.path.ends_with("/source/main") => Step::Write,
            _ if call.method == "POST" && call.path == "/sap/bc/adt/activation" => Step::Activate,
            _ if call.method == "POST" => Step::Create,
            _ => Step::Read,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Lock => write!(f, "LOCK"),
            Step::Write => write!(f, "WRITE"),
            Step::Unlock => write!(f, "UNLOCK"),
            Step::Activate => write!(f, "ACTIVATE"),
            Step::Create => write!(f, "CREATE"),
            Step::Read => write!(f, "READ"),
        }
    }
}

/// Configuration for which protocol step should fail.
#[derive(Debug, Clone)]
pub struct FailOn {
    /// Step to fail at.
    pub step: Step,
    /// Error to answer with.
    pub error: BridgeError,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockBridgeInner {
    /// Every call, in arrival order.
    calls: Vec<ProxyCall>,
    /// Body answered to LOCK calls.
    lock_body: Option<String>,
    /// Injected failure, if any.
    fail_on: Option<FailOn>,
    /// Canned GET responses by exact path.
    get_stubs: HashMap<String, String>,
    /// (collection path, lowercased name) of objects already created.
    created: HashSet<(String, String)>,
    /// Written sources by source path.
    sources: HashMap<String, String>,
}

/// Mock transport for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockBridge {
    inner: Arc<Mutex<MockBridgeInner>>,
}

impl MockBridge {
    /// Create a new empty mock bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the body answered to LOCK calls.
    ///
    /// Use an empty or handle-free body to exercise the degraded
    /// "lock succeeded but returned no handle" path.
    pub fn set_lock_body(&self, body: impl Into<String>) {
        self.inner.lock().unwrap().lock_body = Some(body.into());
    }

    /// Inject a failure at the given protocol step.
    pub fn fail_on(&self, step: Step, error: BridgeError) {
        self.inner.lock().unwrap().fail_on = Some(FailOn { step, error });
    }

    /// Clear any injected failure.
    pub fn clear_failure(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Stub a GET response for an exact path.
    pub fn stub_get(&self, path: impl Into<String>, body: impl Into<String>) {
        self.inner
            .lock()
            .unwrap()
            .get_stubs
            .insert(path.into(), body.into());
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<ProxyCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Protocol steps of all recorded calls, in order, as display strings.
    pub fn steps(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|c| Step::classify(c).to_string())
            .collect()
    }

    /// The source last written to the given source path, if any.
    pub fn source_for(&self, source_path: &str) -> Option<String> {
        self.inner.lock().unwrap().sources.get(source_path).cloned()
    }

    /// Extract `adtcore:name="..."` from a creation body.
    fn creation_name(body: &str) -> Option<String> {
        let marker = "adtcore:name=\"";
        let start = body.find(marker)? + marker.len();
        let end = body[start..].find('"')? + start;
        Some(body[start..end].to_lowercase())
    }
}

#[async_trait]
impl BridgeTransport for MockBridge {
    async fn send(&self, call: ProxyCall) -> Result<ProxyResult, BridgeError> {
        let mut inner = self.inner.lock().unwrap();
        let step = Step::classify(&call);
        inner.calls.push(call.clone());

        if let Some(fail) = &inner.fail_on {
            if fail.step == step {
                return Err(fail.error.clone());
            }
        }

        match step {
            Step::Lock => Ok(ProxyResult {
                status: 200,
                body: inner
                    .lock_body
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOCK_BODY.to_string()),
                headers: HashMap::new(),
            }),
            Step::Unlock | Step::Activate => Ok(ProxyResult {
                status: 200,
                ..Default::default()
            }),
            Step::Write => {
                let source = call.body.clone().unwrap_or_default();
                inner.sources.insert(call.path.clone(), source);
                Ok(ProxyResult {
                    status: 200,
                    ..Default::default()
                })
            }
            Step::Create => {
                let name = Self::creation_name(call.body.as_deref().unwrap_or(""))
                    .unwrap_or_default();
                let key = (call.path.clone(), name);
                if !inner.created.insert(key) {
                    return Err(BridgeError::Api {
                        status: 400,
                        body: ALREADY_EXISTS_BODY.to_string(),
                        headers: HashMap::new(),
                    });
                }
                Ok(ProxyResult {
                    status: 201,
                    ..Default::default()
                })
            }
            Step::Read => match inner.get_stubs.get(&call.path) {
                Some(body) => Ok(ProxyResult {
                    status: 200,
                    body: body.clone(),
                    headers: HashMap::new(),
                }),
                None => Err(BridgeError::Api {
                    status: 404,
                    body: "resource not found".to_string(),
                    headers: HashMap::new(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_call() -> ProxyCall {
        ProxyCall::new("POST", "/sap/bc/adt/programs/programs/ztest")
            .param("_action", "LOCK")
            .param("accessMode", "MODIFY")
    }

    #[tokio::test]
    async fn lock_answers_with_handle() {
        let bridge = MockBridge::new();
        let result = bridge.send(lock_call()).await.unwrap();
        assert!(result.body.contains("<LOCK_HANDLE>MOCK-HANDLE-1</LOCK_HANDLE>"));
    }

    #[tokio::test]
    async fn write_stores_source() {
        let bridge = MockBridge::new();
        let call = ProxyCall::new("PUT", "/sap/bc/adt/programs/programs/ztest/source/main")
            .body("REPORT ztest.");
        bridge.send(call).await.unwrap();
        assert_eq!(
            bridge
                .source_for("/sap/bc/adt/programs/programs/ztest/source/main")
                .as_deref(),
            Some("REPORT ztest.")
        );
    }

    #[tokio::test]
    async fn duplicate_creation_rejected_with_already_exists() {
        let bridge = MockBridge::new();
        let body = r#"<class:abapClass adtcore:name="ZCL_X"/>"#;
        let create = || {
            ProxyCall::new("POST", "/sap/bc/adt/oo/classes")
                .header("Content-Type", "application/xml")
                .body(body)
        };

        bridge.send(create()).await.unwrap();
        let err = bridge.send(create()).await.unwrap_err();
        match err {
            BridgeError::Api { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("AlreadyExists"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn injected_failure_hits_only_its_step() {
        let bridge = MockBridge::new();
        bridge.fail_on(Step::Write, BridgeError::Network("boom".to_string()));

        // Lock still succeeds.
        bridge.send(lock_call()).await.unwrap();

        let write = ProxyCall::new("PUT", "/x/source/main").body("src");
        assert!(bridge.send(write).await.is_err());
    }

    #[tokio::test]
    async fn unstubbed_get_is_404() {
        let bridge = MockBridge::new();
        let err = bridge
            .send(ProxyCall::new("GET", "/sap/bc/adt/oo/classes/zmissing/source/main"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn step_classification() {
        assert_eq!(Step::classify(&lock_call()), Step::Lock);
        assert_eq!(
            Step::classify(&ProxyCall::new("POST", "/x").param("_action", "UNLOCK")),
            Step::Unlock
        );
        assert_eq!(
            Step::classify(&ProxyCall::new("PUT", "/x/source/main")),
            Step::Write
        );
        assert_eq!(
            Step::classify(&ProxyCall::new("POST", "/sap/bc/adt/activation")),
            Step::Activate
        );
        assert_eq!(Step::classify(&ProxyCall::new("POST", "/x")), Step::Create);
        assert_eq!(Step::classify(&ProxyCall::new("GET", "/x")), Step::Read);
    }
}
