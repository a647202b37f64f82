//! bridge
//!
//! Bridge endpoint discovery and the proxy transport.
//!
//! # Architecture
//!
//! The remote ABAP system is not directly reachable over the network. A
//! locally running bridge process (an Eclipse plugin holding the live ADT
//! session) exposes two endpoints:
//!
//! - `GET {base}/health` - liveness check, answers `{"status": "ok"}`
//! - `POST {base}/proxy` - relays one logical call `{method, path,
//!   headers, body, params}` against the remote system and returns its
//!   `{status, body, headers}` verbatim
//!
//! # Modules
//!
//! - [`probe`]: candidate discovery and the write-once endpoint cache
//! - [`transport`]: `BridgeTransport` trait, call/result types, `HttpBridge`
//! - [`mock`]: recording in-memory transport for deterministic tests
//!
//! # Error Semantics
//!
//! Transport failures (no bridge found, connection refused, timeout) and
//! application failures (the remote system answered with >= 400) are
//! distinct variants of [`transport::BridgeError`]; callers branch on the
//! application variant for semantic conditions like "already exists".

pub mod mock;
pub mod probe;
pub mod transport;

pub use probe::{BridgeEndpoint, BridgeLocator, DEFAULT_BRIDGE_PORT};
pub use transport::{BridgeError, BridgeTransport, HttpBridge, ProxyCall, ProxyResult};
