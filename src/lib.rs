//! abaplink - A CLI for ABAP repository objects via a local ADT bridge
//!
//! abaplink talks to a remote ABAP system that is not directly reachable
//! over the network. All traffic flows through a locally running bridge
//! process (an Eclipse plugin holding the live ADT session) which relays
//! method/path/body/header calls on our behalf.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the client)
//! - [`adt`] - ADT repository semantics: addressing, mutation protocol, upserts, reads
//! - [`bridge`] - Bridge endpoint discovery and the proxy transport
//! - [`core`] - Configuration and naming rules
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! abaplink maintains the following invariants:
//!
//! 1. Every acquired object lock is released exactly once, on every exit path
//! 2. Activation is never requested while an object lock is outstanding
//! 3. The bridge endpoint is resolved at most once per process and never re-probed
//! 4. Validation failures never issue network traffic

pub mod adt;
pub mod bridge;
pub mod cli;
pub mod core;
pub mod ui;
