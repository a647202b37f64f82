//! adt
//!
//! ADT repository semantics: addressing, payloads, the mutation
//! protocol, create-or-update reconciliation, and the read surface.
//!
//! # Modules
//!
//! - [`paths`]: `ObjectKind` and the canonical addressing templates
//! - [`payloads`]: XML bodies and tolerant extraction of handles/references
//! - [`mutation`]: the lock → write → unlock → activate state machine
//! - [`upsert`]: optimistic create with "already exists" fallback
//! - [`client`]: `AdtClient` and the thin read operations
//!
//! # Error Handling
//!
//! All operations return [`AdtError`]. Validation variants
//! (`UnsupportedKind`, `Naming`) are raised before any network call;
//! `PartialMutation` marks the one state where the remote object diverges
//! from "fully applied" (source persisted, activation pending).

pub mod client;
pub mod mutation;
pub mod paths;
pub mod payloads;
pub mod upsert;

pub use client::{AdtClient, ConnectionStatus, ObjectInfo, PackageInfo, SearchResults};
pub use paths::ObjectKind;
pub use payloads::ObjectReference;
pub use upsert::{ObjectDescriptor, UpsertAction, UpsertOutcome};

use thiserror::Error;

use crate::bridge::BridgeError;
use crate::core::naming::NamingError;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum AdtError {
    /// The requested object kind is not part of the addressing scheme.
    #[error("unsupported object kind '{kind}'; use one of: {supported}")]
    UnsupportedKind {
        /// The kind string as given by the caller.
        kind: String,
        /// Comma-separated supported kinds.
        supported: String,
    },

    /// A name violated the customer-namespace rules. Raised before any
    /// network call.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// A read addressed an object the repository does not know.
    #[error("object not found: {kind} {name}")]
    NotFound {
        /// Object kind, as requested.
        kind: String,
        /// Object name, as requested.
        name: String,
    },

    /// The source was written but activation failed; the object state
    /// diverges from "fully applied".
    #[error("source for '{name}' was written but activation failed: {source}")]
    PartialMutation {
        /// The object whose activation failed.
        name: String,
        /// The underlying activation error.
        #[source]
        source: BridgeError,
    },

    /// Any transport or remote-system failure.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
