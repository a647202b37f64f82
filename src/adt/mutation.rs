//! adt::mutation
//!
//! The lock → write → unlock → activate state machine.
//!
//! # Design
//!
//! Writing source to an existing object requires an exclusive lock, and
//! an acquired lock MUST be released exactly once no matter how the
//! write goes. The sequence here is strict:
//!
//! 1. LOCK: `POST {object}?_action=LOCK&accessMode=MODIFY`. Failure
//!    aborts the whole mutation; nothing was acquired, nothing to undo.
//! 2. WRITE: `PUT {object}/source/main`, with the lock handle as a
//!    query parameter when the lock result yielded one. A write error
//!    is held, not raised, until the unlock has run.
//! 3. UNLOCK: `POST {object}?_action=UNLOCK`, always. If the write
//!    failed and the unlock also fails, the unlock error is reported to
//!    stderr and suppressed so the write error surfaces.
//! 4. ACTIVATE: only after the unlock, and only if the write succeeded.
//!    An activation failure leaves the source persisted but inactive,
//!    which is surfaced as [`AdtError::PartialMutation`].
//!
//! A lock result without a parsable handle is tolerated: the write and
//! unlock proceed without the `lockHandle` parameter.

use std::collections::HashMap;

use crate::bridge::{BridgeError, BridgeTransport, ProxyCall};
use crate::ui::output;

use super::payloads::{self, LOCK_RESULT_ACCEPT};
use super::{paths, AdtError};

/// Acquire the exclusive lock on an object path.
///
/// Returns the lock handle when the lock result carries one.
async fn lock(
    bridge: &dyn BridgeTransport,
    object_path: &str,
    transport: Option<&str>,
) -> Result<Option<String>, BridgeError> {
    let mut call = ProxyCall::new("POST", object_path)
        .header("Accept", LOCK_RESULT_ACCEPT)
        .header("X-sap-adt-sessiontype", "stateful")
        .param("_action", "LOCK")
        .param("accessMode", "MODIFY");
    if let Some(corr) = transport {
        call = call.param("corrNr", corr);
    }

    let result = bridge.send(call).await?;
    Ok(payloads::extract_lock_handle(&result.body))
}

/// Release the lock on an object path.
async fn unlock(
    bridge: &dyn BridgeTransport,
    object_path: &str,
    handle: Option<&str>,
) -> Result<(), BridgeError> {
    let mut call = ProxyCall::new("POST", object_path)
        .header("X-sap-adt-sessiontype", "stateful")
        .param("_action", "UNLOCK");
    if let Some(h) = handle {
        call = call.param("lockHandle", h);
    }
    bridge.send(call).await?;
    Ok(())
}

/// Replace the main source of an already locked object.
async fn write_source(
    bridge: &dyn BridgeTransport,
    object_path: &str,
    source: &str,
    handle: Option<&str>,
    transport: Option<&str>,
) -> Result<(), BridgeError> {
    let mut params = HashMap::new();
    if let Some(h) = handle {
        params.insert("lockHandle".to_string(), h.to_string());
    }
    if let Some(corr) = transport {
        params.insert("corrNr".to_string(), corr.to_string());
    }
    bridge
        .put(
            &format!("{}/source/main", object_path),
            source,
            "text/plain; charset=utf-8",
            "text/plain",
            params,
        )
        .await?;
    Ok(())
}

/// Activate an object by URI, making its latest source the live version.
pub async fn activate(
    bridge: &dyn BridgeTransport,
    uri: &str,
    name: &str,
) -> Result<(), BridgeError> {
    let body = payloads::activation_xml(uri, name);
    let mut params = HashMap::new();
    params.insert("method".to_string(), "activate".to_string());
    params.insert("preauditRequested".to_string(), "true".to_string());
    bridge
        .post(
            paths::ACTIVATION_PATH,
            &body,
            "application/xml",
            "application/xml",
            params,
        )
        .await?;
    Ok(())
}

/// Run the full mutation sequence against an existing object.
///
/// # Errors
///
/// - lock failure: returned as-is, nothing was changed
/// - write failure: returned after the unlock has run
/// - unlock failure after a successful write: returned, the source may
///   already be persisted
/// - activation failure: [`AdtError::PartialMutation`], the source is
///   persisted but not active
pub async fn write_source_and_activate(
    bridge: &dyn BridgeTransport,
    object_path: &str,
    object_name: &str,
    source: &str,
    transport: Option<&str>,
) -> Result<(), AdtError> {
    let handle = lock(bridge, object_path, transport).await?;
    if handle.is_none() {
        output::warn(format!(
            "lock on {} returned no handle; continuing without one",
            object_path
        ));
    }

    let write_result =
        write_source(bridge, object_path, source, handle.as_deref(), transport).await;
    let unlock_result = unlock(bridge, object_path, handle.as_deref()).await;

    match (write_result, unlock_result) {
        (Err(write_err), Err(unlock_err)) => {
            // The write error is the actionable one; the unlock error
            // must not mask it.
            output::warn(format!(
                "unlock of {} failed after write error: {}",
                object_path, unlock_err
            ));
            Err(write_err.into())
        }
        (Err(write_err), Ok(())) => Err(write_err.into()),
        (Ok(()), Err(unlock_err)) => Err(unlock_err.into()),
        (Ok(()), Ok(())) => activate(bridge, object_path, object_name)
            .await
            .map_err(|e| AdtError::PartialMutation {
                name: object_name.to_string(),
                source: e,
            }),
    }
}
