//! core::naming
//!
//! Object naming rules for the customer namespace.
//!
//! # Rules
//!
//! The remote repository only accepts customer objects whose names live in
//! the reserved namespace: uppercase, starting with `Z` or `Y`. Names are
//! normalized here, before any request is issued:
//!
//! - Uppercase the whole name
//! - Prefix with `Z` unless the name already starts with `Z` or `Y`
//!
//! Function group names are additionally capped at [`GROUP_NAME_LIMIT`]
//! characters. An explicit group name over the limit is rejected; a group
//! name derived from a function module name is truncated to the limit
//! instead (the derivation is a convenience fallback, not caller intent).

use thiserror::Error;

/// Maximum length of a function group name accepted by the remote system.
pub const GROUP_NAME_LIMIT: usize = 26;

/// Errors from name validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("{kind} name '{name}' is too long: {len} characters, limit is {limit}")]
    NameTooLong {
        kind: &'static str,
        name: String,
        len: usize,
        limit: usize,
    },

    #[error("{kind} name cannot be empty")]
    Empty { kind: &'static str },
}

/// Normalize an object name into the customer namespace.
///
/// # Example
///
/// ```
/// use abaplink::core::naming::normalize_object_name;
///
/// assert_eq!(normalize_object_name("foo"), "ZFOO");
/// assert_eq!(normalize_object_name("Ybar"), "YBAR");
/// assert_eq!(normalize_object_name("z_report"), "Z_REPORT");
/// ```
pub fn normalize_object_name(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    if upper.starts_with('Z') || upper.starts_with('Y') {
        upper
    } else {
        format!("Z{}", upper)
    }
}

/// Normalize and validate an explicitly supplied function group name.
///
/// # Errors
///
/// Returns `NamingError::NameTooLong` if the normalized name exceeds
/// [`GROUP_NAME_LIMIT`], or `NamingError::Empty` for a blank input.
/// Rejection happens here, before any network call is made.
pub fn normalize_group_name(name: &str) -> Result<String, NamingError> {
    if name.trim().is_empty() {
        return Err(NamingError::Empty {
            kind: "function group",
        });
    }
    let normalized = normalize_object_name(name);
    if normalized.chars().count() > GROUP_NAME_LIMIT {
        return Err(NamingError::NameTooLong {
            kind: "function group",
            len: normalized.chars().count(),
            name: normalized,
            limit: GROUP_NAME_LIMIT,
        });
    }
    Ok(normalized)
}

/// Derive a function group name from a function module name.
///
/// Used when the caller supplies a module but no group. Truncation to the
/// limit is the defined fallback here, unlike explicit group names which
/// are rejected when too long.
///
/// # Example
///
/// ```
/// use abaplink::core::naming::derive_group_name;
///
/// assert_eq!(derive_group_name("Z_GET_MATERIALS"), "Z_GET_MATERIALS");
/// ```
pub fn derive_group_name(module_name: &str) -> String {
    normalize_object_name(module_name)
        .chars()
        .take(GROUP_NAME_LIMIT)
        .collect()
}
