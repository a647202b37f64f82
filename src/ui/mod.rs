//! ui
//!
//! User interaction utilities.
//!
//! # Design
//!
//! All user-facing output goes through this module to ensure consistent
//! formatting and proper handling of quiet vs debug modes. Machine-readable
//! output (`--json`) is produced by the command handlers themselves.

pub mod output;
