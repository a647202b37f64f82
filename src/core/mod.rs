//! core
//!
//! Core domain rules for abaplink.
//!
//! # Modules
//!
//! - [`naming`] - Object naming rules: customer-namespace normalization and limits
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Naming rules run before any network call; invalid names never leave the process
//! - Configuration is optional everywhere; abaplink works with zero config files

pub mod config;
pub mod naming;
