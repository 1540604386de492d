//! # Common Components
//!
//! Shared utilities used by both binaries.
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing utilities
//! - [`logging`]: Logger initialisation

pub mod config;
pub mod logging;
