//! Config Merge Library
//!
//! Reads JSON and YAML configuration, resolves indirection tokens and
//! deep-merges partial configurations into one value.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
