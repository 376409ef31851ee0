//! Common types and utilities shared across pagesum crates.
//!
//! This crate holds the error taxonomy surfaced at the process boundary and
//! the observability helpers every binary and integration test uses. It is
//! dependency-light so the fetcher, extractor and binary can all depend on it.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PagesumError`] and [`Result`]: Shared error handling
//! - [`Limits`]: Per-list caps shared by the config schema and the summary
//!
//! # Examples
//!
//! ```rust
//! use pagesum_common::PagesumError;
//!
//! let err = PagesumError::Network("connection refused".into());
//! assert_eq!(err.to_string(), "Network error: connection refused");
//! ```
use std::path::PathBuf;

mod limits;
pub mod observability;

pub use limits::Limits;

/// Error types used across the pagesum workspace.
///
/// Malformed markup is deliberately absent: the extractor tolerates it and
/// simply yields fewer fields.
#[derive(thiserror::Error, Debug)]
pub enum PagesumError {
    /// The page could not be fetched (connect, DNS, timeout or HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// The raw page snapshot could not be persisted.
    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`PagesumError`].
pub type Result<T> = std::result::Result<T, PagesumError>;
