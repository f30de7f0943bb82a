//! Common types and utilities shared across claimcheck crates.
//!
//! This crate holds the shared error type and the observability helpers used
//! by every binary and integration test in the workspace. It stays small so
//! that the transport, client, and UI crates can all depend on it freely.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`ClaimCheckError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use claimcheck_common::ClaimCheckError;
//!
//! let err = ClaimCheckError::Config("backend.base_url is empty".into());
//! assert_eq!(err.to_string(), "Configuration error: backend.base_url is empty");
//! ```

pub mod observability;

/// Error types used across the claimcheck workspace.
///
/// These cover invalid setup, caught before any check is issued. Outcomes of
/// a claim check (backend rejections, unreachable backend) are not errors at
/// this level; they settle into the session's `Failed` state instead.
#[derive(thiserror::Error, Debug)]
pub enum ClaimCheckError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ClaimCheckError`].
pub type Result<T> = std::result::Result<T, ClaimCheckError>;
