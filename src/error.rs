//! Error types for the bookery data layer.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors for repository and adapter operations
//! - `Result<T>`: Type alias for Results using AppError
//!
//! Repository methods never panic past their boundary; every outcome is
//! delivered through the returned `Result`. Malformed stored records found
//! during list fetches are logged and skipped rather than surfaced here.

use thiserror::Error;

/// Domain-specific errors for data-layer operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required identifiers missing, detected before any remote call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote store or network failure
    #[error("Remote failure: {0}")]
    Remote(String),

    /// Mutation attempted by a user who does not own the record
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A referenced document is absent where one is required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a remote-failure error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for failures that originated in the remote store or the network.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
