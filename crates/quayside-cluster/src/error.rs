//! Coordination error types

use std::time::Duration;
use thiserror::Error;

/// Result type for coordination operations
pub type Result<T> = std::result::Result<T, CoordinationError>;

/// Errors from topology coordination and lifecycle bridging
#[derive(Debug, Error)]
pub enum CoordinationError {
    // ==================== Configuration Errors ====================
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ==================== Management-Plane Errors ====================
    #[error("administrative call failed: {0}")]
    Admin(#[from] quayside_core::AdminError),

    // ==================== Lifecycle Errors ====================
    #[error("marker removal not observed within {timeout:?}")]
    HandshakeTimeout { timeout: Duration },

    #[error("activation marker installation failed: {0}")]
    MarkerInstall(String),
}

impl CoordinationError {
    /// Check if the operation could succeed on a later topology event
    pub fn is_retriable(&self) -> bool {
        match self {
            CoordinationError::Admin(e) => e.is_retriable(),
            CoordinationError::HandshakeTimeout { .. } => false,
            CoordinationError::InvalidConfig(_) | CoordinationError::MarkerInstall(_) => false,
        }
    }
}
