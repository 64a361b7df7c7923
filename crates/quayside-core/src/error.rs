//! Management-plane error types

use thiserror::Error;

/// Result type for management-plane operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// Errors from administrative calls against a broker
#[derive(Debug, Error)]
pub enum AdminError {
    // ==================== Transport Errors ====================
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("management channel closed")]
    ChannelClosed,

    // ==================== Broker Rejections ====================
    #[error("{operation} rejected for '{resource}': {body}")]
    Rejected {
        operation: String,
        resource: String,
        body: String,
    },

    #[error("malformed management reply for {operation}: {body}")]
    MalformedReply { operation: String, body: String },

    // ==================== Configuration Errors ====================
    #[error("invalid destination configuration: {0}")]
    InvalidConfig(String),
}

impl AdminError {
    /// Check if a retry against the same node could succeed later
    pub fn is_retriable(&self) -> bool {
        matches!(self, AdminError::Transport(_) | AdminError::ChannelClosed)
    }

    /// The diagnostic body carried by a broker rejection, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            AdminError::Rejected { body, .. } | AdminError::MalformedReply { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for AdminError {
    fn from(e: std::io::Error) -> Self {
        AdminError::Transport(e.to_string())
    }
}
