//! Administrative request/reply channel
//!
//! A [`ManagementChannel`] is a short-lived session to one broker node's
//! management address. Requests carry an operation name, the target resource
//! and typed parameters; replies carry the broker's operation-succeeded flag
//! plus an optional diagnostic body. The transport's own call timeout bounds
//! each exchange; no second timeout layer is added here.

use async_trait::async_trait;
use quayside_core::{AdminCredentials, AdminOp, Endpoint, Result};

/// Typed parameter of a management operation
#[derive(Debug, Clone, PartialEq)]
pub enum AdminValue {
    Str(String),
    Bool(bool),
    Long(i64),
}

impl From<&str> for AdminValue {
    fn from(s: &str) -> Self {
        AdminValue::Str(s.to_string())
    }
}

impl From<String> for AdminValue {
    fn from(s: String) -> Self {
        AdminValue::Str(s)
    }
}

impl From<bool> for AdminValue {
    fn from(b: bool) -> Self {
        AdminValue::Bool(b)
    }
}

/// One management operation invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AdminRequest {
    /// Operation to invoke on the broker's management resource
    pub op: AdminOp,
    /// Resource the operation targets (address or queue name)
    pub resource: String,
    /// Operation parameters, in the order the broker expects them
    pub params: Vec<AdminValue>,
}

impl AdminRequest {
    pub fn new(op: AdminOp, resource: impl Into<String>, params: Vec<AdminValue>) -> Self {
        Self {
            op,
            resource: resource.into(),
            params,
        }
    }
}

/// Reply to a management request
#[derive(Debug, Clone, PartialEq)]
pub struct AdminReply {
    /// The broker's operation-succeeded flag
    pub success: bool,
    /// Diagnostic body; present on failure, sometimes on success
    pub body: Option<String>,
}

impl AdminReply {
    /// Successful reply without a body
    pub fn ok() -> Self {
        Self {
            success: true,
            body: None,
        }
    }

    /// Failed reply with a diagnostic body
    pub fn rejected(body: impl Into<String>) -> Self {
        Self {
            success: false,
            body: Some(body.into()),
        }
    }
}

/// Request/reply session to one broker node's administrative endpoint
///
/// An `Err` from [`request`](ManagementChannel::request) means the exchange
/// could not be completed (transport failure); a rejected operation is a
/// successful exchange with `success == false`.
#[async_trait]
pub trait ManagementChannel: Send {
    /// Perform one request/reply exchange
    async fn request(&mut self, request: AdminRequest) -> Result<AdminReply>;

    /// Close the session. Idempotent; failures are the transport's to log.
    async fn close(&mut self);
}

/// Opens short-lived management channels to broker nodes
#[async_trait]
pub trait ChannelFactory: Send + Sync {
    /// Open an administrative session to `endpoint`, targeting
    /// `management_address`, authenticating with `credentials` when present
    async fn open(
        &self,
        endpoint: &Endpoint,
        management_address: &str,
        credentials: Option<&AdminCredentials>,
    ) -> Result<Box<dyn ManagementChannel>>;
}
