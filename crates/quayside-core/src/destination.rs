//! Destination specifications
//!
//! A [`DestinationSpec`] describes one logical destination (queue or topic) to
//! provision on an external broker. It is created once from configuration and
//! never mutated afterwards; all provisioning attempts for that destination
//! share it read-only.

use crate::auth::AdminCredentials;
use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};

/// Default management address on ActiveMQ Artemis brokers
pub const DEFAULT_MANAGEMENT_ADDRESS: &str = "activemq.management";

/// Kind of destination to provision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    /// Point-to-point: one address backed by one queue
    Queue,
    /// Publish-subscribe: one multicast address, subscriptions created lazily
    /// by consumers
    Topic,
}

/// Routing semantics of the backing address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutingType {
    /// Point-to-point delivery
    Anycast,
    /// Fan-out delivery
    Multicast,
}

impl RoutingType {
    /// Wire name used in management operation parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingType::Anycast => "ANYCAST",
            RoutingType::Multicast => "MULTICAST",
        }
    }
}

/// Immutable description of a destination to provision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationSpec {
    /// Destination (and backing address) name
    pub name: String,
    /// Queue or topic
    pub kind: DestinationKind,
    /// Whether the queue survives broker restarts (queues only; topics keep
    /// durability per subscription)
    pub durable: bool,
    /// Optional filter expression applied to the queue binding (queues only)
    pub selector: Option<String>,
    /// Address the management session sends requests to
    pub management_address: String,
    /// Credentials for the administrative connection
    pub credentials: Option<AdminCredentials>,
}

impl DestinationSpec {
    /// Start building a durable queue spec
    pub fn queue(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DestinationKind::Queue,
            durable: true,
            selector: None,
            management_address: DEFAULT_MANAGEMENT_ADDRESS.to_string(),
            credentials: None,
        }
    }

    /// Start building a topic spec
    pub fn topic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DestinationKind::Topic,
            durable: false,
            selector: None,
            management_address: DEFAULT_MANAGEMENT_ADDRESS.to_string(),
            credentials: None,
        }
    }

    /// Set queue durability
    pub fn durable(mut self, durable: bool) -> Self {
        self.durable = durable;
        self
    }

    /// Set the queue filter expression
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Override the management address
    pub fn management_address(mut self, address: impl Into<String>) -> Self {
        self.management_address = address.into();
        self
    }

    /// Attach administrative credentials
    pub fn credentials(mut self, credentials: AdminCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Routing type of the backing address
    pub fn routing_type(&self) -> RoutingType {
        match self.kind {
            DestinationKind::Queue => RoutingType::Anycast,
            DestinationKind::Topic => RoutingType::Multicast,
        }
    }

    /// Validate internal consistency of the spec
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(AdminError::InvalidConfig(
                "destination name must not be empty".into(),
            ));
        }
        if self.kind == DestinationKind::Topic && self.selector.is_some() {
            return Err(AdminError::InvalidConfig(format!(
                "topic '{}' cannot carry a selector; filters apply to queue bindings only",
                self.name
            )));
        }
        Ok(())
    }
}
