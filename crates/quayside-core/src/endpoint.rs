//! Broker connection descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque connection descriptor for one broker node's management endpoint.
///
/// Topology feeds hand these out per member (primary and optional backup);
/// static configuration lists them upfront. The descriptor format is owned by
/// the transport that opens the channel, typically `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Create an endpoint from a connection descriptor string
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self(descriptor.into())
    }

    /// The raw connection descriptor
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let ep = Endpoint::new("broker-1:61616");
        assert_eq!(ep.to_string(), "broker-1:61616");
        assert_eq!(ep.as_str(), "broker-1:61616");
    }

    #[test]
    fn test_endpoint_serde_transparent() {
        let ep: Endpoint = serde_json::from_str("\"broker-1:61616\"").unwrap();
        assert_eq!(ep, Endpoint::from("broker-1:61616"));
        assert_eq!(serde_json::to_string(&ep).unwrap(), "\"broker-1:61616\"");
    }
}
