//! Coordination configuration

use quayside_core::ReplyClassifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`ProvisioningCoordinator`](crate::ProvisioningCoordinator)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Already-exists diagnostic code lists; versioned per broker release
    pub classifier: ReplyClassifier,
}

/// Configuration for an
/// [`ActivationLifecycleController`](crate::ActivationLifecycleController)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Bound on the deactivation handshake; once exceeded, deactivation
    /// proceeds with a warning instead of hanging shutdown
    pub removal_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            removal_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_removal_timeout() {
        assert_eq!(
            LifecycleConfig::default().removal_timeout,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_coordinator_config_default_codes() {
        let config = CoordinatorConfig::default();
        assert!(!config.classifier.address_exists_codes.is_empty());
        assert!(!config.classifier.queue_exists_codes.is_empty());
    }
}
