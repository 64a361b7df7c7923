//! Activation lifecycle bridging
//!
//! The external broker reports its own activation transitions through
//! callbacks whose timing the host does not control. This module bridges
//! those callbacks to a container-managed *activation marker*, the unit of
//! work whose presence signals that broker-dependent features are safe to
//! use. Two races are prevented:
//!
//! - the dependent façade starting before the broker finished activating
//! - the broker completing failover while dependent resources are still
//!   mid-teardown
//!
//! Deactivation blocks on a one-shot removal signal bounded by a timeout:
//! strict ordering is preferred, but an unresponsive container must not hang
//! shutdown forever, so past the bound the controller proceeds with a
//! warning.

use crate::config::LifecycleConfig;
use crate::error::{CoordinationError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Lifecycle state of the activation bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    /// Broker not yet activated, no marker installed
    Inactive,
    /// Broker activation callback in progress
    Activating,
    /// Marker installed and active
    Active,
    /// Waiting for the marker removal handshake
    Deactivating,
    /// Marker fully removed
    Removed,
}

/// Container-managed activation marker service
#[async_trait]
pub trait ActivationMarker: Send + Sync {
    /// Whether the marker is currently active (not dormant from a prior
    /// failover/failback cycle)
    async fn is_active(&self) -> bool;

    /// Reactivate a dormant marker
    async fn activate(&self) -> Result<()>;

    /// Ask the container to remove the marker. The returned receiver fires
    /// once the container reports the marker fully removed.
    async fn request_removal(&self) -> oneshot::Receiver<()>;
}

/// Container seam that installs the activation marker
#[async_trait]
pub trait MarkerRegistry: Send + Sync {
    /// Install and activate the marker service
    async fn install(&self) -> Result<Arc<dyn ActivationMarker>>;
}

struct Inner {
    state: ActivationState,
    marker: Option<Arc<dyn ActivationMarker>>,
}

/// Bridges broker activation callbacks to the activation marker lifecycle
///
/// `on_activated` and `on_deactivating` are invoked from the broker's own
/// lifecycle threads, potentially concurrently with the container acting on
/// the marker; all state lives behind one lock, and the marker reference is
/// re-read under that lock after the blocking wait rather than cached across
/// it.
pub struct ActivationLifecycleController {
    registry: Arc<dyn MarkerRegistry>,
    removal_timeout: Duration,
    inner: Mutex<Inner>,
}

impl ActivationLifecycleController {
    pub fn new(registry: Arc<dyn MarkerRegistry>, config: LifecycleConfig) -> Self {
        Self {
            registry,
            removal_timeout: config.removal_timeout,
            inner: Mutex::new(Inner {
                state: ActivationState::Inactive,
                marker: None,
            }),
        }
    }

    /// Current lifecycle state
    pub async fn state(&self) -> ActivationState {
        self.inner.lock().await.state
    }

    /// Broker finished activating.
    ///
    /// Installs the marker on first activation; a dormant marker left by a
    /// failover-then-failback cycle is reactivated, never installed twice.
    pub async fn on_activated(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.state = ActivationState::Activating;

        match &inner.marker {
            Some(marker) if !marker.is_active().await => {
                marker.activate().await?;
                info!("reactivated dormant activation marker");
            }
            Some(_) => {
                debug!("activation marker already active");
            }
            None => match self.registry.install().await {
                Ok(marker) => {
                    inner.marker = Some(marker);
                    info!("installed activation marker");
                }
                Err(e) => {
                    // back to Inactive so the broker's next activation
                    // callback retries the install from a clean state
                    inner.state = ActivationState::Inactive;
                    return Err(CoordinationError::MarkerInstall(e.to_string()));
                }
            },
        }

        inner.state = ActivationState::Active;
        Ok(())
    }

    /// Broker is deactivating (shutdown or failover).
    ///
    /// Blocks until the container reports the marker removed, bounded by the
    /// configured timeout; past the bound deactivation proceeds with a
    /// warning. Calls with no active marker are no-ops.
    pub async fn on_deactivating(&self) {
        let (marker, removal) = {
            let mut inner = self.inner.lock().await;
            if inner.state == ActivationState::Deactivating {
                debug!("deactivation already in progress");
                return;
            }
            let marker = match &inner.marker {
                Some(marker) => marker.clone(),
                None => {
                    debug!("deactivate without an installed marker; nothing to do");
                    inner.state = ActivationState::Inactive;
                    return;
                }
            };
            if !marker.is_active().await {
                debug!("deactivate with dormant marker; nothing to do");
                inner.state = ActivationState::Inactive;
                return;
            }
            inner.state = ActivationState::Deactivating;
            let removal = marker.request_removal().await;
            (marker, removal)
        };

        match timeout(self.removal_timeout, removal).await {
            Ok(Ok(())) => debug!("activation marker removed"),
            Ok(Err(_)) => warn!("marker removal signal dropped before completion"),
            Err(_) => {
                let err = CoordinationError::HandshakeTimeout {
                    timeout: self.removal_timeout,
                };
                warn!(error = %err, "proceeding with deactivation");
            }
        }

        // re-read under the lock: a failback may have reactivated the marker
        // while we were blocked, and that activation must win over this
        // stale deactivation tail
        let mut inner = self.inner.lock().await;
        let same_marker = inner
            .marker
            .as_ref()
            .map_or(false, |current| Arc::ptr_eq(current, &marker));
        if inner.state == ActivationState::Deactivating && same_marker {
            inner.marker = None;
            inner.state = ActivationState::Removed;
        } else {
            debug!("activation superseded the removal wait; leaving state intact");
        }
    }
}
