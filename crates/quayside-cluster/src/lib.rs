//! # Quayside Cluster
//!
//! Topology-aware provisioning coordination for external clustered brokers:
//!
//! - **TopologyWatcher**: replay-then-live stream of cluster membership events
//! - **ProvisioningCoordinator**: provisions one destination on every current
//!   and future topology member, idempotently and best-effort
//! - **ActivationLifecycleController**: bridges broker activation callbacks to
//!   a dependent management façade, with a bounded deactivation handshake
//!
//! ## Operating Modes
//!
//! - **Static**: a fixed endpoint list, provisioned exactly once at startup
//! - **Discovery**: a topology locator feeds member-up/member-down events;
//!   provisioning follows the topology as it converges
//!
//! Provisioning failures are logged and non-fatal: one unreachable member
//! must not prevent the owning service from starting, and retries ride on
//! the next topology event rather than an internal timer.

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod topology;

pub use config::{CoordinatorConfig, LifecycleConfig};
pub use coordinator::{ProvisioningCoordinator, TopologySource};
pub use dispatch::{BoundedExecutor, Executor, Task, TokioSpawner};
pub use error::{CoordinationError, Result};
pub use lifecycle::{
    ActivationLifecycleController, ActivationMarker, ActivationState, MarkerRegistry,
};
pub use topology::{NodeId, TopologyEvent, TopologyLocator, TopologyMember, TopologyWatcher};
