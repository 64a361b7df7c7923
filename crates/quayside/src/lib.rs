//! # Quayside
//!
//! Management-plane companion for external message brokers: provisions
//! queues and topics across a clustered broker topology and bridges the
//! broker's activation lifecycle to a dependent management façade.
//!
//! This crate is a unified API over the Quayside ecosystem, re-exporting the
//! commonly used types from [`quayside_core`], [`quayside_admin`] and
//! [`quayside_cluster`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quayside::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let spec = DestinationSpec::queue("orders").durable(true);
//!
//!     // channels: your transport's ChannelFactory implementation
//!     let coordinator = ProvisioningCoordinator::new(
//!         spec,
//!         TopologySource::Static(vec!["broker-1:61616".into()]),
//!         channels,
//!         CoordinatorConfig::default(),
//!     );
//!     coordinator.start().await?;
//!
//!     // later, explicit teardown
//!     for (endpoint, outcome) in coordinator.teardown().await {
//!         println!("{endpoint}: {outcome:?}");
//!     }
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

// Re-export the component crates
pub use quayside_admin as admin;
pub use quayside_cluster as cluster;
pub use quayside_core as core;

/// Destination specifications and reply classification.
pub mod destination {
    pub use quayside_core::destination::*;
}

/// Management channel and provisioner.
pub mod provision {
    pub use quayside_admin::channel::*;
    pub use quayside_admin::provisioner::*;
}

/// Topology watching and coordination.
pub mod topology {
    pub use quayside_cluster::coordinator::*;
    pub use quayside_cluster::topology::*;
}

/// Activation lifecycle bridging.
pub mod lifecycle {
    pub use quayside_cluster::lifecycle::*;
}

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use quayside_admin::{
        AdminReply, AdminRequest, AdminValue, ChannelFactory, DestinationProvisioner,
        ManagementChannel, ProvisioningOutcome,
    };
    pub use quayside_cluster::{
        ActivationLifecycleController, ActivationMarker, ActivationState, CoordinatorConfig,
        LifecycleConfig, MarkerRegistry, ProvisioningCoordinator, TopologyEvent, TopologyLocator,
        TopologyMember, TopologySource, TopologyWatcher,
    };
    pub use quayside_core::{
        AdminCredentials, AdminError, AdminOp, Classification, DestinationKind, DestinationSpec,
        Endpoint, ReplyClassifier, RoutingType,
    };
}
