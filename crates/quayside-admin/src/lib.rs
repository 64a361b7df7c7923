//! # Quayside Admin
//!
//! The management-plane boundary for destination provisioning:
//!
//! - **ManagementChannel / ChannelFactory**: request/reply seam to a broker's
//!   administrative endpoint, distinct from the data-plane connection
//! - **DestinationProvisioner**: issues the create/destroy operations for one
//!   [`DestinationSpec`](quayside_core::DestinationSpec) and classifies the
//!   outcome as created / already-exists / failed
//!
//! Transports implement [`ManagementChannel`]; the provisioner never sees
//! sockets, only replies.

pub mod channel;
pub mod provisioner;

pub use channel::{AdminReply, AdminRequest, AdminValue, ChannelFactory, ManagementChannel};
pub use provisioner::{DestinationProvisioner, ProvisioningOutcome};
