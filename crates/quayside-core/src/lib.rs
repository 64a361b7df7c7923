//! # Quayside Core
//!
//! Core value objects for provisioning messaging destinations on an external
//! broker's management plane:
//!
//! - **DestinationSpec**: immutable description of a queue or topic to provision
//! - **Endpoint**: opaque connection descriptor for one broker node
//! - **AdminCredentials**: credentials for the administrative session
//! - **ReplyClassifier**: maps management replies onto success / already-exists /
//!   rejected, driven by configurable diagnostic code lists
//!
//! Everything here is plain data: no I/O, no runtime. The management channel
//! and the provisioning logic live in `quayside-admin`; topology handling and
//! lifecycle coordination live in `quayside-cluster`.

pub mod auth;
pub mod classify;
pub mod destination;
pub mod endpoint;
pub mod error;

pub use auth::{AdminCredentials, SensitiveString};
pub use classify::{AdminOp, Classification, ReplyClassifier};
pub use destination::{DestinationKind, DestinationSpec, RoutingType};
pub use endpoint::Endpoint;
pub use error::{AdminError, Result};
