//! Destination provisioning against one broker node
//!
//! The provisioner drives a single [`ManagementChannel`] through the
//! create/destroy sequence for one destination:
//!
//! - queues: create-address (ANYCAST) then create-queue binding the address,
//!   honoring selector and durability
//! - topics: create-address (MULTICAST) only; subscriptions are created
//!   lazily by consumers
//!
//! Creation tolerates already-exists rejections (cluster members converge
//! independently, and backups replay the primary's state); deletion does not.

use crate::channel::{AdminReply, AdminRequest, AdminValue, ManagementChannel};
use quayside_core::{
    AdminError, AdminOp, Classification, DestinationKind, DestinationSpec, ReplyClassifier,
};
use tracing::debug;

/// Result of provisioning or deprovisioning one destination on one node
#[derive(Debug)]
pub enum ProvisioningOutcome {
    /// At least one administrative operation was applied by the broker
    Created,
    /// Every operation was rejected with a tolerated already-exists code
    AlreadyExists,
    /// An operation failed for a reason other than an existing resource
    Failed(AdminError),
}

impl ProvisioningOutcome {
    /// Whether the destination is usable on the node after this attempt
    pub fn is_converged(&self) -> bool {
        matches!(
            self,
            ProvisioningOutcome::Created | ProvisioningOutcome::AlreadyExists
        )
    }
}

/// Outcome of one create/destroy step, conflict already absorbed
enum StepOutcome {
    Applied,
    AlreadyExists,
}

/// Issues the administrative operations for one destination spec
#[derive(Debug, Clone, Default)]
pub struct DestinationProvisioner {
    classifier: ReplyClassifier,
}

impl DestinationProvisioner {
    pub fn new(classifier: ReplyClassifier) -> Self {
        Self { classifier }
    }

    /// Create the destination on the node behind `channel`.
    ///
    /// Address creation always runs before queue creation; the channel is the
    /// caller's to close, regardless of outcome.
    pub async fn provision(
        &self,
        spec: &DestinationSpec,
        channel: &mut dyn ManagementChannel,
    ) -> ProvisioningOutcome {
        if let Err(e) = spec.validate() {
            return ProvisioningOutcome::Failed(e);
        }

        let address = AdminRequest::new(
            AdminOp::CreateAddress,
            &spec.name,
            vec![
                AdminValue::from(spec.name.as_str()),
                AdminValue::from(spec.routing_type().as_str()),
            ],
        );
        let address_step = match self.run_step(channel, address).await {
            Ok(step) => step,
            Err(e) => return ProvisioningOutcome::Failed(e),
        };

        let queue_step = match spec.kind {
            DestinationKind::Topic => None,
            DestinationKind::Queue => {
                let queue = AdminRequest::new(
                    AdminOp::CreateQueue,
                    &spec.name,
                    vec![
                        AdminValue::from(spec.name.as_str()),
                        AdminValue::from(spec.routing_type().as_str()),
                        AdminValue::from(spec.name.as_str()),
                        AdminValue::from(spec.selector.clone().unwrap_or_default()),
                        AdminValue::from(spec.durable),
                    ],
                );
                match self.run_step(channel, queue).await {
                    Ok(step) => Some(step),
                    Err(e) => return ProvisioningOutcome::Failed(e),
                }
            }
        };

        match (address_step, queue_step) {
            (StepOutcome::AlreadyExists, None)
            | (StepOutcome::AlreadyExists, Some(StepOutcome::AlreadyExists)) => {
                ProvisioningOutcome::AlreadyExists
            }
            _ => ProvisioningOutcome::Created,
        }
    }

    /// Remove the destination from the node behind `channel`.
    ///
    /// `Created` here means the removal was applied. Deleting a resource that
    /// does not exist is reported as `Failed`; the caller decides whether an
    /// idempotent teardown can survive it.
    pub async fn deprovision(
        &self,
        spec: &DestinationSpec,
        channel: &mut dyn ManagementChannel,
    ) -> ProvisioningOutcome {
        if spec.kind == DestinationKind::Queue {
            let destroy = AdminRequest::new(
                AdminOp::DestroyQueue,
                &spec.name,
                vec![AdminValue::from(spec.name.as_str())],
            );
            if let Err(e) = self.run_step(channel, destroy).await {
                return ProvisioningOutcome::Failed(e);
            }
        }

        let delete = AdminRequest::new(
            AdminOp::DeleteAddress,
            &spec.name,
            vec![AdminValue::from(spec.name.as_str())],
        );
        match self.run_step(channel, delete).await {
            Ok(_) => ProvisioningOutcome::Created,
            Err(e) => ProvisioningOutcome::Failed(e),
        }
    }

    async fn run_step(
        &self,
        channel: &mut dyn ManagementChannel,
        request: AdminRequest,
    ) -> Result<StepOutcome, AdminError> {
        let op = request.op;
        let resource = request.resource.clone();
        let reply = channel.request(request).await?;
        self.interpret(op, &resource, reply)
    }

    fn interpret(
        &self,
        op: AdminOp,
        resource: &str,
        reply: AdminReply,
    ) -> Result<StepOutcome, AdminError> {
        if reply.success {
            debug!(operation = op.as_str(), resource, "management operation applied");
            return Ok(StepOutcome::Applied);
        }
        let body = match reply.body {
            Some(body) => body,
            // a failed reply without a diagnostic body cannot be classified
            None => {
                return Err(AdminError::MalformedReply {
                    operation: op.as_str().to_string(),
                    body: "<missing body>".to_string(),
                })
            }
        };
        match self.classifier.classify(op, false, &body) {
            Classification::Success => Ok(StepOutcome::Applied),
            Classification::AlreadyExists => {
                debug!(operation = op.as_str(), resource, "resource already exists");
                Ok(StepOutcome::AlreadyExists)
            }
            Classification::Rejected(body) => Err(AdminError::Rejected {
                operation: op.as_str().to_string(),
                resource: resource.to_string(),
                body,
            }),
        }
    }
}
