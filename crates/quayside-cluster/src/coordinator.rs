//! Topology provisioning coordination
//!
//! Wires the topology event stream to the destination provisioner for a
//! single [`DestinationSpec`]:
//!
//! - **Static mode**: a fixed endpoint list, provisioned exactly once,
//!   synchronously, during [`start`](ProvisioningCoordinator::start)
//! - **Discovery mode**: members are provisioned as the topology announces
//!   them, primaries before their backups, nodes independently of each other
//!
//! Provisioning is best effort and eventually consistent across topology
//! convergence: a failed member attempt is logged, the endpoint returns to
//! the unprovisioned state, and the retry rides on the next topology event
//! (a recovering broker re-announces itself). `start` never fails because a
//! member was unreachable; only invalid configuration is a startup error.

use crate::config::CoordinatorConfig;
use crate::dispatch::{execute_or_run, Executor, Task, TokioSpawner};
use crate::error::{CoordinationError, Result};
use crate::topology::{NodeId, TopologyEvent, TopologyLocator, TopologyMember, TopologyWatcher};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use quayside_admin::{ChannelFactory, DestinationProvisioner, ProvisioningOutcome};
use quayside_core::{DestinationSpec, Endpoint};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Where the coordinator learns about broker endpoints; chosen once at
/// construction
pub enum TopologySource {
    /// Fixed, non-empty endpoint set, no discovery
    Static(Vec<Endpoint>),
    /// Cluster membership feed
    Discovery(Arc<dyn TopologyLocator>),
}

/// Per-endpoint provisioning state; absence means unprovisioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointState {
    InFlight,
    Provisioned,
}

struct Inner {
    spec: DestinationSpec,
    provisioner: DestinationProvisioner,
    channels: Arc<dyn ChannelFactory>,
    states: DashMap<Endpoint, EndpointState>,
    members: DashMap<NodeId, TopologyMember>,
}

impl Inner {
    /// Provision the destination on one endpoint through a short-lived
    /// administrative channel, closed regardless of outcome.
    async fn provision_endpoint(&self, endpoint: Endpoint) {
        match self.states.entry(endpoint.clone()) {
            Entry::Occupied(_) => {
                debug!(endpoint = %endpoint, "endpoint already provisioned or in flight");
                return;
            }
            Entry::Vacant(vacant) => {
                vacant.insert(EndpointState::InFlight);
            }
        }

        let spec = &self.spec;
        let outcome = match self
            .channels
            .open(&endpoint, &spec.management_address, spec.credentials.as_ref())
            .await
        {
            Ok(mut channel) => {
                let outcome = self.provisioner.provision(spec, channel.as_mut()).await;
                channel.close().await;
                outcome
            }
            Err(e) => ProvisioningOutcome::Failed(e),
        };

        match outcome {
            ProvisioningOutcome::Created => {
                info!(destination = %spec.name, endpoint = %endpoint, "destination provisioned");
                self.states.insert(endpoint, EndpointState::Provisioned);
            }
            ProvisioningOutcome::AlreadyExists => {
                debug!(destination = %spec.name, endpoint = %endpoint, "destination already present");
                self.states.insert(endpoint, EndpointState::Provisioned);
            }
            ProvisioningOutcome::Failed(e) => {
                warn!(
                    destination = %spec.name,
                    endpoint = %endpoint,
                    error = %e,
                    "provisioning failed; awaiting next topology event to retry"
                );
                self.states.remove(&endpoint);
            }
        }
    }

    /// Provision one announced member: primary first, then the backup as an
    /// independent attempt. Backups lag their primaries, so already-exists
    /// rejections there are expected once they fail over.
    async fn provision_member(&self, member: TopologyMember) {
        self.members.insert(member.node_id.clone(), member.clone());
        self.provision_endpoint(member.primary.clone()).await;
        if let Some(backup) = member.backup {
            self.provision_endpoint(backup).await;
        }
    }

    /// A departed node keeps its destinations; only its local provisioning
    /// state is dropped so a recovered node is provisioned afresh.
    fn member_down(&self, node_id: &str) {
        if let Some((_, member)) = self.members.remove(node_id) {
            for endpoint in member.endpoints() {
                self.states.remove(endpoint);
            }
        }
        info!(node_id, "member left; destinations retained");
    }

    async fn deprovision_endpoint(&self, endpoint: &Endpoint) -> ProvisioningOutcome {
        let spec = &self.spec;
        let outcome = match self
            .channels
            .open(endpoint, &spec.management_address, spec.credentials.as_ref())
            .await
        {
            Ok(mut channel) => {
                let outcome = self.provisioner.deprovision(spec, channel.as_mut()).await;
                channel.close().await;
                outcome
            }
            Err(e) => ProvisioningOutcome::Failed(e),
        };
        match &outcome {
            ProvisioningOutcome::Failed(e) => {
                warn!(destination = %spec.name, endpoint = %endpoint, error = %e, "teardown failed");
            }
            _ => {
                info!(destination = %spec.name, endpoint = %endpoint, "destination removed");
                self.states.remove(endpoint);
            }
        }
        outcome
    }
}

/// Provisions one destination across a broker topology
pub struct ProvisioningCoordinator {
    inner: Arc<Inner>,
    source: TopologySource,
    executor: Arc<dyn Executor>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ProvisioningCoordinator {
    pub fn new(
        spec: DestinationSpec,
        source: TopologySource,
        channels: Arc<dyn ChannelFactory>,
        config: CoordinatorConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(Inner {
                spec,
                provisioner: DestinationProvisioner::new(config.classifier),
                channels,
                states: DashMap::new(),
                members: DashMap::new(),
            }),
            source,
            executor: Arc::new(TokioSpawner),
            shutdown_tx,
        }
    }

    /// Replace the default spawner with a host-supplied executor
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// The destination this coordinator owns
    pub fn spec(&self) -> &DestinationSpec {
        &self.inner.spec
    }

    /// Start provisioning.
    ///
    /// Static mode provisions every configured endpoint before returning;
    /// discovery mode subscribes and returns once the event driver is
    /// running. Member failures in either mode are logged, not returned.
    pub async fn start(&self) -> Result<()> {
        self.inner.spec.validate()?;

        match &self.source {
            TopologySource::Static(endpoints) => {
                if endpoints.is_empty() {
                    return Err(CoordinationError::InvalidConfig(
                        "static mode requires at least one endpoint".into(),
                    ));
                }
                for endpoint in endpoints {
                    self.inner.provision_endpoint(endpoint.clone()).await;
                }
                Ok(())
            }
            TopologySource::Discovery(locator) => {
                let mut events =
                    TopologyWatcher::spawn(locator.clone(), self.shutdown_tx.subscribe()).await;
                let inner = self.inner.clone();
                let executor = self.executor.clone();
                let mut shutdown = self.shutdown_tx.subscribe();

                tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            _ = shutdown.recv() => break,
                            event = events.recv() => match event {
                                Some(TopologyEvent::MemberUp(member)) => {
                                    let inner = inner.clone();
                                    let task: Task = Box::pin(async move {
                                        inner.provision_member(member).await;
                                    });
                                    execute_or_run(executor.as_ref(), task).await;
                                }
                                Some(TopologyEvent::MemberDown { node_id }) => {
                                    inner.member_down(&node_id);
                                }
                                None => break,
                            }
                        }
                    }
                    debug!("provisioning event driver stopped");
                });
                Ok(())
            }
        }
    }

    /// Stop watching the topology. Provisioned destinations stay on the
    /// brokers; only [`teardown`](Self::teardown) removes them.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Explicitly deprovision every endpoint currently marked provisioned,
    /// reporting the per-endpoint outcome for the caller to judge.
    pub async fn teardown(&self) -> Vec<(Endpoint, ProvisioningOutcome)> {
        let endpoints: Vec<Endpoint> = self
            .inner
            .states
            .iter()
            .filter(|entry| *entry.value() == EndpointState::Provisioned)
            .map(|entry| entry.key().clone())
            .collect();

        let mut results = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let outcome = self.inner.deprovision_endpoint(&endpoint).await;
            results.push((endpoint, outcome));
        }
        results
    }

    /// Endpoints on which the destination is currently known to exist
    pub fn provisioned_endpoints(&self) -> Vec<Endpoint> {
        self.inner
            .states
            .iter()
            .filter(|entry| *entry.value() == EndpointState::Provisioned)
            .map(|entry| entry.key().clone())
            .collect()
    }
}
