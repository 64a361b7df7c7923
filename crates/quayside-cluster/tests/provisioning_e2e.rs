//! End-to-end provisioning scenarios against a simulated clustered broker
//!
//! The simulation keeps real per-endpoint address/queue state and answers
//! with the broker's conflict codes, so idempotent convergence is exercised
//! for real rather than scripted.

use async_trait::async_trait;
use quayside_admin::{AdminReply, AdminRequest, ChannelFactory, ManagementChannel};
use quayside_cluster::{
    CoordinatorConfig, ProvisioningCoordinator, TopologyEvent, TopologyLocator, TopologyMember,
    TopologySource,
};
use quayside_core::{AdminCredentials, AdminError, AdminOp, DestinationSpec, Endpoint};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[derive(Default)]
struct ClusterState {
    addresses: HashSet<(String, String)>,
    queues: HashSet<(String, String)>,
    calls: Vec<(String, &'static str)>,
    rejecting: HashSet<String>,
}

#[derive(Default)]
struct SimCluster {
    state: Arc<Mutex<ClusterState>>,
}

impl SimCluster {
    /// Pre-seed an endpoint as already converged for `name`
    fn converge(&self, endpoint: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .addresses
            .insert((endpoint.to_string(), name.to_string()));
        state.queues.insert((endpoint.to_string(), name.to_string()));
    }

    /// Make an endpoint reject every creation (e.g. a security failure)
    fn reject_all(&self, endpoint: &str) {
        self.state
            .lock()
            .unwrap()
            .rejecting
            .insert(endpoint.to_string());
    }

    fn calls(&self) -> Vec<(String, &'static str)> {
        self.state.lock().unwrap().calls.clone()
    }
}

struct SimChannel {
    endpoint: String,
    state: Arc<Mutex<ClusterState>>,
}

#[async_trait]
impl ManagementChannel for SimChannel {
    async fn request(&mut self, request: AdminRequest) -> quayside_core::Result<AdminReply> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((self.endpoint.clone(), request.op.as_str()));
        if state.rejecting.contains(&self.endpoint) {
            return Ok(AdminReply::rejected("AMQ229031: Unable to validate user"));
        }
        let key = (self.endpoint.clone(), request.resource.clone());
        let reply = match request.op {
            AdminOp::CreateAddress => {
                if state.addresses.insert(key) {
                    AdminReply::ok()
                } else {
                    AdminReply::rejected("AMQ229204: Address already exists")
                }
            }
            AdminOp::CreateQueue => {
                if state.queues.insert(key) {
                    AdminReply::ok()
                } else {
                    AdminReply::rejected("AMQ229019: Queue already exists")
                }
            }
            AdminOp::DestroyQueue => {
                if state.queues.remove(&key) {
                    AdminReply::ok()
                } else {
                    AdminReply::rejected("AMQ229017: Queue does not exist")
                }
            }
            AdminOp::DeleteAddress => {
                if state.addresses.remove(&key) {
                    AdminReply::ok()
                } else {
                    AdminReply::rejected("AMQ229203: Address does not exist")
                }
            }
        };
        Ok(reply)
    }

    async fn close(&mut self) {}
}

#[async_trait]
impl ChannelFactory for SimCluster {
    async fn open(
        &self,
        endpoint: &Endpoint,
        _management_address: &str,
        _credentials: Option<&AdminCredentials>,
    ) -> Result<Box<dyn ManagementChannel>, AdminError> {
        Ok(Box::new(SimChannel {
            endpoint: endpoint.as_str().to_string(),
            state: self.state.clone(),
        }))
    }
}

struct SimLocator {
    members: RwLock<Vec<TopologyMember>>,
    events: broadcast::Sender<TopologyEvent>,
}

impl SimLocator {
    fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            members: RwLock::new(Vec::new()),
            events,
        })
    }

    async fn member_up(&self, member: TopologyMember) {
        self.members.write().await.push(member.clone());
        let _ = self.events.send(TopologyEvent::MemberUp(member));
    }
}

#[async_trait]
impl TopologyLocator for SimLocator {
    async fn current_members(&self) -> Vec<TopologyMember> {
        self.members.read().await.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<TopologyEvent> {
        self.events.subscribe()
    }
}

async fn wait_until(mut pred: impl FnMut() -> bool) {
    for _ in 0..400 {
        if pred() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within 2s");
}

#[tokio::test]
async fn test_orders_queue_follows_topology_convergence() {
    init_tracing();

    let cluster = Arc::new(SimCluster::default());
    let locator = SimLocator::new();
    let coordinator = ProvisioningCoordinator::new(
        DestinationSpec::queue("orders").durable(true),
        TopologySource::Discovery(locator.clone()),
        cluster.clone(),
        CoordinatorConfig::default(),
    );
    coordinator.start().await.unwrap();

    // node1 announces with no backup
    locator
        .member_up(TopologyMember::new("node1", "ep1:61616"))
        .await;
    wait_until(|| coordinator.provisioned_endpoints().len() == 1).await;

    // node2 announces later with a backup pair; its primary already converged
    cluster.converge("ep2:61616", "orders");
    locator
        .member_up(TopologyMember::new("node2", "ep2:61616").with_backup("ep2b:61616"))
        .await;
    wait_until(|| coordinator.provisioned_endpoints().len() == 3).await;

    let calls = cluster.calls();
    let expected: Vec<(String, &str)> = vec![
        ("ep1:61616".into(), "createAddress"),
        ("ep1:61616".into(), "createQueue"),
        ("ep2:61616".into(), "createAddress"),
        ("ep2:61616".into(), "createQueue"),
        ("ep2b:61616".into(), "createAddress"),
        ("ep2b:61616".into(), "createQueue"),
    ];
    assert_eq!(calls, expected);

    coordinator.stop();
}

#[tokio::test]
async fn test_rejected_member_does_not_block_its_siblings() {
    init_tracing();

    let cluster = Arc::new(SimCluster::default());
    cluster.reject_all("ep1:61616");
    let locator = SimLocator::new();
    locator
        .member_up(TopologyMember::new("node1", "ep1:61616"))
        .await;
    locator
        .member_up(TopologyMember::new("node2", "ep2:61616"))
        .await;

    let coordinator = ProvisioningCoordinator::new(
        DestinationSpec::queue("orders"),
        TopologySource::Discovery(locator.clone()),
        cluster.clone(),
        CoordinatorConfig::default(),
    );
    // a rejection on node1 is non-fatal to startup
    coordinator.start().await.unwrap();

    wait_until(|| {
        coordinator.provisioned_endpoints() == vec![Endpoint::from("ep2:61616")]
    })
    .await;

    coordinator.stop();
}

#[tokio::test]
async fn test_topic_provision_and_teardown_round() {
    init_tracing();

    let cluster = Arc::new(SimCluster::default());
    let coordinator = ProvisioningCoordinator::new(
        DestinationSpec::topic("prices"),
        TopologySource::Static(vec!["ep1:61616".into()]),
        cluster.clone(),
        CoordinatorConfig::default(),
    );
    coordinator.start().await.unwrap();
    assert_eq!(coordinator.provisioned_endpoints().len(), 1);

    let results = coordinator.teardown().await;
    assert_eq!(results.len(), 1);
    assert!(results[0].1.is_converged());

    let ops: Vec<&str> = cluster.calls().iter().map(|(_, op)| *op).collect();
    assert_eq!(ops, vec!["createAddress", "deleteAddress"]);
}
