//! Cluster topology watching
//!
//! A [`TopologyLocator`] is the broker client's membership feed: a snapshot
//! query plus a live event subscription. [`TopologyWatcher`] turns the two
//! into one ordered stream with replay-then-live semantics: every member
//! already known at subscription time is delivered exactly once, before any
//! live event, so provisioning is never skipped by a lost startup race
//! between "subscribe" and "topology already populated".

use async_trait::async_trait;
use quayside_core::Endpoint;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

/// Unique broker node identifier within the cluster
pub type NodeId = String;

/// One node of a clustered broker, as announced by the topology feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyMember {
    /// Cluster-wide node identifier
    pub node_id: NodeId,
    /// Primary connection descriptor
    pub primary: Endpoint,
    /// Backup connection descriptor, when the node has a backup pair
    pub backup: Option<Endpoint>,
}

impl TopologyMember {
    pub fn new(node_id: impl Into<NodeId>, primary: impl Into<Endpoint>) -> Self {
        Self {
            node_id: node_id.into(),
            primary: primary.into(),
            backup: None,
        }
    }

    /// Attach a backup endpoint
    pub fn with_backup(mut self, backup: impl Into<Endpoint>) -> Self {
        self.backup = Some(backup.into());
        self
    }

    /// Primary endpoint first, then the backup when present
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        std::iter::once(&self.primary).chain(self.backup.as_ref())
    }
}

/// Cluster membership change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyEvent {
    /// A node joined (or re-announced itself to) the cluster
    MemberUp(TopologyMember),
    /// A node left the cluster
    MemberDown {
        /// Identifier of the departed node
        node_id: NodeId,
    },
}

/// Broker client-side locator exposing the cluster membership feed
#[async_trait]
pub trait TopologyLocator: Send + Sync {
    /// Members known to the locator right now
    async fn current_members(&self) -> Vec<TopologyMember>;

    /// Subscribe to live membership change events
    fn subscribe(&self) -> broadcast::Receiver<TopologyEvent>;
}

/// Replay-then-live membership event stream
pub struct TopologyWatcher;

impl TopologyWatcher {
    /// Subscribe to `locator` and return the merged event stream.
    ///
    /// Subscription happens before the snapshot query, so a member announced
    /// during the snapshot window is never lost; a member-up that raced the
    /// snapshot and is identical to its replayed entry is dropped while
    /// draining that window, and every later event passes through untouched
    /// (re-announcements are how failed members get retried). The watcher
    /// never tears itself down over a single member: consumer-side
    /// provisioning failures are the consumer's to log and survive.
    pub async fn spawn(
        locator: Arc<dyn TopologyLocator>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> mpsc::Receiver<TopologyEvent> {
        let (tx, rx) = mpsc::channel(64);

        let mut live = locator.subscribe();
        let snapshot = locator.current_members().await;

        let mut replayed: HashMap<NodeId, TopologyMember> =
            HashMap::with_capacity(snapshot.len());
        for member in snapshot {
            debug!(node_id = %member.node_id, "replaying known topology member");
            replayed.insert(member.node_id.clone(), member.clone());
            if tx.send(TopologyEvent::MemberUp(member)).await.is_err() {
                return rx;
            }
        }

        // drain events that raced the snapshot query: a member announced in
        // the queued window unchanged from its snapshot entry is delivered
        // exactly once, but changed endpoints (say a backup attached) must
        // still reach the consumer
        loop {
            match live.try_recv() {
                Ok(TopologyEvent::MemberUp(member))
                    if replayed.get(&member.node_id) == Some(&member) =>
                {
                    debug!(node_id = %member.node_id, "member-up already covered by replay");
                }
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        return rx;
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Closed) => return rx,
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!(missed, "topology event stream lagged during replay");
                }
            }
        }

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        debug!("topology watcher shutting down");
                        break;
                    }
                    event = live.recv() => match event {
                        Ok(event) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            warn!(missed, "topology event stream lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        });

        rx
    }
}
