use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::document::connection::{Connection, Connections, NodeId};
use crate::core::engine::host::PluginInstance;
use crate::core::revision::{revise_unordered, Revisable, RevisionHash};

/// One directed edge in the live graph. Carries no taxonomy; custom and
/// default connections are indistinguishable once they are live.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LiveEdge {
    pub source_node: NodeId,
    pub source_channel: i32,
    pub destination_node: NodeId,
    pub destination_channel: i32,
}

impl LiveEdge {
    pub fn of_connection(connection: &Connection) -> LiveEdge {
        LiveEdge {
            source_node: connection.source.node_id,
            source_channel: connection.source.channel,
            destination_node: connection.destination.node_id,
            destination_channel: connection.destination.channel,
        }
    }
}

impl Revisable for LiveEdge {
    fn revision(&self) -> RevisionHash {
        let mut hasher = seahash::SeaHasher::new();
        std::hash::Hasher::write_usize(&mut hasher, self.source_node.value());
        std::hash::Hasher::write_i32(&mut hasher, self.source_channel);
        std::hash::Hasher::write_usize(&mut hasher, self.destination_node.value());
        std::hash::Hasher::write_i32(&mut hasher, self.destination_channel);
        RevisionHash::new(std::hash::Hasher::finish(&hasher))
    }
}

struct LiveNode {
    instance: Box<dyn PluginInstance>,
    bypassed: bool,
}

#[derive(Default)]
struct LiveGraphInner {
    nodes: HashMap<NodeId, LiveNode>,
    edges: Vec<LiveEdge>,
}

/// The running audio graph. Shared between the document thread, which is
/// the only topology writer (through the graph coordinator), and the
/// audio thread, which reads nodes and edges per block. All access goes
/// through one lock; the audio thread never blocks on document state.
#[derive(Clone)]
pub struct LiveGraph {
    inner: Arc<Mutex<LiveGraphInner>>,
}

impl LiveGraph {
    pub fn new() -> LiveGraph {
        LiveGraph {
            inner: Arc::new(Mutex::new(LiveGraphInner::default())),
        }
    }

    pub fn add_node(&self, node_id: NodeId, instance: Box<dyn PluginInstance>) {
        let mut inner = self.inner.lock();
        debug_assert!(!inner.nodes.contains_key(&node_id));
        inner.nodes.insert(
            node_id,
            LiveNode {
                instance,
                bypassed: false,
            },
        );
    }

    pub fn remove_node(&self, node_id: NodeId) -> bool {
        let mut inner = self.inner.lock();
        debug_assert!(inner
            .edges
            .iter()
            .all(|e| e.source_node != node_id && e.destination_node != node_id));
        inner.nodes.remove(&node_id).is_some()
    }

    pub fn has_node(&self, node_id: NodeId) -> bool {
        self.inner.lock().nodes.contains_key(&node_id)
    }

    pub fn num_nodes(&self) -> usize {
        self.inner.lock().nodes.len()
    }

    pub fn set_bypassed(&self, node_id: NodeId, bypassed: bool) {
        if let Some(node) = self.inner.lock().nodes.get_mut(&node_id) {
            node.bypassed = bypassed;
        }
    }

    pub fn is_bypassed(&self, node_id: NodeId) -> bool {
        self.inner
            .lock()
            .nodes
            .get(&node_id)
            .map(|n| n.bypassed)
            .unwrap_or(false)
    }

    pub fn add_edge(&self, connection: &Connection) -> bool {
        let edge = LiveEdge::of_connection(connection);
        let mut inner = self.inner.lock();
        if inner.edges.contains(&edge) {
            return false;
        }
        inner.edges.push(edge);
        true
    }

    pub fn remove_edge(&self, connection: &Connection) -> bool {
        let edge = LiveEdge::of_connection(connection);
        let mut inner = self.inner.lock();
        match inner.edges.iter().position(|e| *e == edge) {
            Some(index) => {
                inner.edges.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn num_edges(&self) -> usize {
        self.inner.lock().edges.len()
    }

    pub fn edges_snapshot(&self) -> Vec<LiveEdge> {
        self.inner.lock().edges.clone()
    }

    /// Run a closure against a node's plugin instance under the lock.
    pub fn with_instance<R>(
        &self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn PluginInstance) -> R,
    ) -> Option<R> {
        let mut inner = self.inner.lock();
        inner
            .nodes
            .get_mut(&node_id)
            .map(|node| f(node.instance.as_mut()))
    }

    pub(crate) fn edge_revision(&self) -> RevisionHash {
        revise_unordered(self.inner.lock().edges.iter())
    }
}

impl Default for LiveGraph {
    fn default() -> LiveGraph {
        LiveGraph::new()
    }
}

/// Revision of a document connection set as it would appear in the live
/// graph, for mirror checks.
pub(crate) fn edge_revision_of_connections(connections: &Connections) -> RevisionHash {
    revise_unordered(connections.iter().map(LiveEdge::of_connection))
}
