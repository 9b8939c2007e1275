use std::hash::Hasher;

use crate::core::revision::{revise_unordered, Revisable, RevisionHash};
use crate::core::uniqueid::UniqueId;

/// Tag type for ids of nodes in the live audio graph. A processor's node id
/// is assigned once, when the processor entity is created, and survives
/// undo/redo of the processor's deletion.
pub struct NodeTag;
pub type NodeId = UniqueId<NodeTag>;

/// Sentinel channel index denoting the MIDI channel of a node, as opposed
/// to an audio channel index.
pub const MIDI_CHANNEL_INDEX: i32 = 0x1000;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConnectionType {
    Audio,
    Midi,
}

impl ConnectionType {
    pub fn channel_matches(&self, channel: i32) -> bool {
        match self {
            ConnectionType::Audio => channel != MIDI_CHANNEL_INDEX,
            ConnectionType::Midi => channel == MIDI_CHANNEL_INDEX,
        }
    }
}

fn channel_matches_filter(channel: i32, connection_type: Option<ConnectionType>) -> bool {
    match connection_type {
        None => true,
        Some(ty) => ty.channel_matches(channel),
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConnectionEndpoint {
    pub node_id: NodeId,
    pub channel: i32,
}

impl ConnectionEndpoint {
    pub fn new(node_id: NodeId, channel: i32) -> ConnectionEndpoint {
        ConnectionEndpoint { node_id, channel }
    }

    pub fn is_midi(&self) -> bool {
        self.channel == MIDI_CHANNEL_INDEX
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Connection {
    pub source: ConnectionEndpoint,
    pub destination: ConnectionEndpoint,
    pub is_custom: bool,
}

impl Connection {
    pub fn new(
        source: ConnectionEndpoint,
        destination: ConnectionEndpoint,
        is_custom: bool,
    ) -> Connection {
        Connection {
            source,
            destination,
            is_custom,
        }
    }

    pub fn default_between(source: NodeId, destination: NodeId, channel: i32) -> Connection {
        Connection::new(
            ConnectionEndpoint::new(source, channel),
            ConnectionEndpoint::new(destination, channel),
            false,
        )
    }

    pub fn connection_type(&self) -> ConnectionType {
        if self.source.is_midi() {
            ConnectionType::Midi
        } else {
            ConnectionType::Audio
        }
    }

    /// True if the other connection joins the same channels of the same
    /// nodes, regardless of whether either is custom.
    pub fn matches_endpoints(&self, other: &Connection) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl Revisable for Connection {
    fn revision(&self) -> RevisionHash {
        let mut hasher = seahash::SeaHasher::new();
        hasher.write_usize(self.source.node_id.value());
        hasher.write_i32(self.source.channel);
        hasher.write_usize(self.destination.node_id.value());
        hasher.write_i32(self.destination.channel);
        hasher.write_u8(self.is_custom as u8);
        RevisionHash::new(hasher.finish())
    }
}

/// The set of all connections in the document, in creation order.
#[derive(Clone, Default)]
pub struct Connections {
    connections: Vec<Connection>,
}

impl Connections {
    pub fn new() -> Connections {
        Connections {
            connections: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn snapshot(&self) -> Vec<Connection> {
        self.connections.clone()
    }

    pub fn connection_matching(&self, connection: &Connection) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.matches_endpoints(connection))
    }

    pub fn is_node_connected(&self, node_id: NodeId) -> bool {
        self.connections
            .iter()
            .any(|c| c.source.node_id == node_id || c.destination.node_id == node_id)
    }

    pub fn for_node(
        &self,
        node_id: NodeId,
        connection_type: Option<ConnectionType>,
        incoming: bool,
        outgoing: bool,
        include_custom: bool,
        include_default: bool,
    ) -> Vec<Connection> {
        let mut node_connections = Vec::new();
        for connection in &self.connections {
            if (connection.is_custom && !include_custom)
                || (!connection.is_custom && !include_default)
            {
                continue;
            }
            if (incoming
                && connection.destination.node_id == node_id
                && channel_matches_filter(connection.destination.channel, connection_type))
                || (outgoing
                    && connection.source.node_id == node_id
                    && channel_matches_filter(connection.source.channel, connection_type))
            {
                node_connections.push(*connection);
            }
        }
        node_connections
    }

    pub(crate) fn add(&mut self, connection: Connection) {
        debug_assert!(self.connection_matching(&connection).is_none());
        self.connections.push(connection);
    }

    pub(crate) fn remove_matching(&mut self, connection: &Connection) -> Option<Connection> {
        let index = self
            .connections
            .iter()
            .position(|c| c.matches_endpoints(connection))?;
        Some(self.connections.remove(index))
    }
}

impl Revisable for Connections {
    fn revision(&self) -> RevisionHash {
        revise_unordered(self.connections.iter())
    }
}
