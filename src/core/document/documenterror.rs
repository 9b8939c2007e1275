use crate::core::document::connection::{Connection, ConnectionType, NodeId};
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;
use crate::core::document::track::TrackId;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocumentError {
    TrackNotFound(TrackId),
    ProcessorNotFound(ProcessorId),
    NodeNotFound(NodeId),
    NodeIdTaken(NodeId),
    SlotCollision {
        track: TrackId,
        slot: i32,
    },
    BadChannel {
        node_id: NodeId,
        channel: i32,
    },
    MissingCapability {
        node_id: NodeId,
        connection_type: ConnectionType,
    },
    DuplicateConnection(Connection),
    CircularDependency {
        cycle: Vec<NodeId>,
    },
    FocusOutOfBounds {
        track_index: i32,
        slot: i32,
    },
    SelectionOutOfBounds {
        track: TrackId,
    },
}

impl DocumentError {
    pub fn explain(&self, document: &Document) -> String {
        let processor_name = |node_id: NodeId| -> String {
            document
                .processor_by_node_id(node_id)
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| format!("<missing node #{}>", node_id.value()))
        };
        match self {
            DocumentError::TrackNotFound(id) => {
                format!("A track with id #{} could not be found", id.value())
            }
            DocumentError::ProcessorNotFound(id) => {
                format!("A processor with id #{} could not be found", id.value())
            }
            DocumentError::NodeNotFound(id) => {
                format!("A graph node with id #{} could not be found", id.value())
            }
            DocumentError::NodeIdTaken(id) => {
                format!(
                    "Node id #{} is already taken by {}",
                    id.value(),
                    processor_name(*id)
                )
            }
            DocumentError::SlotCollision { track, slot } => {
                let track_name = document
                    .track_by_id(*track)
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| format!("<missing track #{}>", track.value()));
                format!(
                    "Two processors in track {} occupy the same slot {}",
                    track_name, slot
                )
            }
            DocumentError::BadChannel { node_id, channel } => {
                format!(
                    "Channel {} is out of range for {}",
                    channel,
                    processor_name(*node_id)
                )
            }
            DocumentError::MissingCapability {
                node_id,
                connection_type,
            } => {
                let capability = match connection_type {
                    ConnectionType::Audio => "audio channels",
                    ConnectionType::Midi => "MIDI",
                };
                format!(
                    "{} does not support {} at that endpoint",
                    processor_name(*node_id),
                    capability
                )
            }
            DocumentError::DuplicateConnection(connection) => {
                format!(
                    "A connection from {} to {} already exists on those channels",
                    processor_name(connection.source.node_id),
                    processor_name(connection.destination.node_id)
                )
            }
            DocumentError::CircularDependency { cycle } => {
                let mut s = "The connection graph contains a cycle: ".to_string();
                let mut first = true;
                for node_id in cycle {
                    if !first {
                        s += " -> ";
                    }
                    s += &processor_name(*node_id);
                    first = false;
                }
                s
            }
            DocumentError::FocusOutOfBounds { track_index, slot } => {
                format!(
                    "The focused cell (track {}, slot {}) is outside the grid",
                    track_index, slot
                )
            }
            DocumentError::SelectionOutOfBounds { track } => {
                let track_name = document
                    .track_by_id(*track)
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| format!("<missing track #{}>", track.value()));
                format!(
                    "Track {} has slots selected beyond its slot count",
                    track_name
                )
            }
        }
    }
}
