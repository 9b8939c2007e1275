use std::collections::{HashMap, HashSet};

use crate::core::document::connection::{ConnectionType, NodeId, MIDI_CHANNEL_INDEX};
use crate::core::document::document::Document;
use crate::core::document::documenterror::DocumentError;
use crate::core::document::processor::Processor;

/// Sweep the whole document for invariant violations. Returns the first
/// violation found, if any. Called under debug_assert! after every
/// committed action; a violation indicates a programming error, not a
/// user error.
pub(crate) fn find_document_error(document: &Document) -> Option<DocumentError> {
    if let Some(e) = find_slot_collision(document) {
        return Some(e);
    }
    if let Some(e) = find_duplicate_node_id(document) {
        return Some(e);
    }
    if let Some(e) = find_invalid_connection(document) {
        return Some(e);
    }
    if let Some(e) = find_cycle(document) {
        return Some(e);
    }
    if let Some(e) = find_focus_out_of_bounds(document) {
        return Some(e);
    }
    find_selection_out_of_bounds(document)
}

fn find_slot_collision(document: &Document) -> Option<DocumentError> {
    for track in document.tracks() {
        let mut seen = HashSet::new();
        for processor in track.lane().processors() {
            if !seen.insert(processor.slot()) {
                return Some(DocumentError::SlotCollision {
                    track: track.id(),
                    slot: processor.slot(),
                });
            }
        }
    }
    None
}

fn all_processors(document: &Document) -> impl Iterator<Item = &Processor> {
    document
        .tracks()
        .iter()
        .flat_map(|t| t.all_processors())
        .chain(document.input().processors().iter())
        .chain(document.output().processors().iter())
}

fn find_duplicate_node_id(document: &Document) -> Option<DocumentError> {
    let mut seen = HashSet::new();
    for processor in all_processors(document) {
        if !seen.insert(processor.node_id()) {
            return Some(DocumentError::NodeIdTaken(processor.node_id()));
        }
    }
    None
}

fn find_invalid_connection(document: &Document) -> Option<DocumentError> {
    let mut seen_endpoints = HashSet::new();
    for connection in document.connections().iter() {
        for (endpoint, is_source) in [(connection.source, true), (connection.destination, false)] {
            let Some(processor) = document.processor_by_node_id(endpoint.node_id) else {
                return Some(DocumentError::NodeNotFound(endpoint.node_id));
            };
            if endpoint.channel == MIDI_CHANNEL_INDEX {
                let capable = if is_source {
                    processor.produces_midi()
                } else {
                    processor.accepts_midi()
                };
                if !capable {
                    return Some(DocumentError::MissingCapability {
                        node_id: endpoint.node_id,
                        connection_type: ConnectionType::Midi,
                    });
                }
            } else {
                let num_channels = if is_source {
                    processor.num_output_channels()
                } else {
                    processor.num_input_channels()
                };
                if endpoint.channel < 0 || endpoint.channel >= num_channels {
                    return Some(DocumentError::BadChannel {
                        node_id: endpoint.node_id,
                        channel: endpoint.channel,
                    });
                }
            }
        }
        if !seen_endpoints.insert((connection.source, connection.destination)) {
            return Some(DocumentError::DuplicateConnection(*connection));
        }
    }
    None
}

fn find_cycle(document: &Document) -> Option<DocumentError> {
    for connection_type in [ConnectionType::Audio, ConnectionType::Midi] {
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for connection in document.connections().iter() {
            if connection.connection_type() == connection_type {
                adjacency
                    .entry(connection.source.node_id)
                    .or_default()
                    .push(connection.destination.node_id);
            }
        }

        let mut finished: HashSet<NodeId> = HashSet::new();
        for &start in adjacency.keys() {
            if finished.contains(&start) {
                continue;
            }
            let mut stack: Vec<NodeId> = Vec::new();
            if let Some(cycle) = visit(start, &adjacency, &mut stack, &mut finished) {
                return Some(DocumentError::CircularDependency { cycle });
            }
        }
    }
    None
}

fn visit(
    node: NodeId,
    adjacency: &HashMap<NodeId, Vec<NodeId>>,
    stack: &mut Vec<NodeId>,
    finished: &mut HashSet<NodeId>,
) -> Option<Vec<NodeId>> {
    if let Some(position) = stack.iter().position(|&n| n == node) {
        return Some(stack[position..].to_vec());
    }
    if finished.contains(&node) {
        return None;
    }
    stack.push(node);
    if let Some(next_nodes) = adjacency.get(&node) {
        for &next in next_nodes {
            if let Some(cycle) = visit(next, adjacency, stack, finished) {
                return Some(cycle);
            }
        }
    }
    stack.pop();
    finished.insert(node);
    None
}

fn find_focus_out_of_bounds(document: &Document) -> Option<DocumentError> {
    let focused = document.view().focused_track_and_slot();
    if document.num_tracks() == 0 {
        return None;
    }
    if focused.track_index < 0 || focused.track_index as usize >= document.num_tracks() {
        return Some(DocumentError::FocusOutOfBounds {
            track_index: focused.track_index,
            slot: focused.slot,
        });
    }
    let is_master = document
        .track(focused.track_index as usize)
        .map(|t| t.is_master())
        .unwrap_or(false);
    let num_slots = document.view().num_processor_slots(is_master);
    if focused.slot < -1 || focused.slot >= num_slots {
        return Some(DocumentError::FocusOutOfBounds {
            track_index: focused.track_index,
            slot: focused.slot,
        });
    }
    None
}

fn find_selection_out_of_bounds(document: &Document) -> Option<DocumentError> {
    for track in document.tracks() {
        let num_slots = document.view().num_processor_slots(track.is_master());
        if let Some(last) = track.lane().selected_slots_mask().last_set() {
            if last >= num_slots {
                return Some(DocumentError::SelectionOutOfBounds { track: track.id() });
            }
        }
    }
    None
}
