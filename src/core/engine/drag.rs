use crate::core::actions::action::Action;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::document::connection::{Connection, NodeId};
use crate::core::document::document::Document;
use crate::core::document::view::TrackAndSlot;

/// State machine for an interactive processor drag. While a drag is in
/// flight the document is mutated provisionally (with no undo manager)
/// and graph updates are paused; ending the drag restores the snapshot
/// and replays the final position as one undoable move.
pub enum DragState {
    Idle,
    Dragging {
        node_id: NodeId,
        initial: TrackAndSlot,
        current: TrackAndSlot,
        connections_snapshot: Vec<Connection>,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn dragged_node_id(&self) -> Option<NodeId> {
        match self {
            DragState::Dragging { node_id, .. } => Some(*node_id),
            DragState::Idle => None,
        }
    }
}

/// Move a processor to a cell outside of any undoable scope, repairing
/// slots and recomputing default connections in place. Used for the
/// provisional moves of an in-flight drag.
pub(crate) fn provisional_move(document: &mut Document, node_id: NodeId, to: TrackAndSlot) {
    if to.track_index < 0 || to.track_index as usize >= document.num_tracks() {
        return;
    }
    let Some(processor) = document.processor_by_node_id(node_id) else {
        return;
    };
    let processor_id = processor.id();
    let from_track_index = document.track_index_for_processor(processor_id);
    let from_slot = processor.slot();
    if from_track_index == Some(to.track_index as usize) && from_slot == to.slot {
        return;
    }

    document.move_lane_processor(processor_id, to.track_index as usize, to.slot);
    document.make_slots_valid(to.track_index as usize);

    let mut update = UpdateAllDefaultConnections::new(document, false, true, None);
    update.perform(document);
}
