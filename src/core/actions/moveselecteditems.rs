use crate::core::actions::action::Action;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::insertprocessor::InsertProcessor;
use crate::core::actions::select::Select;
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;
use crate::core::document::view::TrackAndSlot;

/// Reorder a whole track within the track list.
pub struct InsertTrack {
    from_index: usize,
    to_index: usize,
}

impl InsertTrack {
    pub fn new(from_index: usize, to_index: usize) -> InsertTrack {
        InsertTrack {
            from_index,
            to_index,
        }
    }
}

impl Action for InsertTrack {
    fn name(&self) -> &'static str {
        "InsertTrack"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        document.move_track(self.from_index, self.to_index);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        document.move_track(self.to_index, self.from_index);
        true
    }
}

fn limit_track_delta(
    document: &Document,
    original_track_delta: i32,
    any_track_selected: bool,
    multiple_tracks_with_selections: bool,
) -> i32 {
    // If more than one track has any selected items, or if any track itself
    // is selected, don't move any processors from a non-master track to the
    // master track, or move a full track into the master track slot.
    let max_allowed_track_index = if any_track_selected || multiple_tracks_with_selections {
        document.num_non_master_tracks() as i32 - 1
    } else {
        document.num_tracks() as i32 - 1
    };
    let (Some(first), Some(last)) = (
        document.find_first_track_with_selections(),
        document.find_last_track_with_selections(),
    ) else {
        return 0;
    };
    let lower = -(first as i32);
    let upper = max_allowed_track_index - last as i32;
    if upper < lower {
        return 0;
    }
    original_track_delta.clamp(lower, upper)
}

fn limit_slot_delta(document: &Document, original_slot_delta: i32, limited_track_delta: i32) -> i32 {
    let mut limited_slot_delta = original_slot_delta;
    for (from_track_index, from_track) in document.tracks().iter().enumerate() {
        if from_track.is_selected() {
            // the entire track moves, so it doesn't restrict slot movements
            continue;
        }
        let Some(last_selected) = from_track.find_last_selected_processor() else {
            continue;
        };
        let to_track_index = from_track_index as i32 + limited_track_delta;
        if to_track_index < 0 {
            continue;
        }
        let Some(to_track) = document.track(to_track_index as usize) else {
            continue;
        };
        // valid since a last selected processor exists
        let first_selected = from_track.find_first_selected_processor().unwrap();
        let max_allowed_slot = document.view().num_processor_slots(to_track.is_master()) - 1;
        let lower = -first_selected.slot();
        let upper = max_allowed_slot - last_selected.slot();
        if upper < lower {
            return 0;
        }
        limited_slot_delta = limited_slot_delta.clamp(lower, upper);

        // Expand the slot delta just enough that each contiguous selected
        // group lands completely below a non-selected processor in the
        // target track, without creating empty rows beyond what the drag
        // asked for.
        for processor in from_track.first_processor_in_each_contiguous_selected_group() {
            if let Some(last_non_selected) = to_track
                .last_non_selected_processor_with_slot_less_than(
                    processor.slot() + original_slot_delta,
                )
            {
                let candidate_slot_delta = last_non_selected.slot() + 1 - processor.slot();
                if candidate_slot_delta <= original_slot_delta {
                    limited_slot_delta = limited_slot_delta.max(candidate_slot_delta);
                }
            }
        }
    }
    limited_slot_delta
}

/// Clip a requested grid delta in three phases: handle the edge cases
/// around master-track selections, limit to the grid boundaries, then
/// expand just enough to land groups below a non-selected processor.
fn limited_delta(document: &Document, from: TrackAndSlot, to: TrackAndSlot) -> (i32, i32) {
    let mut original_delta = (
        to.track_index - from.track_index,
        to.slot - from.slot,
    );
    let multiple_tracks_with_selections = document.more_than_one_track_has_selections();
    // When multiple tracks have selections and the master track is one of
    // them, the drag would have to move horizontally and vertically at
    // once; disallow it.
    if multiple_tracks_with_selections
        && document.master_track().map(|t| t.has_selections()).unwrap_or(false)
    {
        return (0, 0);
    }

    let any_track_selected = document.any_track_selected();

    // Dragging from a non-master track onto the master track reads as
    // dragging past the vertical limit; coordinates flip for the master.
    if multiple_tracks_with_selections {
        let from_is_master = from.track_index >= 0
            && document
                .track(from.track_index as usize)
                .map(|t| t.is_master())
                .unwrap_or(false);
        let to_is_master = to.track_index >= 0
            && document
                .track(to.track_index as usize)
                .map(|t| t.is_master())
                .unwrap_or(false);
        if !from_is_master && to_is_master {
            original_delta = (
                to.slot - from.track_index,
                document.view().num_processor_slots(false) - 1 - from.slot,
            );
        }
    }

    let limited_track_delta = limit_track_delta(
        document,
        original_delta.0,
        any_track_selected,
        multiple_tracks_with_selections,
    );
    if from.slot == -1 {
        // track move only
        return (limited_track_delta, 0);
    }
    let limited_slot_delta = limit_slot_delta(document, original_delta.1, limited_track_delta);
    (limited_track_delta, limited_slot_delta)
}

fn create_inserts(document: &mut Document, delta: (i32, i32)) -> Vec<Box<dyn Action>> {
    let mut inserts: Vec<Box<dyn Action>> = Vec::new();
    if delta == (0, 0) {
        return inserts;
    }

    let num_tracks = document.num_tracks();
    let track_order: Vec<usize> = if delta.0 <= 0 {
        (0..num_tracks).collect()
    } else {
        (0..num_tracks).rev().collect()
    };

    for from_track_index in track_order {
        let Some(from_track) = document.track(from_track_index) else {
            continue;
        };
        let to_track_index = from_track_index as i32 + delta.0;

        if from_track.is_selected() {
            if from_track_index as i32 != to_track_index && to_track_index >= 0 {
                let mut action = InsertTrack::new(from_track_index, to_track_index as usize);
                // Actually do the move now, since it affects where later
                // tracks' selections land. (Undone again after the
                // surrounding action has finished observing the result.)
                action.perform(document);
                inserts.push(Box::new(action));
            }
            continue;
        }

        let mut selected: Vec<(ProcessorId, i32)> = from_track
            .find_selected_processors()
            .iter()
            .map(|p| (p.id(), p.slot()))
            .collect();
        if selected.is_empty() || to_track_index < 0 {
            continue;
        }
        if delta.0 == 0 && delta.1 > 0 {
            selected.reverse();
        }
        for (processor_id, slot) in selected {
            if let Some(mut action) = InsertProcessor::new(
                document,
                processor_id,
                to_track_index as usize,
                slot + delta.1,
            ) {
                action.perform(document);
                inserts.push(Box::new(action));
            }
        }
    }

    inserts
}

/// Move everything selected by a grid delta, as one undoable unit:
/// track/processor inserts, then the selection move, then a full default
/// connection update. Built with the temporary-perform protocol.
pub struct MoveSelectedItems {
    inserts: Vec<Box<dyn Action>>,
    update_selection: Select,
    update_connections: UpdateAllDefaultConnections,
}

impl MoveSelectedItems {
    pub fn new(
        document: &mut Document,
        from: TrackAndSlot,
        to: TrackAndSlot,
        make_invalid_defaults_into_custom: bool,
    ) -> MoveSelectedItems {
        let delta = limited_delta(document, from, to);
        let update_selection = Select::move_selections(document, delta);
        let mut inserts = create_inserts(document, delta);
        let update_connections = UpdateAllDefaultConnections::new(
            document,
            make_invalid_defaults_into_custom,
            true,
            Some(update_selection.new_focus()),
        );
        for action in inserts.iter_mut().rev() {
            action.undo(document);
        }
        MoveSelectedItems {
            inserts,
            update_selection,
            update_connections,
        }
    }
}

impl Action for MoveSelectedItems {
    fn name(&self) -> &'static str {
        "MoveSelectedItems"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        if self.inserts.is_empty() {
            return false;
        }
        for action in &mut self.inserts {
            action.perform(document);
        }
        self.update_selection.perform(document);
        self.update_connections.perform(document);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        if self.inserts.is_empty() {
            return false;
        }
        self.update_connections.undo(document);
        self.update_selection.undo(document);
        for action in self.inserts.iter_mut().rev() {
            action.undo(document);
        }
        true
    }
}
