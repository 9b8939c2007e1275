use crate::core::actions::action::Action;
use crate::core::actions::defaultconnectionactions::ResetDefaultExternalInputs;
use crate::core::document::document::Document;
use crate::core::document::slotmask::SlotMask;
use crate::core::document::view::TrackAndSlot;

/// Single-shot replacement of selection and focus state. Snapshots the
/// old and new track selections, slot masks and focus; perform and undo
/// swap between them. Optionally carries the external-input re-targeting
/// that follows a focus change.
pub struct Select {
    old_track_selections: Vec<bool>,
    new_track_selections: Vec<bool>,
    old_slot_masks: Vec<SlotMask>,
    new_slot_masks: Vec<SlotMask>,
    old_focus: TrackAndSlot,
    new_focus: TrackAndSlot,
    reset_inputs: Option<ResetDefaultExternalInputs>,
}

impl Select {
    pub fn new(document: &Document) -> Select {
        let track_selections = document.track_selections();
        let slot_masks = document.selected_slot_masks();
        let focus = document.view().focused_track_and_slot();
        Select {
            old_track_selections: track_selections.clone(),
            new_track_selections: track_selections,
            old_slot_masks: slot_masks.clone(),
            new_slot_masks: slot_masks,
            old_focus: focus,
            new_focus: focus,
            reset_inputs: None,
        }
    }

    pub fn old_focus(&self) -> TrackAndSlot {
        self.old_focus
    }

    pub fn new_focus(&self) -> TrackAndSlot {
        self.new_focus
    }

    pub fn set_new_focused_slot(&mut self, track_and_slot: TrackAndSlot) {
        self.new_focus = track_and_slot;
    }

    pub fn deselect_all(&mut self) {
        for selected in &mut self.new_track_selections {
            *selected = false;
        }
        for mask in &mut self.new_slot_masks {
            *mask = SlotMask::empty();
        }
    }

    pub fn set_new_track_selected(&mut self, track_index: usize, selected: bool) {
        if let Some(entry) = self.new_track_selections.get_mut(track_index) {
            *entry = selected;
        }
    }

    pub fn set_new_slot_mask(&mut self, track_index: usize, mask: SlotMask) {
        if let Some(entry) = self.new_slot_masks.get_mut(track_index) {
            *entry = mask;
        }
    }

    pub fn new_slot_mask(&self, track_index: usize) -> SlotMask {
        self.new_slot_masks
            .get(track_index)
            .copied()
            .unwrap_or_default()
    }

    /// Select or deselect one slot, optionally clearing every other
    /// selection first. Selecting also focuses the slot.
    pub fn processor_slot(
        document: &Document,
        track_index: usize,
        slot: i32,
        selected: bool,
        deselect_others: bool,
    ) -> Select {
        let mut select = Select::new(document);
        if deselect_others {
            select.deselect_all();
        }
        let mut mask = if deselect_others {
            SlotMask::empty()
        } else {
            select.new_slot_mask(track_index)
        };
        mask.set(slot, selected);
        select.set_new_slot_mask(track_index, mask);
        if selected {
            select.set_new_focused_slot(TrackAndSlot::new(track_index as i32, slot));
        }
        select
    }

    /// Select every cell inside the rectangle spanned by two grid cells,
    /// selecting whole tracks whose header cell is inside it.
    pub fn rectangle(document: &Document, from: TrackAndSlot, to: TrackAndSlot) -> Select {
        let mut select = Select::new(document);

        let (from_x, from_y) = document.track_and_slot_to_grid_position(from);
        let (to_x, to_y) = document.track_and_slot_to_grid_position(to);
        let (left, right) = (from_x.min(to_x), from_x.max(to_x));
        let (top, bottom) = (from_y.min(to_y), from_y.max(to_y));
        let contains = |(x, y): (i32, i32)| x >= left && x <= right && y >= top && y <= bottom;

        for track_index in 0..document.num_tracks() {
            let track = document.track(track_index).unwrap();
            let track_selected = contains(
                document.track_and_slot_to_grid_position(TrackAndSlot::new(track_index as i32, -1)),
            );
            select.set_new_track_selected(track_index, track_selected);
            if track_selected {
                let num_slots = document.view().num_processor_slots(track.is_master());
                select.set_new_slot_mask(track_index, SlotMask::full(num_slots));
            } else {
                let mut mask = SlotMask::empty();
                let num_slots = document.view().num_processor_slots(track.is_master());
                for slot in 0..num_slots {
                    mask.set(
                        slot,
                        contains(document.track_and_slot_to_grid_position(TrackAndSlot::new(
                            track_index as i32,
                            slot,
                        ))),
                    );
                }
                select.set_new_slot_mask(track_index, mask);
            }
        }

        let mut slot_to_focus = to.slot;
        if slot_to_focus == -1 {
            slot_to_focus = document
                .track(to.track_index.max(0) as usize)
                .and_then(|t| t.lane().processors().first())
                .map(|p| p.slot())
                .unwrap_or(0);
        }
        select.set_new_focused_slot(TrackAndSlot::new(to.track_index, slot_to_focus));
        select
    }

    /// Select or deselect a whole track. Selecting marks every slot and
    /// focuses the track header.
    pub fn track(
        document: &Document,
        track_index: usize,
        selected: bool,
        deselect_others: bool,
    ) -> Select {
        let mut select = Select::new(document);
        if deselect_others {
            select.deselect_all();
        }
        select.set_new_track_selected(track_index, selected);
        let is_master = document
            .track(track_index)
            .map(|t| t.is_master())
            .unwrap_or(false);
        if selected {
            let num_slots = document.view().num_processor_slots(is_master);
            select.set_new_slot_mask(track_index, SlotMask::full(num_slots));
            select.set_new_focused_slot(TrackAndSlot::new(track_index as i32, -1));
        } else {
            select.set_new_slot_mask(track_index, SlotMask::empty());
        }
        select
    }

    /// The selection half of a grid move: slot masks shift with the slot
    /// delta, whole-track selections move with the track delta, and focus
    /// follows the overall delta.
    pub fn move_selections(document: &Document, delta: (i32, i32)) -> Select {
        let mut select = Select::new(document);
        let (x_delta, y_delta) = delta;

        if y_delta != 0 {
            for track_index in 0..document.num_tracks() {
                if select.old_track_selections[track_index] {
                    // the whole track moves, so its slot selections stay put
                    continue;
                }
                let mut mask = select.old_slot_masks[track_index];
                mask.shift(y_delta);
                select.set_new_slot_mask(track_index, mask);
            }
        }

        if x_delta != 0 {
            let num_tracks = document.num_tracks();
            let mut move_track_selections = |select: &mut Select, from_track_index: usize| {
                let to_track_index = from_track_index as i32 + x_delta;
                if to_track_index >= 0 && (to_track_index as usize) < num_tracks {
                    let to_track_index = to_track_index as usize;
                    select.new_track_selections[to_track_index] =
                        select.new_track_selections[from_track_index];
                    select.new_track_selections[from_track_index] = false;
                    select.new_slot_masks[to_track_index] = select.new_slot_masks[from_track_index];
                    select.new_slot_masks[from_track_index] = SlotMask::empty();
                }
            };
            if x_delta < 0 {
                for from_track_index in 0..num_tracks {
                    move_track_selections(&mut select, from_track_index);
                }
            } else {
                for from_track_index in (0..num_tracks).rev() {
                    move_track_selections(&mut select, from_track_index);
                }
            }
        }

        let old_focus = select.old_focus;
        select.set_new_focused_slot(TrackAndSlot::new(
            old_focus.track_index + x_delta,
            old_focus.slot + y_delta,
        ));
        select
    }

    /// Build the external-input re-targeting that follows this selection's
    /// focus change, by applying the selection temporarily and observing
    /// the newly focused processor.
    pub fn with_external_inputs_reset(mut self, document: &mut Document) -> Select {
        self.apply(document, false);
        let focused_processor = document.focused_processor().map(|p| p.id());
        let mut reset = ResetDefaultExternalInputs::new(document, focused_processor);
        reset.perform(document);
        reset.undo(document);
        self.apply(document, true);
        self.reset_inputs = Some(reset);
        self
    }

    fn apply(&self, document: &mut Document, old: bool) {
        let (selections, masks, focus) = if old {
            (&self.old_track_selections, &self.old_slot_masks, self.old_focus)
        } else {
            (&self.new_track_selections, &self.new_slot_masks, self.new_focus)
        };
        let count = selections.len().min(document.num_tracks());
        for track_index in 0..count {
            document.set_track_selected(track_index, selections[track_index]);
            document.set_selected_slots_mask(track_index, masks[track_index]);
        }
        document.set_focus(focus);
    }
}

impl Action for Select {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        self.apply(document, false);
        if let Some(reset) = self.reset_inputs.as_mut() {
            reset.perform(document);
        }
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        if let Some(reset) = self.reset_inputs.as_mut() {
            reset.undo(document);
        }
        self.apply(document, true);
        true
    }
}
