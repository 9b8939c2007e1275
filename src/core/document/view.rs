/// Numbers of grid cells kept visible at once. Offsets scroll the visible
/// window across the full track/slot ranges.
pub const NUM_VISIBLE_TRACKS: i32 = 8;
pub const NUM_VISIBLE_NON_MASTER_TRACK_SLOTS: i32 = 7;
pub const NUM_VISIBLE_MASTER_TRACK_SLOTS: i32 = 8;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FocusedPane {
    Grid,
    Editor,
}

/// A (track index, processor slot) cell. Slot -1 addresses the track
/// itself rather than any processor slot within it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TrackAndSlot {
    pub track_index: i32,
    pub slot: i32,
}

impl TrackAndSlot {
    pub const INVALID: TrackAndSlot = TrackAndSlot {
        track_index: -1,
        slot: -1,
    };

    pub fn new(track_index: i32, slot: i32) -> TrackAndSlot {
        TrackAndSlot { track_index, slot }
    }

    pub fn is_valid(&self) -> bool {
        self.track_index >= 0
    }
}

/// View state: the focused grid cell, scroll offsets, and the slot counts
/// that bound every lane.
#[derive(Clone)]
pub struct View {
    focused_track_index: i32,
    focused_processor_slot: i32,
    grid_view_track_offset: i32,
    grid_view_slot_offset: i32,
    master_view_slot_offset: i32,
    num_processor_slots: i32,
    num_master_processor_slots: i32,
    focused_pane: FocusedPane,
}

impl View {
    pub fn new() -> View {
        View {
            focused_track_index: 0,
            focused_processor_slot: -1,
            grid_view_track_offset: 0,
            grid_view_slot_offset: 0,
            master_view_slot_offset: 0,
            num_processor_slots: NUM_VISIBLE_NON_MASTER_TRACK_SLOTS,
            num_master_processor_slots: NUM_VISIBLE_MASTER_TRACK_SLOTS,
            focused_pane: FocusedPane::Grid,
        }
    }

    pub fn focused_track_and_slot(&self) -> TrackAndSlot {
        TrackAndSlot::new(self.focused_track_index, self.focused_processor_slot)
    }

    pub(crate) fn focus_on(&mut self, track_and_slot: TrackAndSlot) {
        self.focused_track_index = track_and_slot.track_index;
        self.focused_processor_slot = track_and_slot.slot;
    }

    pub fn num_processor_slots(&self, is_master: bool) -> i32 {
        if is_master {
            self.num_master_processor_slots
        } else {
            self.num_processor_slots
        }
    }

    pub(crate) fn set_num_processor_slots(&mut self, is_master: bool, num_slots: i32) {
        if is_master {
            self.num_master_processor_slots = num_slots;
        } else {
            self.num_processor_slots = num_slots;
        }
    }

    pub fn grid_view_track_offset(&self) -> i32 {
        self.grid_view_track_offset
    }

    pub fn grid_view_slot_offset(&self) -> i32 {
        self.grid_view_slot_offset
    }

    pub fn master_view_slot_offset(&self) -> i32 {
        self.master_view_slot_offset
    }

    pub fn focused_pane(&self) -> FocusedPane {
        self.focused_pane
    }

    pub fn is_grid_pane_focused(&self) -> bool {
        self.focused_pane == FocusedPane::Grid
    }

    pub(crate) fn focus_on_pane(&mut self, pane: FocusedPane) {
        self.focused_pane = pane;
    }

    /// Scroll the track window so the given track is visible. When fewer
    /// than a full window of tracks remains to the right, pull the offset
    /// back to show as many as possible.
    pub(crate) fn update_track_offset_to_include(
        &mut self,
        track_index: i32,
        num_non_master_tracks: i32,
    ) {
        if track_index < 0 {
            return;
        }
        let offset = self.grid_view_track_offset;
        if track_index >= offset + NUM_VISIBLE_TRACKS {
            self.grid_view_track_offset = track_index - NUM_VISIBLE_TRACKS + 1;
        } else if track_index < offset {
            self.grid_view_track_offset = track_index;
        } else if num_non_master_tracks - offset < NUM_VISIBLE_TRACKS
            && num_non_master_tracks >= NUM_VISIBLE_TRACKS
        {
            self.grid_view_track_offset = num_non_master_tracks - NUM_VISIBLE_TRACKS;
        }
    }

    /// Scroll the relevant slot window so the given slot is visible.
    pub(crate) fn update_slot_offset_to_include(&mut self, slot: i32, is_master: bool) {
        if slot < 0 {
            return;
        }
        if is_master {
            let offset = self.master_view_slot_offset;
            if slot >= offset + NUM_VISIBLE_MASTER_TRACK_SLOTS {
                self.master_view_slot_offset = slot - NUM_VISIBLE_MASTER_TRACK_SLOTS + 1;
            } else if slot < offset {
                self.master_view_slot_offset = slot;
            }
        } else {
            let offset = self.grid_view_slot_offset;
            if slot >= offset + NUM_VISIBLE_NON_MASTER_TRACK_SLOTS {
                self.grid_view_slot_offset = slot - NUM_VISIBLE_NON_MASTER_TRACK_SLOTS + 1;
            } else if slot < offset {
                self.grid_view_slot_offset = slot;
            }
        }
    }
}

impl Default for View {
    fn default() -> View {
        View::new()
    }
}
