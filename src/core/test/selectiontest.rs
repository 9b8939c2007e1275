use crate::core::actions::action::Action;
use crate::core::actions::select::Select;
use crate::core::document::slotmask::SlotMask;
use crate::core::document::view::{TrackAndSlot, View, NUM_VISIBLE_TRACKS};

use super::testobjects::{
    add_bare_track, add_lane_processor, document_with_master, gain, reverb,
};

#[test]
fn slot_mask_shifts_and_clips() {
    let mut mask = SlotMask::empty();
    mask.set(0, true);
    mask.set(3, true);
    assert_eq!(mask.first_set(), Some(0));
    assert_eq!(mask.last_set(), Some(3));

    mask.shift(2);
    assert!(mask.get(2) && mask.get(5));
    assert!(!mask.get(0) && !mask.get(3));

    mask.shift(-4);
    assert!(mask.get(1));
    assert_eq!(mask.iter().count(), 1);

    mask.set(6, true);
    mask.truncate(4);
    assert!(mask.get(1));
    assert!(!mask.get(6));

    assert_eq!(SlotMask::full(3).iter().collect::<Vec<i32>>(), vec![0, 1, 2]);
}

#[test]
fn rectangle_selection_covers_the_spanned_cells() {
    let mut document = document_with_master();
    let track_a = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track_a, 0);
    let track_b = add_bare_track(&mut document);
    add_lane_processor(&mut document, &reverb(), track_b, 2);

    let mut select = Select::rectangle(
        &document,
        TrackAndSlot::new(track_a as i32, 0),
        TrackAndSlot::new(track_b as i32, 2),
    );
    select.perform(&mut document);

    for track_index in [track_a, track_b] {
        let track = document.track(track_index).unwrap();
        assert!(!track.is_selected());
        let mask = track.lane().selected_slots_mask();
        assert!(mask.get(0) && mask.get(1) && mask.get(2));
        assert!(!mask.get(3));
    }
    assert_eq!(
        document.view().focused_track_and_slot(),
        TrackAndSlot::new(track_b as i32, 2)
    );

    select.undo(&mut document);
    for track_index in [track_a, track_b] {
        assert!(document
            .track(track_index)
            .unwrap()
            .lane()
            .selected_slots_mask()
            .is_empty());
    }
}

#[test]
fn selecting_a_track_selects_every_slot() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let mut select = Select::track(&document, track, true, true);
    select.perform(&mut document);

    let selected = document.track(track).unwrap();
    assert!(selected.is_selected());
    let num_slots = document.view().num_processor_slots(false);
    assert_eq!(
        selected.lane().selected_slots_mask(),
        SlotMask::full(num_slots)
    );
    assert_eq!(
        document.view().focused_track_and_slot(),
        TrackAndSlot::new(track as i32, -1)
    );
}

#[test]
fn selection_scrolls_the_track_window() {
    let mut document = document_with_master();
    for _ in 0..12 {
        add_bare_track(&mut document);
    }
    assert_eq!(document.view().grid_view_track_offset(), 0);

    let mut mask = SlotMask::empty();
    mask.set(0, true);
    document.set_selected_slots_mask(10, mask);
    assert_eq!(
        document.view().grid_view_track_offset(),
        10 - NUM_VISIBLE_TRACKS + 1
    );

    document.set_selected_slots_mask(10, SlotMask::empty());
    document.set_selected_slots_mask(0, mask);
    assert_eq!(document.view().grid_view_track_offset(), 0);
}

#[test]
fn view_slot_offset_snaps_to_the_focused_slot() {
    let mut view = View::new();
    view.update_slot_offset_to_include(9, false);
    assert_eq!(view.grid_view_slot_offset(), 3);
    view.update_slot_offset_to_include(1, false);
    assert_eq!(view.grid_view_slot_offset(), 1);
    view.update_slot_offset_to_include(-1, false);
    assert_eq!(view.grid_view_slot_offset(), 1);

    view.update_slot_offset_to_include(11, true);
    assert_eq!(view.master_view_slot_offset(), 4);
}

#[test]
fn grid_navigation_crosses_into_the_master_row() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 6);
    let master_index = document.master_track_index().unwrap() as i32;

    document.set_focus(TrackAndSlot::new(track as i32, 6));
    document.take_events();
    let below = document.track_and_slot_with_grid_delta(0, 1);
    assert_eq!(below.track_index, master_index);
    assert_eq!(below.slot, 0);

    document.set_focus(TrackAndSlot::new(master_index, 0));
    document.take_events();
    let above = document.track_and_slot_with_grid_delta(0, -1);
    assert_eq!(above, TrackAndSlot::new(track as i32, 6));
}

#[test]
fn focus_change_round_trips_through_select() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 0);
    add_lane_processor(&mut document, &reverb(), track, 1);
    document.take_events();

    let mut first = Select::processor_slot(&document, track, 0, true, true);
    first.perform(&mut document);
    assert_eq!(
        document.view().focused_track_and_slot(),
        TrackAndSlot::new(track as i32, 0)
    );

    let mut second = Select::processor_slot(&document, track, 1, true, true);
    second.perform(&mut document);
    assert!(document.track(track).unwrap().is_slot_selected(1));
    assert!(!document.track(track).unwrap().is_slot_selected(0));

    second.undo(&mut document);
    assert!(document.track(track).unwrap().is_slot_selected(0));
    assert_eq!(
        document.view().focused_track_and_slot(),
        TrackAndSlot::new(track as i32, 0)
    );
}
