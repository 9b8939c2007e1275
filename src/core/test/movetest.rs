use crate::core::actions::action::Action;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::moveselecteditems::MoveSelectedItems;
use crate::core::document::connection::{Connection, ConnectionEndpoint};
use crate::core::document::document::Document;
use crate::core::document::slotmask::SlotMask;
use crate::core::document::validation::find_document_error;
use crate::core::document::view::TrackAndSlot;

use super::testobjects::{
    add_bare_track, add_lane_processor, add_track_output, document_with_master, fingerprint, gain,
    reverb,
};

fn update_all(document: &mut Document) {
    let mut action = UpdateAllDefaultConnections::new(document, false, true, None);
    action.perform(document);
    document.take_events();
}

fn select_slot(document: &mut Document, track_index: usize, slot: i32) {
    let mut mask = SlotMask::empty();
    mask.set(slot, true);
    document.set_selected_slots_mask(track_index, mask);
    document.set_focus(TrackAndSlot::new(track_index as i32, slot));
    document.take_events();
}

#[test]
fn move_above_the_grid_clips_to_nothing() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 0);
    select_slot(&mut document, track, 0);
    let before = fingerprint(&document);

    let mut action = MoveSelectedItems::new(
        &mut document,
        TrackAndSlot::new(track as i32, 0),
        TrackAndSlot::new(track as i32, -5),
        false,
    );
    assert_eq!(fingerprint(&document), before);
    assert!(!action.perform(&mut document));
    assert_eq!(fingerprint(&document), before);
}

#[test]
fn custom_connection_survives_move() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let reverb_id = add_lane_processor(&mut document, &reverb(), track, 2);

    let gain_node = document.processor(gain_id).unwrap().node_id();
    let reverb_node = document.processor(reverb_id).unwrap().node_id();
    let output_node = document.processor(output).unwrap().node_id();

    // the user has wired the gain straight to the mixer channel
    let custom = Connection::new(
        ConnectionEndpoint::new(gain_node, 0),
        ConnectionEndpoint::new(output_node, 0),
        true,
    );
    document.add_connection(custom);
    document.take_events();
    update_all(&mut document);

    select_slot(&mut document, track, 2);
    let mut action = MoveSelectedItems::new(
        &mut document,
        TrackAndSlot::new(track as i32, 2),
        TrackAndSlot::new(track as i32, 5),
        false,
    );
    assert!(action.perform(&mut document));

    // the custom connection is untouched, the reverb found its defaults,
    // and no default was added from the gain into the reverb
    assert!(document.connections().connection_matching(&custom).unwrap().is_custom);
    assert_eq!(
        document
            .track(track)
            .unwrap()
            .lane()
            .processor_at_slot(5)
            .unwrap()
            .id(),
        reverb_id
    );
    assert!(document
        .connections()
        .connection_matching(&Connection::default_between(reverb_node, output_node, 0))
        .is_some());
    assert!(document
        .connections()
        .connection_matching(&Connection::default_between(gain_node, reverb_node, 0))
        .is_none());
    assert_eq!(find_document_error(&document), None);
}

#[test]
fn move_shifts_the_selection_mask() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 2);
    add_lane_processor(&mut document, &reverb(), track, 3);
    let mut mask = SlotMask::empty();
    mask.set(2, true);
    mask.set(3, true);
    document.set_selected_slots_mask(track, mask);
    document.set_focus(TrackAndSlot::new(track as i32, 2));
    document.take_events();

    let mut action = MoveSelectedItems::new(
        &mut document,
        TrackAndSlot::new(track as i32, 2),
        TrackAndSlot::new(track as i32, 4),
        false,
    );
    assert!(action.perform(&mut document));

    let moved_mask = document.track(track).unwrap().lane().selected_slots_mask();
    assert!(moved_mask.get(4) && moved_mask.get(5));
    assert!(!moved_mask.get(2) && !moved_mask.get(3));
    assert_eq!(
        document.view().focused_track_and_slot(),
        TrackAndSlot::new(track as i32, 4)
    );

    assert!(action.undo(&mut document));
    let restored = document.track(track).unwrap().lane().selected_slots_mask();
    assert!(restored.get(2) && restored.get(3));
    assert_eq!(find_document_error(&document), None);
}

#[test]
fn moving_onto_an_occupied_slot_repairs_slots() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 0);
    add_lane_processor(&mut document, &reverb(), track, 1);
    select_slot(&mut document, track, 0);

    let mut action = MoveSelectedItems::new(
        &mut document,
        TrackAndSlot::new(track as i32, 0),
        TrackAndSlot::new(track as i32, 1),
        false,
    );
    assert!(action.perform(&mut document));
    assert_eq!(find_document_error(&document), None);

    let lane = document.track(track).unwrap().lane();
    assert_eq!(lane.len(), 2);
    let slots: Vec<i32> = lane.processors().iter().map(|p| p.slot()).collect();
    assert_eq!(slots.len(), 2);
    assert_ne!(slots[0], slots[1]);

    assert!(action.undo(&mut document));
    let lane = document.track(track).unwrap().lane();
    assert_eq!(lane.processor_at_slot(0).unwrap().name(), "Gain");
    assert_eq!(lane.processor_at_slot(1).unwrap().name(), "Reverb");
}

#[test]
fn master_and_non_master_selections_cannot_move_together() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 0);
    let master_index = document.master_track_index().unwrap();
    add_lane_processor(&mut document, &reverb(), master_index, 0);

    let mut mask = SlotMask::empty();
    mask.set(0, true);
    document.set_selected_slots_mask(track, mask);
    document.set_selected_slots_mask(master_index, mask);
    document.take_events();

    let mut action = MoveSelectedItems::new(
        &mut document,
        TrackAndSlot::new(track as i32, 0),
        TrackAndSlot::new(track as i32, 3),
        false,
    );
    assert!(!action.perform(&mut document));
}

#[test]
fn whole_track_move_reorders_tracks() {
    let mut document = document_with_master();
    let track_a = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track_a, 0);
    let track_b = add_bare_track(&mut document);
    add_lane_processor(&mut document, &reverb(), track_b, 0);

    let track_a_id = document.track(track_a).unwrap().id();
    document.set_track_selected(track_a, true);
    let num_slots = document.view().num_processor_slots(false);
    document.set_selected_slots_mask(track_a, SlotMask::full(num_slots));
    document.set_focus(TrackAndSlot::new(track_a as i32, -1));
    document.take_events();

    let mut action = MoveSelectedItems::new(
        &mut document,
        TrackAndSlot::new(track_a as i32, -1),
        TrackAndSlot::new(track_b as i32, -1),
        false,
    );
    assert!(action.perform(&mut document));
    assert_eq!(document.index_of_track(track_a_id), Some(track_b));
    assert!(document.track(track_b).unwrap().is_selected());
    assert_eq!(find_document_error(&document), None);

    assert!(action.undo(&mut document));
    assert_eq!(document.index_of_track(track_a_id), Some(track_a));
}
