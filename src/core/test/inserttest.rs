use crate::core::actions::action::Action;
use crate::core::actions::insert::Insert;
use crate::core::document::document::Document;
use crate::core::document::slotmask::SlotMask;
use crate::core::document::validation::find_document_error;
use crate::core::document::view::TrackAndSlot;

use super::testobjects::{
    add_bare_track, add_lane_processor, add_track_output, document_with_master, fingerprint, gain,
    make_project, reverb,
};

fn select_slots(document: &mut Document, track_index: usize, slots: &[i32]) {
    let mut mask = SlotMask::empty();
    for &slot in slots {
        mask.set(slot, true);
    }
    document.set_selected_slots_mask(track_index, mask);
    document.take_events();
}

#[test]
fn duplicate_shifts_copies_clear_of_the_originals() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_track_output(&mut document, track);
    add_lane_processor(&mut document, &gain(), track, 0);
    add_lane_processor(&mut document, &reverb(), track, 1);
    select_slots(&mut document, track, &[0, 1]);

    let copied = document.copy_selected_tracks();
    let before = fingerprint(&document);
    let mut action =
        Insert::new(&mut document, true, &copied, TrackAndSlot::new(0, 0)).unwrap();
    assert_eq!(fingerprint(&document), before);

    assert!(action.perform(&mut document));
    let lane = document.track(track).unwrap().lane();
    assert_eq!(lane.len(), 4);
    assert_eq!(lane.processor_at_slot(0).unwrap().name(), "Gain");
    assert_eq!(lane.processor_at_slot(1).unwrap().name(), "Reverb");
    assert_eq!(lane.processor_at_slot(2).unwrap().name(), "Gain");
    assert_eq!(lane.processor_at_slot(3).unwrap().name(), "Reverb");
    // the copies are now the selection
    let mask = document.track(track).unwrap().lane().selected_slots_mask();
    assert!(mask.get(2) && mask.get(3));
    assert!(!mask.get(0) && !mask.get(1));
    assert_eq!(find_document_error(&document), None);

    assert!(action.undo(&mut document));
    assert_eq!(fingerprint(&document), before);
}

#[test]
fn paste_creates_tracks_to_make_room() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 0);
    add_lane_processor(&mut document, &reverb(), track, 1);
    select_slots(&mut document, track, &[0, 1]);

    let copied = document.copy_selected_tracks();
    let mut action =
        Insert::new(&mut document, false, &copied, TrackAndSlot::new(1, 2)).unwrap();
    assert!(action.perform(&mut document));

    assert_eq!(document.num_non_master_tracks(), 2);
    let lane = document.track(1).unwrap().lane();
    assert_eq!(lane.processor_at_slot(2).unwrap().name(), "Gain");
    assert_eq!(lane.processor_at_slot(3).unwrap().name(), "Reverb");
    assert_eq!(find_document_error(&document), None);

    assert!(action.undo(&mut document));
    assert_eq!(document.num_non_master_tracks(), 1);
}

#[test]
fn pasting_a_selected_track_duplicates_the_whole_track() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_track_output(&mut document, track);
    add_lane_processor(&mut document, &gain(), track, 0);
    document.set_track_selected(track, true);
    let num_slots = document.view().num_processor_slots(false);
    document.set_selected_slots_mask(track, SlotMask::full(num_slots));
    document.take_events();

    let copied = document.copy_selected_tracks();
    let mut action =
        Insert::new(&mut document, false, &copied, TrackAndSlot::new(0, 0)).unwrap();
    assert!(action.perform(&mut document));

    assert_eq!(document.num_non_master_tracks(), 2);
    let new_track = document.track(1).unwrap();
    assert!(!new_track.is_master());
    assert!(new_track.output_processor().is_some());
    assert_eq!(new_track.lane().processor_at_slot(0).unwrap().name(), "Gain");
    // the copy gets its own identity
    assert_ne!(new_track.uuid(), document.track(track).unwrap().uuid());
    assert_eq!(find_document_error(&document), None);
}

#[test]
fn project_duplicate_selected() {
    let mut project = make_project();
    project.insert_track().unwrap();
    project.create_processor_at(gain(), 0, 0).unwrap();
    project.select_rectangle(TrackAndSlot::new(0, 0), TrackAndSlot::new(0, 0)).unwrap();

    assert!(project.duplicate_selected().unwrap());
    let lane = project.document().track(0).unwrap().lane();
    assert_eq!(lane.len(), 2);
    assert!(lane.processor_at_slot(0).is_some());
    assert!(lane.processor_at_slot(1).is_some());

    project.undo().unwrap();
    assert_eq!(project.document().track(0).unwrap().lane().len(), 1);
}
