use crate::core::document::connection::{Connection, ConnectionEndpoint};
use crate::core::document::document::Document;
use crate::core::document::documenterror::DocumentError;
use crate::core::document::event::{coalesce_events, DocumentEvent, RemovedProcessor};
use crate::core::document::validation::find_document_error;
use crate::core::revision::Revisable;

use super::testobjects::{
    add_bare_track, add_lane_processor, add_track_output, document_with_master, gain, reverb,
};

#[test]
fn healthy_documents_have_no_error() {
    let document = Document::new();
    assert_eq!(find_document_error(&document), None);

    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_track_output(&mut document, track);
    add_lane_processor(&mut document, &gain(), track, 0);
    assert_eq!(find_document_error(&document), None);
}

#[test]
fn slot_collisions_are_detected() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_lane_processor(&mut document, &gain(), track, 2);
    add_lane_processor(&mut document, &reverb(), track, 2);
    // make_slots_valid repaired the collision on the way in
    assert_eq!(find_document_error(&document), None);

    // force a collision behind the repair's back
    let reverb_id = document
        .track(track)
        .unwrap()
        .lane()
        .processor_at_slot(3)
        .unwrap()
        .id();
    let mut processor = document
        .track_mut(track)
        .unwrap()
        .lane_mut()
        .remove(reverb_id)
        .unwrap();
    processor.set_slot(2);
    document.track_mut(track).unwrap().lane_mut().insert(processor);
    let track_id = document.track(track).unwrap().id();
    assert_eq!(
        find_document_error(&document),
        Some(DocumentError::SlotCollision {
            track: track_id,
            slot: 2
        })
    );
}

#[test]
fn cycles_are_detected() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let a = add_lane_processor(&mut document, &gain(), track, 0);
    let b = add_lane_processor(&mut document, &reverb(), track, 1);
    let a_node = document.processor(a).unwrap().node_id();
    let b_node = document.processor(b).unwrap().node_id();

    document.add_connection(Connection::default_between(a_node, b_node, 0));
    assert_eq!(find_document_error(&document), None);

    document.add_connection(Connection::default_between(b_node, a_node, 0));
    assert!(matches!(
        find_document_error(&document),
        Some(DocumentError::CircularDependency { .. })
    ));
}

#[test]
fn out_of_range_channels_are_detected() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let a = add_lane_processor(&mut document, &gain(), track, 0);
    let b = add_lane_processor(&mut document, &reverb(), track, 1);
    let a_node = document.processor(a).unwrap().node_id();
    let b_node = document.processor(b).unwrap().node_id();

    document.add_connection(Connection::default_between(a_node, b_node, 5));
    assert_eq!(
        find_document_error(&document),
        Some(DocumentError::BadChannel {
            node_id: a_node,
            channel: 5
        })
    );
}

#[test]
fn coalescing_cancels_add_then_remove_pairs() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let a = add_lane_processor(&mut document, &gain(), track, 0);
    let a_node = document.processor(a).unwrap().node_id();
    let b = add_lane_processor(&mut document, &reverb(), track, 1);
    let b_node = document.processor(b).unwrap().node_id();

    let connection = Connection::default_between(a_node, b_node, 0);
    let events = vec![
        DocumentEvent::ProcessorAdded(a),
        DocumentEvent::ConnectionAdded(connection),
        DocumentEvent::ConnectionRemoved(connection),
        DocumentEvent::ProcessorRemoved(RemovedProcessor {
            id: a,
            node_id: a_node,
            descriptor_id: "test:gain".to_string(),
            device_name: None,
        }),
    ];
    let coalesced = coalesce_events(events);
    assert!(coalesced.is_empty());

    // remove-then-add survives; it is a restoration, not a cancellation
    let events = vec![
        DocumentEvent::ConnectionRemoved(connection),
        DocumentEvent::ConnectionAdded(connection),
    ];
    assert_eq!(coalesce_events(events).len(), 2);
}

#[test]
fn connection_revision_ignores_ordering() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let a = add_lane_processor(&mut document, &gain(), track, 0);
    let b = add_lane_processor(&mut document, &reverb(), track, 1);
    let a_node = document.processor(a).unwrap().node_id();
    let b_node = document.processor(b).unwrap().node_id();

    let first = Connection::default_between(a_node, b_node, 0);
    let second = Connection::new(
        ConnectionEndpoint::new(a_node, 1),
        ConnectionEndpoint::new(b_node, 1),
        true,
    );

    let mut forward = document.connections().clone();
    forward.add(first);
    forward.add(second);
    let mut backward = document.connections().clone();
    backward.add(second);
    backward.add(first);
    assert_eq!(forward.revision(), backward.revision());

    let mut different = document.connections().clone();
    different.add(first);
    assert_ne!(forward.revision(), different.revision());
}
