use crate::core::actions::action::Action;
use crate::core::actions::connectionactions::CreateOrDeleteConnections;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::document::connection::{
    Connection, ConnectionEndpoint, MIDI_CHANNEL_INDEX,
};
use crate::core::document::defaultconnections::can_connect;
use crate::core::document::document::Document;

use super::testobjects::{
    add_bare_track, add_lane_processor, add_track_output, document_with_master, gain, reverb,
};

fn update_all(document: &mut Document) {
    let mut action = UpdateAllDefaultConnections::new(document, false, true, None);
    action.perform(document);
    document.take_events();
}

#[test]
fn can_connect_validates_channels_and_capabilities() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let reverb_id = add_lane_processor(&mut document, &reverb(), track, 2);

    let gain_node = document.processor(gain_id).unwrap().node_id();
    let reverb_node = document.processor(reverb_id).unwrap().node_id();

    assert!(can_connect(&document, gain_node, 0, reverb_node, 0));
    assert!(can_connect(&document, gain_node, 1, reverb_node, 1));
    // channel out of range
    assert!(!can_connect(&document, gain_node, 2, reverb_node, 0));
    assert!(!can_connect(&document, gain_node, -1, reverb_node, 0));
    // no self connections
    assert!(!can_connect(&document, gain_node, 0, gain_node, 1));
    // MIDI-ness must agree on both ends
    assert!(!can_connect(
        &document,
        gain_node,
        0,
        reverb_node,
        MIDI_CHANNEL_INDEX
    ));
    // neither endpoint speaks MIDI
    assert!(!can_connect(
        &document,
        gain_node,
        MIDI_CHANNEL_INDEX,
        reverb_node,
        MIDI_CHANNEL_INDEX
    ));
}

#[test]
fn duplicate_connections_are_rejected() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let reverb_id = add_lane_processor(&mut document, &reverb(), track, 2);
    let gain_node = document.processor(gain_id).unwrap().node_id();
    let reverb_node = document.processor(reverb_id).unwrap().node_id();

    document.add_connection(Connection::default_between(gain_node, reverb_node, 0));
    document.take_events();
    assert!(!can_connect(&document, gain_node, 0, reverb_node, 0));
    assert!(can_connect(&document, gain_node, 1, reverb_node, 1));
}

#[test]
fn cycle_prevention() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let a = add_lane_processor(&mut document, &gain(), track, 0);
    let b = add_lane_processor(&mut document, &reverb(), track, 2);
    let a_node = document.processor(a).unwrap().node_id();
    let b_node = document.processor(b).unwrap().node_id();

    document.add_connection(Connection::new(
        ConnectionEndpoint::new(a_node, 0),
        ConnectionEndpoint::new(b_node, 0),
        true,
    ));
    document.take_events();

    assert!(!can_connect(&document, b_node, 0, a_node, 0));
    assert!(
        CreateOrDeleteConnections::create_connection(
            &document,
            Connection::new(
                ConnectionEndpoint::new(b_node, 0),
                ConnectionEndpoint::new(a_node, 0),
                true,
            ),
        )
        .is_none()
    );
    // no mutation happened
    assert_eq!(document.connections().len(), 1);
}

#[test]
fn custom_connection_displaces_outgoing_defaults() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let reverb_id = add_lane_processor(&mut document, &reverb(), track, 3);
    update_all(&mut document);

    let gain_node = document.processor(gain_id).unwrap().node_id();
    let reverb_node = document.processor(reverb_id).unwrap().node_id();
    let output_node = document.processor(output).unwrap().node_id();
    assert!(document
        .connections()
        .connection_matching(&Connection::default_between(gain_node, reverb_node, 0))
        .is_some());

    let custom = Connection::new(
        ConnectionEndpoint::new(gain_node, 0),
        ConnectionEndpoint::new(output_node, 0),
        true,
    );
    let mut action = CreateOrDeleteConnections::create_connection(&document, custom).unwrap();
    assert!(action.perform(&mut document));
    document.take_events();

    // the defaults that left the gain are gone, the custom edge is in
    for channel in 0..2 {
        assert!(document
            .connections()
            .connection_matching(&Connection::default_between(gain_node, reverb_node, channel))
            .is_none());
    }
    let stored = document.connections().connection_matching(&custom).unwrap();
    assert!(stored.is_custom);

    action.undo(&mut document);
    for channel in 0..2 {
        assert!(document
            .connections()
            .connection_matching(&Connection::default_between(gain_node, reverb_node, channel))
            .is_some());
    }
    assert!(document.connections().connection_matching(&custom).is_none());
}

#[test]
fn delete_connection_respects_taxonomy() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    update_all(&mut document);

    let gain_node = document.processor(gain_id).unwrap().node_id();
    let output_node = document.processor(output).unwrap().node_id();
    let connection = Connection::default_between(gain_node, output_node, 0);

    let action =
        CreateOrDeleteConnections::delete_connection(&document, &connection, false, true);
    assert!(action.is_empty());

    let mut action =
        CreateOrDeleteConnections::delete_connection(&document, &connection, true, false);
    assert!(!action.is_empty());
    assert!(action.perform(&mut document));
    assert!(document
        .connections()
        .connection_matching(&connection)
        .is_none());
}
