use crate::core::actions::action::{Action, Composite};
use crate::core::actions::createprocessor::CreateProcessor;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::deleteprocessor::DeleteProcessor;
use crate::core::actions::deletetrack::DeleteTrack;
use crate::core::document::connection::{Connection, ConnectionEndpoint};

use super::testobjects::{
    add_bare_track, add_lane_processor, add_track_output, broken, document_with_master,
    fingerprint, gain, make_project, reverb,
};

#[test]
fn undo_delete_restores_connections() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let reverb_id = add_lane_processor(&mut document, &reverb(), track, 5);

    let gain_node = document.processor(gain_id).unwrap().node_id();
    let reverb_node = document.processor(reverb_id).unwrap().node_id();
    let output_node = document.processor(output).unwrap().node_id();
    let master_input_node = document
        .master_track()
        .unwrap()
        .input_processor()
        .unwrap()
        .node_id();

    // two incoming defaults, two outgoing (one default, one custom), and
    // one more custom outgoing to the master input
    document.add_connection(Connection::default_between(gain_node, reverb_node, 0));
    document.add_connection(Connection::default_between(gain_node, reverb_node, 1));
    document.add_connection(Connection::default_between(reverb_node, output_node, 0));
    document.add_connection(Connection::new(
        ConnectionEndpoint::new(reverb_node, 1),
        ConnectionEndpoint::new(output_node, 1),
        true,
    ));
    document.add_connection(Connection::new(
        ConnectionEndpoint::new(reverb_node, 0),
        ConnectionEndpoint::new(master_input_node, 0),
        true,
    ));
    document.take_events();

    let before = fingerprint(&document);

    let mut action = DeleteProcessor::new(&document, reverb_id).unwrap();
    assert!(action.perform(&mut document));
    assert!(document.processor(reverb_id).is_none());
    assert_eq!(document.connections().len(), 0);

    assert!(action.undo(&mut document));
    let restored = document.processor(reverb_id).unwrap();
    assert_eq!(restored.node_id(), reverb_node);
    assert_eq!(document.connections().len(), 5);
    assert_eq!(fingerprint(&document), before);
}

#[test]
fn create_processor_undo_round_trip() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_track_output(&mut document, track);
    add_lane_processor(&mut document, &gain(), track, 0);
    {
        let mut update = UpdateAllDefaultConnections::new(&mut document, false, true, None);
        update.perform(&mut document);
    }
    document.take_events();

    let before = fingerprint(&document);

    let mut create = CreateProcessor::new(reverb(), track, 3);
    create.perform(&mut document);
    let update = UpdateAllDefaultConnections::new(&mut document, false, true, None);
    create.undo(&mut document);
    assert_eq!(fingerprint(&document), before);

    let mut composite = Composite::new("CreateProcessor");
    composite.push(Box::new(create));
    composite.push(Box::new(update));

    assert!(composite.perform(&mut document));
    let performed = fingerprint(&document);
    assert_ne!(performed, before);

    assert!(composite.undo(&mut document));
    assert_eq!(fingerprint(&document), before);

    // redo reproduces exactly the performed state, node ids included
    assert!(composite.perform(&mut document));
    assert_eq!(fingerprint(&document), performed);
}

#[test]
fn delete_track_undo_round_trip() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let gain_node = document.processor(gain_id).unwrap().node_id();
    let output_node = document.processor(output).unwrap().node_id();
    document.add_connection(Connection::default_between(gain_node, output_node, 0));
    document.take_events();

    let before = fingerprint(&document);
    let track_id = document.track(track).unwrap().id();

    let mut action = DeleteTrack::new(&mut document, track_id).unwrap();
    assert_eq!(fingerprint(&document), before);

    assert!(action.perform(&mut document));
    assert!(document.index_of_track(track_id).is_none());
    assert_eq!(document.connections().len(), 0);

    assert!(action.undo(&mut document));
    assert_eq!(fingerprint(&document), before);
}

#[test]
fn plugin_failure_rolls_back_the_action() {
    let mut project = make_project();
    project.insert_track().unwrap();
    let before = fingerprint(project.document());

    let result = project.create_processor_at(broken(), 0, 0);
    assert!(result.is_err());
    assert_eq!(fingerprint(project.document()), before);
    // the failed action was never committed; undo still undoes insert_track
    assert!(project.can_undo());
    project.undo().unwrap();
    assert_eq!(project.document().num_non_master_tracks(), 0);
}

#[test]
fn commit_discards_redo_tail() {
    let mut project = make_project();
    project.insert_track().unwrap();
    project.insert_track().unwrap();
    assert_eq!(project.document().num_non_master_tracks(), 2);

    project.undo().unwrap();
    assert_eq!(project.document().num_non_master_tracks(), 1);
    assert!(project.can_redo());

    project.insert_track().unwrap();
    assert!(!project.can_redo());
    assert_eq!(project.document().num_non_master_tracks(), 2);
}

#[test]
fn project_undo_round_trips_through_the_live_graph() {
    let mut project = make_project();
    project.insert_track().unwrap();
    let nodes_before = project.live_graph().num_nodes();
    let edges_before = project.live_graph().num_edges();

    project.create_processor_at(gain(), 0, 0).unwrap();
    assert_eq!(project.live_graph().num_nodes(), nodes_before + 1);

    project.undo().unwrap();
    assert_eq!(project.live_graph().num_nodes(), nodes_before);
    assert_eq!(project.live_graph().num_edges(), edges_before);

    project.redo().unwrap();
    assert_eq!(project.live_graph().num_nodes(), nodes_before + 1);
}
