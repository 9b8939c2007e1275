use crate::core::actions::action::Action;
use crate::core::actions::createprocessor::CreateProcessor;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::select::Select;
use crate::core::document::connection::{Connection, NodeId, MIDI_CHANNEL_INDEX};
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;

use super::testobjects::{
    add_bare_track, add_lane_processor, add_track_input, add_track_output, arpeggiator,
    document_with_master, gain, reverb, synth,
};

fn update_all(document: &mut Document) {
    let mut action = UpdateAllDefaultConnections::new(document, false, true, None);
    action.perform(document);
    document.take_events();
}

fn node(document: &Document, id: ProcessorId) -> NodeId {
    document.processor(id).unwrap().node_id()
}

fn has_default(document: &Document, from: NodeId, to: NodeId, channel: i32) -> bool {
    document
        .connections()
        .connection_matching(&Connection::default_between(from, to, channel))
        .map(|c| !c.is_custom)
        .unwrap_or(false)
}

fn has_any(document: &Document, from: NodeId, to: NodeId, channel: i32) -> bool {
    document
        .connections()
        .connection_matching(&Connection::default_between(from, to, channel))
        .is_some()
}

#[test]
fn default_connection_on_insert() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    update_all(&mut document);

    let gain_node = node(&document, gain_id);
    let output_node = node(&document, output);
    assert!(has_default(&document, gain_node, output_node, 0));
    assert!(has_default(&document, gain_node, output_node, 1));

    let mut create = CreateProcessor::new(reverb(), track, 5);
    assert!(create.perform(&mut document));
    update_all(&mut document);

    let reverb_node = document
        .track(track)
        .unwrap()
        .lane()
        .processor_at_slot(5)
        .unwrap()
        .node_id();
    for channel in 0..2 {
        assert!(has_default(&document, gain_node, reverb_node, channel));
        assert!(has_default(&document, reverb_node, output_node, channel));
        assert!(!has_any(&document, gain_node, output_node, channel));
    }
}

#[test]
fn track_output_flows_into_master_input() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    update_all(&mut document);

    let master = document.master_track().unwrap();
    let master_input_node = master.input_processor().unwrap().node_id();
    let output_node = node(&document, output);
    assert!(has_default(&document, output_node, master_input_node, 0));
    assert!(has_default(&document, output_node, master_input_node, 1));
}

#[test]
fn track_input_feeds_the_first_accepting_processor() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let input = add_track_input(&mut document, track);
    let output = add_track_output(&mut document, track);
    update_all(&mut document);

    // with an empty lane the track input falls through to the mixer channel
    let input_node = node(&document, input);
    let output_node = node(&document, output);
    assert!(has_default(&document, input_node, output_node, 0));

    let gain_id = add_lane_processor(&mut document, &gain(), track, 4);
    update_all(&mut document);
    let gain_node = node(&document, gain_id);
    assert!(has_default(&document, input_node, gain_node, 0));
    assert!(has_default(&document, input_node, gain_node, 1));
    assert!(!has_any(&document, input_node, output_node, 0));
}

#[test]
fn producer_below_blocks_default_path() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    let synth_id = add_lane_processor(&mut document, &synth(), track, 3);
    update_all(&mut document);

    let gain_node = node(&document, gain_id);
    let synth_node = node(&document, synth_id);
    let output_node = node(&document, output);
    // the synth accepts no audio, so the gain's output is blocked by it
    assert!(document
        .connections()
        .for_node(gain_node, None, false, true, true, true)
        .is_empty());
    assert!(has_default(&document, synth_node, output_node, 0));
}

#[test]
fn midi_default_between_lane_processors() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    add_track_output(&mut document, track);
    let arp_id = add_lane_processor(&mut document, &arpeggiator(), track, 0);
    let synth_id = add_lane_processor(&mut document, &synth(), track, 2);
    update_all(&mut document);

    let arp_node = node(&document, arp_id);
    let synth_node = node(&document, synth_id);
    assert!(has_default(
        &document,
        arp_node,
        synth_node,
        MIDI_CHANNEL_INDEX
    ));
    // the arpeggiator produces no audio, so no audio default leaves it
    assert!(!has_any(&document, arp_node, synth_node, 0));
}

#[test]
fn external_input_follows_focus() {
    let mut document = document_with_master();
    let track_a = add_bare_track(&mut document);
    add_track_output(&mut document, track_a);
    let gain_a = add_lane_processor(&mut document, &gain(), track_a, 0);
    let track_b = add_bare_track(&mut document);
    add_track_output(&mut document, track_b);
    let gain_b = add_lane_processor(&mut document, &gain(), track_b, 0);
    update_all(&mut document);

    let audio_input_node = document
        .input()
        .audio_input_processor()
        .unwrap()
        .node_id();
    let gain_a_node = node(&document, gain_a);
    let gain_b_node = node(&document, gain_b);

    let mut select = Select::processor_slot(&document, track_b, 0, true, true)
        .with_external_inputs_reset(&mut document);
    select.perform(&mut document);
    assert!(has_default(&document, audio_input_node, gain_b_node, 0));
    assert!(!has_any(&document, audio_input_node, gain_a_node, 0));

    let mut select = Select::processor_slot(&document, track_a, 0, true, true)
        .with_external_inputs_reset(&mut document);
    select.perform(&mut document);
    assert!(has_default(&document, audio_input_node, gain_a_node, 0));
    assert!(!has_any(&document, audio_input_node, gain_b_node, 0));
}

#[test]
fn disallowing_default_connections_removes_them() {
    let mut document = document_with_master();
    let track = add_bare_track(&mut document);
    let output = add_track_output(&mut document, track);
    let gain_id = add_lane_processor(&mut document, &gain(), track, 0);
    update_all(&mut document);

    let gain_node = node(&document, gain_id);
    let output_node = node(&document, output);
    assert!(has_default(&document, gain_node, output_node, 0));

    document.set_default_connections_allowed(gain_id, false);
    document.take_events();
    update_all(&mut document);
    assert!(document
        .connections()
        .for_node(gain_node, None, true, true, true, true)
        .is_empty());

    document.set_default_connections_allowed(gain_id, true);
    document.take_events();
    update_all(&mut document);
    assert!(has_default(&document, gain_node, output_node, 0));
    assert!(has_default(&document, gain_node, output_node, 1));
}
