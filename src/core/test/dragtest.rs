use std::time::Duration;

use crate::core::document::view::TrackAndSlot;
use crate::core::engine::coordinator::FlushTimer;
use crate::core::engine::livegraph::LiveEdge;

use super::testobjects::{gain, make_project, reverb};

fn sorted_edges(edges: Vec<LiveEdge>) -> Vec<LiveEdge> {
    let mut edges = edges;
    edges.sort_by_key(|e| {
        (
            e.source_node.value(),
            e.source_channel,
            e.destination_node.value(),
            e.destination_channel,
        )
    });
    edges
}

#[test]
fn paused_drag_coalesces_to_nothing() {
    let mut project = make_project();
    project.insert_track().unwrap();
    project.create_processor_at(gain(), 0, 0).unwrap();
    project.create_processor_at(reverb(), 0, 3).unwrap();

    let gain_node = project
        .document()
        .track(0)
        .unwrap()
        .lane()
        .processor_at_slot(0)
        .unwrap()
        .node_id();

    project.begin_drag(gain_node, TrackAndSlot::new(0, 0)).unwrap();
    let edges_at_drag_start = sorted_edges(project.live_graph().edges_snapshot());
    let connections_before = project.document().connections().len();

    // drag away and back; the model churns, the live graph must not
    project.drag_to(gain_node, TrackAndSlot::new(0, 5)).unwrap();
    assert_eq!(
        sorted_edges(project.live_graph().edges_snapshot()),
        edges_at_drag_start
    );
    project.drag_to(gain_node, TrackAndSlot::new(0, 0)).unwrap();
    project.end_drag(gain_node).unwrap();

    assert!(!project.is_dragging());
    assert_eq!(
        sorted_edges(project.live_graph().edges_snapshot()),
        edges_at_drag_start
    );
    assert_eq!(project.document().connections().len(), connections_before);
}

#[test]
fn drag_commits_one_undoable_move() {
    let mut project = make_project();
    project.insert_track().unwrap();
    project.create_processor_at(gain(), 0, 0).unwrap();

    let gain_node = project
        .document()
        .track(0)
        .unwrap()
        .lane()
        .processor_at_slot(0)
        .unwrap()
        .node_id();

    project.begin_drag(gain_node, TrackAndSlot::new(0, 0)).unwrap();
    project.drag_to(gain_node, TrackAndSlot::new(0, 2)).unwrap();
    project.drag_to(gain_node, TrackAndSlot::new(0, 4)).unwrap();
    project.end_drag(gain_node).unwrap();

    let lane = project.document().track(0).unwrap().lane();
    assert!(lane.processor_at_slot(4).is_some());
    assert!(lane.processor_at_slot(0).is_none());

    // the whole drag undoes as one step
    project.undo().unwrap();
    let lane = project.document().track(0).unwrap().lane();
    assert!(lane.processor_at_slot(0).is_some());
    assert!(lane.processor_at_slot(4).is_none());
}

#[test]
fn mixer_channel_refuses_to_drag() {
    let mut project = make_project();
    project.insert_track().unwrap();
    let output_node = project
        .document()
        .track(0)
        .unwrap()
        .output_processor()
        .unwrap()
        .node_id();
    assert!(!project.begin_drag(output_node, TrackAndSlot::new(0, 0)).unwrap());
    assert!(!project.is_dragging());
}

#[test]
fn flush_timer_backs_off_additively() {
    let mut timer = FlushTimer::new();
    assert_eq!(timer.next_interval(true), Duration::from_millis(20));
    // idle ticks back off toward half a second, 20 ms at a time
    assert_eq!(timer.next_interval(false), Duration::from_millis(50));
    assert_eq!(timer.next_interval(false), Duration::from_millis(70));
    let mut last = Duration::from_millis(70);
    for _ in 0..30 {
        let next = timer.next_interval(false);
        assert!(next >= last);
        assert!(next <= Duration::from_millis(500));
        last = next;
    }
    assert_eq!(last, Duration::from_millis(500));
    assert_eq!(timer.next_interval(true), Duration::from_millis(20));
}

#[test]
fn sync_io_devices_is_idempotent() {
    let mut project = make_project();
    assert_eq!(
        project.document().input().midi_input_processors().count(),
        1
    );
    project.sync_io_devices().unwrap();
    assert_eq!(
        project.document().input().midi_input_processors().count(),
        1
    );
    assert_eq!(
        project.document().output().midi_output_processors().count(),
        0
    );
}

#[test]
fn parameter_flush_reaches_the_document() {
    let mut project = make_project();
    project.insert_track().unwrap();
    project.create_processor_at(gain(), 0, 0).unwrap();
    let gain_id = project
        .document()
        .track(0)
        .unwrap()
        .lane()
        .processor_at_slot(0)
        .unwrap()
        .id();

    // first tick flushes the registered defaults
    project.tick().unwrap();

    let wrapper = project.coordinator().wrapper(gain_id).unwrap();
    let parameter = wrapper.parameter(0).unwrap().clone();
    parameter.set_value(0.8);

    project.tick().unwrap();
    let value = project
        .document()
        .processor(gain_id)
        .unwrap()
        .parameters()[0]
        .value;
    assert_eq!(value, 0.8);
}
