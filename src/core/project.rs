use std::time::Duration;

use crate::core::actions::action::{Action, Composite};
use crate::core::actions::connectionactions::CreateOrDeleteConnections;
use crate::core::actions::createprocessor::CreateProcessor;
use crate::core::actions::createtrack::CreateTrack;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::deleteselecteditems::DeleteSelectedItems;
use crate::core::actions::insert::Insert;
use crate::core::actions::moveselecteditems::MoveSelectedItems;
use crate::core::actions::select::Select;
use crate::core::actions::undo::UndoManager;
use crate::core::document::connection::{Connection, ConnectionEndpoint, NodeId};
use crate::core::document::document::Document;
use crate::core::document::event::{coalesce_events, DocumentListener};
use crate::core::document::processor::{builtin, Processor, ProcessorId, WindowPlacement};
use crate::core::document::track::Track;
use crate::core::document::validation::find_document_error;
use crate::core::document::view::{FocusedPane, TrackAndSlot};
use crate::core::engine::coordinator::{CoordinatorError, GraphCoordinator};
use crate::core::engine::drag::{provisional_move, DragState};
use crate::core::engine::host::{
    AudioDeviceManager, MidiInputMultiplexer, PluginDescriptor, PluginError, PluginManager,
};
use crate::core::engine::livegraph::LiveGraph;

#[derive(Debug)]
pub enum ProjectError {
    PluginInstantiation {
        processor: ProcessorId,
        error: PluginError,
    },
}

impl From<CoordinatorError> for ProjectError {
    fn from(error: CoordinatorError) -> ProjectError {
        match error {
            CoordinatorError::PluginInstantiation { processor, error } => {
                ProjectError::PluginInstantiation { processor, error }
            }
        }
    }
}

/// The clipboard payload captured from the current selection.
pub struct CopiedState {
    tracks: Vec<Track>,
}

impl CopiedState {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

/// Owns the document, the undo history and the graph coordinator, and
/// exposes the command surface. Every command builds an action, performs
/// it, routes the resulting events into the coordinator and listeners,
/// and commits the action to the undo history as one unit. A command
/// whose plugin instantiation fails is rolled back and never committed.
pub struct Project {
    document: Document,
    undo_manager: UndoManager,
    coordinator: GraphCoordinator,
    listeners: Vec<Box<dyn DocumentListener>>,
    drag: DragState,
    copied_state: Option<CopiedState>,
}

impl Project {
    pub fn new(
        plugin_manager: Box<dyn PluginManager>,
        device_manager: Box<dyn AudioDeviceManager>,
        controller_surface: Option<Box<dyn MidiInputMultiplexer>>,
    ) -> Result<Project, ProjectError> {
        let mut project = Project {
            document: Document::new(),
            undo_manager: UndoManager::new(),
            coordinator: GraphCoordinator::new(plugin_manager, device_manager, controller_surface),
            listeners: Vec::new(),
            drag: DragState::Idle,
            copied_state: None,
        };
        project.initialize_default()?;
        Ok(project)
    }

    /// Create the ambient processors every project starts with: the
    /// system audio I/O, a MIDI input per enabled device, and the master
    /// track with its input and mixer channel. None of this is undoable.
    fn initialize_default(&mut self) -> Result<(), ProjectError> {
        let audio_input = self.build_processor(&PluginDescriptor::audio_input(), -1, None);
        self.document.add_input_processor(audio_input);
        let audio_output = self.build_processor(&PluginDescriptor::audio_output(), -1, None);
        self.document.add_output_processor(audio_output);

        let device_names = self.coordinator.device_manager().midi_input_device_names();
        for device_name in device_names {
            let processor =
                self.build_processor(&PluginDescriptor::midi_input(), -1, Some(device_name));
            self.document.add_input_processor(processor);
        }

        let master_id = self.document.next_track_id();
        let master = Track::new(master_id, "Master".to_string(), "ff616161".to_string(), true);
        let master_index = self.document.num_tracks();
        self.document.add_track(master_index, master);
        let input = self.build_processor(&PluginDescriptor::track_input(), -1, None);
        self.document.set_track_input_processor(master_index, input);
        let output = self.build_processor(&PluginDescriptor::track_output(), -1, None);
        let master_output_node = output.node_id();
        self.document
            .set_track_output_processor(master_index, output);

        // The master mixer feeds the device output. Default derivation
        // stops at the master, so this edge is authored once, as custom.
        if let Some(audio_output_node) = self
            .document
            .output()
            .audio_output_processor()
            .map(|p| p.node_id())
        {
            for channel in 0..2 {
                self.document.add_connection(Connection::new(
                    ConnectionEndpoint::new(master_output_node, channel),
                    ConnectionEndpoint::new(audio_output_node, channel),
                    true,
                ));
            }
        }

        self.drain_and_apply()
    }

    fn build_processor(
        &mut self,
        descriptor: &PluginDescriptor,
        slot: i32,
        device_name: Option<String>,
    ) -> Processor {
        let id = self.document.next_processor_id();
        let node_id = self.document.next_node_id();
        let mut processor = Processor::new(
            id,
            node_id,
            descriptor.id.clone(),
            descriptor.name.clone(),
            slot,
            descriptor.num_input_channels,
            descriptor.num_output_channels,
            descriptor.accepts_midi,
            descriptor.produces_midi,
        );
        processor.set_device_name(device_name);
        processor
    }

    // ------------------------------------------------------------------
    // accessors

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn coordinator(&self) -> &GraphCoordinator {
        &self.coordinator
    }

    pub fn live_graph(&self) -> &LiveGraph {
        self.coordinator.live_graph()
    }

    pub fn copied_state(&self) -> Option<&CopiedState> {
        self.copied_state.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn add_listener(&mut self, listener: Box<dyn DocumentListener>) {
        self.listeners.push(listener);
    }

    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    // ------------------------------------------------------------------
    // event routing

    fn drain_and_apply(&mut self) -> Result<(), ProjectError> {
        let events = coalesce_events(self.document.take_events());
        let result = self.coordinator.apply_events(&mut self.document, events.clone());
        for event in &events {
            for listener in &mut self.listeners {
                listener.document_changed(&self.document, event);
            }
        }
        result.map_err(ProjectError::from)
    }

    fn commit(&mut self, mut action: Box<dyn Action>) -> Result<bool, ProjectError> {
        if !action.perform(&mut self.document) {
            self.drain_and_apply()?;
            return Ok(false);
        }
        match self.drain_and_apply() {
            Ok(()) => {
                self.undo_manager.commit(action);
                debug_assert_eq!(find_document_error(&self.document), None);
                Ok(true)
            }
            Err(error) => {
                action.undo(&mut self.document);
                let _ = self.drain_and_apply();
                Err(error)
            }
        }
    }

    pub fn undo(&mut self) -> Result<bool, ProjectError> {
        if !self.undo_manager.undo(&mut self.document) {
            return Ok(false);
        }
        self.drain_and_apply()?;
        debug_assert_eq!(find_document_error(&self.document), None);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, ProjectError> {
        if !self.undo_manager.redo(&mut self.document) {
            return Ok(false);
        }
        self.drain_and_apply()?;
        debug_assert_eq!(find_document_error(&self.document), None);
        Ok(true)
    }

    /// One tick of the adaptive parameter flush. Returns the delay until
    /// the next tick should run.
    pub fn tick(&mut self) -> Result<Duration, ProjectError> {
        let (_, next) = self.coordinator.flush_parameter_values(&mut self.document);
        self.drain_and_apply()?;
        Ok(next)
    }

    /// Reconcile the external MIDI processors with the device manager's
    /// current device lists: processors for absent devices are removed
    /// (with their connections), newly present devices gain one. Not
    /// undoable, like the rest of the ambient I/O.
    pub fn sync_io_devices(&mut self) -> Result<(), ProjectError> {
        let input_devices = self.coordinator.device_manager().midi_input_device_names();
        let output_devices = self.coordinator.device_manager().midi_output_device_names();

        let stale_inputs: Vec<ProcessorId> = self
            .document
            .input()
            .midi_input_processors()
            .filter(|p| {
                p.device_name()
                    .map(|d| !input_devices.iter().any(|name| name == d))
                    .unwrap_or(true)
            })
            .map(|p| p.id())
            .collect();
        for id in stale_inputs {
            self.remove_external_processor_connections(id);
            self.document.remove_input_processor(id);
        }
        let stale_outputs: Vec<ProcessorId> = self
            .document
            .output()
            .midi_output_processors()
            .filter(|p| {
                p.device_name()
                    .map(|d| !output_devices.iter().any(|name| name == d))
                    .unwrap_or(true)
            })
            .map(|p| p.id())
            .collect();
        for id in stale_outputs {
            self.remove_external_processor_connections(id);
            self.document.remove_output_processor(id);
        }

        for device_name in input_devices {
            if self
                .document
                .input()
                .midi_input_processor_for_device(&device_name)
                .is_none()
            {
                let processor =
                    self.build_processor(&PluginDescriptor::midi_input(), -1, Some(device_name));
                self.document.add_input_processor(processor);
            }
        }
        for device_name in output_devices {
            let present = self
                .document
                .output()
                .midi_output_processors()
                .any(|p| p.device_name() == Some(device_name.as_str()));
            if !present {
                let processor =
                    self.build_processor(&PluginDescriptor::midi_output(), -1, Some(device_name));
                self.document.add_output_processor(processor);
            }
        }

        self.drain_and_apply()
    }

    fn remove_external_processor_connections(&mut self, processor_id: ProcessorId) {
        let Some(node_id) = self.document.processor(processor_id).map(|p| p.node_id()) else {
            return;
        };
        let connections = self
            .document
            .connections()
            .for_node(node_id, None, true, true, true, true);
        for connection in connections {
            self.document.remove_connection_matching(&connection);
        }
    }

    // ------------------------------------------------------------------
    // track and processor commands

    /// Append a new track (with its input and mixer channel) after the
    /// last non-master track, select it and focus it.
    pub fn insert_track(&mut self) -> Result<bool, ProjectError> {
        let insert_index = self.document.num_non_master_tracks();
        let mut create_track = CreateTrack::new(insert_index, false);
        create_track.perform(&mut self.document);
        let mut create_input =
            CreateProcessor::new(PluginDescriptor::track_input(), insert_index, -1);
        create_input.perform(&mut self.document);
        let mut create_output =
            CreateProcessor::new(PluginDescriptor::track_output(), insert_index, -1);
        create_output.perform(&mut self.document);

        let select = Select::track(&self.document, insert_index, true, true);
        let new_focus = select.new_focus();
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, Some(new_focus));

        create_output.undo(&mut self.document);
        create_input.undo(&mut self.document);
        create_track.undo(&mut self.document);

        let mut composite = Composite::new("InsertTrack");
        composite.push(Box::new(create_track));
        composite.push(Box::new(create_input));
        composite.push(Box::new(create_output));
        composite.push(Box::new(select));
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    /// Create the focused track's mixer channel if it is missing.
    pub fn add_mixer_channel(&mut self) -> Result<bool, ProjectError> {
        let focused = self.document.view().focused_track_and_slot();
        if focused.track_index < 0 {
            return Ok(false);
        }
        let track_index = focused.track_index as usize;
        let Some(track) = self.document.track(track_index) else {
            return Ok(false);
        };
        if track.output_processor().is_some() {
            return Ok(false);
        }
        let mut create =
            CreateProcessor::new(PluginDescriptor::track_output(), track_index, -1);
        create.perform(&mut self.document);
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, None);
        create.undo(&mut self.document);

        let mut composite = Composite::new("AddMixerChannel");
        composite.push(Box::new(create));
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    /// Create a processor at a slot of the focused track, select it and
    /// rewire defaults around it.
    pub fn create_processor(
        &mut self,
        descriptor: PluginDescriptor,
        slot: i32,
    ) -> Result<bool, ProjectError> {
        let focused = self.document.view().focused_track_and_slot();
        let track_index = focused.track_index.max(0) as usize;
        self.create_processor_at(descriptor, track_index, slot)
    }

    pub fn create_processor_at(
        &mut self,
        descriptor: PluginDescriptor,
        track_index: usize,
        slot: i32,
    ) -> Result<bool, ProjectError> {
        if track_index >= self.document.num_tracks() {
            return Ok(false);
        }
        let mut create = CreateProcessor::new(descriptor, track_index, slot);
        if !create.perform(&mut self.document) {
            self.drain_and_apply()?;
            return Ok(false);
        }
        let select = if slot >= 0 {
            Some(Select::processor_slot(
                &self.document,
                track_index,
                slot,
                true,
                true,
            ))
        } else {
            None
        };
        let focus_override = select.as_ref().map(|s| s.new_focus());
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, focus_override);
        create.undo(&mut self.document);

        let mut composite = Composite::new("CreateProcessor");
        composite.push(Box::new(create));
        if let Some(select) = select {
            composite.push(Box::new(select));
        }
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    pub fn delete_selected(&mut self) -> Result<bool, ProjectError> {
        let action = DeleteSelectedItems::new(&mut self.document);
        if action.is_empty() {
            self.drain_and_apply()?;
            return Ok(false);
        }
        self.commit(Box::new(action))
    }

    /// Capture the current selection into the copy buffer, refreshing
    /// each processor's state blob from its live instance first.
    pub fn copy_selected(&mut self) -> Result<bool, ProjectError> {
        self.coordinator
            .save_processor_state_information(&mut self.document);
        self.drain_and_apply()?;
        let tracks = self.document.copy_selected_tracks();
        if tracks.is_empty() {
            return Ok(false);
        }
        self.copied_state = Some(CopiedState { tracks });
        Ok(true)
    }

    pub fn duplicate_selected(&mut self) -> Result<bool, ProjectError> {
        self.coordinator
            .save_processor_state_information(&mut self.document);
        self.drain_and_apply()?;
        let copied = self.document.copy_selected_tracks();
        if copied.is_empty() {
            return Ok(false);
        }
        let Some(action) = Insert::new(&mut self.document, true, &copied, TrackAndSlot::new(0, 0))
        else {
            self.drain_and_apply()?;
            return Ok(false);
        };
        self.commit(Box::new(action))
    }

    pub fn paste(&mut self, to: TrackAndSlot) -> Result<bool, ProjectError> {
        let Some(copied) = self.copied_state.take() else {
            return Ok(false);
        };
        let action = Insert::new(&mut self.document, false, copied.tracks(), to);
        self.copied_state = Some(copied);
        let Some(action) = action else {
            self.drain_and_apply()?;
            return Ok(false);
        };
        self.commit(Box::new(action))
    }

    // ------------------------------------------------------------------
    // processor property commands

    pub fn toggle_bypass(&mut self, processor_id: ProcessorId) -> Result<bool, ProjectError> {
        let Some(processor) = self.document.processor(processor_id) else {
            return Ok(false);
        };
        let bypassed = !processor.is_bypassed();
        self.commit(Box::new(SetProcessorBypassed {
            processor_id,
            bypassed,
        }))
    }

    pub fn set_default_connections_allowed(
        &mut self,
        processor_id: ProcessorId,
        allowed: bool,
    ) -> Result<bool, ProjectError> {
        let Some(processor) = self.document.processor(processor_id) else {
            return Ok(false);
        };
        if processor.default_connections_allowed() == allowed {
            return Ok(false);
        }
        let mut set = SetDefaultConnectionsAllowed {
            processor_id,
            allowed,
        };
        set.perform(&mut self.document);
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, None);
        set.undo(&mut self.document);

        let mut composite = Composite::new("SetDefaultConnectionsAllowed");
        composite.push(Box::new(set));
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    /// Point an external I/O processor at a different device. The device
    /// manager picks the change up through the coordinator.
    pub fn set_device_name(
        &mut self,
        processor_id: ProcessorId,
        device_name: &str,
    ) -> Result<(), ProjectError> {
        self.document
            .set_device_name(processor_id, Some(device_name.to_string()));
        self.drain_and_apply()
    }

    /// Record where a processor's plugin window was placed. Carried with
    /// the processor through copy and undo, never interpreted here.
    pub fn set_window_placement(
        &mut self,
        processor_id: ProcessorId,
        placement: WindowPlacement,
    ) -> Result<(), ProjectError> {
        self.document.set_window_placement(processor_id, placement);
        self.drain_and_apply()
    }

    /// Document-side parameter write; pushed to the live instance
    /// synchronously.
    pub fn set_parameter_value(
        &mut self,
        processor_id: ProcessorId,
        index: usize,
        value: f32,
    ) -> Result<(), ProjectError> {
        self.document.set_parameter_value(processor_id, index, value);
        self.drain_and_apply()
    }

    pub fn focus_on_pane(&mut self, pane: FocusedPane) {
        self.document.focus_on_pane(pane);
    }

    pub fn set_num_processor_slots(&mut self, is_master: bool, num_slots: i32) {
        self.document.set_num_processor_slots(is_master, num_slots);
    }

    // ------------------------------------------------------------------
    // connection commands

    /// Add a user-authored connection. Returns false (with no mutation)
    /// if the connection is invalid: bad channels, duplicate, or cycle.
    pub fn add_custom_connection(&mut self, connection: Connection) -> Result<bool, ProjectError> {
        let Some(mut create) =
            CreateOrDeleteConnections::create_connection(&self.document, connection)
        else {
            return Ok(false);
        };
        create.perform(&mut self.document);
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, None);
        create.undo(&mut self.document);

        let mut composite = Composite::new("CreateConnection");
        composite.push(Box::new(create));
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    pub fn remove_connection(&mut self, connection: &Connection) -> Result<bool, ProjectError> {
        let mut delete =
            CreateOrDeleteConnections::delete_connection(&self.document, connection, true, true);
        if delete.is_empty() {
            return Ok(false);
        }
        delete.perform(&mut self.document);
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, None);
        delete.undo(&mut self.document);

        let mut composite = Composite::new("DeleteConnection");
        composite.push(Box::new(delete));
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    pub fn disconnect_all(&mut self, processor_id: ProcessorId) -> Result<bool, ProjectError> {
        self.disconnect(processor_id, true, true)
    }

    pub fn disconnect_custom(&mut self, processor_id: ProcessorId) -> Result<bool, ProjectError> {
        self.disconnect(processor_id, false, true)
    }

    fn disconnect(
        &mut self,
        processor_id: ProcessorId,
        defaults: bool,
        custom: bool,
    ) -> Result<bool, ProjectError> {
        let mut disconnect = CreateOrDeleteConnections::disconnect_processor(
            &self.document,
            processor_id,
            None,
            defaults,
            custom,
            true,
            true,
            None,
        );
        if disconnect.is_empty() {
            return Ok(false);
        }
        disconnect.perform(&mut self.document);
        let update_connections =
            UpdateAllDefaultConnections::new(&mut self.document, false, true, None);
        disconnect.undo(&mut self.document);

        let mut composite = Composite::new("DisconnectProcessor");
        composite.push(Box::new(disconnect));
        composite.push(Box::new(update_connections));
        self.commit(Box::new(composite))
    }

    // ------------------------------------------------------------------
    // selection and focus commands

    pub fn select_processor_slot(
        &mut self,
        track_index: usize,
        slot: i32,
        deselect_others: bool,
    ) -> Result<bool, ProjectError> {
        let select = Select::processor_slot(&self.document, track_index, slot, true, deselect_others)
            .with_external_inputs_reset(&mut self.document);
        self.commit(Box::new(select))
    }

    pub fn select_track(
        &mut self,
        track_index: usize,
        deselect_others: bool,
    ) -> Result<bool, ProjectError> {
        let select = Select::track(&self.document, track_index, true, deselect_others)
            .with_external_inputs_reset(&mut self.document);
        self.commit(Box::new(select))
    }

    pub fn select_rectangle(
        &mut self,
        from: TrackAndSlot,
        to: TrackAndSlot,
    ) -> Result<bool, ProjectError> {
        let select = Select::rectangle(&self.document, from, to)
            .with_external_inputs_reset(&mut self.document);
        self.commit(Box::new(select))
    }

    /// Shift-click: extend the selection from the focused cell to the
    /// given cell, as a rectangle between the two.
    pub fn extend_selection_to(&mut self, to: TrackAndSlot) -> Result<bool, ProjectError> {
        let from = self.document.view().focused_track_and_slot();
        self.select_rectangle(from, to)
    }

    pub fn navigate_left(&mut self) -> Result<bool, ProjectError> {
        self.navigate(-1, 0)
    }

    pub fn navigate_right(&mut self) -> Result<bool, ProjectError> {
        self.navigate(1, 0)
    }

    pub fn navigate_up(&mut self) -> Result<bool, ProjectError> {
        self.navigate(0, -1)
    }

    pub fn navigate_down(&mut self) -> Result<bool, ProjectError> {
        self.navigate(0, 1)
    }

    fn navigate(&mut self, x_delta: i32, y_delta: i32) -> Result<bool, ProjectError> {
        let target = self.document.track_and_slot_with_grid_delta(x_delta, y_delta);
        if !target.is_valid() || target == self.document.view().focused_track_and_slot() {
            return Ok(false);
        }
        if target.slot < 0 {
            self.select_track(target.track_index as usize, true)
        } else {
            self.select_processor_slot(target.track_index as usize, target.slot, true)
        }
    }

    // ------------------------------------------------------------------
    // interactive drags

    /// Begin dragging the processor behind a live node. Mixer channels
    /// refuse to drag. Selects the processor, snapshots the connection
    /// set and pauses live-graph updates for the duration of the drag.
    pub fn begin_drag(
        &mut self,
        node_id: NodeId,
        start: TrackAndSlot,
    ) -> Result<bool, ProjectError> {
        if self.drag.is_dragging() {
            return Ok(false);
        }
        let Some(processor) = self.document.processor_by_node_id(node_id) else {
            return Ok(false);
        };
        if processor.descriptor_id() == builtin::TRACK_OUTPUT {
            // mixer channels could be dragged and reconnected like any old
            // processor, but please don't :)
            return Ok(false);
        }
        if start.track_index >= 0 && start.slot >= 0 {
            self.select_processor_slot(start.track_index as usize, start.slot, true)?;
        }
        let connections_snapshot = self.document.connections().snapshot();
        self.coordinator.pause_graph_updates();
        self.drag = DragState::Dragging {
            node_id,
            initial: start,
            current: start,
            connections_snapshot,
        };
        Ok(true)
    }

    /// Provisionally move the dragged processor. Returning to the initial
    /// cell restores the connection snapshot. Nothing here is undoable;
    /// the model changes while the live graph stays paused.
    pub fn drag_to(&mut self, node_id: NodeId, to: TrackAndSlot) -> Result<bool, ProjectError> {
        let (initial, current, snapshot) = match &self.drag {
            DragState::Dragging {
                node_id: dragged,
                initial,
                current,
                connections_snapshot,
            } if *dragged == node_id => (*initial, *current, connections_snapshot.clone()),
            _ => return Ok(false),
        };
        if current == to {
            return Ok(false);
        }
        provisional_move(&mut self.document, node_id, to);
        if to == initial {
            self.document.restore_connections(&snapshot);
        }
        if let DragState::Dragging { current, .. } = &mut self.drag {
            *current = to;
        }
        self.drain_and_apply()?;
        Ok(true)
    }

    /// End the drag: restore the snapshot, resume graph updates (the
    /// pending deltas cancel out), then replay the move from the initial
    /// to the final cell as a single undoable action.
    pub fn end_drag(&mut self, node_id: NodeId) -> Result<bool, ProjectError> {
        let (initial, current, snapshot) = match &self.drag {
            DragState::Dragging {
                node_id: dragged,
                initial,
                current,
                connections_snapshot,
            } if *dragged == node_id => (*initial, *current, connections_snapshot.clone()),
            _ => return Ok(false),
        };
        self.drag = DragState::Idle;

        if current == initial {
            self.drain_and_apply()?;
            self.coordinator
                .resume_graph_updates_and_apply_diff_since_pause(&self.document);
            return Ok(false);
        }

        // Put the document back the way it was before the drag, so that
        // the committed move captures the true before-state.
        provisional_move(&mut self.document, node_id, initial);
        self.document.restore_connections(&snapshot);
        self.drain_and_apply()?;
        self.coordinator
            .resume_graph_updates_and_apply_diff_since_pause(&self.document);

        let action = MoveSelectedItems::new(&mut self.document, initial, current, true);
        self.commit(Box::new(action))
    }

    /// Move the current selection by an explicit grid target, outside of
    /// any drag.
    pub fn move_selected_items(
        &mut self,
        from: TrackAndSlot,
        to: TrackAndSlot,
        make_invalid_defaults_into_custom: bool,
    ) -> Result<bool, ProjectError> {
        let action = MoveSelectedItems::new(
            &mut self.document,
            from,
            to,
            make_invalid_defaults_into_custom,
        );
        self.commit(Box::new(action))
    }
}

struct SetProcessorBypassed {
    processor_id: ProcessorId,
    bypassed: bool,
}

impl Action for SetProcessorBypassed {
    fn name(&self) -> &'static str {
        "SetProcessorBypassed"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        document.set_bypassed(self.processor_id, self.bypassed);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        document.set_bypassed(self.processor_id, !self.bypassed);
        true
    }
}

struct SetDefaultConnectionsAllowed {
    processor_id: ProcessorId,
    allowed: bool,
}

impl Action for SetDefaultConnectionsAllowed {
    fn name(&self) -> &'static str {
        "SetDefaultConnectionsAllowed"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        document.set_default_connections_allowed(self.processor_id, self.allowed);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        document.set_default_connections_allowed(self.processor_id, !self.allowed);
        true
    }
}
