use crate::core::document::connection::{Connection, Connections, NodeId, NodeTag};
use crate::core::document::event::{DocumentEvent, ProcessorProperty, RemovedProcessor};
use crate::core::document::input::Input;
use crate::core::document::output::Output;
use crate::core::document::processor::{Processor, ProcessorId, ProcessorTag, WindowPlacement};
use crate::core::document::slotmask::SlotMask;
use crate::core::document::track::{Track, TrackId, TrackTag};
use crate::core::document::view::{
    FocusedPane, TrackAndSlot, View, NUM_VISIBLE_NON_MASTER_TRACK_SLOTS,
};
use crate::core::uniqueid::IdGenerator;

/// The root of the document model: tracks, connections, external I/O and
/// view state. Every mutation pushes a typed event onto a pending queue
/// which the project drains to the graph coordinator and listeners after
/// each committed step.
pub struct Document {
    tracks: Vec<Track>,
    connections: Connections,
    input: Input,
    output: Output,
    view: View,
    track_ids: IdGenerator<TrackTag>,
    processor_ids: IdGenerator<ProcessorTag>,
    node_ids: IdGenerator<NodeTag>,
    events: Vec<DocumentEvent>,
}

impl Document {
    pub fn new() -> Document {
        Document {
            tracks: Vec::new(),
            connections: Connections::new(),
            input: Input::new(),
            output: Output::new(),
            view: View::new(),
            track_ids: IdGenerator::new(),
            processor_ids: IdGenerator::new(),
            node_ids: IdGenerator::new(),
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // queries

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub(crate) fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn track_by_id(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    pub fn index_of_track(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    pub fn find_track_with_uuid(&self, uuid: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.uuid() == uuid)
    }

    pub fn master_track_index(&self) -> Option<usize> {
        self.tracks.iter().position(|t| t.is_master())
    }

    pub fn master_track(&self) -> Option<&Track> {
        self.tracks.iter().find(|t| t.is_master())
    }

    pub fn num_non_master_tracks(&self) -> usize {
        if self.master_track().is_some() {
            self.tracks.len() - 1
        } else {
            self.tracks.len()
        }
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    pub fn processor(&self, id: ProcessorId) -> Option<&Processor> {
        self.tracks
            .iter()
            .find_map(|t| t.processor(id))
            .or_else(|| self.input.processor(id))
            .or_else(|| self.output.processor(id))
    }

    pub(crate) fn processor_mut(&mut self, id: ProcessorId) -> Option<&mut Processor> {
        if let Some(track_index) = self.tracks.iter().position(|t| t.processor(id).is_some()) {
            return self.tracks[track_index].processor_mut(id);
        }
        if self.input.processor(id).is_some() {
            return self.input.processor_mut(id);
        }
        self.output.processor_mut(id)
    }

    pub fn processor_by_node_id(&self, node_id: NodeId) -> Option<&Processor> {
        self.tracks
            .iter()
            .find_map(|t| t.processor_by_node_id(node_id))
            .or_else(|| self.input.processor_by_node_id(node_id))
            .or_else(|| self.output.processor_by_node_id(node_id))
    }

    pub fn track_index_for_processor(&self, id: ProcessorId) -> Option<usize> {
        self.tracks.iter().position(|t| t.processor(id).is_some())
    }

    /// The lane processor at the given cell, if any. Track-level and
    /// external I/O processors are not addressable by cell.
    pub fn processor_at(&self, track_and_slot: TrackAndSlot) -> Option<&Processor> {
        if track_and_slot.track_index < 0 {
            return None;
        }
        let track = self.track(track_and_slot.track_index as usize)?;
        track.lane().processor_at_slot(track_and_slot.slot)
    }

    pub fn focused_track(&self) -> Option<&Track> {
        let focused = self.view.focused_track_and_slot();
        if focused.track_index < 0 {
            return None;
        }
        self.track(focused.track_index as usize)
    }

    pub fn focused_processor(&self) -> Option<&Processor> {
        self.processor_at(self.view.focused_track_and_slot())
    }

    pub fn any_track_selected(&self) -> bool {
        self.tracks.iter().any(|t| t.is_selected())
    }

    pub fn any_track_has_selections(&self) -> bool {
        self.tracks.iter().any(|t| t.has_selections())
    }

    pub fn more_than_one_track_has_selections(&self) -> bool {
        self.tracks.iter().filter(|t| t.has_selections()).count() > 1
    }

    pub fn find_first_track_with_selections(&self) -> Option<usize> {
        self.tracks.iter().position(|t| t.has_selections())
    }

    pub fn find_last_track_with_selections(&self) -> Option<usize> {
        self.tracks.iter().rposition(|t| t.has_selections())
    }

    pub fn track_selections(&self) -> Vec<bool> {
        self.tracks.iter().map(|t| t.is_selected()).collect()
    }

    pub fn selected_slot_masks(&self) -> Vec<SlotMask> {
        self.tracks
            .iter()
            .map(|t| t.lane().selected_slots_mask())
            .collect()
    }

    /// Deep copies of every track that has selections: whole tracks when
    /// the track itself is selected, otherwise a stripped copy holding
    /// only the selected lane processors. This is the clipboard payload
    /// consumed by paste and duplicate.
    pub fn copy_selected_tracks(&self) -> Vec<Track> {
        let mut copies = Vec::new();
        for track in &self.tracks {
            if !track.has_selections() {
                continue;
            }
            if track.is_selected() {
                copies.push(track.clone());
            } else {
                let mut copy = track.clone();
                copy.set_input_processor(None);
                copy.set_output_processor(None);
                let unselected: Vec<ProcessorId> = copy
                    .lane()
                    .processors()
                    .iter()
                    .filter(|p| !track.is_processor_selected(p))
                    .map(|p| p.id())
                    .collect();
                for id in unselected {
                    copy.lane_mut().remove(id);
                }
                copies.push(copy);
            }
        }
        copies
    }

    // ------------------------------------------------------------------
    // grid navigation

    /// Map a (track, slot) cell to a notional grid position in which
    /// non-master tracks are columns and the master track is a single row
    /// below them.
    pub fn track_and_slot_to_grid_position(&self, track_and_slot: TrackAndSlot) -> (i32, i32) {
        let track = if track_and_slot.track_index >= 0 {
            self.track(track_and_slot.track_index as usize)
        } else {
            None
        };
        if let Some(track) = track {
            if track.is_master() {
                return (
                    track_and_slot.slot + self.view.grid_view_track_offset()
                        - self.view.master_view_slot_offset(),
                    self.view.num_processor_slots(false),
                );
            }
        }
        (track_and_slot.track_index, track_and_slot.slot)
    }

    /// Inverse of track_and_slot_to_grid_position. Positions at or below
    /// the master row resolve to the master track; positions above it
    /// resolve to lane cells, clamped to the grid. When moving up out of
    /// the master row, the target is the last visible slot of the column
    /// aligned with the master cell's x position.
    pub fn grid_position_to_track_and_slot(
        &self,
        grid_position: (i32, i32),
        allow_up_from_master: bool,
    ) -> TrackAndSlot {
        let (x, y) = grid_position;
        let num_slots = self.view.num_processor_slots(false);
        if y >= num_slots {
            if let Some(master_index) = self.master_track_index() {
                let num_master_slots = self.view.num_processor_slots(true);
                let slot = (x - self.view.grid_view_track_offset()
                    + self.view.master_view_slot_offset())
                .clamp(0, num_master_slots - 1);
                return TrackAndSlot::new(master_index as i32, slot);
            }
        }
        let num_non_master = self.num_non_master_tracks() as i32;
        if num_non_master == 0 {
            return TrackAndSlot::INVALID;
        }
        let track_index = x.clamp(0, num_non_master - 1);
        let slot = if allow_up_from_master {
            self.view.grid_view_slot_offset() + NUM_VISIBLE_NON_MASTER_TRACK_SLOTS - 1
        } else {
            y.clamp(-1, num_slots - 1)
        };
        TrackAndSlot::new(track_index, slot)
    }

    /// The cell reached from the focused cell by the given grid delta.
    pub fn track_and_slot_with_grid_delta(&self, x_delta: i32, y_delta: i32) -> TrackAndSlot {
        let mut focused = self.view.focused_track_and_slot();
        let focused_track = self.focused_track();
        if focused_track.map(|t| t.is_selected()).unwrap_or(false) {
            focused.slot = -1;
        }
        let from_master = focused_track.map(|t| t.is_master()).unwrap_or(false);
        let (x, y) = self.track_and_slot_to_grid_position(focused);
        self.grid_position_to_track_and_slot(
            (x + x_delta, y + y_delta),
            from_master && y_delta < 0,
        )
    }

    // ------------------------------------------------------------------
    // id generation

    pub(crate) fn next_track_id(&mut self) -> TrackId {
        self.track_ids.next_id()
    }

    pub(crate) fn next_processor_id(&mut self) -> ProcessorId {
        self.processor_ids.next_id()
    }

    pub(crate) fn next_node_id(&mut self) -> NodeId {
        self.node_ids.next_id()
    }

    // ------------------------------------------------------------------
    // mutations

    pub(crate) fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: DocumentEvent) {
        self.events.push(event);
    }

    pub(crate) fn add_track(&mut self, index: usize, track: Track) {
        let track_id = track.id();
        let processor_ids: Vec<ProcessorId> = track.all_processors().map(|p| p.id()).collect();
        self.tracks.insert(index.min(self.tracks.len()), track);
        self.push_event(DocumentEvent::TrackAdded(track_id));
        for id in processor_ids {
            self.push_event(DocumentEvent::ProcessorAdded(id));
        }
    }

    pub(crate) fn remove_track(&mut self, index: usize) -> Track {
        let track = self.tracks.remove(index);
        for processor in track.all_processors() {
            self.events
                .push(DocumentEvent::ProcessorRemoved(RemovedProcessor {
                    id: processor.id(),
                    node_id: processor.node_id(),
                    descriptor_id: processor.descriptor_id().to_string(),
                    device_name: processor.device_name().map(str::to_string),
                }));
        }
        self.push_event(DocumentEvent::TrackRemoved(track.id()));
        track
    }

    pub(crate) fn move_track(&mut self, from: usize, to: usize) {
        if from == to || from >= self.tracks.len() || to >= self.tracks.len() {
            return;
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        self.push_event(DocumentEvent::TrackMoved { from, to });
    }

    pub(crate) fn add_lane_processor(&mut self, track_index: usize, processor: Processor) {
        let id = processor.id();
        self.tracks[track_index].lane_mut().insert(processor);
        self.push_event(DocumentEvent::ProcessorAdded(id));
    }

    pub(crate) fn remove_lane_processor(
        &mut self,
        track_index: usize,
        id: ProcessorId,
    ) -> Option<Processor> {
        let processor = self.tracks[track_index].lane_mut().remove(id)?;
        self.events
            .push(DocumentEvent::ProcessorRemoved(RemovedProcessor {
                id: processor.id(),
                node_id: processor.node_id(),
                descriptor_id: processor.descriptor_id().to_string(),
                device_name: processor.device_name().map(str::to_string),
            }));
        Some(processor)
    }

    pub(crate) fn set_track_input_processor(&mut self, track_index: usize, processor: Processor) {
        let id = processor.id();
        debug_assert!(self.tracks[track_index].input_processor().is_none());
        self.tracks[track_index].set_input_processor(Some(processor));
        self.push_event(DocumentEvent::ProcessorAdded(id));
    }

    pub(crate) fn set_track_output_processor(&mut self, track_index: usize, processor: Processor) {
        let id = processor.id();
        debug_assert!(self.tracks[track_index].output_processor().is_none());
        self.tracks[track_index].set_output_processor(Some(processor));
        self.push_event(DocumentEvent::ProcessorAdded(id));
    }

    pub(crate) fn take_track_io_processor(
        &mut self,
        track_index: usize,
        id: ProcessorId,
    ) -> Option<Processor> {
        let track = &mut self.tracks[track_index];
        let processor = if track.input_processor().map(|p| p.id()) == Some(id) {
            track.take_input_processor()
        } else if track.output_processor().map(|p| p.id()) == Some(id) {
            track.take_output_processor()
        } else {
            None
        }?;
        self.events
            .push(DocumentEvent::ProcessorRemoved(RemovedProcessor {
                id: processor.id(),
                node_id: processor.node_id(),
                descriptor_id: processor.descriptor_id().to_string(),
                device_name: processor.device_name().map(str::to_string),
            }));
        Some(processor)
    }

    pub(crate) fn add_input_processor(&mut self, processor: Processor) {
        let id = processor.id();
        self.input.add(processor);
        self.push_event(DocumentEvent::ProcessorAdded(id));
    }

    pub(crate) fn remove_input_processor(&mut self, id: ProcessorId) -> Option<Processor> {
        let processor = self.input.remove(id)?;
        self.events
            .push(DocumentEvent::ProcessorRemoved(RemovedProcessor {
                id: processor.id(),
                node_id: processor.node_id(),
                descriptor_id: processor.descriptor_id().to_string(),
                device_name: processor.device_name().map(str::to_string),
            }));
        Some(processor)
    }

    pub(crate) fn add_output_processor(&mut self, processor: Processor) {
        let id = processor.id();
        self.output.add(processor);
        self.push_event(DocumentEvent::ProcessorAdded(id));
    }

    pub(crate) fn remove_output_processor(&mut self, id: ProcessorId) -> Option<Processor> {
        let processor = self.output.remove(id)?;
        self.events
            .push(DocumentEvent::ProcessorRemoved(RemovedProcessor {
                id: processor.id(),
                node_id: processor.node_id(),
                descriptor_id: processor.descriptor_id().to_string(),
                device_name: processor.device_name().map(str::to_string),
            }));
        Some(processor)
    }

    /// Repair slot collisions in the given track's lane, returning the
    /// (id, old_slot) of every processor whose slot changed.
    pub(crate) fn make_slots_valid(&mut self, track_index: usize) -> Vec<(ProcessorId, i32)> {
        let changed = self.tracks[track_index].lane_mut().make_slots_valid();
        for (id, _) in &changed {
            self.push_event(DocumentEvent::ProcessorChanged(*id, ProcessorProperty::Slot));
        }
        changed
    }

    pub(crate) fn set_processor_slot(&mut self, id: ProcessorId, slot: i32) {
        let Some(track_index) = self.track_index_for_processor(id) else {
            return;
        };
        let lane = self.tracks[track_index].lane_mut();
        if let Some(mut processor) = lane.remove(id) {
            processor.set_slot(slot);
            lane.insert(processor);
            self.push_event(DocumentEvent::ProcessorChanged(id, ProcessorProperty::Slot));
        }
    }

    /// Move a lane processor to another track and slot without changing its
    /// identity. Slot collisions in the target lane are not repaired here.
    pub(crate) fn move_lane_processor(
        &mut self,
        id: ProcessorId,
        to_track_index: usize,
        to_slot: i32,
    ) -> bool {
        let Some(from_track_index) = self.track_index_for_processor(id) else {
            return false;
        };
        let Some(mut processor) = self.tracks[from_track_index].lane_mut().remove(id) else {
            return false;
        };
        processor.set_slot(to_slot);
        self.tracks[to_track_index].lane_mut().insert(processor);
        self.push_event(DocumentEvent::ProcessorMoved(id));
        true
    }

    pub(crate) fn add_connection(&mut self, connection: Connection) {
        self.connections.add(connection);
        self.push_event(DocumentEvent::ConnectionAdded(connection));
    }

    pub(crate) fn remove_connection_matching(
        &mut self,
        connection: &Connection,
    ) -> Option<Connection> {
        let removed = self.connections.remove_matching(connection)?;
        self.push_event(DocumentEvent::ConnectionRemoved(removed));
        Some(removed)
    }

    /// Replace the connection set with a previously captured snapshot,
    /// emitting remove/add events only for the differences.
    pub(crate) fn restore_connections(&mut self, snapshot: &[Connection]) {
        let current = self.connections.snapshot();
        for connection in &current {
            if !snapshot.iter().any(|c| c == connection) {
                self.remove_connection_matching(connection);
            }
        }
        for connection in snapshot {
            let existing_custom = self
                .connections
                .connection_matching(connection)
                .map(|c| c.is_custom);
            match existing_custom {
                None => self.add_connection(*connection),
                Some(is_custom) if is_custom != connection.is_custom => {
                    self.remove_connection_matching(connection);
                    self.add_connection(*connection);
                }
                Some(_) => {}
            }
        }
    }

    fn push_processor_changed(&mut self, id: ProcessorId, property: ProcessorProperty) {
        self.push_event(DocumentEvent::ProcessorChanged(id, property));
    }

    pub(crate) fn set_bypassed(&mut self, id: ProcessorId, bypassed: bool) {
        if let Some(processor) = self.processor_mut(id) {
            if processor.is_bypassed() != bypassed {
                processor.set_bypassed(bypassed);
                self.push_processor_changed(id, ProcessorProperty::Bypassed);
            }
        }
    }

    pub(crate) fn set_default_connections_allowed(&mut self, id: ProcessorId, allowed: bool) {
        if let Some(processor) = self.processor_mut(id) {
            if processor.default_connections_allowed() != allowed {
                processor.set_default_connections_allowed(allowed);
                self.push_processor_changed(id, ProcessorProperty::DefaultConnectionsAllowed);
            }
        }
    }

    pub(crate) fn set_device_name(&mut self, id: ProcessorId, device_name: Option<String>) {
        if let Some(processor) = self.processor_mut(id) {
            processor.set_device_name(device_name);
            self.push_processor_changed(id, ProcessorProperty::DeviceName);
        }
    }

    pub(crate) fn set_plugin_state(&mut self, id: ProcessorId, state: Option<String>) {
        if let Some(processor) = self.processor_mut(id) {
            processor.set_plugin_state(state);
            self.push_processor_changed(id, ProcessorProperty::PluginState);
        }
    }

    pub(crate) fn set_window_placement(&mut self, id: ProcessorId, placement: WindowPlacement) {
        if let Some(processor) = self.processor_mut(id) {
            processor.set_window_placement(placement);
            self.push_processor_changed(id, ProcessorProperty::WindowPlacement);
        }
    }

    /// Register a processor's parameter set the first time it goes live.
    /// Does nothing if the entity already carries parameters.
    pub(crate) fn init_parameters(
        &mut self,
        id: ProcessorId,
        parameters: Vec<crate::core::document::processor::ParameterValue>,
    ) {
        if let Some(processor) = self.processor_mut(id) {
            if processor.parameters().is_empty() {
                processor.set_parameters(parameters);
            }
        }
    }

    pub(crate) fn set_parameter_value(&mut self, id: ProcessorId, index: usize, value: f32) {
        if let Some(processor) = self.processor_mut(id) {
            processor.set_parameter_value(index, value);
            self.push_processor_changed(id, ProcessorProperty::Parameter(index));
        }
    }

    pub(crate) fn set_track_selected(&mut self, track_index: usize, selected: bool) {
        let (changed, is_master) = {
            let track = &mut self.tracks[track_index];
            let changed = track.is_selected() != selected;
            track.set_selected(selected);
            (changed, track.is_master())
        };
        if changed {
            if selected && !is_master {
                let num_non_master = self.num_non_master_tracks() as i32;
                self.view
                    .update_track_offset_to_include(track_index as i32, num_non_master);
            }
            self.push_event(DocumentEvent::SelectionChanged);
        }
    }

    pub(crate) fn set_selected_slots_mask(&mut self, track_index: usize, mask: SlotMask) {
        let (changed, is_master) = {
            let track = &mut self.tracks[track_index];
            let changed = track.lane().selected_slots_mask() != mask;
            track.lane_mut().set_selected_slots_mask(mask);
            (changed, track.is_master())
        };
        if changed {
            if !is_master {
                let num_non_master = self.num_non_master_tracks() as i32;
                self.view
                    .update_track_offset_to_include(track_index as i32, num_non_master);
            }
            if let Some(slot) = mask.last_set() {
                self.view.update_slot_offset_to_include(slot, is_master);
            }
            self.push_event(DocumentEvent::SelectionChanged);
        }
    }

    pub(crate) fn set_focus(&mut self, track_and_slot: TrackAndSlot) {
        if self.view.focused_track_and_slot() == track_and_slot {
            return;
        }
        self.view.focus_on(track_and_slot);
        if track_and_slot.track_index >= 0 {
            let is_master = self
                .track(track_and_slot.track_index as usize)
                .map(|t| t.is_master())
                .unwrap_or(false);
            let num_non_master = self.num_non_master_tracks() as i32;
            if !is_master {
                self.view
                    .update_track_offset_to_include(track_and_slot.track_index, num_non_master);
            }
            self.view
                .update_slot_offset_to_include(track_and_slot.slot, is_master);
        }
        self.push_event(DocumentEvent::FocusChanged(track_and_slot));
    }

    pub(crate) fn focus_on_pane(&mut self, pane: FocusedPane) {
        self.view.focus_on_pane(pane);
    }

    /// Resize the slot range for master or non-master lanes. Selection
    /// bits beyond the new range are cleared.
    pub(crate) fn set_num_processor_slots(&mut self, is_master: bool, num_slots: i32) {
        self.view.set_num_processor_slots(is_master, num_slots);
        for track_index in 0..self.tracks.len() {
            if self.tracks[track_index].is_master() == is_master {
                let mut mask = self.tracks[track_index].lane().selected_slots_mask();
                mask.truncate(num_slots);
                self.set_selected_slots_mask(track_index, mask);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Document {
        Document::new()
    }
}
