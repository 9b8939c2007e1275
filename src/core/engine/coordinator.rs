use std::collections::HashMap;
use std::time::Duration;

use crate::core::actions::connectionactions::{ConnectionEdit, CreateOrDeleteConnections};
use crate::core::document::connection::NodeId;
use crate::core::document::document::Document;
use crate::core::document::event::{DocumentEvent, ProcessorProperty, RemovedProcessor};
use crate::core::document::processor::{ParameterValue, ProcessorId};
use crate::core::engine::host::{
    AudioDeviceManager, MidiInputMultiplexer, PluginError, PluginManager,
};
use crate::core::engine::livegraph::{edge_revision_of_connections, LiveGraph};
use crate::core::engine::wrapper::ProcessorWrapper;

#[derive(Debug)]
pub enum CoordinatorError {
    PluginInstantiation {
        processor: ProcessorId,
        error: PluginError,
    },
}

/// Adaptive interval for the parameter flush: a tick that flushed
/// anything reschedules at 20 ms, an idle tick backs off additively
/// toward half a second.
pub struct FlushTimer {
    interval: Duration,
}

const FLUSH_ACTIVE_INTERVAL: Duration = Duration::from_millis(20);
const FLUSH_MIN_IDLE_INTERVAL: Duration = Duration::from_millis(50);
const FLUSH_MAX_IDLE_INTERVAL: Duration = Duration::from_millis(500);

impl FlushTimer {
    pub fn new() -> FlushTimer {
        FlushTimer {
            interval: Duration::from_millis(100),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn next_interval(&mut self, anything_updated: bool) -> Duration {
        self.interval = if anything_updated {
            FLUSH_ACTIVE_INTERVAL
        } else {
            (self.interval + Duration::from_millis(20))
                .clamp(FLUSH_MIN_IDLE_INTERVAL, FLUSH_MAX_IDLE_INTERVAL)
        };
        self.interval
    }
}

impl Default for FlushTimer {
    fn default() -> FlushTimer {
        FlushTimer::new()
    }
}

/// Keeps the live audio graph in lock-step with the document. Consumes
/// the document's event stream after every committed step: instantiates
/// and destroys plugin instances, wires MIDI input callbacks, mirrors
/// connections into the live graph, and batches connection deltas while
/// paused during interactive drags.
pub struct GraphCoordinator {
    plugin_manager: Box<dyn PluginManager>,
    device_manager: Box<dyn AudioDeviceManager>,
    controller_surface: Option<Box<dyn MidiInputMultiplexer>>,
    live_graph: LiveGraph,
    wrappers: HashMap<ProcessorId, ProcessorWrapper>,
    graph_updates_paused: bool,
    connections_since_pause: CreateOrDeleteConnections,
    flush_timer: FlushTimer,
}

impl GraphCoordinator {
    pub fn new(
        plugin_manager: Box<dyn PluginManager>,
        device_manager: Box<dyn AudioDeviceManager>,
        controller_surface: Option<Box<dyn MidiInputMultiplexer>>,
    ) -> GraphCoordinator {
        GraphCoordinator {
            plugin_manager,
            device_manager,
            controller_surface,
            live_graph: LiveGraph::new(),
            wrappers: HashMap::new(),
            graph_updates_paused: false,
            connections_since_pause: CreateOrDeleteConnections::new(),
            flush_timer: FlushTimer::new(),
        }
    }

    pub fn live_graph(&self) -> &LiveGraph {
        &self.live_graph
    }

    pub fn wrapper(&self, processor_id: ProcessorId) -> Option<&ProcessorWrapper> {
        self.wrappers.get(&processor_id)
    }

    pub fn wrapper_for_node_id(&self, node_id: NodeId) -> Option<&ProcessorWrapper> {
        self.wrappers.values().find(|w| w.node_id() == node_id)
    }

    pub fn device_manager(&self) -> &dyn AudioDeviceManager {
        self.device_manager.as_ref()
    }

    pub fn device_manager_mut(&mut self) -> &mut dyn AudioDeviceManager {
        self.device_manager.as_mut()
    }

    pub fn are_graph_updates_paused(&self) -> bool {
        self.graph_updates_paused
    }

    pub fn pause_graph_updates(&mut self) {
        self.graph_updates_paused = true;
    }

    /// Coalesce the deltas accumulated while paused (cancelling
    /// add-then-remove pairs on the same connection) and apply what
    /// remains to the live graph in order.
    pub fn resume_graph_updates_and_apply_diff_since_pause(&mut self, document: &Document) {
        self.graph_updates_paused = false;
        let mut buffer = std::mem::take(&mut self.connections_since_pause);
        buffer.coalesce();
        for edit in buffer.edits() {
            match edit {
                ConnectionEdit::Add(connection) => {
                    self.live_graph.add_edge(connection);
                }
                ConnectionEdit::Remove(connection) => {
                    self.live_graph.remove_edge(connection);
                }
            }
        }
        self.debug_check_mirror(document);
    }

    /// Apply a batch of drained document events. The batch is coalesced
    /// first so that temporary performs during action construction never
    /// reach the live graph.
    pub fn apply_events(
        &mut self,
        document: &mut Document,
        events: Vec<DocumentEvent>,
    ) -> Result<(), CoordinatorError> {
        let events = crate::core::document::event::coalesce_events(events);
        for event in &events {
            self.apply_event(document, event)?;
        }
        if !self.graph_updates_paused {
            self.debug_check_mirror(document);
        }
        Ok(())
    }

    fn apply_event(
        &mut self,
        document: &mut Document,
        event: &DocumentEvent,
    ) -> Result<(), CoordinatorError> {
        match event {
            DocumentEvent::ProcessorAdded(processor_id) => {
                self.add_processor(document, *processor_id)
            }
            DocumentEvent::ProcessorRemoved(removed) => {
                self.remove_processor(removed);
                Ok(())
            }
            DocumentEvent::ConnectionAdded(connection) => {
                if self.graph_updates_paused {
                    self.connections_since_pause.add_connection(*connection);
                } else {
                    self.live_graph.add_edge(connection);
                }
                Ok(())
            }
            DocumentEvent::ConnectionRemoved(connection) => {
                if self.graph_updates_paused {
                    self.connections_since_pause.remove_connection(*connection);
                } else {
                    self.live_graph.remove_edge(connection);
                }
                Ok(())
            }
            DocumentEvent::ProcessorChanged(processor_id, property) => {
                self.processor_changed(document, *processor_id, *property);
                Ok(())
            }
            DocumentEvent::TrackAdded(_)
            | DocumentEvent::TrackRemoved(_)
            | DocumentEvent::TrackMoved { .. }
            | DocumentEvent::ProcessorMoved(_)
            | DocumentEvent::FocusChanged(_)
            | DocumentEvent::SelectionChanged => Ok(()),
        }
    }

    fn add_processor(
        &mut self,
        document: &mut Document,
        processor_id: ProcessorId,
    ) -> Result<(), CoordinatorError> {
        if self.wrappers.contains_key(&processor_id) {
            return Ok(());
        }
        let Some(processor) = document.processor(processor_id) else {
            return Ok(());
        };
        let node_id = processor.node_id();
        let descriptor_id = processor.descriptor_id().to_string();
        let device_name = processor.device_name().map(str::to_string);
        let plugin_state = processor.plugin_state().map(str::to_string);
        let stored_values: Vec<f32> = processor.parameters().iter().map(|p| p.value).collect();
        let bypassed = processor.is_bypassed();

        let mut instance = self
            .plugin_manager
            .create_instance(
                &descriptor_id,
                self.device_manager.sample_rate(),
                self.device_manager.block_size(),
            )
            .map_err(|error| CoordinatorError::PluginInstantiation {
                processor: processor_id,
                error,
            })?;

        if let Some(state) = &plugin_state {
            if let Ok(bytes) = base64::decode(state) {
                instance.set_state(&bytes);
            }
        }
        for (index, &value) in stored_values.iter().enumerate() {
            instance.set_parameter_value(index, value);
        }

        let parameter_descriptors = instance.parameters();
        let initial_values: Vec<f32> = parameter_descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                stored_values
                    .get(index)
                    .copied()
                    .unwrap_or(descriptor.default_value)
            })
            .collect();

        // Register the parameter set on the document entity the first time
        // this processor goes live.
        if stored_values.is_empty() && !parameter_descriptors.is_empty() {
            let values: Vec<ParameterValue> = parameter_descriptors
                .iter()
                .map(|descriptor| ParameterValue {
                    id: descriptor.id.clone(),
                    value: descriptor.default_value,
                    default_value: descriptor.default_value,
                })
                .collect();
            document.init_parameters(processor_id, values);
        }

        self.wire_midi_input(&descriptor_id, device_name.as_deref());

        self.live_graph.add_node(node_id, instance);
        if bypassed {
            self.live_graph.set_bypassed(node_id, true);
        }
        self.wrappers.insert(
            processor_id,
            ProcessorWrapper::new(processor_id, node_id, parameter_descriptors, &initial_values),
        );
        Ok(())
    }

    fn remove_processor(&mut self, removed: &RemovedProcessor) {
        if self.wrappers.remove(&removed.id).is_none() {
            return;
        }
        if removed.descriptor_id == crate::core::document::processor::builtin::MIDI_INPUT {
            self.unwire_midi_input(removed.device_name.as_deref());
        }
        self.live_graph.remove_node(removed.node_id);
    }

    fn wire_midi_input(&mut self, descriptor_id: &str, device_name: Option<&str>) {
        if descriptor_id != crate::core::document::processor::builtin::MIDI_INPUT {
            return;
        }
        let Some(device_name) = device_name else {
            return;
        };
        if let Some(surface) = self.controller_surface.as_mut() {
            if device_name
                .to_lowercase()
                .contains(&surface.device_name().to_lowercase())
            {
                surface.add_midi_input_callback();
                return;
            }
        }
        if !self.device_manager.is_midi_input_enabled(device_name) {
            self.device_manager.set_midi_input_enabled(device_name, true);
        }
        // An absent device leaves the processor inert; no callback is wired.
        self.device_manager.add_midi_input_callback(device_name);
    }

    fn unwire_midi_input(&mut self, device_name: Option<&str>) {
        let Some(device_name) = device_name else {
            return;
        };
        if let Some(surface) = self.controller_surface.as_mut() {
            if device_name
                .to_lowercase()
                .contains(&surface.device_name().to_lowercase())
            {
                surface.remove_midi_input_callback();
                return;
            }
        }
        self.device_manager.remove_midi_input_callback(device_name);
        if self.device_manager.is_midi_input_enabled(device_name) {
            self.device_manager.set_midi_input_enabled(device_name, false);
        }
    }

    fn processor_changed(
        &mut self,
        document: &Document,
        processor_id: ProcessorId,
        property: ProcessorProperty,
    ) {
        let Some(processor) = document.processor(processor_id) else {
            return;
        };
        match property {
            ProcessorProperty::Bypassed => {
                self.live_graph
                    .set_bypassed(processor.node_id(), processor.is_bypassed());
            }
            ProcessorProperty::Parameter(index) => {
                let Some(value) = processor.parameters().get(index).map(|p| p.value) else {
                    return;
                };
                self.live_graph.with_instance(processor.node_id(), |instance| {
                    if instance.parameter_value(index) != value {
                        instance.set_parameter_value(index, value);
                    }
                });
                if let Some(wrapper) = self.wrappers.get(&processor_id) {
                    if let Some(parameter) = wrapper.parameter(index) {
                        if parameter.value() != value {
                            parameter.set_value_quiet(value);
                        }
                    }
                }
            }
            ProcessorProperty::DeviceName => {
                if processor.is_audio_input() {
                    if let Some(device_name) = processor.device_name() {
                        self.device_manager.set_audio_input_device(device_name);
                    }
                }
            }
            ProcessorProperty::PluginState => {
                if let Some(state) = processor.plugin_state() {
                    if let Ok(bytes) = base64::decode(state) {
                        self.live_graph
                            .with_instance(processor.node_id(), |instance| {
                                instance.set_state(&bytes);
                            });
                    }
                }
            }
            ProcessorProperty::DefaultConnectionsAllowed
            | ProcessorProperty::Slot
            | ProcessorProperty::Name
            | ProcessorProperty::WindowPlacement => {}
        }
    }

    /// Flush every wrapper's changed parameter values into the document.
    /// Returns the delay until the next tick.
    pub fn flush_parameter_values(&mut self, document: &mut Document) -> (bool, Duration) {
        let mut anything_updated = false;
        for wrapper in self.wrappers.values() {
            if wrapper.flush_parameter_values(document) {
                anything_updated = true;
            }
        }
        let next = self.flush_timer.next_interval(anything_updated);
        (anything_updated, next)
    }

    /// Capture the live state blob of each processor instance back into
    /// the document, base64-encoded, so that copies carry current state.
    pub fn save_processor_state_information(&self, document: &mut Document) {
        let ids: Vec<(ProcessorId, NodeId)> = self
            .wrappers
            .values()
            .map(|w| (w.processor_id(), w.node_id()))
            .collect();
        for (processor_id, node_id) in ids {
            let state = self
                .live_graph
                .with_instance(node_id, |instance| instance.get_state());
            if let Some(state) = state {
                if state.is_empty() {
                    continue;
                }
                document.set_plugin_state(processor_id, Some(base64::encode(state)));
            }
        }
    }

    fn debug_check_mirror(&self, document: &Document) {
        debug_assert_eq!(
            self.live_graph.edge_revision(),
            edge_revision_of_connections(document.connections()),
            "live graph edges no longer mirror the document connections"
        );
    }
}
