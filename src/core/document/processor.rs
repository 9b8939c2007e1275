use crate::core::document::connection::{ConnectionType, NodeId};
use crate::core::uniqueid::UniqueId;

pub struct ProcessorTag;
pub type ProcessorId = UniqueId<ProcessorTag>;

/// Identifiers of the processors built into the host itself, as opposed to
/// loaded plugins. I/O routing treats these kinds specially.
pub mod builtin {
    /// Feeds a track with whatever external inputs are routed to it.
    pub const TRACK_INPUT: &str = "internal:track_input";
    /// A track's mixer channel. Everything a track produces leaves through it.
    pub const TRACK_OUTPUT: &str = "internal:track_output";
    pub const AUDIO_INPUT: &str = "internal:audio_input";
    pub const AUDIO_OUTPUT: &str = "internal:audio_output";
    pub const MIDI_INPUT: &str = "internal:midi_input";
    pub const MIDI_OUTPUT: &str = "internal:midi_output";
}

/// Document-side mirror of one plugin parameter. The live value is owned by
/// the plugin instance and flushed here on a timer; see engine::wrapper.
#[derive(Clone, PartialEq, Debug)]
pub struct ParameterValue {
    pub id: String,
    pub value: f32,
    pub default_value: f32,
}

/// Where a plugin window for this processor was last placed. Carried
/// opaquely through copy and undo; the windows themselves are not ours.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
    pub window_type: i32,
}

#[derive(Clone, Debug)]
pub struct Processor {
    id: ProcessorId,
    descriptor_id: String,
    name: String,
    slot: i32,
    node_id: NodeId,
    bypassed: bool,
    allow_default_connections: bool,
    num_input_channels: i32,
    num_output_channels: i32,
    accepts_midi: bool,
    produces_midi: bool,
    plugin_state: Option<String>,
    device_name: Option<String>,
    window_placement: WindowPlacement,
    parameters: Vec<ParameterValue>,
}

impl Processor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ProcessorId,
        node_id: NodeId,
        descriptor_id: String,
        name: String,
        slot: i32,
        num_input_channels: i32,
        num_output_channels: i32,
        accepts_midi: bool,
        produces_midi: bool,
    ) -> Processor {
        Processor {
            id,
            descriptor_id,
            name,
            slot,
            node_id,
            bypassed: false,
            allow_default_connections: true,
            num_input_channels,
            num_output_channels,
            accepts_midi,
            produces_midi,
            plugin_state: None,
            device_name: None,
            window_placement: WindowPlacement::default(),
            parameters: Vec::new(),
        }
    }

    pub fn id(&self) -> ProcessorId {
        self.id
    }

    pub fn descriptor_id(&self) -> &str {
        &self.descriptor_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> i32 {
        self.slot
    }

    pub(crate) fn set_slot(&mut self, slot: i32) {
        self.slot = slot;
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    pub(crate) fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn default_connections_allowed(&self) -> bool {
        self.allow_default_connections
    }

    pub(crate) fn set_default_connections_allowed(&mut self, allowed: bool) {
        self.allow_default_connections = allowed;
    }

    pub fn num_input_channels(&self) -> i32 {
        self.num_input_channels
    }

    pub fn num_output_channels(&self) -> i32 {
        self.num_output_channels
    }

    pub fn accepts_midi(&self) -> bool {
        self.accepts_midi
    }

    pub fn produces_midi(&self) -> bool {
        self.produces_midi
    }

    pub fn plugin_state(&self) -> Option<&str> {
        self.plugin_state.as_deref()
    }

    pub(crate) fn set_plugin_state(&mut self, state: Option<String>) {
        self.plugin_state = state;
    }

    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub(crate) fn set_device_name(&mut self, device_name: Option<String>) {
        self.device_name = device_name;
    }

    pub fn window_placement(&self) -> WindowPlacement {
        self.window_placement
    }

    pub(crate) fn set_window_placement(&mut self, placement: WindowPlacement) {
        self.window_placement = placement;
    }

    pub fn parameters(&self) -> &[ParameterValue] {
        &self.parameters
    }

    pub(crate) fn set_parameters(&mut self, parameters: Vec<ParameterValue>) {
        self.parameters = parameters;
    }

    pub(crate) fn set_parameter_value(&mut self, index: usize, value: f32) {
        if let Some(parameter) = self.parameters.get_mut(index) {
            parameter.value = value;
        }
    }

    /// A producer has outputs of the given type. Whether a processor is a
    /// producer or an effect is a property of its I/O shape, not its kind.
    pub fn is_producer(&self, connection_type: ConnectionType) -> bool {
        match connection_type {
            ConnectionType::Audio => self.num_output_channels > 0,
            ConnectionType::Midi => self.produces_midi,
        }
    }

    /// An effect has inputs of the given type.
    pub fn is_effect(&self, connection_type: ConnectionType) -> bool {
        match connection_type {
            ConnectionType::Audio => self.num_input_channels > 0,
            ConnectionType::Midi => self.accepts_midi,
        }
    }

    pub fn is_track_input(&self) -> bool {
        self.descriptor_id == builtin::TRACK_INPUT
    }

    pub fn is_track_output(&self) -> bool {
        self.descriptor_id == builtin::TRACK_OUTPUT
    }

    pub fn is_audio_input(&self) -> bool {
        self.descriptor_id == builtin::AUDIO_INPUT
    }

    pub fn is_audio_output(&self) -> bool {
        self.descriptor_id == builtin::AUDIO_OUTPUT
    }

    pub fn is_midi_input(&self) -> bool {
        self.descriptor_id == builtin::MIDI_INPUT
    }

    pub fn is_midi_output(&self) -> bool {
        self.descriptor_id == builtin::MIDI_OUTPUT
    }

    pub fn is_io_processor(&self) -> bool {
        self.is_audio_input() || self.is_audio_output() || self.is_midi_input() || self.is_midi_output()
    }
}
