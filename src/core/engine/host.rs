use crate::core::document::processor::builtin;

/// Everything the document needs to know about a loadable processor type.
#[derive(Clone, Debug)]
pub struct PluginDescriptor {
    pub id: String,
    pub name: String,
    pub num_input_channels: i32,
    pub num_output_channels: i32,
    pub accepts_midi: bool,
    pub produces_midi: bool,
}

impl PluginDescriptor {
    pub fn track_input() -> PluginDescriptor {
        PluginDescriptor {
            id: builtin::TRACK_INPUT.to_string(),
            name: "Track Input".to_string(),
            num_input_channels: 2,
            num_output_channels: 2,
            accepts_midi: true,
            produces_midi: true,
        }
    }

    pub fn track_output() -> PluginDescriptor {
        PluginDescriptor {
            id: builtin::TRACK_OUTPUT.to_string(),
            name: "Mixer Channel".to_string(),
            num_input_channels: 2,
            num_output_channels: 2,
            accepts_midi: false,
            produces_midi: false,
        }
    }

    pub fn audio_input() -> PluginDescriptor {
        PluginDescriptor {
            id: builtin::AUDIO_INPUT.to_string(),
            name: "Audio Input".to_string(),
            num_input_channels: 0,
            num_output_channels: 2,
            accepts_midi: false,
            produces_midi: false,
        }
    }

    pub fn audio_output() -> PluginDescriptor {
        PluginDescriptor {
            id: builtin::AUDIO_OUTPUT.to_string(),
            name: "Audio Output".to_string(),
            num_input_channels: 2,
            num_output_channels: 0,
            accepts_midi: false,
            produces_midi: false,
        }
    }

    pub fn midi_input() -> PluginDescriptor {
        PluginDescriptor {
            id: builtin::MIDI_INPUT.to_string(),
            name: "MIDI Input".to_string(),
            num_input_channels: 0,
            num_output_channels: 0,
            accepts_midi: false,
            produces_midi: true,
        }
    }

    pub fn midi_output() -> PluginDescriptor {
        PluginDescriptor {
            id: builtin::MIDI_OUTPUT.to_string(),
            name: "MIDI Output".to_string(),
            num_input_channels: 0,
            num_output_channels: 0,
            accepts_midi: true,
            produces_midi: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    pub id: String,
    pub name: String,
    pub default_value: f32,
    pub min_value: f32,
    pub max_value: f32,
    /// Number of discrete steps, if the parameter is stepped.
    pub num_steps: Option<u32>,
    /// Display strings for stepped parameters, if any.
    pub value_strings: Vec<String>,
}

/// A live processing instance created from a descriptor. The core never
/// interprets its state blob and never calls into it from the audio
/// thread; per-block processing is the embedder's concern.
pub trait PluginInstance: Send {
    fn descriptor_id(&self) -> &str;
    fn parameters(&self) -> Vec<ParameterDescriptor>;
    fn parameter_value(&self, index: usize) -> f32;
    fn set_parameter_value(&mut self, index: usize, value: f32);
    fn get_state(&self) -> Vec<u8>;
    fn set_state(&mut self, state: &[u8]);
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PluginError {
    UnknownDescriptor(String),
    InstantiationFailed(String),
}

/// Creates plugin instances and answers descriptor lookups. Provided by
/// the embedder; the built-in I/O descriptors above must always resolve.
pub trait PluginManager {
    fn descriptor(&self, descriptor_id: &str) -> Option<PluginDescriptor>;
    fn create_instance(
        &mut self,
        descriptor_id: &str,
        sample_rate: f64,
        block_size: usize,
    ) -> Result<Box<dyn PluginInstance>, PluginError>;
}

/// The device layer, provided by the embedder. MIDI input callbacks are
/// wired per device name; a device that is absent simply reports failure
/// and the processor stays inert.
pub trait AudioDeviceManager {
    fn sample_rate(&self) -> f64;
    fn block_size(&self) -> usize;
    fn midi_input_device_names(&self) -> Vec<String>;
    fn midi_output_device_names(&self) -> Vec<String>;
    fn is_midi_input_enabled(&self, device_name: &str) -> bool;
    fn set_midi_input_enabled(&mut self, device_name: &str, enabled: bool);
    /// Returns false if the named device is unavailable.
    fn add_midi_input_callback(&mut self, device_name: &str) -> bool;
    fn remove_midi_input_callback(&mut self, device_name: &str);
    fn set_audio_input_device(&mut self, device_name: &str);
}

/// Dedicated multiplexer for the controller surface's MIDI input, which
/// bypasses the device manager entirely.
pub trait MidiInputMultiplexer {
    fn device_name(&self) -> &str;
    fn add_midi_input_callback(&mut self);
    fn remove_midi_input_callback(&mut self);
}
