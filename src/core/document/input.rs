use crate::core::document::connection::{ConnectionType, NodeId};
use crate::core::document::processor::{Processor, ProcessorId};

/// The external inputs into the graph: one audio input processor plus one
/// MIDI input processor per enabled MIDI device, each identified by its
/// device name.
#[derive(Clone, Default)]
pub struct Input {
    processors: Vec<Processor>,
}

impl Input {
    pub fn new() -> Input {
        Input {
            processors: Vec::new(),
        }
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn processor(&self, id: ProcessorId) -> Option<&Processor> {
        self.processors.iter().find(|p| p.id() == id)
    }

    pub(crate) fn processor_mut(&mut self, id: ProcessorId) -> Option<&mut Processor> {
        self.processors.iter_mut().find(|p| p.id() == id)
    }

    pub fn processor_by_node_id(&self, node_id: NodeId) -> Option<&Processor> {
        self.processors.iter().find(|p| p.node_id() == node_id)
    }

    pub fn audio_input_processor(&self) -> Option<&Processor> {
        self.processors.iter().find(|p| p.is_audio_input())
    }

    pub fn midi_input_processors(&self) -> impl Iterator<Item = &Processor> {
        self.processors.iter().filter(|p| p.is_midi_input())
    }

    pub fn midi_input_processor_for_device(&self, device_name: &str) -> Option<&Processor> {
        self.processors
            .iter()
            .find(|p| p.is_midi_input() && p.device_name() == Some(device_name))
    }

    pub fn default_input_processor(&self, connection_type: ConnectionType) -> Option<&Processor> {
        match connection_type {
            ConnectionType::Audio => self.audio_input_processor(),
            ConnectionType::Midi => self.midi_input_processors().next(),
        }
    }

    pub(crate) fn add(&mut self, processor: Processor) {
        self.processors.push(processor);
    }

    pub(crate) fn remove(&mut self, id: ProcessorId) -> Option<Processor> {
        let index = self.processors.iter().position(|p| p.id() == id)?;
        Some(self.processors.remove(index))
    }
}
