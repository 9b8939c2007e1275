use crate::core::document::connection::{ConnectionType, NodeId};
use crate::core::document::processor::{Processor, ProcessorId};

/// The external outputs of the graph: one audio output processor plus one
/// MIDI output processor per enabled MIDI device.
#[derive(Clone, Default)]
pub struct Output {
    processors: Vec<Processor>,
}

impl Output {
    pub fn new() -> Output {
        Output {
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

    pub fn audio_output_processor(&self) -> Option<&Processor> {
        self.processors.iter().find(|p| p.is_audio_output())
    }

    pub fn midi_output_processors(&self) -> impl Iterator<Item = &Processor> {
        self.processors.iter().filter(|p| p.is_midi_output())
    }

    /// The system-wide fallback destination for the given connection type,
    /// used when the default connection search finds nothing else.
    pub fn default_output_processor(&self, connection_type: ConnectionType) -> Option<&Processor> {
        match connection_type {
            ConnectionType::Audio => self.audio_output_processor(),
            ConnectionType::Midi => self.midi_output_processors().next(),
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
