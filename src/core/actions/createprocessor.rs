use crate::core::actions::action::Action;
use crate::core::document::document::Document;
use crate::core::document::processor::{Processor, ProcessorId};
use crate::core::engine::host::PluginDescriptor;

/// Create a processor in a track, either fresh from a descriptor or as a
/// copy of an existing processor (paste and duplicate). Slot -1 creates
/// the track-level I/O processor matching the descriptor's kind. The
/// processor's ids are assigned on first perform and reused afterwards,
/// so redo restores the identical node id.
pub struct CreateProcessor {
    descriptor: PluginDescriptor,
    track_index: usize,
    slot: i32,
    template: Option<Processor>,
    created: Option<Processor>,
    processor_id: Option<ProcessorId>,
    displaced_slots: Vec<(ProcessorId, i32)>,
}

impl CreateProcessor {
    pub fn new(descriptor: PluginDescriptor, track_index: usize, slot: i32) -> CreateProcessor {
        CreateProcessor {
            descriptor,
            track_index,
            slot,
            template: None,
            created: None,
            processor_id: None,
            displaced_slots: Vec::new(),
        }
    }

    /// A copy of an existing processor entity: same descriptor, plugin
    /// state, parameter values and window placement, new identity.
    pub fn from_template(template: &Processor, track_index: usize, slot: i32) -> CreateProcessor {
        CreateProcessor {
            descriptor: PluginDescriptor {
                id: template.descriptor_id().to_string(),
                name: template.name().to_string(),
                num_input_channels: template.num_input_channels(),
                num_output_channels: template.num_output_channels(),
                accepts_midi: template.accepts_midi(),
                produces_midi: template.produces_midi(),
            },
            track_index,
            slot,
            template: Some(template.clone()),
            created: None,
            processor_id: None,
            displaced_slots: Vec::new(),
        }
    }

    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn slot(&self) -> i32 {
        self.slot
    }

    pub fn processor_id(&self) -> Option<ProcessorId> {
        self.processor_id
    }

    fn build(&mut self, document: &mut Document) -> Processor {
        if let Some(processor) = self.created.take() {
            return processor;
        }
        let id = document.next_processor_id();
        let node_id = document.next_node_id();
        let mut processor = Processor::new(
            id,
            node_id,
            self.descriptor.id.clone(),
            self.descriptor.name.clone(),
            self.slot,
            self.descriptor.num_input_channels,
            self.descriptor.num_output_channels,
            self.descriptor.accepts_midi,
            self.descriptor.produces_midi,
        );
        if let Some(template) = &self.template {
            processor.set_plugin_state(template.plugin_state().map(str::to_string));
            processor.set_device_name(template.device_name().map(str::to_string));
            processor.set_window_placement(template.window_placement());
            processor.set_parameters(template.parameters().to_vec());
            processor.set_bypassed(template.is_bypassed());
            processor.set_default_connections_allowed(template.default_connections_allowed());
        }
        processor
    }
}

impl Action for CreateProcessor {
    fn name(&self) -> &'static str {
        "CreateProcessor"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        if self.track_index >= document.num_tracks() {
            return false;
        }
        let processor = self.build(document);
        let processor_id = processor.id();
        self.processor_id = Some(processor_id);

        if self.slot < 0 {
            if processor.is_track_input() {
                document.set_track_input_processor(self.track_index, processor);
            } else if processor.is_track_output() {
                document.set_track_output_processor(self.track_index, processor);
            } else {
                self.created = Some(processor);
                return false;
            }
            self.displaced_slots.clear();
            return true;
        }

        document.add_lane_processor(self.track_index, processor);
        self.displaced_slots = document
            .make_slots_valid(self.track_index)
            .into_iter()
            .filter(|(id, _)| *id != processor_id)
            .collect();
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        let Some(processor_id) = self.processor_id else {
            return false;
        };
        let removed = if self.slot < 0 {
            document.take_track_io_processor(self.track_index, processor_id)
        } else {
            document.remove_lane_processor(self.track_index, processor_id)
        };
        let Some(removed) = removed else {
            return false;
        };
        for (id, old_slot) in self.displaced_slots.iter().rev() {
            document.set_processor_slot(*id, *old_slot);
        }
        self.created = Some(removed);
        true
    }
}
