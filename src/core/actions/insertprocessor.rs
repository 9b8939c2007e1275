use crate::core::actions::action::Action;
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;

/// Reassign a lane processor's slot and track without changing its
/// identity. Slot collisions in the target lane are repaired; the
/// displaced slots are restored on undo.
pub struct InsertProcessor {
    processor_id: ProcessorId,
    from_track_index: usize,
    from_slot: i32,
    to_track_index: usize,
    to_slot: i32,
    displaced_slots: Vec<(ProcessorId, i32)>,
}

impl InsertProcessor {
    pub fn new(
        document: &Document,
        processor_id: ProcessorId,
        to_track_index: usize,
        to_slot: i32,
    ) -> Option<InsertProcessor> {
        let from_track_index = document.track_index_for_processor(processor_id)?;
        let from_slot = document.processor(processor_id)?.slot();
        Some(InsertProcessor {
            processor_id,
            from_track_index,
            from_slot,
            to_track_index,
            to_slot,
            displaced_slots: Vec::new(),
        })
    }

    pub fn processor_id(&self) -> ProcessorId {
        self.processor_id
    }

    pub fn to_track_index(&self) -> usize {
        self.to_track_index
    }

    pub fn to_slot(&self) -> i32 {
        self.to_slot
    }
}

impl Action for InsertProcessor {
    fn name(&self) -> &'static str {
        "InsertProcessor"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        if self.from_track_index == self.to_track_index && self.from_slot == self.to_slot {
            self.displaced_slots.clear();
            return true;
        }
        if !document.move_lane_processor(self.processor_id, self.to_track_index, self.to_slot) {
            return false;
        }
        self.displaced_slots = document
            .make_slots_valid(self.to_track_index)
            .into_iter()
            .filter(|(id, _)| *id != self.processor_id)
            .collect();
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        if self.from_track_index == self.to_track_index && self.from_slot == self.to_slot {
            return true;
        }
        if !document.move_lane_processor(self.processor_id, self.from_track_index, self.from_slot) {
            return false;
        }
        for (id, old_slot) in self.displaced_slots.iter().rev() {
            document.set_processor_slot(*id, *old_slot);
        }
        true
    }
}
