use crate::core::document::connection::NodeId;
use crate::core::document::processor::{Processor, ProcessorId};
use crate::core::document::slotmask::SlotMask;

/// An ordered, slot-indexed sequence of processors inside a track.
/// Processors are kept sorted by slot ascending; slot numbers may be sparse.
#[derive(Clone, Default)]
pub struct ProcessorLane {
    processors: Vec<Processor>,
    selected_slots_mask: SlotMask,
}

impl ProcessorLane {
    pub fn new() -> ProcessorLane {
        ProcessorLane {
            processors: Vec::new(),
            selected_slots_mask: SlotMask::empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn get(&self, index: usize) -> Option<&Processor> {
        self.processors.get(index)
    }

    pub fn processor_at_slot(&self, slot: i32) -> Option<&Processor> {
        self.processors.iter().find(|p| p.slot() == slot)
    }

    pub(crate) fn processor_at_slot_mut(&mut self, slot: i32) -> Option<&mut Processor> {
        self.processors.iter_mut().find(|p| p.slot() == slot)
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

    /// Index at which a processor with the given slot belongs, keeping the
    /// lane ordered by slot ascending.
    pub fn insert_index_for_slot(&self, slot: i32) -> usize {
        for (index, processor) in self.processors.iter().enumerate() {
            if processor.slot() >= slot {
                return index;
            }
        }
        self.processors.len()
    }

    pub(crate) fn insert(&mut self, processor: Processor) {
        let index = self.insert_index_for_slot(processor.slot());
        self.processors.insert(index, processor);
    }

    pub(crate) fn remove(&mut self, id: ProcessorId) -> Option<Processor> {
        let index = self.processors.iter().position(|p| p.id() == id)?;
        Some(self.processors.remove(index))
    }

    /// Push collided slots downward until every slot in the lane is unique,
    /// preserving order. Returns (id, old_slot) for every processor whose
    /// slot changed, in the order the changes were applied.
    pub(crate) fn make_slots_valid(&mut self) -> Vec<(ProcessorId, i32)> {
        let mut slots: Vec<i32> = self.processors.iter().map(|p| p.slot()).collect();
        slots.sort_unstable();
        for i in 1..slots.len() {
            while slots[i] <= slots[i - 1] {
                slots[i] += 1;
            }
        }

        let mut changed = Vec::new();
        for (processor, new_slot) in self.processors.iter_mut().zip(slots) {
            if processor.slot() != new_slot {
                changed.push((processor.id(), processor.slot()));
                processor.set_slot(new_slot);
            }
        }
        changed
    }

    pub fn selected_slots_mask(&self) -> SlotMask {
        self.selected_slots_mask
    }

    pub(crate) fn set_selected_slots_mask(&mut self, mask: SlotMask) {
        self.selected_slots_mask = mask;
    }

    pub fn is_slot_selected(&self, slot: i32) -> bool {
        self.selected_slots_mask.get(slot)
    }

    pub fn first_selected_slot(&self) -> Option<i32> {
        self.selected_slots_mask.first_set()
    }

    pub fn last_selected_slot(&self) -> Option<i32> {
        self.selected_slots_mask.last_set()
    }
}
