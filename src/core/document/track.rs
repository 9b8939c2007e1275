use crate::core::document::connection::NodeId;
use crate::core::document::lane::ProcessorLane;
use crate::core::document::processor::{Processor, ProcessorId};
use crate::core::uniqueid::UniqueId;

use rand::{thread_rng, Rng};

pub struct TrackTag;
pub type TrackId = UniqueId<TrackTag>;

pub(crate) fn new_uuid() -> String {
    format!("{:032x}", thread_rng().gen::<u128>())
}

/// A vertical container of processors. Owns one processor lane plus the
/// track-level input and output processors, which sit outside the lane's
/// slot range (their slot is -1).
#[derive(Clone)]
pub struct Track {
    id: TrackId,
    uuid: String,
    name: String,
    colour: String,
    is_master: bool,
    selected: bool,
    lane: ProcessorLane,
    input: Option<Processor>,
    output: Option<Processor>,
}

impl Track {
    pub(crate) fn new(id: TrackId, name: String, colour: String, is_master: bool) -> Track {
        Track {
            id,
            uuid: new_uuid(),
            name,
            colour,
            is_master,
            selected: false,
            lane: ProcessorLane::new(),
            input: None,
            output: None,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn colour(&self) -> &str {
        &self.colour
    }

    pub fn is_master(&self) -> bool {
        self.is_master
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn lane(&self) -> &ProcessorLane {
        &self.lane
    }

    pub(crate) fn lane_mut(&mut self) -> &mut ProcessorLane {
        &mut self.lane
    }

    pub fn input_processor(&self) -> Option<&Processor> {
        self.input.as_ref()
    }

    pub fn output_processor(&self) -> Option<&Processor> {
        self.output.as_ref()
    }

    pub(crate) fn set_input_processor(&mut self, processor: Option<Processor>) {
        self.input = processor;
    }

    pub(crate) fn set_output_processor(&mut self, processor: Option<Processor>) {
        self.output = processor;
    }

    pub(crate) fn take_input_processor(&mut self) -> Option<Processor> {
        self.input.take()
    }

    pub(crate) fn take_output_processor(&mut self) -> Option<Processor> {
        self.output.take()
    }

    /// Track-level input, then lane processors by slot ascending, then
    /// track-level output. This is the deterministic order in which
    /// default connections are recomputed.
    pub fn all_processors(&self) -> impl Iterator<Item = &Processor> {
        self.input
            .iter()
            .chain(self.lane.processors().iter())
            .chain(self.output.iter())
    }

    pub fn processor(&self, id: ProcessorId) -> Option<&Processor> {
        self.all_processors().find(|p| p.id() == id)
    }

    pub(crate) fn processor_mut(&mut self, id: ProcessorId) -> Option<&mut Processor> {
        if self.input.as_ref().map(|p| p.id()) == Some(id) {
            return self.input.as_mut();
        }
        if self.output.as_ref().map(|p| p.id()) == Some(id) {
            return self.output.as_mut();
        }
        self.lane.processor_mut(id)
    }

    pub fn processor_by_node_id(&self, node_id: NodeId) -> Option<&Processor> {
        self.all_processors().find(|p| p.node_id() == node_id)
    }

    pub fn has_selections(&self) -> bool {
        self.selected || !self.lane.selected_slots_mask().is_empty()
    }

    pub fn is_slot_selected(&self, slot: i32) -> bool {
        self.lane.is_slot_selected(slot)
    }

    pub fn is_processor_selected(&self, processor: &Processor) -> bool {
        self.lane.is_slot_selected(processor.slot())
    }

    pub fn find_first_selected_processor(&self) -> Option<&Processor> {
        self.lane
            .processors()
            .iter()
            .find(|p| self.lane.is_slot_selected(p.slot()))
    }

    pub fn find_last_selected_processor(&self) -> Option<&Processor> {
        self.lane
            .processors()
            .iter()
            .rev()
            .find(|p| self.lane.is_slot_selected(p.slot()))
    }

    pub fn find_selected_processors(&self) -> Vec<&Processor> {
        self.lane
            .processors()
            .iter()
            .filter(|p| self.lane.is_slot_selected(p.slot()))
            .collect()
    }

    /// The first processor of each contiguous run of selected slots,
    /// scanning by slot ascending.
    pub fn first_processor_in_each_contiguous_selected_group(&self) -> Vec<&Processor> {
        let mut firsts = Vec::new();
        let mut last_selected_slot = -2;
        for processor in self.lane.processors() {
            let slot = processor.slot();
            if self.lane.is_slot_selected(slot) {
                if slot > last_selected_slot + 1 {
                    firsts.push(processor);
                }
                last_selected_slot = slot;
            }
        }
        firsts
    }

    /// The last processor in the lane strictly above the given slot that is
    /// not selected, if any.
    pub fn last_non_selected_processor_with_slot_less_than(&self, slot: i32) -> Option<&Processor> {
        self.lane
            .processors()
            .iter()
            .rev()
            .find(|p| p.slot() < slot && !self.is_processor_selected(p))
    }
}
