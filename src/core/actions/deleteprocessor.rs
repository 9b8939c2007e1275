use crate::core::actions::action::Action;
use crate::core::actions::connectionactions::CreateOrDeleteConnections;
use crate::core::document::document::Document;
use crate::core::document::processor::{Processor, ProcessorId};

#[derive(Copy, Clone, Debug)]
enum Location {
    Lane { track_index: usize },
    TrackIo { track_index: usize },
}

/// Delete a processor from its track: first remove every incoming and
/// outgoing connection (default and custom), then remove the entity.
/// Undo restores the entity with its original node id and re-adds all of
/// its connections with their original taxonomy.
pub struct DeleteProcessor {
    processor_id: ProcessorId,
    location: Location,
    disconnect: CreateOrDeleteConnections,
    removed: Option<Processor>,
}

impl DeleteProcessor {
    pub fn new(document: &Document, processor_id: ProcessorId) -> Option<DeleteProcessor> {
        let track_index = document.track_index_for_processor(processor_id)?;
        let processor = document.processor(processor_id)?;
        let location = if processor.slot() < 0 {
            Location::TrackIo { track_index }
        } else {
            Location::Lane { track_index }
        };
        Some(DeleteProcessor {
            processor_id,
            location,
            disconnect: CreateOrDeleteConnections::disconnect_processor(
                document,
                processor_id,
                None,
                true,
                true,
                true,
                true,
                None,
            ),
            removed: None,
        })
    }

    pub fn processor_id(&self) -> ProcessorId {
        self.processor_id
    }
}

impl Action for DeleteProcessor {
    fn name(&self) -> &'static str {
        "DeleteProcessor"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        if !self.disconnect.perform(document) {
            return false;
        }
        let removed = match self.location {
            Location::Lane { track_index } => {
                document.remove_lane_processor(track_index, self.processor_id)
            }
            Location::TrackIo { track_index } => {
                document.take_track_io_processor(track_index, self.processor_id)
            }
        };
        let Some(removed) = removed else {
            self.disconnect.undo(document);
            return false;
        };
        self.removed = Some(removed);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        let Some(processor) = self.removed.take() else {
            return false;
        };
        match self.location {
            Location::Lane { track_index } => {
                document.add_lane_processor(track_index, processor);
            }
            Location::TrackIo { track_index } => {
                if processor.is_track_input() {
                    document.set_track_input_processor(track_index, processor);
                } else {
                    document.set_track_output_processor(track_index, processor);
                }
            }
        }
        self.disconnect.undo(document);
        true
    }
}
