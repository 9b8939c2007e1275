use crate::core::actions::action::Action;
use crate::core::actions::deleteprocessor::DeleteProcessor;
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;
use crate::core::document::track::{Track, TrackId};

/// Delete a whole track: a DeleteProcessor child for every contained
/// processor, then the track itself. The children are built with the
/// temporary-perform protocol so that each one captures the connection
/// set left by the previous one.
pub struct DeleteTrack {
    track_id: TrackId,
    delete_processors: Vec<DeleteProcessor>,
    removed: Option<(usize, Track)>,
}

impl DeleteTrack {
    pub fn new(document: &mut Document, track_id: TrackId) -> Option<DeleteTrack> {
        let track_index = document.index_of_track(track_id)?;
        let processor_ids: Vec<ProcessorId> = document
            .track(track_index)
            .map(|t| t.all_processors().map(|p| p.id()).collect())
            .unwrap_or_default();

        let mut delete_processors = Vec::new();
        for processor_id in processor_ids {
            if let Some(mut action) = DeleteProcessor::new(document, processor_id) {
                action.perform(document);
                delete_processors.push(action);
            }
        }
        for action in delete_processors.iter_mut().rev() {
            action.undo(document);
        }

        Some(DeleteTrack {
            track_id,
            delete_processors,
            removed: None,
        })
    }

    pub fn track_id(&self) -> TrackId {
        self.track_id
    }
}

impl Action for DeleteTrack {
    fn name(&self) -> &'static str {
        "DeleteTrack"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        for action in &mut self.delete_processors {
            action.perform(document);
        }
        let Some(track_index) = document.index_of_track(self.track_id) else {
            return false;
        };
        self.removed = Some((track_index, document.remove_track(track_index)));
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        let Some((track_index, track)) = self.removed.take() else {
            return false;
        };
        document.add_track(track_index, track);
        for action in self.delete_processors.iter_mut().rev() {
            action.undo(document);
        }
        true
    }
}
