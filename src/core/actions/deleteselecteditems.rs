use crate::core::actions::action::Action;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::deleteprocessor::DeleteProcessor;
use crate::core::actions::deletetrack::DeleteTrack;
use crate::core::document::document::Document;

/// Delete every selected item: whole tracks for selected tracks,
/// individual processors for selected slots, then a default-connection
/// sweep over what remains.
pub struct DeleteSelectedItems {
    delete_processors: Vec<DeleteProcessor>,
    delete_tracks: Vec<DeleteTrack>,
    update_connections: UpdateAllDefaultConnections,
}

impl DeleteSelectedItems {
    pub fn new(document: &mut Document) -> DeleteSelectedItems {
        let mut selected_track_ids = Vec::new();
        let mut selected_processor_ids = Vec::new();
        for track in document.tracks() {
            if track.is_selected() {
                selected_track_ids.push(track.id());
            } else {
                for processor in track.find_selected_processors() {
                    selected_processor_ids.push(processor.id());
                }
            }
        }

        let mut delete_processors = Vec::new();
        for processor_id in selected_processor_ids {
            if let Some(mut action) = DeleteProcessor::new(document, processor_id) {
                action.perform(document);
                delete_processors.push(action);
            }
        }
        let mut delete_tracks = Vec::new();
        for track_id in selected_track_ids {
            if let Some(mut action) = DeleteTrack::new(document, track_id) {
                action.perform(document);
                delete_tracks.push(action);
            }
        }

        let update_connections = UpdateAllDefaultConnections::new(document, false, true, None);

        for action in delete_tracks.iter_mut().rev() {
            action.undo(document);
        }
        for action in delete_processors.iter_mut().rev() {
            action.undo(document);
        }

        DeleteSelectedItems {
            delete_processors,
            delete_tracks,
            update_connections,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.delete_processors.is_empty() && self.delete_tracks.is_empty()
    }
}

impl Action for DeleteSelectedItems {
    fn name(&self) -> &'static str {
        "DeleteSelectedItems"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        if self.is_empty() {
            return false;
        }
        for action in &mut self.delete_processors {
            action.perform(document);
        }
        for action in &mut self.delete_tracks {
            action.perform(document);
        }
        self.update_connections.perform(document);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        if self.is_empty() {
            return false;
        }
        self.update_connections.undo(document);
        for action in self.delete_tracks.iter_mut().rev() {
            action.undo(document);
        }
        for action in self.delete_processors.iter_mut().rev() {
            action.undo(document);
        }
        true
    }
}
