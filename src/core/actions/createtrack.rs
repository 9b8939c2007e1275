use crate::core::actions::action::Action;
use crate::core::document::document::Document;
use crate::core::document::track::{Track, TrackId};

const TRACK_COLOURS: &[&str] = &[
    "ffe57373", "ffffb74d", "fffff176", "ffaed581", "ff4dd0e1", "ff7986cb", "ffba68c8", "fff06292",
];

/// Create a new track at an insertion index, optionally deriving its name
/// and colour from a copied track. The track is created empty; its
/// processors are created by separate CreateProcessor children.
pub struct CreateTrack {
    insert_index: usize,
    is_master: bool,
    derived_name: Option<String>,
    derived_colour: Option<String>,
    created: Option<Track>,
    track_id: Option<TrackId>,
}

impl CreateTrack {
    pub fn new(insert_index: usize, is_master: bool) -> CreateTrack {
        CreateTrack {
            insert_index,
            is_master,
            derived_name: None,
            derived_colour: None,
            created: None,
            track_id: None,
        }
    }

    pub fn derived_from(insert_index: usize, source: &Track) -> CreateTrack {
        CreateTrack {
            insert_index,
            is_master: false,
            derived_name: Some(source.name().to_string()),
            derived_colour: Some(source.colour().to_string()),
            created: None,
            track_id: None,
        }
    }

    pub fn insert_index(&self) -> usize {
        self.insert_index
    }

    pub fn track_id(&self) -> Option<TrackId> {
        self.track_id
    }
}

impl Action for CreateTrack {
    fn name(&self) -> &'static str {
        "CreateTrack"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        let track = match self.created.take() {
            Some(track) => track,
            None => {
                let id = document.next_track_id();
                let name = match &self.derived_name {
                    Some(name) => name.clone(),
                    None if self.is_master => "Master".to_string(),
                    None => format!("Track {}", document.num_non_master_tracks() + 1),
                };
                let colour = self.derived_colour.clone().unwrap_or_else(|| {
                    TRACK_COLOURS[document.num_tracks() % TRACK_COLOURS.len()].to_string()
                });
                Track::new(id, name, colour, self.is_master)
            }
        };
        self.track_id = Some(track.id());
        document.add_track(self.insert_index.min(document.num_tracks()), track);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        let Some(track_id) = self.track_id else {
            return false;
        };
        let Some(index) = document.index_of_track(track_id) else {
            return false;
        };
        self.created = Some(document.remove_track(index));
        true
    }
}
