use crate::core::actions::action::Action;
use crate::core::actions::createprocessor::CreateProcessor;
use crate::core::actions::createtrack::CreateTrack;
use crate::core::actions::defaultconnectionactions::UpdateAllDefaultConnections;
use crate::core::actions::select::Select;
use crate::core::document::document::Document;
use crate::core::document::slotmask::SlotMask;
use crate::core::document::track::Track;
use crate::core::document::view::TrackAndSlot;

enum CreateChild {
    Track(CreateTrack),
    Processor(CreateProcessor),
}

impl CreateChild {
    fn perform(&mut self, document: &mut Document) -> bool {
        match self {
            CreateChild::Track(action) => action.perform(document),
            CreateChild::Processor(action) => action.perform(document),
        }
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        match self {
            CreateChild::Track(action) => action.undo(document),
            CreateChild::Processor(action) => action.undo(document),
        }
    }
}

fn any_copied_track_selected(copied_tracks: &[Track]) -> bool {
    copied_tracks.iter().any(|t| t.is_selected())
}

fn find_selected_non_master_track_indices(copied_tracks: &[Track]) -> Vec<i32> {
    copied_tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_selected() && !t.is_master())
        .map(|(i, _)| i as i32)
        .collect()
}

fn find_from_track_and_slot(copied_tracks: &[Track]) -> Option<TrackAndSlot> {
    let from_track_index = copied_tracks.iter().position(|t| t.has_selections())? as i32;
    if any_copied_track_selected(copied_tracks) {
        return Some(TrackAndSlot::new(from_track_index, 0));
    }
    let from_slot = copied_tracks
        .iter()
        .filter_map(|t| t.lane().selected_slots_mask().first_set())
        .min()?;
    Some(TrackAndSlot::new(from_track_index, from_slot))
}

/// Shift a sorted list of indices so that a copy inserted after each
/// original lands clear of the originals: indices within a contiguous run
/// shift together, later runs shift further.
fn find_duplication_indices(current_indices: &[i32]) -> Vec<i32> {
    let mut duplication_indices = current_indices.to_vec();
    let mut previous_index = -1;
    let mut end_of_contiguous_range = 0usize;
    for i in 0..duplication_indices.len() {
        let current_index = current_indices[i];
        if previous_index != -1 && current_index - previous_index > 1 {
            end_of_contiguous_range = i;
        }
        for j in end_of_contiguous_range..duplication_indices.len() {
            duplication_indices[j] += 1;
        }
        previous_index = current_index;
    }
    duplication_indices
}

struct InsertBuilder<'a> {
    document: &'a mut Document,
    create_actions: Vec<CreateChild>,
    old_focused: TrackAndSlot,
    new_focused: TrackAndSlot,
}

impl<'a> InsertBuilder<'a> {
    fn add_and_perform_create_processor(
        &mut self,
        template: &crate::core::document::processor::Processor,
        from_track_index: i32,
        from_slot: i32,
        to_track_index: usize,
        to_slot: i32,
    ) {
        let mut action = CreateProcessor::from_template(template, to_track_index, to_slot);
        action.perform(self.document);
        if self.old_focused.track_index == from_track_index && self.old_focused.slot == from_slot {
            self.new_focused = TrackAndSlot::new(to_track_index as i32, to_slot);
        }
        self.create_actions.push(CreateChild::Processor(action));
    }

    fn copy_processors_from_track(
        &mut self,
        copied_track: &Track,
        from_track_index: i32,
        to_track_index: usize,
        slot_diff: i32,
    ) {
        let slots: Vec<i32> = copied_track.lane().selected_slots_mask().iter().collect();
        for from_slot in slots {
            if let Some(processor) = copied_track.lane().processor_at_slot(from_slot) {
                let processor = processor.clone();
                self.add_and_perform_create_processor(
                    &processor,
                    from_track_index,
                    from_slot,
                    to_track_index,
                    from_slot + slot_diff,
                );
            }
        }
    }

    fn duplicate_selected_processors(&mut self, copied_track: &Track, target_track_index: usize) {
        let num_slots = self
            .document
            .view()
            .num_processor_slots(copied_track.is_master());
        let selected_slots: Vec<i32> = copied_track
            .lane()
            .selected_slots_mask()
            .iter()
            .filter(|slot| *slot < num_slots)
            .collect();
        let duplicated_slots = find_duplication_indices(&selected_slots);
        for (i, &from_slot) in selected_slots.iter().enumerate() {
            if let Some(processor) = copied_track.lane().processor_at_slot(from_slot) {
                let processor = processor.clone();
                self.add_and_perform_create_processor(
                    &processor,
                    target_track_index as i32,
                    from_slot,
                    target_track_index,
                    duplicated_slots[i],
                );
            }
        }
    }

    fn add_and_perform_create_track(
        &mut self,
        copied_track: &Track,
        from_track_index: i32,
        insert_index: usize,
    ) {
        let mut action = CreateTrack::derived_from(insert_index, copied_track);
        action.perform(self.document);
        self.create_actions.push(CreateChild::Track(action));

        // track-level I/O processors come with the track
        if let Some(input) = copied_track.input_processor() {
            let input = input.clone();
            self.add_and_perform_create_processor(&input, -1, -1, insert_index, -1);
        }
        if let Some(output) = copied_track.output_processor() {
            let output = output.clone();
            self.add_and_perform_create_processor(&output, -1, -1, insert_index, -1);
        }
        for processor in copied_track.lane().processors().to_vec() {
            let slot = processor.slot();
            self.add_and_perform_create_processor(
                &processor,
                from_track_index,
                slot,
                insert_index,
                slot,
            );
        }
    }
}

/// Create tracks and processors from a copy buffer, either as a paste at
/// a target cell or as an in-place duplicate, then select exactly what
/// was created and recompute default connections. Built with the
/// temporary-perform protocol.
pub struct Insert {
    create_actions: Vec<CreateChild>,
    select: Select,
    update_connections: UpdateAllDefaultConnections,
}

impl Insert {
    pub fn new(
        document: &mut Document,
        duplicate: bool,
        copied_tracks: &[Track],
        to: TrackAndSlot,
    ) -> Option<Insert> {
        let from = find_from_track_and_slot(copied_tracks)?;
        let to = if any_copied_track_selected(copied_tracks) {
            TrackAndSlot::new(to.track_index, 0)
        } else {
            to
        };
        let diff = (to.track_index - from.track_index, to.slot - from.slot);

        let old_focused = document.view().focused_track_and_slot();
        let mut builder = InsertBuilder {
            document,
            create_actions: Vec::new(),
            old_focused,
            new_focused: old_focused,
        };

        let num_non_master = builder.document.num_non_master_tracks() as i32;
        let pasting_into_master = !duplicate
            && builder.document.master_track().is_some()
            && to.track_index == num_non_master;

        if pasting_into_master {
            // Only the first copied track with selections lands in the master.
            let master_index = builder.document.master_track_index().unwrap();
            let copied_track = &copied_tracks[from.track_index as usize];
            builder.copy_processors_from_track(copied_track, from.track_index, master_index, diff.1);
        } else {
            // First pass: processors selected without their parent track.
            // Done first because adding new tracks changes track indices
            // relative to their current position.
            for (copied_index, copied_track) in copied_tracks.iter().enumerate() {
                if copied_track.is_selected() {
                    continue;
                }
                if duplicate {
                    let target_index = builder
                        .document
                        .tracks()
                        .iter()
                        .position(|t| t.uuid() == copied_track.uuid());
                    if let Some(target_index) = target_index {
                        builder.duplicate_selected_processors(copied_track, target_index);
                    }
                } else if copied_track.is_master() {
                    // Processors copied from the master track can only get
                    // inserted into the master track.
                    if let Some(master_index) = builder.document.master_track_index() {
                        builder.copy_processors_from_track(
                            copied_track,
                            copied_index as i32,
                            master_index,
                            diff.1,
                        );
                    }
                } else {
                    let to_track_index = copied_index as i32 + diff.0;
                    if !copied_track.lane().is_empty() {
                        // create tracks to make room
                        while to_track_index >= builder.document.num_non_master_tracks() as i32 {
                            let insert_index = builder.document.num_non_master_tracks();
                            let mut action = CreateTrack::new(insert_index, false);
                            action.perform(builder.document);
                            builder.create_actions.push(CreateChild::Track(action));
                        }
                    }
                    if to_track_index >= 0
                        && to_track_index < builder.document.num_non_master_tracks() as i32
                    {
                        builder.copy_processors_from_track(
                            copied_track,
                            copied_index as i32,
                            to_track_index as usize,
                            diff.1,
                        );
                    }
                }
            }

            // Second pass: selected tracks, along with their processors.
            let selected_track_indices = find_selected_non_master_track_indices(copied_tracks);
            let duplicated_track_indices = find_duplication_indices(&selected_track_indices);
            for (i, &copied_index) in selected_track_indices.iter().enumerate() {
                let copied_track = &copied_tracks[copied_index as usize];
                let insert_index = if duplicate {
                    duplicated_track_indices[i].max(0) as usize
                } else {
                    (copied_index + diff.0 + 1).max(0) as usize
                };
                builder.add_and_perform_create_track(copied_track, copied_index, insert_index);
            }
        }

        let InsertBuilder {
            document,
            mut create_actions,
            new_focused,
            ..
        } = builder;

        let mut select = Select::new(document);
        select.deselect_all();
        for child in &create_actions {
            match child {
                CreateChild::Processor(action) => {
                    let mut mask = select.new_slot_mask(action.track_index());
                    mask.set(action.slot(), true);
                    select.set_new_slot_mask(action.track_index(), mask);
                }
                CreateChild::Track(action) => {
                    select.set_new_track_selected(action.insert_index(), true);
                    let is_master = document
                        .track(action.insert_index())
                        .map(|t| t.is_master())
                        .unwrap_or(false);
                    let num_slots = document.view().num_processor_slots(is_master);
                    select.set_new_slot_mask(action.insert_index(), SlotMask::full(num_slots));
                }
            }
        }
        select.set_new_focused_slot(new_focused);

        let update_connections =
            UpdateAllDefaultConnections::new(document, false, true, Some(new_focused));

        for child in create_actions.iter_mut().rev() {
            child.undo(document);
        }

        Some(Insert {
            create_actions,
            select,
            update_connections,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.create_actions.is_empty()
    }
}

impl Action for Insert {
    fn name(&self) -> &'static str {
        "Insert"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        if self.create_actions.is_empty() {
            return false;
        }
        for child in &mut self.create_actions {
            child.perform(document);
        }
        self.select.perform(document);
        self.update_connections.perform(document);
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        if self.create_actions.is_empty() {
            return false;
        }
        self.update_connections.undo(document);
        self.select.undo(document);
        for child in self.create_actions.iter_mut().rev() {
            child.undo(document);
        }
        true
    }
}
