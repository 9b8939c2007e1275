use crate::core::actions::action::Action;
use crate::core::actions::connectionactions::CreateOrDeleteConnections;
use crate::core::document::connection::{Connection, ConnectionType};
use crate::core::document::defaultconnections::{
    can_connect, default_connection_channels, find_external_input_target,
    find_processor_to_flow_into,
};
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;
use crate::core::document::view::TrackAndSlot;

/// Recompute the outgoing default connections of a single processor
/// against the current document state. Stale defaults (pointing somewhere
/// other than the derived destination) are removed, optionally preserved
/// as custom connections, and fresh defaults are added when nothing
/// custom occupies the path.
pub struct UpdateDefaultConnections {
    edits: CreateOrDeleteConnections,
}

impl UpdateDefaultConnections {
    pub fn new(
        document: &Document,
        processor_id: ProcessorId,
        make_invalid_defaults_into_custom: bool,
    ) -> UpdateDefaultConnections {
        let mut edits = CreateOrDeleteConnections::new();
        let Some(processor) = document.processor(processor_id) else {
            return UpdateDefaultConnections { edits };
        };
        let Some(track_index) = document.track_index_for_processor(processor_id) else {
            // External I/O processors are handled by ResetDefaultExternalInputs.
            return UpdateDefaultConnections { edits };
        };
        let node_id = processor.node_id();

        if !processor.default_connections_allowed() {
            for connection in document
                .connections()
                .for_node(node_id, None, true, true, false, true)
            {
                edits.remove_connection(connection);
            }
            return UpdateDefaultConnections { edits };
        }

        for connection_type in [ConnectionType::Audio, ConnectionType::Midi] {
            let outgoing_custom = document.connections().for_node(
                node_id,
                Some(connection_type),
                false,
                true,
                true,
                false,
            );
            if !outgoing_custom.is_empty() {
                // A custom connection occupies this path; defaults yield to it.
                for connection in document.connections().for_node(
                    node_id,
                    Some(connection_type),
                    false,
                    true,
                    false,
                    true,
                ) {
                    edits.remove_connection(connection);
                }
                continue;
            }

            let outgoing_defaults = document.connections().for_node(
                node_id,
                Some(connection_type),
                false,
                true,
                false,
                true,
            );
            let destination =
                find_processor_to_flow_into(document, track_index, processor, connection_type, None);

            let mut any_custom_added = false;
            for connection in &outgoing_defaults {
                if Some(connection.destination.node_id) != destination {
                    edits.remove_connection(*connection);
                    if make_invalid_defaults_into_custom {
                        // The displaced default survives as a user connection.
                        edits.add_connection(Connection::new(
                            connection.source,
                            connection.destination,
                            true,
                        ));
                        any_custom_added = true;
                    }
                }
            }

            if any_custom_added {
                continue;
            }
            let Some(destination) = destination else {
                continue;
            };
            let destination_allows = document
                .processor_by_node_id(destination)
                .map(|p| p.default_connections_allowed())
                .unwrap_or(false);
            if !destination_allows {
                continue;
            }
            for &channel in default_connection_channels(connection_type) {
                let connection = Connection::default_between(node_id, destination, channel);
                if document
                    .connections()
                    .connection_matching(&connection)
                    .is_none()
                    && can_connect(document, node_id, channel, destination, channel)
                {
                    edits.add_connection(connection);
                }
            }
        }

        UpdateDefaultConnections { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

impl Action for UpdateDefaultConnections {
    fn name(&self) -> &'static str {
        "UpdateDefaultConnections"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        self.edits.perform(document)
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        self.edits.undo(document)
    }
}

/// Re-target the default connections leaving each external input so that
/// exactly one default path feeds the focused processor per input, per
/// connection type.
pub struct ResetDefaultExternalInputs {
    edits: CreateOrDeleteConnections,
}

impl ResetDefaultExternalInputs {
    pub fn new(
        document: &Document,
        focused_processor: Option<ProcessorId>,
    ) -> ResetDefaultExternalInputs {
        let mut edits = CreateOrDeleteConnections::new();

        let mut reset_input = |input_node, connection_type| {
            let target = focused_processor
                .and_then(|focused| find_external_input_target(document, focused, connection_type));
            for connection in document.connections().for_node(
                input_node,
                Some(connection_type),
                false,
                true,
                false,
                true,
            ) {
                if Some(connection.destination.node_id) != target {
                    edits.remove_connection(connection);
                }
            }
            if let Some(target) = target {
                for &channel in default_connection_channels(connection_type) {
                    let connection = Connection::default_between(input_node, target, channel);
                    if document
                        .connections()
                        .connection_matching(&connection)
                        .is_none()
                        && can_connect(document, input_node, channel, target, channel)
                    {
                        edits.add_connection(connection);
                    }
                }
            }
        };

        if let Some(audio_input) = document.input().audio_input_processor() {
            reset_input(audio_input.node_id(), ConnectionType::Audio);
        }
        for midi_input in document.input().midi_input_processors() {
            reset_input(midi_input.node_id(), ConnectionType::Midi);
        }

        ResetDefaultExternalInputs { edits }
    }
}

impl Action for ResetDefaultExternalInputs {
    fn name(&self) -> &'static str {
        "ResetDefaultExternalInputs"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        self.edits.perform(document)
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        self.edits.undo(document)
    }
}

/// Recompute default connections for every processor, tracks left to
/// right and slots ascending, then re-target the external inputs. Built
/// with the temporary-perform protocol so each per-processor step
/// observes the effects of the previous ones.
pub struct UpdateAllDefaultConnections {
    children: Vec<Box<dyn Action>>,
}

impl UpdateAllDefaultConnections {
    pub fn new(
        document: &mut Document,
        make_invalid_defaults_into_custom: bool,
        update_external_inputs: bool,
        focused_override: Option<TrackAndSlot>,
    ) -> UpdateAllDefaultConnections {
        let mut children: Vec<Box<dyn Action>> = Vec::new();

        for track_index in 0..document.num_tracks() {
            let processor_ids: Vec<ProcessorId> = document
                .track(track_index)
                .map(|t| t.all_processors().map(|p| p.id()).collect())
                .unwrap_or_default();
            for processor_id in processor_ids {
                let mut child = UpdateDefaultConnections::new(
                    document,
                    processor_id,
                    make_invalid_defaults_into_custom,
                );
                child.perform(document);
                children.push(Box::new(child));
            }
        }

        if update_external_inputs {
            let focused_processor = match focused_override {
                Some(track_and_slot) => document.processor_at(track_and_slot).map(|p| p.id()),
                None => document.focused_processor().map(|p| p.id()),
            };
            let mut child = ResetDefaultExternalInputs::new(document, focused_processor);
            child.perform(document);
            children.push(Box::new(child));
        }

        for child in children.iter_mut().rev() {
            child.undo(document);
        }

        UpdateAllDefaultConnections { children }
    }
}

impl Action for UpdateAllDefaultConnections {
    fn name(&self) -> &'static str {
        "UpdateAllDefaultConnections"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        for i in 0..self.children.len() {
            if !self.children[i].perform(document) {
                for j in (0..i).rev() {
                    self.children[j].undo(document);
                }
                return false;
            }
        }
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        for child in self.children.iter_mut().rev() {
            child.undo(document);
        }
        true
    }
}
