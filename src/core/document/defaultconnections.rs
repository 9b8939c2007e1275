use crate::core::document::connection::{
    Connection, ConnectionEndpoint, ConnectionType, NodeId, MIDI_CHANNEL_INDEX,
};
use crate::core::document::document::Document;
use crate::core::document::processor::{Processor, ProcessorId};

pub(crate) const DEFAULT_AUDIO_CONNECTION_CHANNELS: &[i32] = &[0, 1];
pub(crate) const DEFAULT_MIDI_CONNECTION_CHANNELS: &[i32] = &[MIDI_CHANNEL_INDEX];

pub(crate) fn default_connection_channels(connection_type: ConnectionType) -> &'static [i32] {
    match connection_type {
        ConnectionType::Audio => DEFAULT_AUDIO_CONNECTION_CHANNELS,
        ConnectionType::Midi => DEFAULT_MIDI_CONNECTION_CHANNELS,
    }
}

/// Whether a connection between the given channels of the given nodes
/// would be legal: both endpoints must exist and be distinct, the
/// MIDI-ness of both channels must agree, the channels must be in range
/// and backed by the corresponding capability, no equivalent connection
/// may already exist, and the new edge must not close a cycle.
pub fn can_connect(
    document: &Document,
    source: NodeId,
    source_channel: i32,
    destination: NodeId,
    destination_channel: i32,
) -> bool {
    let source_is_midi = source_channel == MIDI_CHANNEL_INDEX;
    let destination_is_midi = destination_channel == MIDI_CHANNEL_INDEX;

    if source_channel < 0
        || destination_channel < 0
        || source == destination
        || source_is_midi != destination_is_midi
    {
        return false;
    }

    let Some(source_processor) = document.processor_by_node_id(source) else {
        return false;
    };
    if (!source_is_midi && source_channel >= source_processor.num_output_channels())
        || (source_is_midi && !source_processor.produces_midi())
    {
        return false;
    }

    let Some(destination_processor) = document.processor_by_node_id(destination) else {
        return false;
    };
    if (!destination_is_midi && destination_channel >= destination_processor.num_input_channels())
        || (destination_is_midi && !destination_processor.accepts_midi())
    {
        return false;
    }

    let candidate = Connection::new(
        ConnectionEndpoint::new(source, source_channel),
        ConnectionEndpoint::new(destination, destination_channel),
        false,
    );
    if document.connections().connection_matching(&candidate).is_some() {
        return false;
    }

    // A new source -> destination edge closes a cycle exactly when the
    // destination already flows into the source.
    let connection_type = if source_is_midi {
        ConnectionType::Midi
    } else {
        ConnectionType::Audio
    };
    !are_processors_connected(document, destination, source, connection_type)
}

/// True if the upstream node transitively flows into the downstream node
/// over connections of the given type (or if they are the same node).
pub(crate) fn are_processors_connected(
    document: &Document,
    upstream: NodeId,
    downstream: NodeId,
    connection_type: ConnectionType,
) -> bool {
    if upstream == downstream {
        return true;
    }
    let outgoing =
        document
            .connections()
            .for_node(upstream, Some(connection_type), false, true, true, true);
    for connection in outgoing {
        let next = connection.destination.node_id;
        if next == downstream || are_processors_connected(document, next, downstream, connection_type)
        {
            return true;
        }
    }
    false
}

/// Find the processor a source processor's default connections of the
/// given type should flow into, if any:
///
/// 1. a track output processor flows into the master track's input,
/// 2. otherwise the first processor below it in its lane that accepts the
///    connection type; a non-accepting processor below it blocks the
///    default instead,
/// 3. otherwise the track's own output processor,
/// 4. otherwise (no track output) the first master-track processor
///    accepting the type,
/// 5. otherwise the system output processor for the type.
pub(crate) fn find_processor_to_flow_into(
    document: &Document,
    track_index: usize,
    source: &Processor,
    connection_type: ConnectionType,
    excluding: Option<ProcessorId>,
) -> Option<NodeId> {
    if !source.is_producer(connection_type) {
        return None;
    }

    let track = document.track(track_index)?;

    if source.is_track_output() {
        if track.is_master() {
            return None;
        }
        return document
            .master_track()
            .and_then(|master| master.input_processor())
            .map(|input| input.node_id());
    }

    if source.is_track_input() {
        // A track input feeds the first lane processor that accepts the
        // connection type, and falls through to the track output otherwise.
        for other in track.lane().processors() {
            if other.id() == source.id() || Some(other.id()) == excluding {
                continue;
            }
            if other.is_effect(connection_type) {
                return Some(other.node_id());
            }
        }
    } else {
        // Scan the lane below the source. A processor that cannot accept
        // the connection type blocks the default path instead of
        // forwarding it.
        let mut fallback_blocking_processor: Option<&Processor> = None;
        for other in track.lane().processors() {
            if other.id() == source.id() || Some(other.id()) == excluding {
                continue;
            }
            if other.slot() <= source.slot() {
                continue;
            }
            if other.is_effect(connection_type) {
                return Some(other.node_id());
            }
            fallback_blocking_processor = Some(other);
            break;
        }
        if let Some(blocking) = fallback_blocking_processor {
            return Some(blocking.node_id());
        }
    }

    if let Some(output) = track.output_processor() {
        if output.id() != source.id() && Some(output.id()) != excluding {
            return Some(output.node_id());
        }
    }

    if !track.is_master() {
        if let Some(master) = document.master_track() {
            for processor in master.all_processors() {
                if processor.id() == source.id() || Some(processor.id()) == excluding {
                    continue;
                }
                if processor.is_effect(connection_type) {
                    return Some(processor.node_id());
                }
            }
        }
    }

    document
        .output()
        .default_output_processor(connection_type)
        .map(|p| p.node_id())
}

/// The single processor an external input should feed by default: the
/// upper-right-most track entry point that transitively flows into the
/// focused processor. Tracks are scanned right to left; a strictly lower
/// entry slot wins, so ties keep the right-most track.
pub(crate) fn find_external_input_target(
    document: &Document,
    focused: ProcessorId,
    connection_type: ConnectionType,
) -> Option<NodeId> {
    let focused_node = document.processor(focused)?.node_id();

    let mut lowest_slot = i32::MAX;
    let mut target: Option<NodeId> = None;
    for track in document.tracks().iter().rev() {
        let (entry_node, entry_slot) = match track.input_processor() {
            Some(input) => (input.node_id(), -1),
            None => match track.lane().processors().first() {
                Some(first) => (first.node_id(), first.slot()),
                None => continue,
            },
        };
        if entry_slot < lowest_slot
            && are_processors_connected(document, entry_node, focused_node, connection_type)
        {
            lowest_slot = entry_slot;
            target = Some(entry_node);
        }
    }
    target
}
