use crate::core::document::connection::{Connection, NodeId};
use crate::core::document::processor::ProcessorId;
use crate::core::document::track::TrackId;
use crate::core::document::view::TrackAndSlot;

/// What changed about a processor's properties.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ProcessorProperty {
    Bypassed,
    DefaultConnectionsAllowed,
    Slot,
    Name,
    DeviceName,
    PluginState,
    WindowPlacement,
    Parameter(usize),
}

/// Everything the engine needs to know about a processor that is no longer
/// in the document.
#[derive(Clone, Debug)]
pub struct RemovedProcessor {
    pub id: ProcessorId,
    pub node_id: NodeId,
    pub descriptor_id: String,
    pub device_name: Option<String>,
}

/// A change to the document, emitted in mutation order. The graph
/// coordinator and any registered listeners consume these after each
/// committed step; each event refers to a document state in which all
/// preceding events have already been applied.
#[derive(Clone, Debug)]
pub enum DocumentEvent {
    TrackAdded(TrackId),
    TrackRemoved(TrackId),
    TrackMoved { from: usize, to: usize },
    ProcessorAdded(ProcessorId),
    ProcessorRemoved(RemovedProcessor),
    ProcessorMoved(ProcessorId),
    ProcessorChanged(ProcessorId, ProcessorProperty),
    ConnectionAdded(Connection),
    ConnectionRemoved(Connection),
    FocusChanged(TrackAndSlot),
    SelectionChanged,
}

/// Cancel out processor add/remove and connection add/remove pairs in
/// which the same entity is added and then removed with no net effect.
/// This keeps temporary performs during action construction invisible to
/// the live graph. Order of the surviving events is preserved.
pub(crate) fn coalesce_events(events: Vec<DocumentEvent>) -> Vec<DocumentEvent> {
    let mut kept: Vec<Option<DocumentEvent>> = events.into_iter().map(Some).collect();
    for i in 0..kept.len() {
        let cancel = match &kept[i] {
            Some(DocumentEvent::ProcessorAdded(id)) => {
                let id = *id;
                kept.iter().skip(i + 1).position(|e| {
                    matches!(e, Some(DocumentEvent::ProcessorRemoved(removed)) if removed.id == id)
                })
            }
            Some(DocumentEvent::ConnectionAdded(connection)) => {
                let connection = *connection;
                kept.iter().skip(i + 1).position(|e| {
                    matches!(e, Some(DocumentEvent::ConnectionRemoved(c)) if c.matches_endpoints(&connection))
                })
            }
            _ => None,
        };
        if let Some(offset) = cancel {
            kept[i] = None;
            kept[i + 1 + offset] = None;
        }
    }
    kept.into_iter().flatten().collect()
}

/// Listener interface for document changes, registered with the project.
/// Listeners observe a consistent document at each notification and must
/// not mutate it.
pub trait DocumentListener {
    fn document_changed(
        &mut self,
        document: &crate::core::document::document::Document,
        event: &DocumentEvent,
    );
}
