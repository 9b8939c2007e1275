use crate::core::actions::action::Action;
use crate::core::document::connection::{Connection, ConnectionType, NodeId};
use crate::core::document::defaultconnections::can_connect;
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;

#[derive(Copy, Clone, Debug)]
pub enum ConnectionEdit {
    Add(Connection),
    Remove(Connection),
}

/// An ordered list of connection additions and removals, applied to the
/// document as one reversible unit. Removals capture the full connection
/// (including its is_custom flag) at construction time so undo restores
/// it exactly.
pub struct CreateOrDeleteConnections {
    edits: Vec<ConnectionEdit>,
}

impl CreateOrDeleteConnections {
    pub fn new() -> CreateOrDeleteConnections {
        CreateOrDeleteConnections { edits: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[ConnectionEdit] {
        &self.edits
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.edits.push(ConnectionEdit::Add(connection));
    }

    pub fn remove_connection(&mut self, connection: Connection) {
        self.edits.push(ConnectionEdit::Remove(connection));
    }

    /// Cancel add-then-remove pairs on the same endpoints, preserving the
    /// order of whatever survives.
    pub fn coalesce(&mut self) {
        let mut kept: Vec<Option<ConnectionEdit>> = self.edits.drain(..).map(Some).collect();
        for i in 0..kept.len() {
            let added = match kept[i] {
                Some(ConnectionEdit::Add(connection)) => connection,
                _ => continue,
            };
            let cancelling = kept.iter().skip(i + 1).position(|e| {
                matches!(e, Some(ConnectionEdit::Remove(c)) if c.matches_endpoints(&added))
            });
            if let Some(offset) = cancelling {
                kept[i] = None;
                kept[i + 1 + offset] = None;
            }
        }
        self.edits = kept.into_iter().flatten().collect();
    }

    /// All removals of connections incident on a processor, filtered by
    /// type, direction and custom/default taxonomy. Connections whose far
    /// endpoint is the excluded node are kept.
    #[allow(clippy::too_many_arguments)]
    pub fn disconnect_processor(
        document: &Document,
        processor_id: ProcessorId,
        connection_type: Option<ConnectionType>,
        defaults: bool,
        custom: bool,
        incoming: bool,
        outgoing: bool,
        excluding: Option<NodeId>,
    ) -> CreateOrDeleteConnections {
        let mut action = CreateOrDeleteConnections::new();
        let Some(processor) = document.processor(processor_id) else {
            return action;
        };
        let node_id = processor.node_id();
        for connection in document.connections().for_node(
            node_id,
            connection_type,
            incoming,
            outgoing,
            custom,
            defaults,
        ) {
            if let Some(excluded) = excluding {
                let far_end = if connection.source.node_id == node_id {
                    connection.destination.node_id
                } else {
                    connection.source.node_id
                };
                if far_end == excluded {
                    continue;
                }
            }
            action.remove_connection(connection);
        }
        action
    }

    /// A user-authored connection. Displaces any default connections
    /// leaving the same source on the same connection type, then adds the
    /// custom connection. Returns None if the connection is not legal.
    pub fn create_connection(
        document: &Document,
        connection: Connection,
    ) -> Option<CreateOrDeleteConnections> {
        if !can_connect(
            document,
            connection.source.node_id,
            connection.source.channel,
            connection.destination.node_id,
            connection.destination.channel,
        ) {
            return None;
        }
        let source_processor = document.processor_by_node_id(connection.source.node_id)?;
        let mut action = CreateOrDeleteConnections::disconnect_processor(
            document,
            source_processor.id(),
            Some(connection.connection_type()),
            true,
            false,
            false,
            true,
            None,
        );
        action.add_connection(Connection::new(
            connection.source,
            connection.destination,
            true,
        ));
        Some(action)
    }

    /// Removal of a single connection, gated by the taxonomy flags.
    pub fn delete_connection(
        document: &Document,
        connection: &Connection,
        allow_defaults: bool,
        allow_custom: bool,
    ) -> CreateOrDeleteConnections {
        let mut action = CreateOrDeleteConnections::new();
        if let Some(existing) = document.connections().connection_matching(connection) {
            if (existing.is_custom && allow_custom) || (!existing.is_custom && allow_defaults) {
                action.remove_connection(*existing);
            }
        }
        action
    }
}

impl Default for CreateOrDeleteConnections {
    fn default() -> CreateOrDeleteConnections {
        CreateOrDeleteConnections::new()
    }
}

impl Action for CreateOrDeleteConnections {
    fn name(&self) -> &'static str {
        "CreateOrDeleteConnections"
    }

    fn perform(&mut self, document: &mut Document) -> bool {
        for i in 0..self.edits.len() {
            let ok = match self.edits[i] {
                ConnectionEdit::Add(connection) => {
                    if document
                        .connections()
                        .connection_matching(&connection)
                        .is_some()
                    {
                        false
                    } else {
                        document.add_connection(connection);
                        true
                    }
                }
                ConnectionEdit::Remove(connection) => {
                    document.remove_connection_matching(&connection).is_some()
                }
            };
            if !ok {
                for j in (0..i).rev() {
                    undo_edit(&self.edits[j], document);
                }
                return false;
            }
        }
        true
    }

    fn undo(&mut self, document: &mut Document) -> bool {
        for edit in self.edits.iter().rev() {
            undo_edit(edit, document);
        }
        true
    }
}

fn undo_edit(edit: &ConnectionEdit, document: &mut Document) {
    match edit {
        ConnectionEdit::Add(connection) => {
            document.remove_connection_matching(connection);
        }
        ConnectionEdit::Remove(connection) => {
            if document
                .connections()
                .connection_matching(connection)
                .is_none()
            {
                document.add_connection(*connection);
            }
        }
    }
}
