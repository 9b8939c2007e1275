use crate::core::actions::action::Action;
use crate::core::document::document::Document;

/// Linear undo history. Actions are committed after they have been
/// performed; committing discards any undone tail.
pub struct UndoManager {
    history: Vec<Box<dyn Action>>,
    num_undone: usize,
}

impl UndoManager {
    pub fn new() -> UndoManager {
        UndoManager {
            history: Vec::new(),
            num_undone: 0,
        }
    }

    pub fn commit(&mut self, action: Box<dyn Action>) {
        let keep = self.history.len() - self.num_undone;
        self.history.truncate(keep);
        self.num_undone = 0;
        self.history.push(action);
    }

    pub fn can_undo(&self) -> bool {
        self.num_undone < self.history.len()
    }

    pub fn can_redo(&self) -> bool {
        self.num_undone > 0
    }

    pub fn undo(&mut self, document: &mut Document) -> bool {
        if !self.can_undo() {
            return false;
        }
        let index = self.history.len() - 1 - self.num_undone;
        let undone = self.history[index].undo(document);
        self.num_undone += 1;
        undone
    }

    pub fn redo(&mut self, document: &mut Document) -> bool {
        if !self.can_redo() {
            return false;
        }
        let index = self.history.len() - self.num_undone;
        let performed = self.history[index].perform(document);
        self.num_undone -= 1;
        performed
    }
}

impl Default for UndoManager {
    fn default() -> UndoManager {
        UndoManager::new()
    }
}
