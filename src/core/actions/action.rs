use crate::core::document::document::Document;

/// A reversible unit of document change. Both methods are idempotent with
/// respect to repeated perform/undo pairs: perform after undo reproduces
/// exactly the state the first perform produced.
///
/// Actions that need to observe post-state while being built follow the
/// temporary-perform protocol: the constructor performs children against
/// the document to discover the resulting layout, builds further children
/// from what it sees, then undoes everything before returning. The
/// finished action, when performed by the undo manager, performs all its
/// children fresh in order.
pub trait Action {
    fn name(&self) -> &'static str;

    /// Apply the change. Returns false if nothing was done; a composite
    /// that fails partway undoes its already-performed children first.
    fn perform(&mut self, document: &mut Document) -> bool;

    /// Reverse the change, in exact reverse order of perform.
    fn undo(&mut self, document: &mut Document) -> bool;
}

/// An ordered list of child actions performed in order and undone in
/// reverse.
pub struct Composite {
    name: &'static str,
    children: Vec<Box<dyn Action>>,
}

impl Composite {
    pub fn new(name: &'static str) -> Composite {
        Composite {
            name,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: Box<dyn Action>) {
        self.children.push(child);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Action for Composite {
    fn name(&self) -> &'static str {
        self.name
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
