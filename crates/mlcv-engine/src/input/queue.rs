use std::cell::RefCell;
use std::rc::Rc;

use crate::api::types::EmitterId;

/// Commands raised by emitter listeners for the editor to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// An emitter's drag handle was clicked.
    SelectEmitter(EmitterId),
}

/// A shared queue of editor commands.
/// Listeners hold clones and push; the editor drains after each dispatch.
/// Single-threaded by construction, so `Rc<RefCell<_>>` is enough.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    commands: Rc<RefCell<Vec<EditorCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: EditorCommand) {
        self.commands.borrow_mut().push(command);
    }

    /// Drain all pending commands. Returns a Vec and clears the queue.
    pub fn drain(&self) -> Vec<EditorCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let q = CommandQueue::new();
        let producer = q.clone();
        producer.push(EditorCommand::SelectEmitter(EmitterId::new("a")));
        producer.push(EditorCommand::SelectEmitter(EmitterId::new("b")));
        assert_eq!(q.len(), 2);
        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert!(producer.is_empty());
    }
}
