//! Typed interaction events and per-emitter handler registration.

use std::fmt;

use crate::api::types::EmitterId;

/// Interaction kinds an emitter can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterEvent {
    Click,
}

/// Which part of an emitter received the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionTarget {
    /// The draggable anchor handle.
    DragGizmo,
}

/// Callback fired with the id of the emitter that received the event.
pub type EventHandler = Box<dyn FnMut(&EmitterId)>;

/// Listener table owned by each emitter.
#[derive(Default)]
pub struct HandlerTable {
    handlers: Vec<(EmitterEvent, InteractionTarget, EventHandler)>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event` on `target`.
    pub fn on(&mut self, event: EmitterEvent, target: InteractionTarget, handler: EventHandler) {
        self.handlers.push((event, target, handler));
    }

    /// Fire every listener registered for (`event`, `target`), in registration
    /// order. Returns how many fired.
    pub fn dispatch(&mut self, event: EmitterEvent, target: InteractionTarget, id: &EmitterId) -> usize {
        let mut fired = 0;
        for (e, t, handler) in &mut self.handlers {
            if *e == event && *t == target {
                handler(id);
                fired += 1;
            }
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
