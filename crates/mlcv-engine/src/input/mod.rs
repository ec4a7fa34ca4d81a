pub mod events;
pub mod queue;

pub use events::{EmitterEvent, EventHandler, HandlerTable, InteractionTarget};
pub use queue::{CommandQueue, EditorCommand};
