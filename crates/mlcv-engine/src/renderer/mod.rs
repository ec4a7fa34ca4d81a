pub mod instance;
pub mod traits;

pub use instance::{MoleculeInstance, RenderBuffer};
pub use traits::{DrawNode, Primitive, RecordingSurface, RenderSurface};
