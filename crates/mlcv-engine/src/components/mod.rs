pub mod emitter;
pub mod gizmo;
pub mod molecule;
pub mod settings;
