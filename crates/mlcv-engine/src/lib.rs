pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod editor;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::config::VisualizationConfig;
pub use api::error::EditorError;
pub use api::types::{Color, EmitterId};
pub use components::emitter::{EmitterOptions, MoleculeEmitter};
pub use components::gizmo::Gizmo;
pub use components::molecule::{Molecule, MoleculeStyle};
pub use components::settings::{EmitterSettings, EmitterState, SettingField, SettingValue};
pub use core::ids::{IdSource, UniqueIds};
pub use core::visualization::{ExportDocument, GlobalSettings, ReferenceImage, Visualization};
pub use editor::{
    ChangePhase, ControlPanel, Editor, ExportDialog, FolderBinding, FolderPanel, Selection,
    SettingTarget,
};
pub use input::{CommandQueue, EditorCommand, EmitterEvent, InteractionTarget};
pub use renderer::{DrawNode, MoleculeInstance, Primitive, RecordingSurface, RenderBuffer, RenderSurface};
pub use systems::rng::Rng;
pub use systems::spawn::RadialDistribution;
