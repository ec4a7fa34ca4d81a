//! Editor layer: placement, selection, live editing and export.

pub mod export;
pub mod panel;
pub mod session;

pub use export::ExportDialog;
pub use panel::{
    ChangePhase, ControlPanel, FolderBinding, FolderPanel, SettingTarget, EXPORT_FOLDER,
    NEW_EMITTER_FOLDER, SELECTED_EMITTER_FOLDER, VISUALIZATION_FOLDER,
};
pub use session::{Editor, Selection};
