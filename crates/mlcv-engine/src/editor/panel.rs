//! Control-panel contract. Widgets are views over the settings records;
//! the editor tells the panel which folders exist and what they are bound to.

use crate::api::types::EmitterId;
use crate::components::settings::EmitterSettings;

pub const NEW_EMITTER_FOLDER: &str = "New Emitter";
pub const VISUALIZATION_FOLDER: &str = "MLCV";
pub const EXPORT_FOLDER: &str = "Export";
pub const SELECTED_EMITTER_FOLDER: &str = "Selected Emitter";

/// What a folder's widgets edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderBinding {
    /// The new-emitter draft template.
    Draft,
    /// Global visualization settings and toggles.
    Visualization,
    /// Export name and action.
    Export,
    /// A placed emitter.
    Selected(EmitterId),
}

/// Which settings record a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingTarget {
    Draft,
    Selected,
}

/// When a control reports a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePhase {
    /// Fired on every interactive update while the user drags.
    Changing,
    /// Fired once when the interaction ends.
    Finished,
}

/// The host's control panel.
pub trait ControlPanel {
    /// Add a folder. A folder with the same name is replaced.
    fn add_folder(&mut self, name: &str, binding: FolderBinding);

    /// Remove a folder by name. Unknown names are ignored.
    fn remove_folder(&mut self, name: &str);

    fn has_folder(&self, name: &str) -> bool;

    /// Persist the given settings as the panel's preset state.
    fn remember(&mut self, settings: &EmitterSettings);
}

/// In-memory panel: records folders in insertion order.
#[derive(Debug, Default)]
pub struct FolderPanel {
    folders: Vec<(String, FolderBinding)>,
    remembered: Option<EmitterSettings>,
}

impl FolderPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folders(&self) -> impl Iterator<Item = (&str, &FolderBinding)> {
        self.folders.iter().map(|(n, b)| (n.as_str(), b))
    }

    pub fn binding(&self, name: &str) -> Option<&FolderBinding> {
        self.folders.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    pub fn remembered(&self) -> Option<&EmitterSettings> {
        self.remembered.as_ref()
    }
}

impl ControlPanel for FolderPanel {
    fn add_folder(&mut self, name: &str, binding: FolderBinding) {
        self.remove_folder(name);
        self.folders.push((name.to_string(), binding));
    }

    fn remove_folder(&mut self, name: &str) {
        self.folders.retain(|(n, _)| n != name);
    }

    fn has_folder(&self, name: &str) -> bool {
        self.folders.iter().any(|(n, _)| n == name)
    }

    fn remember(&mut self, settings: &EmitterSettings) {
        self.remembered = Some(settings.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_replaces_same_name() {
        let mut panel = FolderPanel::new();
        panel.add_folder(SELECTED_EMITTER_FOLDER, FolderBinding::Selected(EmitterId::new("a")));
        panel.add_folder(SELECTED_EMITTER_FOLDER, FolderBinding::Selected(EmitterId::new("b")));
        assert_eq!(panel.folders().count(), 1);
        assert_eq!(
            panel.binding(SELECTED_EMITTER_FOLDER),
            Some(&FolderBinding::Selected(EmitterId::new("b")))
        );
    }

    #[test]
    fn remove_unknown_is_ignored() {
        let mut panel = FolderPanel::new();
        panel.add_folder(EXPORT_FOLDER, FolderBinding::Export);
        panel.remove_folder("nope");
        assert!(panel.has_folder(EXPORT_FOLDER));
        panel.remove_folder(EXPORT_FOLDER);
        assert!(!panel.has_folder(EXPORT_FOLDER));
    }
}
