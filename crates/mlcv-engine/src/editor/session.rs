//! Editor session: placement, selection and live editing of emitters.
//!
//! The editor holds only session state (draft template, selection, export
//! name). The visualization is passed into every operation, so the editor
//! and the container can be driven and tested independently.

use glam::Vec2;

use crate::api::error::EditorError;
use crate::api::types::EmitterId;
use crate::components::emitter::MoleculeEmitter;
use crate::components::settings::{EmitterSettings, SettingField, SettingValue};
use crate::core::ids::{IdSource, UniqueIds};
use crate::core::visualization::{ExportDocument, Visualization};
use crate::editor::export::ExportDialog;
use crate::editor::panel::{
    ChangePhase, ControlPanel, FolderBinding, FolderPanel, SettingTarget, EXPORT_FOLDER,
    NEW_EMITTER_FOLDER, SELECTED_EMITTER_FOLDER, VISUALIZATION_FOLDER,
};
use crate::input::events::{EmitterEvent, InteractionTarget};
use crate::input::queue::{CommandQueue, EditorCommand};

/// Selection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected(EmitterId),
}

/// Editor for one visualization session.
pub struct Editor<P: ControlPanel = FolderPanel, I: IdSource = UniqueIds> {
    panel: P,
    ids: I,
    draft: EmitterSettings,
    selection: Selection,
    export_state_id: String,
    dialog: Option<ExportDialog>,
    commands: CommandQueue,
}

impl<P: ControlPanel, I: IdSource> Editor<P, I> {
    /// Create an editor and register its permanent folders with the panel.
    pub fn new(mut panel: P, ids: I) -> Self {
        let draft = EmitterSettings::default();
        panel.remember(&draft);
        panel.add_folder(NEW_EMITTER_FOLDER, FolderBinding::Draft);
        panel.add_folder(VISUALIZATION_FOLDER, FolderBinding::Visualization);
        panel.add_folder(EXPORT_FOLDER, FolderBinding::Export);
        Self {
            panel,
            ids,
            draft,
            selection: Selection::Idle,
            export_state_id: "Default".to_string(),
            dialog: None,
            commands: CommandQueue::new(),
        }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// The "new emitter" template. Never rendered.
    pub fn draft(&self) -> &EmitterSettings {
        &self.draft
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&EmitterId> {
        match &self.selection {
            Selection::Idle => None,
            Selection::Selected(id) => Some(id),
        }
    }

    /// Place a new emitter.
    ///
    /// Without a position the emitter goes to the center of the viewport; a
    /// non-finite position falls back to the center as well. With
    /// `copy_from`, that emitter's settings are used instead of the draft.
    /// Selection does not move to the new emitter.
    pub fn place_emitter(
        &mut self,
        viz: &mut Visualization,
        at: Option<Vec2>,
        copy_from: Option<&EmitterId>,
    ) -> Result<EmitterId, EditorError> {
        let mut settings = match copy_from {
            Some(id) => {
                viz.get(id)
                    .ok_or_else(|| EditorError::UnknownEmitter(id.clone()))?
                    .export_state()
                    .settings
            }
            None => self.draft.clone(),
        };

        let position = match at {
            Some(p) if p.is_finite() => p,
            Some(p) => {
                log::warn!("placement at non-finite {p:?}, using center");
                viz.center_coordinates()
            }
            None => viz.center_coordinates(),
        };
        settings.x = position.x;
        settings.y = position.y;

        let id = self.fresh_id(viz);
        let options = viz.emitter_options();
        let emitter = MoleculeEmitter::new(id.clone(), settings, options);
        self.attach(viz, emitter);
        log::info!("placed emitter {id} at ({}, {})", position.x, position.y);
        Ok(id)
    }

    /// Place a copy of the selected emitter at the viewport center.
    /// Returns `Ok(None)` when nothing is selected.
    pub fn duplicate_selected_emitter(
        &mut self,
        viz: &mut Visualization,
    ) -> Result<Option<EmitterId>, EditorError> {
        let Some(source) = self.selected().cloned() else {
            return Ok(None);
        };
        self.place_emitter(viz, None, Some(&source)).map(Some)
    }

    /// Select `id`. Clicking the selected emitter again is a no-op.
    pub fn on_click_emitter(
        &mut self,
        viz: &mut Visualization,
        id: &EmitterId,
    ) -> Result<(), EditorError> {
        if self.selected() == Some(id) {
            return Ok(());
        }
        if !viz.contains(id) {
            return Err(EditorError::UnknownEmitter(id.clone()));
        }

        if let Selection::Selected(previous) = &self.selection {
            if let Some(emitter) = viz.get_mut(previous) {
                emitter.unhighlight();
            }
            self.panel.remove_folder(SELECTED_EMITTER_FOLDER);
        }

        if let Some(emitter) = viz.get_mut(id) {
            emitter.highlight();
        }
        self.panel
            .add_folder(SELECTED_EMITTER_FOLDER, FolderBinding::Selected(id.clone()));
        self.selection = Selection::Selected(id.clone());
        log::debug!("selected emitter {id}");
        Ok(())
    }

    /// Remove the selected emitter. A no-op while nothing is selected.
    ///
    /// If the selected emitter has vanished from the visualization the stale
    /// selection is cleared and `UnknownEmitter` is returned.
    pub fn remove_emitter(&mut self, viz: &mut Visualization) -> Result<(), EditorError> {
        let Selection::Selected(id) = std::mem::take(&mut self.selection) else {
            return Ok(());
        };
        self.panel.remove_folder(SELECTED_EMITTER_FOLDER);
        match viz.remove_emitter(&id) {
            Some(_) => Ok(()),
            None => Err(EditorError::UnknownEmitter(id)),
        }
    }

    /// Hit-test the drag handles at `point` and deliver a click to the
    /// top-most one. Returns the clicked emitter, if any.
    pub fn pointer_down(
        &mut self,
        viz: &mut Visualization,
        point: Vec2,
    ) -> Result<Option<EmitterId>, EditorError> {
        let Some(id) = viz.emitter_at(point).cloned() else {
            return Ok(None);
        };
        if let Some(emitter) = viz.get_mut(&id) {
            emitter.emit(EmitterEvent::Click, InteractionTarget::DragGizmo);
        }
        self.process_commands(viz)?;
        Ok(Some(id))
    }

    /// Drag the selected emitter's anchor to `point`.
    pub fn drag_selected(&mut self, viz: &mut Visualization, point: Vec2) -> Result<(), EditorError> {
        let Some(id) = self.selected() else {
            return Ok(());
        };
        if !point.is_finite() {
            log::warn!("ignoring drag to non-finite {point:?}");
            return Ok(());
        }
        let emitter = viz
            .get_mut(id)
            .ok_or_else(|| EditorError::UnknownEmitter(id.clone()))?;
        emitter.set_position(point.x, point.y);
        Ok(())
    }

    /// Handle commands queued by emitter listeners.
    pub fn process_commands(&mut self, viz: &mut Visualization) -> Result<(), EditorError> {
        for command in self.commands.drain() {
            match command {
                EditorCommand::SelectEmitter(id) => self.on_click_emitter(viz, &id)?,
            }
        }
        Ok(())
    }

    /// Apply a control change to the draft or the selected emitter.
    ///
    /// Draft changes only write the template. Changes to the selected emitter
    /// write the record and update the molecules the way the panel binds
    /// them: cheap in-place updates while dragging, resizing and jitter once
    /// the drag finishes. Mismatched value kinds are logged and ignored.
    pub fn change_setting(
        &mut self,
        viz: &mut Visualization,
        target: SettingTarget,
        field: SettingField,
        value: SettingValue,
        phase: ChangePhase,
    ) -> Result<(), EditorError> {
        let Some(value) = field.normalize(value) else {
            log::warn!("ignoring {value:?} for {}", field.label());
            return Ok(());
        };

        let id = match target {
            SettingTarget::Draft => {
                self.draft.set(field, value);
                return Ok(());
            }
            SettingTarget::Selected => match self.selected() {
                Some(id) => id.clone(),
                None => return Ok(()),
            },
        };

        let show_gizmos = viz.settings.show_gizmos;
        let emitter = viz
            .get_mut(&id)
            .ok_or_else(|| EditorError::UnknownEmitter(id.clone()))?;
        log::debug!("emitter {id}: {} = {value:?} ({phase:?})", field.label());

        let number = value.as_number().unwrap_or_default();
        match (field, phase) {
            (SettingField::Color, ChangePhase::Changing) => {
                if let Some(color) = value.as_color() {
                    emitter.set_color(color);
                }
            }
            (SettingField::MoleculeAmount, ChangePhase::Changing) => {
                emitter.set_molecule_amount(number as u32)
            }
            (SettingField::SpawnRadius, ChangePhase::Changing) => {
                emitter.set_spawn_radius(number, true)
            }
            (SettingField::SpawnRadius, ChangePhase::Finished) => {
                emitter.set_spawn_radius(number, false);
                if !show_gizmos {
                    emitter.hide_gizmos();
                }
            }
            (SettingField::MoleculeSize, ChangePhase::Finished) => {
                emitter.set_molecule_size(number)
            }
            (SettingField::MoleculePointRadius, ChangePhase::Changing) => {
                emitter.set_molecule_point_radius(number)
            }
            (SettingField::MoleculeLineLengthScale, ChangePhase::Changing) => {
                emitter.set_molecule_line_length_scale(number)
            }
            (SettingField::MoleculeLineThickness, ChangePhase::Changing) => {
                emitter.set_molecule_line_thickness(number)
            }
            (SettingField::OpacityJitter, ChangePhase::Finished) => {
                emitter.set_opacity_jitter(number)
            }
            (SettingField::SizeJitter, ChangePhase::Finished) => emitter.set_size_jitter(number),
            _ => {
                emitter.write_setting(field, value);
            }
        }
        Ok(())
    }

    /// Set the global quality. Emitters regenerate when the drag finishes.
    pub fn set_quality_level(&mut self, viz: &mut Visualization, quality_level: u32, phase: ChangePhase) {
        viz.set_quality_level(quality_level);
        if phase == ChangePhase::Finished {
            viz.apply_quality();
        }
    }

    pub fn toggle_debug(&mut self, viz: &mut Visualization) {
        let debug = !viz.settings.debug;
        viz.set_debug(debug);
    }

    pub fn toggle_gizmos(&mut self, viz: &mut Visualization) {
        let show = !viz.settings.show_gizmos;
        viz.set_show_gizmos(show);
    }

    pub fn toggle_reference_image(&mut self, viz: &mut Visualization) {
        viz.reference.toggle();
    }

    pub fn set_reference_opacity(&mut self, viz: &mut Visualization, opacity: f32) {
        viz.reference.set_opacity(opacity);
    }

    pub fn toggle_animation(&mut self, viz: &mut Visualization) {
        viz.toggle_animation();
    }

    /// Regenerate every emitter's population, in collection order.
    pub fn recreate_molecules(&mut self, viz: &mut Visualization) {
        viz.recreate_molecules();
    }

    /// Re-place every emitter's molecules, in collection order.
    pub fn randomize_positions(&mut self, viz: &mut Visualization) {
        viz.randomize_positions();
    }

    pub fn export_state_id(&self) -> &str {
        &self.export_state_id
    }

    pub fn set_export_state_id(&mut self, name: impl Into<String>) {
        self.export_state_id = name.into();
    }

    /// Build the export text and open the dialog showing it.
    pub fn export_state(&mut self, viz: &Visualization) -> Result<&ExportDialog, EditorError> {
        let document = viz.export_state();
        let text = document.to_module_text()?;
        log::info!(
            "exported {} emitters as {:?}",
            document.emitters.len(),
            self.export_state_id
        );
        Ok(self.dialog.insert(ExportDialog {
            title: self.export_state_id.clone(),
            text,
        }))
    }

    pub fn export_dialog(&self) -> Option<&ExportDialog> {
        self.dialog.as_ref()
    }

    pub fn close_export_dialog(&mut self) {
        self.dialog = None;
    }

    /// Replace the whole visualization with an exported document.
    /// Emitters keep their exported ids; the editor ends up idle.
    /// Returns the number of emitters restored.
    pub fn import_state(&mut self, viz: &mut Visualization, text: &str) -> Result<usize, EditorError> {
        let document = ExportDocument::parse(text)?;

        if self.selection != Selection::Idle {
            self.panel.remove_folder(SELECTED_EMITTER_FOLDER);
            self.selection = Selection::Idle;
        }
        viz.clear();
        viz.settings.set_quality_level(document.global_settings.quality_level);
        viz.settings.debug = document.global_settings.debug;
        viz.settings.show_gizmos = document.global_settings.show_gizmos;

        for mut state in document.emitters {
            let clamped = state.settings.clamp_to_ranges();
            if !clamped.is_empty() {
                let labels: Vec<_> = clamped.iter().map(|f| f.label()).collect();
                log::warn!("emitter {}: clamped {}", state.id, labels.join(", "));
            }
            if viz.contains(&state.id) {
                log::warn!("skipping duplicate emitter id {}", state.id);
                continue;
            }
            let options = viz.emitter_options();
            let emitter = MoleculeEmitter::from_state(state, options);
            self.attach(viz, emitter);
        }
        log::info!("imported {} emitters", viz.len());
        Ok(viz.len())
    }

    fn fresh_id(&mut self, viz: &Visualization) -> EmitterId {
        loop {
            let id = self.ids.next_id();
            if !viz.contains(&id) {
                return id;
            }
        }
    }

    /// Wire the drag-handle click to selection and add to the visualization.
    fn attach(&mut self, viz: &mut Visualization, mut emitter: MoleculeEmitter) {
        let queue = self.commands.clone();
        emitter.on(
            EmitterEvent::Click,
            InteractionTarget::DragGizmo,
            Box::new(move |id| queue.push(EditorCommand::SelectEmitter(id.clone()))),
        );
        viz.add_emitter(emitter);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(FolderPanel::new(), UniqueIds::default())
    }
}
