use mlcv_engine::{
    ChangePhase, Color, EditorError, Editor, EmitterId, EmitterSettings, MoleculeInstance, RenderBuffer,
    SettingField, SettingTarget, SettingValue, UniqueIds, Visualization, VisualizationConfig,
    FolderPanel,
};
use mlcv_engine::glam::Vec2;

/// Owns the visualization and its editor and flattens their API into calls
/// that wasm-bindgen can export.
///
/// wasm-bindgen cannot export the generic `Editor`, so the crate root keeps a
/// `thread_local!` runner and forwards free functions to it. Failures are
/// logged here and turned into neutral return values for JavaScript.
pub struct EditorRunner {
    viz: Visualization,
    editor: Editor<FolderPanel, UniqueIds>,
    render_buffer: RenderBuffer,
}

impl EditorRunner {
    pub fn new(config: VisualizationConfig, session_seed: u64) -> Self {
        let render_buffer = RenderBuffer::with_capacity(config.max_instances);
        Self {
            viz: Visualization::new(config),
            editor: Editor::new(FolderPanel::new(), UniqueIds::new(session_seed)),
            render_buffer,
        }
    }

    /// Run one animation frame and rebuild the instance buffer.
    pub fn tick(&mut self) {
        self.viz.tick();
        self.viz.build_render_buffer(&mut self.render_buffer);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viz.resize(width, height);
    }

    // ---- Placement and selection ----

    /// Place a draft emitter. Non-finite coordinates place it at the center.
    pub fn place_emitter(&mut self, x: f32, y: f32) -> String {
        let result = self.editor.place_emitter(&mut self.viz, Some(Vec2::new(x, y)), None);
        id_or_empty(result)
    }

    pub fn duplicate_selected(&mut self) -> String {
        match self.editor.duplicate_selected_emitter(&mut self.viz) {
            Ok(Some(id)) => id.to_string(),
            Ok(None) => String::new(),
            Err(err) => {
                log::warn!("duplicate failed: {err}");
                String::new()
            }
        }
    }

    pub fn select(&mut self, id: &str) -> bool {
        report(self.editor.on_click_emitter(&mut self.viz, &EmitterId::from(id)))
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        match self.editor.pointer_down(&mut self.viz, Vec2::new(x, y)) {
            Ok(Some(id)) => id.to_string(),
            Ok(None) => String::new(),
            Err(err) => {
                log::warn!("pointer down failed: {err}");
                String::new()
            }
        }
    }

    pub fn drag(&mut self, x: f32, y: f32) -> bool {
        report(self.editor.drag_selected(&mut self.viz, Vec2::new(x, y)))
    }

    pub fn remove_selected(&mut self) -> bool {
        report(self.editor.remove_emitter(&mut self.viz))
    }

    pub fn selected_id(&self) -> String {
        self.editor.selected().map(|id| id.to_string()).unwrap_or_default()
    }

    // ---- Settings ----

    /// Record behind the draft folder or the selected-emitter folder.
    fn settings(&self, selected: bool) -> Option<&EmitterSettings> {
        if selected {
            let id = self.editor.selected()?;
            self.viz.get(id).map(|e| e.settings())
        } else {
            Some(self.editor.draft())
        }
    }

    /// Current value of a numeric field, for refreshing a widget.
    /// NaN when the field or the selection is missing.
    pub fn setting_number(&self, selected: bool, field: u32) -> f32 {
        SettingField::from_index(field)
            .zip(self.settings(selected))
            .and_then(|(field, settings)| settings.get(field).as_number())
            .unwrap_or(f32::NAN)
    }

    /// Current color as `#rrggbb`, empty when nothing is selected.
    pub fn setting_color(&self, selected: bool) -> String {
        self.settings(selected)
            .map(|s| s.color.to_hex())
            .unwrap_or_default()
    }

    /// Numeric control change. `field` indexes the settings fields in panel
    /// order; unknown indices are ignored.
    pub fn change_number(&mut self, selected: bool, field: u32, value: f32, finished: bool) -> bool {
        let Some(field) = SettingField::from_index(field) else {
            log::warn!("unknown setting field {field}");
            return false;
        };
        self.change(selected, field, SettingValue::Number(value), finished)
    }

    pub fn change_color(&mut self, selected: bool, hex: &str, finished: bool) -> bool {
        let Some(color) = Color::from_hex(hex) else {
            log::warn!("invalid color {hex:?}");
            return false;
        };
        self.change(selected, SettingField::Color, SettingValue::Color(color), finished)
    }

    fn change(&mut self, selected: bool, field: SettingField, value: SettingValue, finished: bool) -> bool {
        let target = if selected { SettingTarget::Selected } else { SettingTarget::Draft };
        report(self.editor.change_setting(&mut self.viz, target, field, value, phase(finished)))
    }

    pub fn set_quality_level(&mut self, quality_level: u32, finished: bool) {
        self.editor.set_quality_level(&mut self.viz, quality_level, phase(finished));
    }

    pub fn toggle_debug(&mut self) {
        self.editor.toggle_debug(&mut self.viz);
    }

    pub fn toggle_gizmos(&mut self) {
        self.editor.toggle_gizmos(&mut self.viz);
    }

    pub fn toggle_reference_image(&mut self) {
        self.editor.toggle_reference_image(&mut self.viz);
    }

    pub fn set_reference_opacity(&mut self, opacity: f32) {
        self.editor.set_reference_opacity(&mut self.viz, opacity);
    }

    pub fn toggle_animation(&mut self) {
        self.editor.toggle_animation(&mut self.viz);
    }

    pub fn recreate_molecules(&mut self) {
        self.editor.recreate_molecules(&mut self.viz);
    }

    pub fn randomize_positions(&mut self) {
        self.editor.randomize_positions(&mut self.viz);
    }

    // ---- Export / import ----

    pub fn set_export_state_id(&mut self, name: &str) {
        self.editor.set_export_state_id(name);
    }

    /// Open the export dialog and return its text.
    pub fn export_state(&mut self) -> String {
        match self.editor.export_state(&self.viz) {
            Ok(dialog) => dialog.text.clone(),
            Err(err) => {
                log::error!("export failed: {err}");
                String::new()
            }
        }
    }

    pub fn close_export_dialog(&mut self) {
        self.editor.close_export_dialog();
    }

    /// Returns the number of restored emitters, or -1 if the text was rejected.
    pub fn import_state(&mut self, text: &str) -> i32 {
        match self.editor.import_state(&mut self.viz, text) {
            Ok(count) => count as i32,
            Err(err) => {
                log::warn!("import rejected: {err}");
                -1
            }
        }
    }

    // ---- Pointer accessors for instance buffer reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn instance_floats(&self) -> u32 {
        MoleculeInstance::FLOATS as u32
    }

    pub fn max_instances(&self) -> u32 {
        self.viz.config().max_instances as u32
    }

    // ---- Scene accessors ----

    pub fn viewport_width(&self) -> f32 {
        self.viz.viewport().x
    }

    pub fn viewport_height(&self) -> f32 {
        self.viz.viewport().y
    }

    pub fn emitter_count(&self) -> u32 {
        self.viz.len() as u32
    }

    pub fn molecule_count(&self) -> u32 {
        self.viz.molecule_count() as u32
    }

    pub fn quality_level(&self) -> u32 {
        self.viz.settings.quality_level
    }

    pub fn reference_source(&self) -> String {
        self.viz.reference.source.clone()
    }

    pub fn reference_visible(&self) -> bool {
        self.viz.reference.visible
    }

    pub fn reference_opacity(&self) -> f32 {
        self.viz.reference.opacity
    }
}

fn phase(finished: bool) -> ChangePhase {
    if finished {
        ChangePhase::Finished
    } else {
        ChangePhase::Changing
    }
}

fn report(result: Result<(), EditorError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::warn!("{err}");
            false
        }
    }
}

fn id_or_empty(result: Result<EmitterId, EditorError>) -> String {
    match result {
        Ok(id) => id.to_string(),
        Err(err) => {
            log::warn!("{err}");
            String::new()
        }
    }
}
