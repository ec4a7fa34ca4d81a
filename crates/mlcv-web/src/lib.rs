//! WASM bridge for the molecule visualization editor.
//!
//! The page calls `editor_init()` once, then drives the editor through the
//! free functions below. Every frame it calls `editor_tick()` and reads the
//! packed molecule instances straight out of linear memory through
//! `get_instances_ptr()` / `get_instance_count()`.

pub mod runner;

pub use runner::EditorRunner;

use std::cell::RefCell;

use mlcv_engine::VisualizationConfig;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<EditorRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut EditorRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("editor not initialized, call editor_init() first");
                None
            }
        }
    })
}

/// Initialize the editor. `config_json` may be empty for the defaults.
#[wasm_bindgen]
pub fn editor_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        VisualizationConfig::default()
    } else {
        VisualizationConfig::from_json(config_json).unwrap_or_else(|err| {
            log::warn!("invalid config, using defaults: {err}");
            VisualizationConfig::default()
        })
    };
    let session_seed = js_sys::Date::now() as u64;
    let runner = EditorRunner::new(config, session_seed);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("mlcv: initialized");
}

#[wasm_bindgen]
pub fn editor_tick() {
    with_runner(|r| r.tick());
}

#[wasm_bindgen]
pub fn editor_resize(width: f32, height: f32) {
    with_runner(|r| r.resize(width, height));
}

// ---- Placement and selection ----

#[wasm_bindgen]
pub fn editor_place_emitter(x: f32, y: f32) -> String {
    with_runner(|r| r.place_emitter(x, y)).unwrap_or_default()
}

#[wasm_bindgen]
pub fn editor_duplicate_selected() -> String {
    with_runner(|r| r.duplicate_selected()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn editor_select(id: &str) -> bool {
    with_runner(|r| r.select(id)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn editor_pointer_down(x: f32, y: f32) -> String {
    with_runner(|r| r.pointer_down(x, y)).unwrap_or_default()
}

#[wasm_bindgen]
pub fn editor_pointer_move(x: f32, y: f32) -> bool {
    with_runner(|r| r.drag(x, y)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn editor_remove_selected() -> bool {
    with_runner(|r| r.remove_selected()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_selected_id() -> String {
    with_runner(|r| r.selected_id()).unwrap_or_default()
}

// ---- Settings ----

#[wasm_bindgen]
pub fn editor_change_number(selected: bool, field: u32, value: f32, finished: bool) -> bool {
    with_runner(|r| r.change_number(selected, field, value, finished)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn editor_change_color(selected: bool, hex: &str, finished: bool) -> bool {
    with_runner(|r| r.change_color(selected, hex, finished)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_setting_number(selected: bool, field: u32) -> f32 {
    with_runner(|r| r.setting_number(selected, field)).unwrap_or(f32::NAN)
}

#[wasm_bindgen]
pub fn get_setting_color(selected: bool) -> String {
    with_runner(|r| r.setting_color(selected)).unwrap_or_default()
}

#[wasm_bindgen]
pub fn editor_set_quality_level(quality_level: u32, finished: bool) {
    with_runner(|r| r.set_quality_level(quality_level, finished));
}

#[wasm_bindgen]
pub fn editor_toggle_debug() {
    with_runner(|r| r.toggle_debug());
}

#[wasm_bindgen]
pub fn editor_toggle_gizmos() {
    with_runner(|r| r.toggle_gizmos());
}

#[wasm_bindgen]
pub fn editor_toggle_reference_image() {
    with_runner(|r| r.toggle_reference_image());
}

#[wasm_bindgen]
pub fn editor_set_reference_opacity(opacity: f32) {
    with_runner(|r| r.set_reference_opacity(opacity));
}

#[wasm_bindgen]
pub fn editor_toggle_animation() {
    with_runner(|r| r.toggle_animation());
}

#[wasm_bindgen]
pub fn editor_recreate_molecules() {
    with_runner(|r| r.recreate_molecules());
}

#[wasm_bindgen]
pub fn editor_randomize_positions() {
    with_runner(|r| r.randomize_positions());
}

// ---- Export / import ----

#[wasm_bindgen]
pub fn editor_set_export_state_id(name: &str) {
    with_runner(|r| r.set_export_state_id(name));
}

#[wasm_bindgen]
pub fn editor_export_state() -> String {
    with_runner(|r| r.export_state()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn editor_close_export_dialog() {
    with_runner(|r| r.close_export_dialog());
}

#[wasm_bindgen]
pub fn editor_import_state(text: &str) -> i32 {
    with_runner(|r| r.import_state(text)).unwrap_or(-1)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instance_floats() -> u32 {
    with_runner(|r| r.instance_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.max_instances()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_viewport_width() -> f32 {
    with_runner(|r| r.viewport_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_viewport_height() -> f32 {
    with_runner(|r| r.viewport_height()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_emitter_count() -> u32 {
    with_runner(|r| r.emitter_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_molecule_count() -> u32 {
    with_runner(|r| r.molecule_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_reference_source() -> String {
    with_runner(|r| r.reference_source()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_reference_visible() -> bool {
    with_runner(|r| r.reference_visible()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_reference_opacity() -> f32 {
    with_runner(|r| r.reference_opacity()).unwrap_or(0.0)
}
