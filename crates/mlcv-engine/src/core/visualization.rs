//! The visualization container: ordered emitters plus global settings.
//!
//! Insertion order is draw and update order, and export order. Selection is
//! not tracked here; that belongs to the editor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::config::VisualizationConfig;
use crate::api::types::EmitterId;
use crate::components::emitter::{EmitterOptions, MoleculeEmitter};
use crate::components::settings::EmitterState;
use crate::renderer::instance::RenderBuffer;
use crate::renderer::traits::{DrawNode, Primitive, RenderSurface};
use crate::systems::rng::Rng;

pub const MIN_QUALITY: u32 = 1;
pub const MAX_QUALITY: u32 = 100;

/// Settings shared by every emitter in the visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Percentage applied to every emitter's molecule amount, 1 - 100.
    pub quality_level: u32,
    pub debug: bool,
    pub show_gizmos: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            quality_level: MAX_QUALITY,
            debug: false,
            show_gizmos: true,
        }
    }
}

impl GlobalSettings {
    pub fn set_quality_level(&mut self, quality_level: u32) {
        self.quality_level = quality_level.clamp(MIN_QUALITY, MAX_QUALITY);
    }
}

/// Reference image drawn under the composition to trace against.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub source: String,
    pub visible: bool,
    pub opacity: f32,
}

impl ReferenceImage {
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn node(&self, center: Vec2) -> DrawNode {
        DrawNode::new(center)
            .with_alpha(self.opacity)
            .with_visible(self.visible)
            .with_primitive(Primitive::Image {
                source: self.source.clone(),
            })
    }
}

/// Full exported state: every emitter plus the global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub emitters: Vec<EmitterState>,
    pub global_settings: GlobalSettings,
}

/// Owns the emitters and the settings they share.
pub struct Visualization {
    emitters: Vec<MoleculeEmitter>,
    pub settings: GlobalSettings,
    pub reference: ReferenceImage,
    config: VisualizationConfig,
    viewport: Vec2,
    rng: Rng,
    animating: bool,
}

impl Visualization {
    pub fn new(config: VisualizationConfig) -> Self {
        let mut settings = GlobalSettings {
            debug: config.debug,
            show_gizmos: config.show_gizmos,
            ..GlobalSettings::default()
        };
        settings.set_quality_level(config.quality_level);
        Self {
            emitters: Vec::new(),
            settings,
            reference: ReferenceImage {
                source: config.reference_image.clone(),
                visible: config.reference_visible,
                opacity: config.reference_opacity.clamp(0.0, 1.0),
            },
            viewport: Vec2::new(config.width, config.height),
            rng: Rng::new(config.seed),
            animating: true,
            config,
        }
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    /// Options for a new emitter: current globals plus a fresh rng seed.
    pub fn emitter_options(&mut self) -> EmitterOptions {
        EmitterOptions {
            quality_level: self.settings.quality_level,
            debug: self.settings.debug,
            show_gizmos: self.settings.show_gizmos,
            distribution: self.config.distribution,
            rotation_step: self.config.rotation_step,
            seed: self.rng.fork().next_u64(),
        }
    }

    /// Append an emitter. It is drawn and updated after all existing ones.
    pub fn add_emitter(&mut self, emitter: MoleculeEmitter) {
        log::info!("emitter {} added", emitter.id());
        self.emitters.push(emitter);
    }

    /// Remove an emitter by id, keeping the order of the rest.
    /// Returns the removed emitter if found.
    pub fn remove_emitter(&mut self, id: &EmitterId) -> Option<MoleculeEmitter> {
        let idx = self.emitters.iter().position(|e| e.id() == id)?;
        log::info!("emitter {} removed", id);
        Some(self.emitters.remove(idx))
    }

    pub fn get(&self, id: &EmitterId) -> Option<&MoleculeEmitter> {
        self.emitters.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &EmitterId) -> Option<&mut MoleculeEmitter> {
        self.emitters.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &EmitterId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoleculeEmitter> {
        self.emitters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MoleculeEmitter> {
        self.emitters.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    pub fn clear(&mut self) {
        self.emitters.clear();
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Middle of the visible area, the default placement point.
    pub fn center_coordinates(&self) -> Vec2 {
        self.viewport * 0.5
    }

    /// Top-most emitter whose drag handle contains `point`.
    pub fn emitter_at(&self, point: Vec2) -> Option<&EmitterId> {
        self.emitters
            .iter()
            .rev()
            .find(|e| e.hit_gizmo(point))
            .map(|e| e.id())
    }

    pub fn set_quality_level(&mut self, quality_level: u32) {
        self.settings.set_quality_level(quality_level);
    }

    /// Regenerate every emitter at the current quality level.
    pub fn apply_quality(&mut self) {
        let quality = self.settings.quality_level;
        for emitter in &mut self.emitters {
            emitter.update_emission_amount_based_on_quality(quality);
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.settings.debug = debug;
        for emitter in &mut self.emitters {
            emitter.toggle_debug(debug);
        }
    }

    pub fn set_show_gizmos(&mut self, show: bool) {
        self.settings.show_gizmos = show;
        for emitter in &mut self.emitters {
            emitter.toggle_gizmos(show);
        }
    }

    pub fn recreate_molecules(&mut self) {
        for emitter in &mut self.emitters {
            emitter.init_molecules();
        }
    }

    pub fn randomize_positions(&mut self) {
        for emitter in &mut self.emitters {
            emitter.randomize_positions();
        }
    }

    pub fn toggle_animation(&mut self) {
        self.animating = !self.animating;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// One animation tick across every molecule.
    pub fn tick(&mut self) {
        if !self.animating {
            return;
        }
        for emitter in &mut self.emitters {
            emitter.tick();
        }
    }

    /// Present the reference overlay, then every emitter in order.
    pub fn draw(&self, surface: &mut impl RenderSurface) {
        let center = surface.size() * 0.5;
        surface.draw(&self.reference.node(center));
        for emitter in &self.emitters {
            emitter.draw(surface);
        }
    }

    /// Rebuild the packed instance buffer from every emitter.
    pub fn build_render_buffer(&self, buffer: &mut RenderBuffer) {
        buffer.clear();
        for emitter in &self.emitters {
            emitter.write_instances(buffer);
        }
    }

    pub fn molecule_count(&self) -> usize {
        self.emitters.iter().map(|e| e.molecules().len()).sum()
    }

    /// Every emitter's state, in collection order, plus the global settings.
    pub fn export_state(&self) -> ExportDocument {
        ExportDocument {
            emitters: self.emitters.iter().map(|e| e.export_state()).collect(),
            global_settings: self.settings.clone(),
        }
    }
}

impl Default for Visualization {
    fn default() -> Self {
        Self::new(VisualizationConfig::default())
    }
}
