//! Molecule emitter: owns a settings record and the molecule population
//! derived from it.
//!
//! Only [`MoleculeEmitter::init_molecules`] throws the population away and
//! draws a new one. Every other setter mutates the existing molecules in
//! place so nothing jumps on screen. Jitter settings are generation-time
//! parameters: changing them has no visible effect until the next
//! `init_molecules()`.

use glam::Vec2;

use crate::api::types::{Color, EmitterId};
use crate::components::gizmo::Gizmo;
use crate::components::molecule::{Molecule, MoleculeStyle, DEFAULT_ROTATION_STEP};
use crate::components::settings::{EmitterSettings, EmitterState, SettingField, SettingValue};
use crate::input::events::{EmitterEvent, EventHandler, HandlerTable, InteractionTarget};
use crate::renderer::traits::RenderSurface;
use crate::renderer::instance::RenderBuffer;
use crate::systems::rng::Rng;
use crate::systems::spawn::{self, RadialDistribution};

/// Context an emitter is created with. The visualization hands these out so
/// emitters never reach back into shared state.
#[derive(Debug, Clone)]
pub struct EmitterOptions {
    pub quality_level: u32,
    pub debug: bool,
    pub show_gizmos: bool,
    pub distribution: RadialDistribution,
    pub rotation_step: f32,
    pub seed: u64,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            quality_level: 100,
            debug: false,
            show_gizmos: true,
            distribution: RadialDistribution::UniformRadius,
            rotation_step: DEFAULT_ROTATION_STEP,
            seed: 42,
        }
    }
}

/// A configured source of molecules anchored at a point.
#[derive(Debug)]
pub struct MoleculeEmitter {
    id: EmitterId,
    settings: EmitterSettings,
    molecules: Vec<Molecule>,
    rng: Rng,
    quality_level: u32,
    debug: bool,
    distribution: RadialDistribution,
    rotation_step: f32,
    gizmo: Gizmo,
    handlers: HandlerTable,
}

impl MoleculeEmitter {
    /// Create an emitter and generate its initial population.
    pub fn new(id: EmitterId, settings: EmitterSettings, options: EmitterOptions) -> Self {
        let mut emitter = Self {
            id,
            settings,
            molecules: Vec::new(),
            rng: Rng::new(options.seed),
            quality_level: options.quality_level,
            debug: options.debug,
            distribution: options.distribution,
            rotation_step: options.rotation_step,
            gizmo: Gizmo::new(options.show_gizmos),
            handlers: HandlerTable::new(),
        };
        emitter.init_molecules();
        emitter
    }

    /// Recreate an emitter from an exported snapshot.
    pub fn from_state(state: EmitterState, options: EmitterOptions) -> Self {
        Self::new(state.id, state.settings, options)
    }

    pub fn id(&self) -> &EmitterId {
        &self.id
    }

    pub fn settings(&self) -> &EmitterSettings {
        &self.settings
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.settings.x, self.settings.y)
    }

    pub fn quality_level(&self) -> u32 {
        self.quality_level
    }

    pub fn gizmo(&self) -> &Gizmo {
        &self.gizmo
    }

    pub fn is_highlighted(&self) -> bool {
        self.gizmo.highlighted
    }

    /// Population size the current settings and quality call for.
    pub fn target_amount(&self) -> usize {
        spawn::scaled_amount(self.settings.molecule_amount, self.quality_level)
    }

    /// Discard the population and generate a fresh one from the settings.
    pub fn init_molecules(&mut self) {
        let count = self.target_amount();
        let mut molecules = Vec::with_capacity(count);
        for _ in 0..count {
            molecules.push(self.spawn_molecule());
        }
        self.molecules = molecules;
        log::debug!("emitter {}: generated {} molecules", self.id, count);
    }

    fn spawn_molecule(&mut self) -> Molecule {
        let s = &self.settings;
        let offset = spawn::sample_offset(&mut self.rng, s.spawn_radius, self.distribution);
        let factor = spawn::size_factor(&mut self.rng, s.size_jitter);
        let alpha = spawn::opacity(&mut self.rng, s.opacity_jitter);
        Molecule::new(
            offset,
            s.molecule_point_radius * factor,
            s.molecule_size * factor,
            self.debug,
            &mut self.rng,
        )
        .with_style(self.style())
        .with_size_factor(factor)
        .with_alpha(alpha)
        .with_rotation_step(self.rotation_step)
    }

    fn style(&self) -> MoleculeStyle {
        MoleculeStyle {
            color: self.settings.color,
            line_length_scale: self.settings.molecule_line_length_scale,
            line_thickness: self.settings.molecule_line_thickness,
        }
    }

    fn restyle(&mut self) {
        let style = self.style();
        for molecule in &mut self.molecules {
            molecule.set_style(style);
        }
    }

    fn resize(&mut self) {
        let radius = self.settings.molecule_point_radius;
        let width = self.settings.molecule_size;
        for molecule in &mut self.molecules {
            *molecule = molecule.resized(radius, width);
        }
    }

    /// Write a field without any follow-up. Used for values a control is
    /// still dragging where the live update is deferred to the end of the drag.
    pub fn write_setting(&mut self, field: SettingField, value: SettingValue) -> bool {
        self.settings.set(field, value)
    }

    pub fn set_molecule_amount(&mut self, amount: u32) {
        self.settings.molecule_amount = amount;
        self.init_molecules();
    }

    /// Re-tint every molecule. Geometry and positions are untouched.
    pub fn set_color(&mut self, color: Color) {
        self.settings.color = color;
        self.restyle();
    }

    /// Update the spawn radius. With `live_preview`, existing molecules are
    /// moved to fresh positions inside the new radius right away and the
    /// gizmo is shown so the ring is visible while dragging.
    pub fn set_spawn_radius(&mut self, radius: f32, live_preview: bool) {
        self.settings.spawn_radius = radius;
        if live_preview {
            self.gizmo.visible = true;
            self.randomize_positions();
        }
    }

    pub fn set_molecule_size(&mut self, size: f32) {
        self.settings.molecule_size = size;
        self.resize();
    }

    pub fn set_molecule_point_radius(&mut self, radius: f32) {
        self.settings.molecule_point_radius = radius;
        self.resize();
    }

    pub fn set_molecule_line_length_scale(&mut self, scale: f32) {
        self.settings.molecule_line_length_scale = scale;
        self.restyle();
    }

    pub fn set_molecule_line_thickness(&mut self, thickness: f32) {
        self.settings.molecule_line_thickness = thickness;
        self.restyle();
    }

    /// Takes effect on the next `init_molecules()`.
    pub fn set_opacity_jitter(&mut self, jitter: f32) {
        self.settings.opacity_jitter = jitter;
    }

    /// Takes effect on the next `init_molecules()`.
    pub fn set_size_jitter(&mut self, jitter: f32) {
        self.settings.size_jitter = jitter;
    }

    /// Adopt a new global quality level and regenerate.
    pub fn update_emission_amount_based_on_quality(&mut self, quality_level: u32) {
        self.quality_level = quality_level;
        self.init_molecules();
    }

    /// Move every molecule to a fresh position inside the spawn radius.
    /// Population size, sizes and opacities stay as they are.
    pub fn randomize_positions(&mut self) {
        let radius = self.settings.spawn_radius;
        for molecule in &mut self.molecules {
            molecule.offset = spawn::sample_offset(&mut self.rng, radius, self.distribution);
        }
    }

    /// Move the anchor. Molecules keep their offsets.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.settings.x = x;
        self.settings.y = y;
    }

    pub fn highlight(&mut self) {
        self.gizmo.highlighted = true;
    }

    pub fn unhighlight(&mut self) {
        self.gizmo.highlighted = false;
    }

    pub fn toggle_debug(&mut self, debug: bool) {
        self.debug = debug;
        for molecule in &mut self.molecules {
            molecule.set_debug(debug);
        }
    }

    pub fn toggle_gizmos(&mut self, visible: bool) {
        self.gizmo.visible = visible;
    }

    pub fn hide_gizmos(&mut self) {
        self.gizmo.visible = false;
    }

    /// Snapshot of id and settings. Independent of the live emitter.
    pub fn export_state(&self) -> EmitterState {
        EmitterState {
            id: self.id.clone(),
            settings: self.settings.clone(),
        }
    }

    /// Register a listener for `event` on `target`.
    pub fn on(&mut self, event: EmitterEvent, target: InteractionTarget, handler: EventHandler) {
        self.handlers.on(event, target, handler);
    }

    /// Deliver an interaction to this emitter's listeners.
    pub fn emit(&mut self, event: EmitterEvent, target: InteractionTarget) -> usize {
        self.handlers.dispatch(event, target, &self.id)
    }

    /// Whether `point` hits this emitter's drag handle.
    pub fn hit_gizmo(&self, point: Vec2) -> bool {
        self.gizmo.contains(self.anchor(), point)
    }

    /// Advance every molecule one animation tick.
    pub fn tick(&mut self) {
        for molecule in &mut self.molecules {
            molecule.render();
        }
    }

    /// Present molecules, then the handle and the selection marker.
    pub fn draw(&self, surface: &mut impl RenderSurface) {
        let anchor = self.anchor();
        for molecule in &self.molecules {
            surface.draw(&molecule.node(anchor));
        }
        surface.draw(&self.gizmo.node(anchor, self.settings.spawn_radius));
        surface.draw(&self.gizmo.highlight_node(anchor));
    }

    /// Append packed instances for every molecule.
    pub fn write_instances(&self, buffer: &mut RenderBuffer) {
        let anchor = self.anchor();
        for molecule in &self.molecules {
            buffer.push(molecule.instance(anchor));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::traits::{Primitive, RecordingSurface};
    use std::cell::Cell;
    use std::rc::Rc;

    fn emitter(settings: EmitterSettings) -> MoleculeEmitter {
        MoleculeEmitter::new(EmitterId::new("test"), settings, EmitterOptions::default())
    }

    fn offsets(e: &MoleculeEmitter) -> Vec<Vec2> {
        e.molecules().iter().map(|m| m.offset).collect()
    }

    #[test]
    fn population_within_spawn_radius() {
        let e = emitter(
            EmitterSettings::default()
                .with_position(100.0, 100.0)
                .with_molecule_amount(10)
                .with_spawn_radius(50.0),
        );
        assert_eq!(e.molecules().len(), 10);
        let anchor = Vec2::new(100.0, 100.0);
        for m in e.molecules() {
            let pos = anchor + m.offset;
            assert!(pos.distance(anchor) <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn zero_amount_is_empty() {
        let e = emitter(EmitterSettings::default().with_molecule_amount(0));
        assert!(e.molecules().is_empty());
    }

    #[test]
    fn zero_radius_places_at_anchor() {
        let e = emitter(EmitterSettings::default().with_spawn_radius(0.0));
        assert!(!e.molecules().is_empty());
        for m in e.molecules() {
            assert_eq!(m.offset, Vec2::ZERO);
        }
    }

    #[test]
    fn no_size_jitter_keeps_exact_radius() {
        let e = emitter(
            EmitterSettings::default()
                .with_point_radius(7.5)
                .with_molecule_size(33.0)
                .with_size_jitter(0.0),
        );
        for m in e.molecules() {
            assert_eq!(m.radius(), 7.5);
            assert_eq!(m.width(), 33.0);
        }
    }

    #[test]
    fn size_jitter_stays_in_bounds() {
        let e = emitter(
            EmitterSettings::default()
                .with_molecule_amount(150)
                .with_point_radius(10.0)
                .with_size_jitter(20.0),
        );
        let mut varied = false;
        for m in e.molecules() {
            assert!(m.radius() >= 8.0 - 1e-4 && m.radius() <= 12.0 + 1e-4);
            varied |= m.radius() != 10.0;
        }
        assert!(varied);
    }

    #[test]
    fn opacity_jitter_applies_on_generation() {
        let e = emitter(
            EmitterSettings::default()
                .with_molecule_amount(100)
                .with_opacity_jitter(50.0),
        );
        assert!(e.molecules().iter().all(|m| m.alpha >= 0.5 && m.alpha <= 1.0));
        assert!(e.molecules().iter().any(|m| m.alpha < 1.0));
    }

    #[test]
    fn boundary_maxima_do_not_panic() {
        let e = emitter(EmitterSettings {
            molecule_amount: 150,
            spawn_radius: 400.0,
            molecule_size: 500.0,
            molecule_point_radius: 250.0,
            molecule_line_length_scale: 100.0,
            molecule_line_thickness: 100.0,
            opacity_jitter: 100.0,
            size_jitter: 100.0,
            ..EmitterSettings::default()
        });
        assert_eq!(e.molecules().len(), 150);
    }

    #[test]
    fn quality_scales_population() {
        let mut e = emitter(EmitterSettings::default().with_molecule_amount(33));
        e.update_emission_amount_based_on_quality(50);
        assert_eq!(e.molecules().len(), 17);
        e.update_emission_amount_based_on_quality(50);
        assert_eq!(e.molecules().len(), 17);
        e.update_emission_amount_based_on_quality(1);
        assert_eq!(e.molecules().len(), 0);
    }

    #[test]
    fn set_color_keeps_positions() {
        let mut e = emitter(EmitterSettings::default());
        let before = offsets(&e);
        e.set_color(Color(0xFF0000));
        assert_eq!(offsets(&e), before);
        for m in e.molecules() {
            assert_eq!(m.style().color, Color(0xFF0000));
            assert!(m.primitives().iter().all(|p| match p {
                Primitive::Circle { color, .. } | Primitive::Line { color, .. } => {
                    *color == Color(0xFF0000)
                }
                _ => true,
            }));
        }
    }

    #[test]
    fn resize_keeps_positions_and_rotation() {
        let mut e = emitter(EmitterSettings::default().with_size_jitter(0.0));
        let before = offsets(&e);
        let rotations: Vec<f32> = e.molecules().iter().map(|m| m.rotation).collect();
        e.set_molecule_size(80.0);
        e.set_molecule_point_radius(9.0);
        assert_eq!(offsets(&e), before);
        for (m, r) in e.molecules().iter().zip(rotations) {
            assert_eq!(m.width(), 80.0);
            assert_eq!(m.radius(), 9.0);
            assert_eq!(m.rotation, r);
        }
    }

    #[test]
    fn line_setters_restyle_in_place() {
        let mut e = emitter(EmitterSettings::default());
        let before = offsets(&e);
        e.set_molecule_line_length_scale(50.0);
        e.set_molecule_line_thickness(3.0);
        assert_eq!(offsets(&e), before);
        for m in e.molecules() {
            assert_eq!(m.style().line_length_scale, 50.0);
            assert_eq!(m.style().line_thickness, 3.0);
        }
    }

    #[test]
    fn jitter_setters_are_lazy() {
        let mut e = emitter(EmitterSettings::default().with_molecule_amount(50));
        e.set_size_jitter(50.0);
        e.set_opacity_jitter(50.0);
        assert_eq!(e.settings().size_jitter, 50.0);
        assert!(e.molecules().iter().all(|m| m.radius() == 4.0 && m.alpha == 1.0));

        e.init_molecules();
        assert!(e.molecules().iter().any(|m| m.radius() != 4.0));
        assert!(e.molecules().iter().any(|m| m.alpha < 1.0));
    }

    #[test]
    fn live_spawn_radius_moves_without_regenerating() {
        let mut e = emitter(
            EmitterSettings::default()
                .with_molecule_amount(40)
                .with_spawn_radius(200.0)
                .with_size_jitter(30.0),
        );
        e.hide_gizmos();
        let radii: Vec<f32> = e.molecules().iter().map(|m| m.radius()).collect();

        e.set_spawn_radius(10.0, false);
        assert_eq!(e.settings().spawn_radius, 10.0);
        assert!(!e.gizmo().visible);

        e.set_spawn_radius(10.0, true);
        assert!(e.gizmo().visible);
        assert_eq!(e.molecules().len(), 40);
        for (m, r) in e.molecules().iter().zip(radii) {
            assert!(m.offset.length() <= 10.0 + 1e-3);
            assert_eq!(m.radius(), r);
        }
    }

    #[test]
    fn randomize_positions_keeps_population() {
        let mut e = emitter(EmitterSettings::default().with_opacity_jitter(40.0));
        let alphas: Vec<f32> = e.molecules().iter().map(|m| m.alpha).collect();
        let before = offsets(&e);
        e.randomize_positions();
        assert_eq!(e.molecules().len(), before.len());
        assert_ne!(offsets(&e), before);
        let after: Vec<f32> = e.molecules().iter().map(|m| m.alpha).collect();
        assert_eq!(after, alphas);
    }

    #[test]
    fn export_round_trip() {
        let e = emitter(
            EmitterSettings::default()
                .with_position(12.5, -3.0)
                .with_color(Color(0x123456))
                .with_size_jitter(7.0),
        );
        let state = e.export_state();
        let copy = MoleculeEmitter::from_state(state.clone(), EmitterOptions { seed: 99, ..EmitterOptions::default() });
        assert_eq!(copy.export_state(), state);
    }

    #[test]
    fn export_is_a_snapshot() {
        let mut e = emitter(EmitterSettings::default());
        let mut state = e.export_state();
        state.settings.molecule_amount = 99;
        assert_eq!(e.settings().molecule_amount, 20);
        e.set_color(Color::WHITE);
        assert_eq!(state.settings.color, Color::BLACK);
    }

    #[test]
    fn highlight_does_not_touch_settings() {
        let mut e = emitter(EmitterSettings::default());
        let before = e.export_state();
        e.highlight();
        assert!(e.is_highlighted());
        e.unhighlight();
        assert!(!e.is_highlighted());
        assert_eq!(e.export_state(), before);
    }

    #[test]
    fn debug_toggle_reaches_molecules() {
        let mut e = emitter(EmitterSettings::default());
        e.toggle_debug(true);
        assert!(e.molecules().iter().all(|m| m.debug()));
        e.toggle_debug(false);
        assert!(e.molecules().iter().all(|m| !m.debug()));
    }

    #[test]
    fn click_reaches_listener() {
        let mut e = emitter(EmitterSettings::default());
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        e.on(
            EmitterEvent::Click,
            InteractionTarget::DragGizmo,
            Box::new(move |_| counter.set(counter.get() + 1)),
        );
        assert_eq!(e.emit(EmitterEvent::Click, InteractionTarget::DragGizmo), 1);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn moving_anchor_keeps_offsets() {
        let mut e = emitter(EmitterSettings::default());
        let before = offsets(&e);
        e.set_position(300.0, 200.0);
        assert_eq!(e.anchor(), Vec2::new(300.0, 200.0));
        assert_eq!(offsets(&e), before);
    }

    #[test]
    fn draw_emits_molecules_then_gizmo() {
        let e = emitter(EmitterSettings::default().with_molecule_amount(5));
        let mut surface = RecordingSurface::new(800.0, 600.0);
        e.draw(&mut surface);
        assert_eq!(surface.nodes.len(), 5 + 2);
        let mut buffer = RenderBuffer::new();
        e.write_instances(&mut buffer);
        assert_eq!(buffer.instance_count(), 5);
    }
}
