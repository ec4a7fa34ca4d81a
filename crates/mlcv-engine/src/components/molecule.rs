//! A single molecule: two filled circles joined by a line, spinning slowly
//! around the center of its own bounding box.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::types::Color;
use crate::renderer::instance::MoleculeInstance;
use crate::renderer::traits::{DrawNode, Primitive};
use crate::systems::rng::Rng;

/// Rotation applied per tick unless the emitter overrides it.
pub const DEFAULT_ROTATION_STEP: f32 = 0.01;

/// Stroke width of the debug bounding box.
const DEBUG_STROKE: f32 = 1.0;

/// Style attributes that can change without recreating the molecule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoleculeStyle {
    pub color: Color,
    /// Connecting line length as a percentage of the body width.
    pub line_length_scale: f32,
    pub line_thickness: f32,
}

impl Default for MoleculeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            line_length_scale: 100.0,
            line_thickness: 1.0,
        }
    }
}

/// A single molecule with its local geometry and rendering state.
///
/// Radius and width are fixed at construction; use [`Molecule::resized`] to
/// get a replacement that keeps placement, rotation and opacity.
#[derive(Debug, Clone)]
pub struct Molecule {
    /// Offset of the molecule from its emitter's anchor.
    pub offset: Vec2,
    /// Current rotation in radians.
    pub rotation: f32,
    /// Opacity drawn at generation time.
    pub alpha: f32,
    radius: f32,
    width: f32,
    /// Size factor drawn at generation time, reused when resizing.
    size_factor: f32,
    rotation_step: f32,
    style: MoleculeStyle,
    debug: bool,
    primitives: Vec<Primitive>,
    bounds_min: Vec2,
    bounds_max: Vec2,
}

impl Molecule {
    /// Create a molecule at `offset` with a random initial rotation in [0, 2π).
    pub fn new(offset: Vec2, radius: f32, width: f32, debug: bool, rng: &mut Rng) -> Self {
        let mut molecule = Molecule {
            offset,
            rotation: rng.next_f32() * TAU,
            alpha: 1.0,
            radius,
            width,
            size_factor: 1.0,
            rotation_step: DEFAULT_ROTATION_STEP,
            style: MoleculeStyle::default(),
            debug,
            primitives: Vec::new(),
            bounds_min: Vec2::ZERO,
            bounds_max: Vec2::ZERO,
        };
        molecule.rebuild();
        molecule
    }

    // -- Builder pattern --

    pub fn with_style(mut self, style: MoleculeStyle) -> Self {
        self.style = style;
        self.rebuild();
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_size_factor(mut self, factor: f32) -> Self {
        self.size_factor = factor;
        self
    }

    pub fn with_rotation_step(mut self, step: f32) -> Self {
        self.rotation_step = step;
        self
    }

    /// Advance one animation tick.
    pub fn render(&mut self) {
        self.rotation -= self.rotation_step;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn size_factor(&self) -> f32 {
        self.size_factor
    }

    pub fn style(&self) -> MoleculeStyle {
        self.style
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Local bounding box as (min, max).
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.bounds_min, self.bounds_max)
    }

    /// Rotation pivot: the middle of the local bounding box.
    pub fn pivot(&self) -> Vec2 {
        (self.bounds_min + self.bounds_max) * 0.5
    }

    /// Local X span of the connecting line, centered on the body.
    pub fn line_span(&self) -> (f32, f32) {
        let length = self.width * self.style.line_length_scale / 100.0;
        let start = (self.width - length) * 0.5;
        (start, start + length)
    }

    /// A replacement molecule with new base dimensions. The stored size factor
    /// is applied again so jitter stays as it was generated.
    pub fn resized(&self, base_radius: f32, base_width: f32) -> Molecule {
        let mut molecule = self.clone();
        molecule.radius = base_radius * self.size_factor;
        molecule.width = base_width * self.size_factor;
        molecule.rebuild();
        molecule
    }

    pub fn set_style(&mut self, style: MoleculeStyle) {
        if self.style != style {
            self.style = style;
            self.rebuild();
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        if self.debug != debug {
            self.debug = debug;
            self.rebuild();
        }
    }

    /// Scene node for this molecule given its emitter's anchor.
    pub fn node(&self, anchor: Vec2) -> DrawNode {
        let mut node = DrawNode::new(anchor + self.offset)
            .with_rotation(self.rotation)
            .with_pivot(self.pivot())
            .with_alpha(self.alpha);
        node.primitives = self.primitives.clone();
        node
    }

    /// Packed instance for the shared render buffer.
    pub fn instance(&self, anchor: Vec2) -> MoleculeInstance {
        let pos = anchor + self.offset;
        let pivot = self.pivot();
        let (line_start, line_end) = self.line_span();
        MoleculeInstance {
            x: pos.x,
            y: pos.y,
            rotation: self.rotation,
            alpha: self.alpha,
            pivot_x: pivot.x,
            pivot_y: pivot.y,
            radius: self.radius,
            width: self.width,
            line_start,
            line_end,
            line_thickness: self.style.line_thickness,
            color: (self.style.color.0 & 0xFF_FFFF) as f32,
        }
    }

    fn rebuild(&mut self) {
        let r = self.radius;
        let w = self.width;
        let (line_start, line_end) = self.line_span();
        let half_stroke = self.style.line_thickness * 0.5;
        let color = self.style.color;

        self.primitives.clear();
        self.primitives.push(Primitive::Line {
            from: Vec2::new(line_start, r),
            to: Vec2::new(line_end, r),
            stroke: self.style.line_thickness,
            color,
        });
        self.primitives.push(Primitive::Circle {
            center: Vec2::new(r, r),
            radius: r,
            color,
        });
        self.primitives.push(Primitive::Circle {
            center: Vec2::new(w - r, r),
            radius: r,
            color,
        });

        // Circles span [0, 2r] and [w - 2r, w]; the line adds its stroke height.
        let min = Vec2::new(
            0.0f32.min(w - 2.0 * r).min(line_start),
            0.0f32.min(r - half_stroke),
        );
        let max = Vec2::new(
            (2.0 * r).max(w).max(line_end),
            (2.0 * r).max(r + half_stroke),
        );
        self.bounds_min = min;
        self.bounds_max = max;

        if self.debug {
            self.primitives.push(Primitive::RectOutline {
                min,
                size: max - min,
                stroke: DEBUG_STROKE,
                color: Color::MAGENTA,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn molecule(radius: f32, width: f32) -> Molecule {
        Molecule::new(Vec2::ZERO, radius, width, false, &mut Rng::new(42))
    }

    #[test]
    fn geometry_matches_body() {
        let m = molecule(5.0, 40.0);
        match &m.primitives()[0] {
            Primitive::Line { from, to, .. } => {
                assert_eq!(*from, Vec2::new(0.0, 5.0));
                assert_eq!(*to, Vec2::new(40.0, 5.0));
            }
            other => panic!("expected line, got {other:?}"),
        }
        match &m.primitives()[2] {
            Primitive::Circle { center, radius, .. } => {
                assert_eq!(*center, Vec2::new(35.0, 5.0));
                assert_eq!(*radius, 5.0);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn pivot_is_body_center() {
        let m = molecule(5.0, 40.0);
        assert_eq!(m.pivot(), Vec2::new(20.0, 5.0));
    }

    #[test]
    fn rotation_starts_in_full_turn() {
        let mut rng = Rng::new(1);
        for _ in 0..100 {
            let m = Molecule::new(Vec2::ZERO, 2.0, 10.0, false, &mut rng);
            assert!(m.rotation >= 0.0 && m.rotation < TAU);
        }
    }

    #[test]
    fn rotations_differ_between_instances() {
        let mut rng = Rng::new(1);
        let a = Molecule::new(Vec2::ZERO, 2.0, 10.0, false, &mut rng);
        let b = Molecule::new(Vec2::ZERO, 2.0, 10.0, false, &mut rng);
        assert_ne!(a.rotation, b.rotation);
    }

    #[test]
    fn render_spins_backwards() {
        let mut m = molecule(2.0, 10.0);
        let before = m.rotation;
        m.render();
        assert!((m.rotation - (before - DEFAULT_ROTATION_STEP)).abs() < 1e-6);
        assert_eq!(m.offset, Vec2::ZERO);
    }

    #[test]
    fn debug_adds_bounds_without_moving_geometry() {
        let plain = molecule(5.0, 40.0);
        let mut debug = plain.clone();
        debug.set_debug(true);
        assert_eq!(debug.primitives().len(), plain.primitives().len() + 1);
        assert_eq!(&debug.primitives()[..3], plain.primitives());
        assert_eq!(debug.pivot(), plain.pivot());
    }

    #[test]
    fn line_scale_shortens_line_around_center() {
        let m = molecule(5.0, 40.0).with_style(MoleculeStyle {
            line_length_scale: 50.0,
            ..MoleculeStyle::default()
        });
        assert_eq!(m.line_span(), (10.0, 30.0));
    }

    #[test]
    fn resized_keeps_placement() {
        let m = Molecule::new(Vec2::new(3.0, 4.0), 5.0, 40.0, false, &mut Rng::new(2))
            .with_size_factor(0.5)
            .with_alpha(0.8);
        let r = m.resized(10.0, 60.0);
        assert_eq!(r.offset, m.offset);
        assert_eq!(r.rotation, m.rotation);
        assert_eq!(r.alpha, 0.8);
        assert_eq!(r.radius(), 5.0);
        assert_eq!(r.width(), 30.0);
    }

    #[test]
    fn zero_sized_molecule_is_valid() {
        let m = molecule(0.0, 0.0);
        assert_eq!(m.pivot(), Vec2::ZERO);
        assert_eq!(m.primitives().len(), 3);
    }

    #[test]
    fn instance_carries_world_position() {
        let m = Molecule::new(Vec2::new(1.0, -1.0), 2.0, 10.0, false, &mut Rng::new(3));
        let inst = m.instance(Vec2::new(100.0, 100.0));
        assert_eq!(inst.x, 101.0);
        assert_eq!(inst.y, 99.0);
        assert_eq!(inst.line_end, 10.0);
    }
}
