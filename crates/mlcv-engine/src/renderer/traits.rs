//! Rendering surface contract.
//!
//! The core never draws pixels. It describes what to show as `DrawNode`s,
//! each a small scene-graph node of primitives in local coordinates, and hands
//! them to whatever surface the host provides (Canvas2D, WebGPU, a test
//! recorder). Nothing is ever read back.

use glam::Vec2;

use crate::api::types::Color;

/// A drawable primitive in node-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled circle.
    Circle { center: Vec2, radius: f32, color: Color },
    /// Stroked circle outline.
    Ring { center: Vec2, radius: f32, stroke: f32, color: Color },
    /// Straight stroked line.
    Line { from: Vec2, to: Vec2, stroke: f32, color: Color },
    /// Rectangle outline, `min` is the top-left corner.
    RectOutline { min: Vec2, size: Vec2, stroke: f32, color: Color },
    /// Image centered on the node origin.
    Image { source: String },
}

/// A positioned group of primitives. Rotation is applied around `pivot`,
/// which is expressed in the same local coordinates as the primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawNode {
    pub position: Vec2,
    pub rotation: f32,
    pub pivot: Vec2,
    pub alpha: f32,
    pub visible: bool,
    pub primitives: Vec<Primitive>,
}

impl DrawNode {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            pivot: Vec2::ZERO,
            alpha: 1.0,
            visible: true,
            primitives: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }
}

/// Surface that presents draw nodes. Owns no domain state.
///
/// ```ignore
/// struct CanvasSurface { ctx: web_sys::CanvasRenderingContext2d }
///
/// impl RenderSurface for CanvasSurface {
///     fn size(&self) -> Vec2 { /* canvas client size */ }
///     fn draw(&mut self, node: &DrawNode) { /* translate, rotate, stroke */ }
/// }
/// ```
pub trait RenderSurface {
    /// Visible area in surface units.
    fn size(&self) -> Vec2;

    /// Present one node. Called in back-to-front order.
    fn draw(&mut self, node: &DrawNode);
}

/// Surface that keeps every node it receives. Handy for tests and for hosts
/// that want to batch a frame before presenting it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub size: Vec2,
    pub nodes: Vec<DrawNode>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            nodes: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn draw(&mut self, node: &DrawNode) {
        self.nodes.push(node.clone());
    }
}
