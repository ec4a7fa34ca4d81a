use glam::Vec2;

use crate::api::types::Color;
use crate::renderer::traits::{DrawNode, Primitive};

/// Radius of the clickable drag handle.
pub const HANDLE_RADIUS: f32 = 10.0;
/// Radius of the selection marker drawn around a highlighted anchor.
pub const HIGHLIGHT_RADIUS: f32 = HANDLE_RADIUS + 6.0;

const HANDLE_COLOR: Color = Color(0x3399FF);
const RING_COLOR: Color = Color(0x3399FF);
const HIGHLIGHT_COLOR: Color = Color(0xFF9900);

/// Drag handle and selection marker for an emitter's anchor.
///
/// Visibility and highlight are independent: a highlighted emitter keeps its
/// marker even when gizmos are switched off.
#[derive(Debug, Clone, Default)]
pub struct Gizmo {
    /// Whether the handle and the spawn-radius ring are shown.
    pub visible: bool,
    /// Whether the selection marker is shown.
    pub highlighted: bool,
}

impl Gizmo {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            highlighted: false,
        }
    }

    /// Whether `point` hits the handle. Hidden handles receive no input.
    pub fn contains(&self, anchor: Vec2, point: Vec2) -> bool {
        self.visible && anchor.distance(point) <= HANDLE_RADIUS
    }

    /// Handle node: the handle plus the spawn-radius ring.
    pub fn node(&self, anchor: Vec2, spawn_radius: f32) -> DrawNode {
        DrawNode::new(anchor)
            .with_visible(self.visible)
            .with_primitive(Primitive::Ring {
                center: Vec2::ZERO,
                radius: spawn_radius,
                stroke: 1.0,
                color: RING_COLOR,
            })
            .with_primitive(Primitive::Circle {
                center: Vec2::ZERO,
                radius: HANDLE_RADIUS,
                color: HANDLE_COLOR,
            })
    }

    /// Selection marker node.
    pub fn highlight_node(&self, anchor: Vec2) -> DrawNode {
        DrawNode::new(anchor)
            .with_visible(self.highlighted)
            .with_primitive(Primitive::Ring {
                center: Vec2::ZERO,
                radius: HIGHLIGHT_RADIUS,
                stroke: 2.0,
                color: HIGHLIGHT_COLOR,
            })
    }
}
