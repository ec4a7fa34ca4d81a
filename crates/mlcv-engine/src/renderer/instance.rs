use bytemuck::{Pod, Zeroable};

/// Per-molecule render data written to shared memory for the browser renderer.
/// Must match the TypeScript reader: 12 floats = 48 bytes stride.
///
/// Geometry is in molecule-local coordinates (see `Molecule`); the renderer
/// translates to (`x`, `y`) and rotates by `rotation` around the pivot.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MoleculeInstance {
    /// World-space anchor X (emitter anchor + molecule offset).
    pub x: f32,
    /// World-space anchor Y.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Opacity (0.0 - 1.0).
    pub alpha: f32,
    /// Pivot X in local coordinates.
    pub pivot_x: f32,
    /// Pivot Y in local coordinates.
    pub pivot_y: f32,
    /// Circle radius.
    pub radius: f32,
    /// Body width (distance between the outer edges of the two circles).
    pub width: f32,
    /// Local X where the connecting line starts.
    pub line_start: f32,
    /// Local X where the connecting line ends.
    pub line_end: f32,
    /// Line stroke width.
    pub line_thickness: f32,
    /// Fill color as 0xRRGGBB (exact in f32, 24 bits).
    pub color: f32,
}

impl MoleculeInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Flat buffer of molecule instances, rebuilt every frame.
pub struct RenderBuffer {
    pub instances: Vec<MoleculeInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: MoleculeInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for shared-memory reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// The instance data viewed as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
