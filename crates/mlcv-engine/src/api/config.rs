use serde::{Deserialize, Serialize};

use crate::systems::spawn::RadialDistribution;

/// Configuration for a visualization session, provided by the host page.
/// Every field has a default, so a partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    /// Viewport width in surface units (default: 800).
    pub width: f32,
    /// Viewport height in surface units (default: 600).
    pub height: f32,
    /// Seed for the session RNG. Each emitter derives its own stream from it.
    pub seed: u64,
    /// Initial global quality level, 1 - 100 (default: 100).
    pub quality_level: u32,
    /// Start with diagnostic overlays on.
    pub debug: bool,
    /// Start with emitter drag handles visible.
    pub show_gizmos: bool,
    /// Path of the reference overlay image, relative to the page.
    pub reference_image: String,
    /// Initial reference overlay opacity, 0.0 - 1.0 (default: 0.15).
    pub reference_opacity: f32,
    /// Whether the reference overlay starts visible.
    pub reference_visible: bool,
    /// How molecule distances from the anchor are sampled.
    pub distribution: RadialDistribution,
    /// Rotation applied to every molecule per tick, in radians (default: 0.01).
    pub rotation_step: f32,
    /// Capacity hint for the packed molecule instance buffer (default: 4096).
    pub max_instances: usize,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            seed: 42,
            quality_level: 100,
            debug: false,
            show_gizmos: true,
            reference_image: "img/reference-organs.png".to_string(),
            reference_opacity: 0.15,
            reference_visible: true,
            distribution: RadialDistribution::UniformRadius,
            rotation_step: 0.01,
            max_instances: 4096,
        }
    }
}

impl VisualizationConfig {
    /// Parse a configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
