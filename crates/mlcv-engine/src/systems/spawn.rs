//! Placement and jitter sampling for molecule populations.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::Rng;

/// How the distance from the anchor is drawn when placing a molecule.
///
/// `UniformRadius` draws the distance uniformly in [0, radius], so molecules
/// cluster towards the anchor (half of them land within radius / 2).
/// `UniformArea` takes the square root first, giving constant density over
/// the disc (a quarter land within radius / 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialDistribution {
    #[default]
    UniformRadius,
    UniformArea,
}

/// Sample an offset from the anchor within `radius`.
/// A radius of zero (or less) always yields the anchor itself.
pub fn sample_offset(rng: &mut Rng, radius: f32, distribution: RadialDistribution) -> Vec2 {
    let angle = rng.next_f32() * TAU;
    let t = rng.next_f32();
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let distance = match distribution {
        RadialDistribution::UniformRadius => t * radius,
        RadialDistribution::UniformArea => t.sqrt() * radius,
    };
    Vec2::new(angle.cos(), angle.sin()) * distance
}

/// Per-molecule size factor in [1 - jitter%, 1 + jitter%].
/// Exactly 1.0 when jitter is zero.
pub fn size_factor(rng: &mut Rng, jitter_percent: f32) -> f32 {
    if jitter_percent <= 0.0 {
        return 1.0;
    }
    let j = jitter_percent / 100.0;
    (1.0 + rng.range(-j, j)).max(0.0)
}

/// Opacity in [1 - jitter%, 1]. Exactly 1.0 when jitter is zero.
pub fn opacity(rng: &mut Rng, jitter_percent: f32) -> f32 {
    if jitter_percent <= 0.0 {
        return 1.0;
    }
    (1.0 - rng.next_f32() * jitter_percent / 100.0).clamp(0.0, 1.0)
}

/// Target population after quality scaling: round(amount * quality / 100).
pub fn scaled_amount(amount: u32, quality_level: u32) -> usize {
    ((amount as u64 * quality_level as u64 + 50) / 100) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_is_anchor() {
        let mut rng = Rng::new(1);
        for _ in 0..100 {
            assert_eq!(sample_offset(&mut rng, 0.0, RadialDistribution::UniformRadius), Vec2::ZERO);
            assert_eq!(sample_offset(&mut rng, 0.0, RadialDistribution::UniformArea), Vec2::ZERO);
        }
    }

    #[test]
    fn offsets_stay_within_radius() {
        let mut rng = Rng::new(3);
        for distribution in [RadialDistribution::UniformRadius, RadialDistribution::UniformArea] {
            for _ in 0..2000 {
                let offset = sample_offset(&mut rng, 50.0, distribution);
                assert!(offset.length() <= 50.0 + 1e-3, "offset {offset:?} outside radius");
            }
        }
    }

    #[test]
    fn uniform_radius_clusters_near_anchor() {
        let mut rng = Rng::new(11);
        let n = 20_000;
        let inner = |rng: &mut Rng, d| {
            (0..n)
                .filter(|_| sample_offset(rng, 100.0, d).length() < 50.0)
                .count() as f32
                / n as f32
        };
        let by_radius = inner(&mut rng, RadialDistribution::UniformRadius);
        let by_area = inner(&mut rng, RadialDistribution::UniformArea);
        assert!((by_radius - 0.5).abs() < 0.03, "uniform radius inner share {by_radius}");
        assert!((by_area - 0.25).abs() < 0.03, "uniform area inner share {by_area}");
    }

    #[test]
    fn no_jitter_is_exact() {
        let mut rng = Rng::new(5);
        assert_eq!(size_factor(&mut rng, 0.0), 1.0);
        assert_eq!(opacity(&mut rng, 0.0), 1.0);
    }

    #[test]
    fn jitter_bounds() {
        let mut rng = Rng::new(5);
        for _ in 0..1000 {
            let f = size_factor(&mut rng, 30.0);
            assert!((0.7..=1.3).contains(&f));
            let a = opacity(&mut rng, 100.0);
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn scaled_amount_rounds_half_up() {
        assert_eq!(scaled_amount(10, 100), 10);
        assert_eq!(scaled_amount(150, 1), 2);
        assert_eq!(scaled_amount(1, 50), 1);
        assert_eq!(scaled_amount(1, 49), 0);
        assert_eq!(scaled_amount(0, 100), 0);
        assert_eq!(scaled_amount(33, 50), 17);
    }

    #[test]
    fn scaled_amount_matches_float_rounding() {
        for amount in 0..=150u32 {
            for quality in 1..=100u32 {
                let expected = (amount as f64 * quality as f64 / 100.0).round() as usize;
                assert_eq!(scaled_amount(amount, quality), expected);
            }
        }
    }
}
