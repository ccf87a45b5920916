// Shimmer: the tiny sparkle dots scattered around the brush tip on every painted segment.
// Purely cosmetic. The random source is injected so tests can seed it or switch it off.
// Visual outcomes:
// - Up to two small dots of the stroke color land near the end of each brush segment.
// - With `Shimmer::disabled()` the stroke is drawn clean, nothing else changes.

use crate::types::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dots emitted per painted segment.
pub const SPARKLES_PER_SEGMENT: usize = 2;
/// Jitter span as a fraction of stroke width (offset lands in ±width × 0.4).
pub const JITTER_SPAN: f32 = 0.8;
/// Largest dot radius as a fraction of stroke width.
pub const MAX_RADIUS_FRACTION: f32 = 0.15;
/// Dot alpha relative to the stroke opacity.
pub const ALPHA_FRACTION: f32 = 0.6;

/// One shimmer dot in surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub center: Point,
    pub radius: f32,
}

/// Random source for shimmer placement.
pub struct Shimmer {
    rng: Option<StdRng>,
}

impl Shimmer {
    /// Reproducible sparkles.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Some(StdRng::seed_from_u64(seed)) }
    }

    /// Fresh randomness from the OS; what the host uses.
    pub fn from_entropy() -> Self {
        Self { rng: Some(StdRng::from_os_rng()) }
    }

    /// No sparkles at all.
    pub fn disabled() -> Self {
        Self { rng: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.rng.is_some()
    }

    /// Sparkles around `tip` for a stroke of `width`. Dots whose random radius
    /// comes out as zero are dropped, so 0..=2 are returned.
    pub fn sparkles(&mut self, tip: Point, width: f32) -> Vec<Sparkle> {
        let Some(rng) = self.rng.as_mut() else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(SPARKLES_PER_SEGMENT);
        for _ in 0..SPARKLES_PER_SEGMENT {
            let dx = (rng.random::<f32>() - 0.5) * width * JITTER_SPAN;
            let dy = (rng.random::<f32>() - 0.5) * width * JITTER_SPAN;
            let radius = rng.random::<f32>() * width * MAX_RADIUS_FRACTION;
            if radius <= 0.0 {
                continue;
            }
            out.push(Sparkle {
                center: Point::new(tip.x + dx, tip.y + dy),
                radius,
            });
        }
        out
    }
}

impl Default for Shimmer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for Shimmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shimmer").field("enabled", &self.is_enabled()).finish()
    }
}
