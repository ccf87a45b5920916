// Software rasterization of stroke segments, glow halos and dots.
// All coordinates here are PHYSICAL pixels; the surface applies the device scale first.
// Visual outcomes:
// - A thick, round-capped, anti-aliased line between two points.
// - A soft halo of the stroke color fading out around it (the "glow").
// - Small round dots (used for shimmer).
// - With `Composite::DestinationOut`, the same shapes punch holes to transparency.

use crate::types::{Point, Raster, Rgba};

/// How a drawn shape combines with what is already in the raster.
/// Passed explicitly with every draw call; there is no context-wide mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Composite {
    /// Normal painting: `color` blended over the destination at `alpha` (0..1).
    SourceOver { color: Rgba, alpha: f32 },
    /// Destructive: destination alpha is reduced by shape coverage, never painted black.
    DestinationOut,
}

/// Shortest distance from `p` to the segment `a`–`b`.
/// Degenerate segments (a == b) measure distance to the point.
/// Worked in f64 so far-apart endpoints cannot overflow the projection.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let dx = b.x as f64 - ax;
    let dy = b.y as f64 - ay;
    let len2 = dx * dx + dy * dy;
    let t = if len2 <= f64::EPSILON {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    };
    let cx = ax + dx * t;
    let cy = ay + dy * t;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt() as f32
}

const OUT_LEFT: u8 = 1;
const OUT_RIGHT: u8 = 2;
const OUT_ABOVE: u8 = 4;
const OUT_BELOW: u8 = 8;

fn outcode(x: f64, y: f64, lo: (f64, f64), hi: (f64, f64)) -> u8 {
    let mut code = 0;
    if x < lo.0 {
        code |= OUT_LEFT;
    } else if x > hi.0 {
        code |= OUT_RIGHT;
    }
    if y < lo.1 {
        code |= OUT_ABOVE;
    } else if y > hi.1 {
        code |= OUT_BELOW;
    }
    code
}

/// Cohen–Sutherland clip of `a`–`b` to the box `lo..=hi`.
/// Each clip pins one coordinate to the box edge exactly, so a segment with
/// endpoints far off the surface still lands on the right pixels.
fn clip_segment(a: Point, b: Point, lo: (f64, f64), hi: (f64, f64)) -> Option<(Point, Point)> {
    let (mut x0, mut y0) = (a.x as f64, a.y as f64);
    let (mut x1, mut y1) = (b.x as f64, b.y as f64);
    let mut c0 = outcode(x0, y0, lo, hi);
    let mut c1 = outcode(x1, y1, lo, hi);

    // Two clips per endpoint at most; the bound only guards against rounding ping-pong.
    for _ in 0..8 {
        if c0 | c1 == 0 {
            let p0 = Point::new(x0 as f32, y0 as f32);
            let p1 = Point::new(x1 as f32, y1 as f32);
            return Some((p0, p1));
        }
        if c0 & c1 != 0 {
            return None;
        }
        let code = if c0 != 0 { c0 } else { c1 };
        let (x, y) = if code & OUT_BELOW != 0 {
            (x0 + (x1 - x0) * (hi.1 - y0) / (y1 - y0), hi.1)
        } else if code & OUT_ABOVE != 0 {
            (x0 + (x1 - x0) * (lo.1 - y0) / (y1 - y0), lo.1)
        } else if code & OUT_RIGHT != 0 {
            (hi.0, y0 + (y1 - y0) * (hi.0 - x0) / (x1 - x0))
        } else {
            (lo.0, y0 + (y1 - y0) * (lo.0 - x0) / (x1 - x0))
        };
        if code == c0 {
            (x0, y0) = (x, y);
            c0 = outcode(x0, y0, lo, hi);
        } else {
            (x1, y1) = (x, y);
            c1 = outcode(x1, y1, lo, hi);
        }
    }
    None
}

/// Visit every pixel whose center lies within `reach` of the segment,
/// passing its distance to the segment. Out-of-bounds pixels are skipped.
fn for_each_near_segment(
    raster: &mut Raster,
    a: Point,
    b: Point,
    reach: f32,
    mut visit: impl FnMut(&mut Rgba, f32),
) {
    if raster.width == 0 || raster.height == 0 || reach.is_nan() || reach <= 0.0 {
        return;
    }
    // Only the part of the segment that can reach the raster matters.
    let r = reach as f64;
    let lo = (-r, -r);
    let hi = (raster.width as f64 + r, raster.height as f64 + r);
    let Some((a, b)) = clip_segment(a, b, lo, hi) else {
        return; // entirely off the surface
    };

    let min_x = (a.x.min(b.x) - reach).floor().max(0.0);
    let min_y = (a.y.min(b.y) - reach).floor().max(0.0);
    let max_x = (a.x.max(b.x) + reach).ceil().min(raster.width as f32 - 1.0);
    let max_y = (a.y.max(b.y) + reach).ceil().min(raster.height as f32 - 1.0);
    if max_x < min_x || max_y < min_y {
        return;
    }

    for y in (min_y as usize)..=(max_y as usize) {
        for x in (min_x as usize)..=(max_x as usize) {
            // Sample at the pixel center
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let d = distance_to_segment(center, a, b);
            if !d.is_finite() || d > reach {
                continue;
            }
            visit(raster.pixel_mut(x, y), d);
        }
    }
}

/// Coverage of a pixel at distance `d` from a shape edge of `radius`,
/// with one pixel of anti-aliasing ramp.
#[inline]
fn edge_coverage(d: f32, radius: f32) -> f32 {
    (radius + 0.5 - d).clamp(0.0, 1.0)
}

/// Straight-alpha source-over for one pixel.
#[inline]
pub fn blend_over(dst: &mut Rgba, color: Rgba, alpha: f32) {
    let sa = (alpha * color.a as f32 / 255.0).clamp(0.0, 1.0);
    if sa.is_nan() || sa <= 0.0 {
        return;
    }
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= f32::EPSILON {
        *dst = Rgba::TRANSPARENT;
        return;
    }

    let mix = |s: u8, d: u8| -> u8 {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    *dst = Rgba {
        r: mix(color.r, dst.r),
        g: mix(color.g, dst.g),
        b: mix(color.b, dst.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    };
}

/// Destination-out for one pixel: alpha shrinks by `coverage`; empty pixels are zeroed.
#[inline]
pub fn erase_pixel(dst: &mut Rgba, coverage: f32) {
    if coverage.is_nan() {
        return;
    }
    let keep = 1.0 - coverage.clamp(0.0, 1.0);
    let a = (dst.a as f32 * keep).round().clamp(0.0, 255.0) as u8;
    *dst = if a == 0 { Rgba::TRANSPARENT } else { Rgba { a, ..*dst } };
}

#[inline]
fn apply(dst: &mut Rgba, composite: Composite, coverage: f32) {
    if coverage.is_nan() || coverage <= 0.0 {
        return;
    }
    match composite {
        Composite::SourceOver { color, alpha } => blend_over(dst, color, alpha * coverage),
        Composite::DestinationOut => erase_pixel(dst, coverage),
    }
}

/// Thick segment with round caps and joins. `width` is the full line width.
/// A zero-length segment draws a round dot.
pub fn stroke_segment(raster: &mut Raster, a: Point, b: Point, width: f32, composite: Composite) {
    let radius = width * 0.5;
    for_each_near_segment(raster, a, b, radius + 0.5, |px, d| {
        apply(px, composite, edge_coverage(d, radius));
    });
}

/// Soft halo around a segment: full strength under the core line, Gaussian falloff
/// over `glow` pixels past its edge. Drawn *before* the core so the line sits on top.
pub fn glow_segment(
    raster: &mut Raster,
    a: Point,
    b: Point,
    width: f32,
    glow: f32,
    color: Rgba,
    alpha: f32,
) {
    if glow <= 0.0 {
        return;
    }
    let radius = width * 0.5;
    let sigma = glow * 0.5; // softness; smaller = tighter halo
    for_each_near_segment(raster, a, b, radius + glow, |px, d| {
        let z = (d - radius).max(0.0) / sigma;
        let w = (-0.5 * z * z).exp();
        blend_over(px, color, alpha * w);
    });
}

/// Filled anti-aliased disc.
pub fn fill_disc(raster: &mut Raster, center: Point, radius: f32, composite: Composite) {
    if radius <= 0.0 {
        return;
    }
    for_each_near_segment(raster, center, center, radius + 0.5, |px, d| {
        apply(px, composite, edge_coverage(d, radius));
    });
}
