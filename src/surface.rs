// Surface manager: owns the raster, its logical→physical mapping, and snapshot export.
// Visual outcomes:
// - `paint_segment` leaves a glowing stroke (plus a couple of shimmer dots) on the surface.
// - `erase_segment` cuts a wider transparent path through whatever is there.
// - `clear` and `resize` leave a fully transparent surface.

use crate::config::BrushStyle;
use crate::error::{Error, Result};
use crate::paint::{self, Composite};
use crate::shimmer::{self, Shimmer};
use crate::types::{Point, Raster};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::{debug, trace, warn};

/// Largest physical side we will allocate.
pub const MAX_PHYSICAL_SIDE: usize = 16_384;
/// Eraser strokes are this much wider than the configured width.
pub const ERASER_WIDTH_FACTOR: f32 = 1.6;
/// Alpha of the glow color (`#rrggbbAA`).
pub const GLOW_ALPHA: f32 = 170.0 / 255.0;

/// Encodings offered by `export_snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Png,
    Bmp,
}

impl SnapshotFormat {
    /// Accepts short names (`png`) and MIME types (`image/png`).
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(Self::Png),
            "bmp" | "image/bmp" => Ok(Self::Bmp),
            _ => Err(Error::UnsupportedFormat(name.to_string())),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

/// The drawing surface. Physical size is always logical size × device scale.
#[derive(Debug, Clone)]
pub struct Surface {
    logical: (u32, u32),
    scale: f32,
    origin: Point,
    raster: Raster,
}

/// Truncates like a canvas assigning `logical * scale` to an integer size.
/// The slack absorbs f32 noise in the scale (0.7 is stored as 0.69999...).
fn physical_side(logical: u32, scale: f32) -> usize {
    (logical as f64 * scale as f64 + 1e-4).floor() as usize
}

/// Physical dimensions for a logical size, or why they are not acceptable.
fn physical_dims(width: u32, height: u32, scale: f32) -> Result<(usize, usize)> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::InvalidScale(scale));
    }
    let pw = physical_side(width, scale);
    let ph = physical_side(height, scale);
    if pw > MAX_PHYSICAL_SIDE || ph > MAX_PHYSICAL_SIDE {
        return Err(Error::SurfaceTooLarge { width: pw, height: ph });
    }
    if pw == 0 || ph == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok((pw, ph))
}

impl Surface {
    /// Allocate a transparent surface. Rejects zero sizes and bad scale factors.
    pub fn new(width: u32, height: u32, scale: f32) -> Result<Self> {
        let (pw, ph) = physical_dims(width, height, scale)?;
        debug!(width, height, scale, pw, ph, "surface created");
        Ok(Self {
            logical: (width, height),
            scale,
            origin: Point::default(),
            raster: Raster::new(pw, ph),
        })
    }

    /// (Re)allocate the buffer and scale. Safe to call repeatedly; content is discarded.
    /// On error the previous buffer and scale are left exactly as they were.
    pub fn initialize(&mut self, width: u32, height: u32, scale: f32) -> Result<()> {
        let (pw, ph) = physical_dims(width, height, scale)?;
        self.raster = Raster::new(pw, ph);
        self.logical = (width, height);
        self.scale = scale;
        debug!(width, height, scale, pw, ph, "surface initialized");
        Ok(())
    }

    /// Destructive: existing pixels are not carried over.
    pub fn resize(&mut self, width: u32, height: u32, scale: f32) -> Result<()> {
        self.initialize(width, height, scale).inspect_err(|e| {
            warn!(error = %e, width, height, scale, "resize rejected; keeping previous surface");
        })
    }

    pub fn logical_size(&self) -> (u32, u32) {
        self.logical
    }

    pub fn physical_size(&self) -> (usize, usize) {
        (self.raster.width, self.raster.height)
    }

    pub fn device_scale(&self) -> f32 {
        self.scale
    }

    /// Where the surface's top-left sits on screen, in client coordinates.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Client (window) coordinates → surface space. Not multiplied by the device scale.
    pub fn to_surface_space(&self, client: Point) -> Point {
        client.offset_from(self.origin)
    }

    /// Read-only view of the pixels.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Glowing brush segment in surface space, source-over.
    pub fn paint_segment(&mut self, from: Point, to: Point, style: &BrushStyle, shimmer: &mut Shimmer) {
        if !from.is_finite() || !to.is_finite() || !style.width.is_finite() || !style.opacity.is_finite() {
            warn!(?from, ?to, "non-finite paint segment ignored");
            return;
        }
        let s = self.scale;
        let (a, b) = (from.scaled(s), to.scaled(s));
        // Scaling a huge finite width may overflow; saturate instead.
        let width = (style.width * s).min(f32::MAX);
        let glow = (style.glow_radius() * s).min(f32::MAX);
        let opacity = style.opacity.clamp(0.0, 1.0);

        // Halo first, then the core line on top of it.
        paint::glow_segment(
            &mut self.raster,
            a,
            b,
            width,
            glow,
            style.color,
            opacity * GLOW_ALPHA,
        );
        paint::stroke_segment(
            &mut self.raster,
            a,
            b,
            width,
            Composite::SourceOver { color: style.color, alpha: opacity },
        );

        let dots = Composite::SourceOver {
            color: style.color,
            alpha: shimmer::ALPHA_FRACTION * opacity,
        };
        for sparkle in shimmer.sparkles(to, style.width) {
            paint::fill_disc(&mut self.raster, sparkle.center.scaled(s), sparkle.radius * s, dots);
        }
        trace!(?from, ?to, width = style.width, "paint segment");
    }

    /// Destructive segment: pixels under it go to transparent.
    pub fn erase_segment(&mut self, from: Point, to: Point, width: f32) {
        if !from.is_finite() || !to.is_finite() || !width.is_finite() {
            warn!(?from, ?to, "non-finite erase segment ignored");
            return;
        }
        let s = self.scale;
        paint::stroke_segment(
            &mut self.raster,
            from.scaled(s),
            to.scaled(s),
            (width * ERASER_WIDTH_FACTOR * s).min(f32::MAX),
            Composite::DestinationOut,
        );
        trace!(?from, ?to, width, "erase segment");
    }

    pub fn clear(&mut self) {
        self.raster.clear();
        debug!("surface cleared");
    }

    /// Encode the current pixels. Never mutates the surface.
    pub fn export_snapshot(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        let (w, h) = self.physical_size();
        if w == 0 || h == 0 {
            return Err(Error::Export("surface is empty".into()));
        }
        let img = RgbaImage::from_raw(w as u32, h as u32, self.raster.to_rgba_bytes())
            .ok_or_else(|| Error::Export("pixel buffer does not match surface size".into()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format.image_format())
            .map_err(|e| Error::Export(e.to_string()))?;
        debug!(?format, len = bytes.len(), "snapshot exported");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    fn style(width: f32) -> BrushStyle {
        BrushStyle {
            width,
            color: Rgba::rgb(0x22, 0xd3, 0xee),
            opacity: 1.0,
        }
    }

    #[test]
    fn physical_size_is_logical_times_scale() {
        let s = Surface::new(800, 600, 2.0).unwrap();
        assert_eq!(s.physical_size(), (1600, 1200));
        assert_eq!(s.logical_size(), (800, 600));
    }

    #[test]
    fn fractional_physical_size_truncates() {
        assert_eq!(Surface::new(33, 10, 1.5).unwrap().physical_size(), (49, 15));
        assert_eq!(Surface::new(10, 3, 0.7).unwrap().physical_size(), (7, 2));
        assert!(matches!(Surface::new(1, 10, 0.5), Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn rejects_bad_dimensions_and_scale() {
        assert!(matches!(Surface::new(0, 10, 1.0), Err(Error::InvalidDimensions { .. })));
        assert!(matches!(Surface::new(10, 10, 0.0), Err(Error::InvalidScale(_))));
        assert!(matches!(Surface::new(10, 10, f32::NAN), Err(Error::InvalidScale(_))));
        assert!(matches!(
            Surface::new(20_000, 10, 1.0),
            Err(Error::SurfaceTooLarge { .. })
        ));
    }

    #[test]
    fn failed_resize_keeps_previous_surface() {
        let mut s = Surface::new(40, 30, 1.0).unwrap();
        s.paint_segment(Point::new(5.0, 5.0), Point::new(30.0, 5.0), &style(4.0), &mut Shimmer::disabled());
        let before = s.raster().clone();
        assert!(s.resize(0, 30, 1.0).is_err());
        assert!(s.resize(40, 30, -1.0).is_err());
        assert_eq!(s.raster(), &before);
        assert_eq!(s.device_scale(), 1.0);
    }

    #[test]
    fn resize_discards_content_and_rescales() {
        let mut s = Surface::new(40, 30, 1.0).unwrap();
        s.paint_segment(Point::new(5.0, 5.0), Point::new(30.0, 5.0), &style(4.0), &mut Shimmer::disabled());
        s.resize(50, 20, 3.0).unwrap();
        assert_eq!(s.physical_size(), (150, 60));
        assert!(s.raster().is_transparent());
    }

    #[test]
    fn drawing_is_scaled_into_physical_pixels() {
        let mut s = Surface::new(50, 50, 2.0).unwrap();
        s.paint_segment(Point::new(10.0, 25.0), Point::new(40.0, 25.0), &style(4.0), &mut Shimmer::disabled());
        // Logical (25, 25) lands on physical (50, 50).
        assert_eq!(s.raster().pixel(50, 50).unwrap().a, 255);
        assert_eq!(s.raster().pixel(50, 10).unwrap().a, 0);
    }

    #[test]
    fn surface_space_subtracts_origin_only() {
        let mut s = Surface::new(100, 100, 2.0).unwrap();
        s.set_origin(Point::new(16.0, 24.0));
        assert_eq!(s.to_surface_space(Point::new(116.0, 124.0)), Point::new(100.0, 100.0));
    }

    #[test]
    fn non_finite_segments_are_ignored() {
        let mut s = Surface::new(20, 20, 1.0).unwrap();
        s.paint_segment(Point::new(f32::NAN, 1.0), Point::new(5.0, 5.0), &style(4.0), &mut Shimmer::disabled());
        s.erase_segment(Point::new(1.0, 1.0), Point::new(f32::INFINITY, 5.0), 4.0);
        assert!(s.raster().is_transparent());
    }

    #[test]
    fn far_off_endpoints_paint_without_wiping_existing_pixels() {
        let mut s = Surface::new(50, 50, 1.0).unwrap();
        s.paint_segment(Point::new(5.0, 25.0), Point::new(45.0, 25.0), &style(10.0), &mut Shimmer::disabled());
        let before = s.raster().clone();

        let (a, b) = (Point::new(-1e20, 25.0), Point::new(1e20, 25.0));
        s.paint_segment(a, b, &style(4.0), &mut Shimmer::disabled());

        for (old, new) in before.pixels.iter().zip(&s.raster().pixels) {
            assert!(new.a >= old.a, "alpha dropped from {} to {}", old.a, new.a);
        }
        assert_eq!(s.raster().pixel(0, 25).unwrap().a, 255);
        assert_eq!(s.raster().pixel(49, 25).unwrap().a, 255);
    }

    #[test]
    fn huge_width_covers_the_whole_surface() {
        let mut s = Surface::new(20, 20, 2.0).unwrap();
        s.paint_segment(Point::new(5.0, 5.0), Point::new(6.0, 5.0), &style(f32::MAX), &mut Shimmer::disabled());
        assert!(s.raster().pixels.iter().all(|p| p.a == 255));
    }

    #[test]
    fn erase_widens_the_configured_width() {
        let mut s = Surface::new(60, 60, 1.0).unwrap();
        let (a, b) = (Point::new(5.0, 30.0), Point::new(55.0, 30.0));
        s.paint_segment(a, b, &style(20.0), &mut Shimmer::disabled());
        s.erase_segment(a, b, 10.0);
        // 10 × 1.6 = 16 wide: 7 px off the line is inside the cut.
        assert_eq!(s.raster().pixel(30, 37).unwrap().a, 0);
        assert_eq!(s.raster().pixel(30, 30).unwrap().a, 0);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut s = Surface::new(20, 20, 1.0).unwrap();
        s.paint_segment(Point::new(2.0, 2.0), Point::new(18.0, 18.0), &style(3.0), &mut Shimmer::seeded(1));
        assert!(!s.raster().is_transparent());
        s.clear();
        assert!(s.raster().is_transparent());
    }

    #[test]
    fn snapshot_formats_parse_names_and_mime_types() {
        assert_eq!(SnapshotFormat::parse("png").unwrap(), SnapshotFormat::Png);
        assert_eq!(SnapshotFormat::parse("image/PNG").unwrap(), SnapshotFormat::Png);
        assert_eq!(SnapshotFormat::parse("bmp").unwrap(), SnapshotFormat::Bmp);
        assert!(matches!(SnapshotFormat::parse("gif"), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn png_snapshot_decodes_back_to_surface_size() {
        let s = Surface::new(30, 20, 2.0).unwrap();
        let bytes = s.export_snapshot(SnapshotFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (60, 40));
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn bmp_snapshot_is_not_empty() {
        let s = Surface::new(8, 8, 1.0).unwrap();
        let bytes = s.export_snapshot(SnapshotFormat::Bmp).unwrap();
        assert!(bytes.starts_with(b"BM"));
    }
}
