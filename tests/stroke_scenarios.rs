use glossy_canvas::engine::{Phase, PointerEvent, Session, Stroke, StrokeEngine};
use glossy_canvas::fps::FrameRateSampler;
use glossy_canvas::shimmer::Shimmer;
use glossy_canvas::surface::{SnapshotFormat, Surface};
use glossy_canvas::types::{Point, Rgba};
use glossy_canvas::{Tool, ToolConfig};
use std::time::{Duration, Instant};

fn brush() -> ToolConfig {
    ToolConfig {
        tool: Tool::Brush,
        width: 18.0,
        opacity: 0.9,
        color: Rgba::from_hex("#22d3ee").expect("color"),
    }
}

fn mouse(phase: Phase, x: f32, y: f32) -> PointerEvent {
    PointerEvent::mouse(phase, x, y)
}

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes).expect("decode").to_rgba8()
}

#[test]
fn brush_stroke_lands_in_exported_png() {
    let mut surface = Surface::new(800, 600, 2.0).expect("surface");
    assert_eq!(surface.physical_size(), (1600, 1200));

    let mut engine = StrokeEngine::new(Shimmer::disabled());
    let cfg = brush();
    engine.handle(&mut surface, &mouse(Phase::Begin, 100.0, 100.0), &cfg);
    let stroke = engine.handle(&mut surface, &mouse(Phase::Move, 150.0, 100.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::End, 150.0, 100.0), &cfg);

    match stroke {
        Some(Stroke::Paint { from, to, style }) => {
            assert_eq!(from, Point::new(100.0, 100.0));
            assert_eq!(to, Point::new(150.0, 100.0));
            assert_eq!(style.width, 18.0);
        }
        other => panic!("expected one paint segment, got {other:?}"),
    }
    assert_eq!(engine.segments_drawn(), 1);

    let bytes = surface.export_snapshot(SnapshotFormat::Png).expect("png");
    assert!(!bytes.is_empty());
    let img = decode(&bytes);
    assert_eq!(img.dimensions(), (1600, 1200));
    // Along the segment (logical y = 100 → physical 200).
    for lx in [100u32, 125, 150] {
        let px = img.get_pixel(lx * 2, 200);
        assert!(px.0[3] > 200, "pixel at logical x={lx} had alpha {}", px.0[3]);
    }
    // Far from it: untouched.
    assert_eq!(img.get_pixel(1500, 1100).0[3], 0);
}

#[test]
fn eraser_returns_painted_pixels_to_transparent() {
    let mut surface = Surface::new(200, 100, 1.0).expect("surface");
    let mut engine = StrokeEngine::new(Shimmer::disabled());

    let paint = brush();
    engine.handle(&mut surface, &mouse(Phase::Begin, 20.0, 50.0), &paint);
    engine.handle(&mut surface, &mouse(Phase::Move, 180.0, 50.0), &paint);
    engine.handle(&mut surface, &mouse(Phase::End, 180.0, 50.0), &paint);
    assert!(surface.raster().pixel(100, 50).expect("pixel").a > 0);

    let erase = ToolConfig { tool: Tool::Eraser, ..brush() };
    engine.handle(&mut surface, &mouse(Phase::Begin, 20.0, 50.0), &erase);
    engine.handle(&mut surface, &mouse(Phase::Move, 180.0, 50.0), &erase);
    engine.handle(&mut surface, &mouse(Phase::End, 180.0, 50.0), &erase);

    for x in [20usize, 60, 100, 140, 179] {
        assert_eq!(surface.raster().pixel(x, 50), Some(Rgba::TRANSPARENT), "x={x}");
    }
}

#[test]
fn resize_then_export_is_blank_at_new_physical_size() {
    let mut surface = Surface::new(64, 64, 1.0).expect("surface");
    let mut engine = StrokeEngine::new(Shimmer::seeded(3));
    let cfg = brush();
    engine.handle(&mut surface, &mouse(Phase::Begin, 5.0, 5.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::Move, 60.0, 60.0), &cfg);

    surface.resize(40, 30, 1.5).expect("resize");
    let img = decode(&surface.export_snapshot(SnapshotFormat::Png).expect("png"));
    assert_eq!(img.dimensions(), (60, 45));
    assert!(img.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn stroke_across_far_off_coordinates_only_adds_paint() {
    let mut surface = Surface::new(50, 50, 1.0).expect("surface");
    let mut engine = StrokeEngine::new(Shimmer::disabled());
    let cfg = ToolConfig { width: 10.0, ..brush() };
    engine.handle(&mut surface, &mouse(Phase::Begin, 5.0, 25.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::Move, 45.0, 25.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::End, 45.0, 25.0), &cfg);
    let before = surface.raster().clone();

    engine.handle(&mut surface, &mouse(Phase::Begin, -1e20, 25.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::Move, 1e20, 25.0), &cfg);
    assert_eq!(engine.segments_drawn(), 2);

    for (old, new) in before.pixels.iter().zip(&surface.raster().pixels) {
        assert!(new.a >= old.a, "alpha dropped from {} to {}", old.a, new.a);
    }
    assert!(surface.raster().pixel(0, 25).expect("pixel").a > 200);
}

#[test]
fn moves_outside_a_session_never_touch_the_surface() {
    let mut surface = Surface::new(50, 50, 1.0).expect("surface");
    let mut engine = StrokeEngine::new(Shimmer::seeded(9));
    let cfg = brush();

    for (x, y) in [(5.0, 5.0), (25.0, 25.0), (45.0, 45.0)] {
        assert_eq!(engine.handle(&mut surface, &mouse(Phase::Move, x, y), &cfg), None);
    }
    engine.handle(&mut surface, &mouse(Phase::Begin, 10.0, 10.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::End, 10.0, 10.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::Move, 40.0, 40.0), &cfg);

    assert!(surface.raster().is_transparent());
    assert_eq!(engine.segments_drawn(), 0);
}

#[test]
fn reentrant_begin_does_not_draw_back_to_old_anchor() {
    let mut surface = Surface::new(300, 300, 1.0).expect("surface");
    let mut engine = StrokeEngine::new(Shimmer::disabled());
    let cfg = ToolConfig { width: 4.0, ..brush() };

    engine.handle(&mut surface, &mouse(Phase::Begin, 10.0, 10.0), &cfg);
    engine.handle(&mut surface, &mouse(Phase::Begin, 250.0, 250.0), &cfg);
    assert_eq!(engine.session(), Session::Active { anchor: Point::new(250.0, 250.0) });
    engine.handle(&mut surface, &mouse(Phase::Move, 260.0, 250.0), &cfg);

    // The diagonal between the two begins stays empty.
    assert_eq!(surface.raster().pixel(130, 130).expect("pixel").a, 0);
    assert!(surface.raster().pixel(255, 250).expect("pixel").a > 0);
}

#[test]
fn surface_origin_is_subtracted_from_client_coordinates() {
    let mut surface = Surface::new(100, 100, 2.0).expect("surface");
    surface.set_origin(Point::new(0.0, 20.0));
    let mut engine = StrokeEngine::new(Shimmer::disabled());
    let cfg = ToolConfig { width: 4.0, ..brush() };

    engine.handle(&mut surface, &mouse(Phase::Begin, 10.0, 70.0), &cfg);
    let stroke = engine.handle(&mut surface, &mouse(Phase::Move, 90.0, 70.0), &cfg);
    assert!(matches!(stroke, Some(Stroke::Paint { from, .. }) if from == Point::new(10.0, 50.0)));
    // Logical y = 50 → physical row 100.
    assert!(surface.raster().pixel(100, 100).expect("pixel").a > 0);
}

#[test]
fn frame_rate_reports_frames_in_the_last_second() {
    let t0 = Instant::now();
    let mut fps = FrameRateSampler::new(t0);
    let n = 45u32;
    for i in 1..n {
        fps.tick(t0 + Duration::from_millis(u64::from(i) * 20));
    }
    assert_eq!(fps.tick(t0 + Duration::from_millis(1000)), Some(n));
    assert_eq!(fps.current(), n);
    assert_eq!(fps.pending_frames(), 0);
}
