// What you SEE:
// • A dark canvas under a thin HUD strip (tool, width, opacity, color, FPS).
// • Hold Left Mouse: paint a glowing stroke; with the eraser, cut back to empty canvas.
// • B brush, E eraser, L layers (no drawing), [ ] width, - = opacity, 1-6 palette.
// • C clears, N starts over, S saves, X exports a PNG. ESC quits.

mod draw;

use draw::{compose_canvas, draw_crosshair, draw_text_5x7, fill_rows, Drawer, FrameBuffer, KeyAction, HUD_HEIGHT};
use glossy_canvas::config::{AppConfig, Tool, PALETTE};
use glossy_canvas::error::Error;
use glossy_canvas::schedule::Scheduler;
use glossy_canvas::shimmer::Shimmer;
use glossy_canvas::studio::Studio;
use glossy_canvas::types::{Point, Rgba};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BACKDROP: Rgba = Rgba::rgb(0x0a, 0x0a, 0x0a); // visual: near-black canvas background
const HUD_BG: u32 = 0x00_17_17_17;
const HUD_FG: u32 = 0x00_E5_E5_E5;
const CROSSHAIR: u32 = 0x00_22_D3_EE;
const WIDTH_STEP: f32 = 2.0;
const OPACITY_STEP: f32 = 0.05;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    /* --- Config + studio setup ---
       Visual: nothing yet; the surface is allocated transparent. */
    let config = AppConfig::discover(std::env::args_os().nth(1).map(PathBuf::from))?;
    let scale = config.device_scale;
    let mut studio = Studio::new(&config, Shimmer::from_entropy(), Instant::now())?;
    studio.set_origin(Point::new(0.0, HUD_HEIGHT as f32)); // canvas starts below the HUD strip

    let win_w = config.canvas_width as usize;
    let win_h = (config.canvas_height + HUD_HEIGHT) as usize;
    let mut drawer = Drawer::new("Glossy Canvas", win_w, win_h)?;
    let mut last_window = (win_w, win_h);
    info!(width = win_w, height = win_h, scale, "window open");

    /* --- Per-frame tasks: FPS sampling + resize handling ---
       Visual: FPS in the HUD updates once per second. */
    let mut scheduler = Scheduler::new();
    let tasks = Studio::install_tasks(&mut scheduler);

    let mut screen = FrameBuffer::new(0, 0);

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Viewport: a new window size becomes a (destructive) surface resize. */
        let window = drawer.size();
        if window != last_window {
            last_window = window;
            let canvas_h = (window.1 as u32).saturating_sub(HUD_HEIGHT);
            studio.viewport_changed(window.0 as u32, canvas_h);
        }

        /* 2) Chrome controls from the keyboard. */
        for action in drawer.key_actions() {
            apply_action(&mut studio, &config, action);
        }

        /* 3) Pointer input → stroke engine → surface. */
        for event in drawer.pointer_events(HUD_HEIGHT as f32) {
            studio.pointer(&event);
        }

        /* 4) Frame tasks (apply queued resize, count this frame). */
        scheduler.run_frame(&mut studio, now);

        /* 5) Compose: HUD strip, then the canvas over its backdrop. */
        let (pw, ph) = studio.surface().physical_size();
        let hud_px = (HUD_HEIGHT as f32 * scale).round() as usize;
        screen.ensure_size(pw, ph + hud_px);
        fill_rows(&mut screen, hud_px, HUD_BG);
        compose_canvas(&mut screen, studio.surface().raster(), hud_px, BACKDROP);

        if let Some((mx, my)) = drawer.mouse_pos() {
            if my >= HUD_HEIGHT as f32 {
                let (cx, cy) = ((mx * scale) as i32, (my * scale) as i32);
                draw_crosshair(&mut screen, cx, cy, 8, CROSSHAIR); // visual: cyan + at cursor
            }
        }

        let tool = studio.tool;
        let hud = format!(
            "{} | WIDTH {:.0} | OPACITY {:.0}% | {} | {} FPS",
            tool.tool.label(),
            tool.width,
            tool.opacity * 100.0,
            tool.color.to_hex(),
            studio.frame_rate(),
        );
        draw_text_5x7(&mut screen, 6, (hud_px as i32 - 7) / 2, &hud, HUD_FG);

        /* 6) Present. */
        drawer.present(&screen)?;
    }

    /* --- Teardown: no frame task may outlive the window. --- */
    scheduler.cancel(tasks.frame_rate);
    scheduler.cancel(tasks.resize);
    info!("window closed");
    Ok(())
}

/// Apply one chrome action. The tool config is only ever changed here.
fn apply_action(studio: &mut Studio, config: &AppConfig, action: KeyAction) {
    let tool = &mut studio.tool;
    match action {
        KeyAction::Brush => tool.tool = Tool::Brush,
        KeyAction::Eraser => tool.tool = Tool::Eraser,
        KeyAction::Layers => tool.tool = Tool::Layers,
        KeyAction::Thinner => tool.width -= WIDTH_STEP,
        KeyAction::Thicker => tool.width += WIDTH_STEP,
        KeyAction::Fainter => tool.opacity -= OPACITY_STEP,
        KeyAction::Stronger => tool.opacity += OPACITY_STEP,
        KeyAction::Swatch(i) => {
            if let Some(color) = PALETTE.get(i) {
                tool.color = *color;
            }
        }
        KeyAction::Clear => studio.clear(),
        KeyAction::New => studio.new_canvas(),
        KeyAction::Save => {
            if let Err(e) = studio.save_to(&config.storage_path) {
                warn!(error = %e, "save failed");
            }
        }
        KeyAction::Export => {
            if let Err(e) = studio.export_to(&config.export_path) {
                warn!(error = %e, "export failed");
            }
        }
    }
    studio.tool = studio.tool.clamped();
}
