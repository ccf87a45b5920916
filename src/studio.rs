// The drawing session as the host sees it: one surface, one stroke engine,
// the caller-owned tool settings and the frame-rate readout.
// Visual outcomes:
// - Pointer input paints or erases; New and Clear empty the canvas.
// - A window resize blanks the canvas at the new size on the next frame.
// - Save/Export write the current pixels to PNG files.

use crate::config::{AppConfig, ToolConfig};
use crate::engine::{PointerEvent, Stroke, StrokeEngine};
use crate::error::Result;
use crate::fps::FrameRateSampler;
use crate::save;
use crate::schedule::{Scheduler, TaskHandle};
use crate::shimmer::Shimmer;
use crate::surface::{SnapshotFormat, Surface};
use crate::types::Point;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub struct Studio {
    surface: Surface,
    engine: StrokeEngine,
    /// Owned by the chrome; the engine only reads it.
    pub tool: ToolConfig,
    defaults: ToolConfig,
    fps: FrameRateSampler,
    pending_viewport: Option<(u32, u32)>,
}

/// Handles for the per-frame tasks a studio installs.
#[derive(Debug, Clone, Copy)]
pub struct StudioTasks {
    pub frame_rate: TaskHandle,
    pub resize: TaskHandle,
}

impl Studio {
    pub fn new(config: &AppConfig, shimmer: Shimmer, now: Instant) -> Result<Self> {
        let surface = Surface::new(config.canvas_width, config.canvas_height, config.device_scale)?;
        let tool = config.tool.clamped();
        Ok(Self {
            surface,
            engine: StrokeEngine::new(shimmer),
            tool,
            defaults: tool,
            fps: FrameRateSampler::new(now),
            pending_viewport: None,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn engine(&self) -> &StrokeEngine {
        &self.engine
    }

    /// Where the surface sits inside the host window.
    pub fn set_origin(&mut self, origin: Point) {
        self.surface.set_origin(origin);
    }

    pub fn pointer(&mut self, event: &PointerEvent) -> Option<Stroke> {
        self.engine.handle(&mut self.surface, event, &self.tool)
    }

    /// Queue a viewport change; the resize task applies the latest one.
    pub fn viewport_changed(&mut self, width: u32, height: u32) {
        if self.surface.logical_size() == (width, height) && self.pending_viewport.is_none() {
            return;
        }
        self.pending_viewport = Some((width, height));
    }

    /// Apply a queued viewport change. Returns true if the surface was rebuilt.
    /// A rejected size leaves the old surface in place.
    pub fn apply_pending_resize(&mut self) -> bool {
        let Some((w, h)) = self.pending_viewport.take() else {
            return false;
        };
        if self.surface.logical_size() == (w, h) {
            return false;
        }
        let scale = self.surface.device_scale();
        // A stroke cannot survive its surface; drop the anchor with it.
        self.engine.end();
        self.surface.resize(w, h, scale).is_ok()
    }

    pub fn frame_rate(&self) -> u32 {
        self.fps.current()
    }

    /// Count one presented frame.
    pub fn frame_presented(&mut self, now: Instant) {
        if let Some(rate) = self.fps.tick(now) {
            debug!(fps = rate, "frame rate");
        }
    }

    /// Register FPS sampling and resize handling on the host's frame loop.
    pub fn install_tasks(scheduler: &mut Scheduler<Studio>) -> StudioTasks {
        StudioTasks {
            frame_rate: scheduler.every_frame("frame-rate", |studio, now| studio.frame_presented(now)),
            resize: scheduler.every_frame("resize", |studio, _| {
                studio.apply_pending_resize();
            }),
        }
    }

    /// Wipe the canvas.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Start over: blank canvas, no open stroke, default tool settings.
    pub fn new_canvas(&mut self) {
        self.engine.end();
        self.surface.clear();
        self.tool = self.defaults;
        info!("new canvas");
    }

    pub fn snapshot(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        self.surface.export_snapshot(format)
    }

    /// PNG into the storage slot.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let bytes = self.snapshot(SnapshotFormat::Png)?;
        save::write_snapshot(path, &bytes)
    }

    /// PNG export file.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        self.save_to(path)
    }
}
