// Stroke engine: turns pointer/touch events into paint and erase segments.
// A session opens on `begin`, draws one segment per `move`, and closes on `end`
// or when the pointer leaves the surface. Tool parameters are read from the
// caller's `ToolConfig` on every segment.
// Visual outcomes:
// - Holding the button and dragging leaves one continuous stroke.
// - Width/opacity/color changes mid-stroke show up on the very next segment.

use crate::config::{BrushStyle, Tool, ToolConfig};
use crate::shimmer::Shimmer;
use crate::surface::Surface;
use crate::types::Point;
use tracing::{debug, trace};

/// What the stroke engine needs from a surface. `Surface` is the real one;
/// tests plug in recorders.
pub trait Canvas {
    /// Client coordinates → surface space (logical units).
    fn to_surface_space(&self, client: Point) -> Point;
    fn paint_segment(&mut self, from: Point, to: Point, style: &BrushStyle, shimmer: &mut Shimmer);
    fn erase_segment(&mut self, from: Point, to: Point, width: f32);
}

impl Canvas for Surface {
    fn to_surface_space(&self, client: Point) -> Point {
        Surface::to_surface_space(self, client)
    }

    fn paint_segment(&mut self, from: Point, to: Point, style: &BrushStyle, shimmer: &mut Shimmer) {
        Surface::paint_segment(self, from, to, style, shimmer);
    }

    fn erase_segment(&mut self, from: Point, to: Point, width: f32) {
        Surface::erase_segment(self, from, to, width);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Begin,
    Move,
    End,
    Leave,
}

/// One input event from the host, in client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: Phase,
    pub client: Point,
    /// Active touch points, first one wins. Empty for mouse input.
    pub touches: Vec<Point>,
    pub is_touch: bool,
}

impl PointerEvent {
    pub fn mouse(phase: Phase, x: f32, y: f32) -> Self {
        Self {
            phase,
            client: Point::new(x, y),
            touches: Vec::new(),
            is_touch: false,
        }
    }

    pub fn touch(phase: Phase, touches: Vec<Point>) -> Self {
        Self {
            phase,
            client: touches.first().copied().unwrap_or_default(),
            touches,
            is_touch: true,
        }
    }

    /// Where the event happened. A touch event with no active touch has no position.
    pub fn position(&self) -> Option<Point> {
        if self.is_touch {
            self.touches.first().copied()
        } else {
            Some(self.client)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Session {
    Idle,
    /// `anchor` is the last committed surface-space point.
    Active { anchor: Point },
}

/// A segment the engine asked the canvas to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    Paint { from: Point, to: Point, style: BrushStyle },
    Erase { from: Point, to: Point, width: f32 },
}

#[derive(Debug)]
pub struct StrokeEngine {
    session: Session,
    shimmer: Shimmer,
    segments: u64,
}

impl Default for StrokeEngine {
    fn default() -> Self {
        Self::new(Shimmer::default())
    }
}

impl StrokeEngine {
    pub fn new(shimmer: Shimmer) -> Self {
        Self {
            session: Session::Idle,
            shimmer,
            segments: 0,
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn is_active(&self) -> bool {
        matches!(self.session, Session::Active { .. })
    }

    /// Segments drawn since this engine was created.
    pub fn segments_drawn(&self) -> u64 {
        self.segments
    }

    /// Route an event to `begin`/`advance`/`end`/`leave`.
    pub fn handle<C: Canvas>(&mut self, canvas: &mut C, event: &PointerEvent, config: &ToolConfig) -> Option<Stroke> {
        match event.phase {
            Phase::Begin => {
                self.begin(canvas, event, config);
                None
            }
            Phase::Move => self.advance(canvas, event, config),
            Phase::End => {
                self.end();
                None
            }
            Phase::Leave => {
                self.leave();
                None
            }
        }
    }

    /// Open a session at the event position. Nothing is drawn yet.
    /// A `begin` during an open session closes it first, so the old anchor is gone.
    pub fn begin<C: Canvas>(&mut self, canvas: &C, event: &PointerEvent, config: &ToolConfig) {
        if self.is_active() {
            debug!("begin while active; closing previous stroke");
            self.session = Session::Idle;
        }
        if !config.tool.draws() {
            trace!(tool = ?config.tool, "non-drawing tool; staying idle");
            return;
        }
        let Some(client) = event.position() else {
            return;
        };
        let anchor = canvas.to_surface_space(client);
        if !anchor.is_finite() {
            return;
        }
        self.session = Session::Active { anchor };
        debug!(?anchor, tool = ?config.tool, "stroke begin");
    }

    /// Draw from the anchor to the event position and move the anchor there.
    /// No-op while idle.
    pub fn advance<C: Canvas>(&mut self, canvas: &mut C, event: &PointerEvent, config: &ToolConfig) -> Option<Stroke> {
        let Session::Active { anchor } = self.session else {
            return None;
        };
        let to = canvas.to_surface_space(event.position()?);
        if !to.is_finite() {
            return None;
        }
        self.session = Session::Active { anchor: to };

        let stroke = match config.tool {
            Tool::Brush => {
                let style = config.brush_style();
                canvas.paint_segment(anchor, to, &style, &mut self.shimmer);
                Stroke::Paint { from: anchor, to, style }
            }
            Tool::Eraser => {
                let width = config.brush_style().width;
                canvas.erase_segment(anchor, to, width);
                Stroke::Erase { from: anchor, to, width }
            }
            // Switched to a UI tool mid-stroke: follow the pointer, draw nothing.
            _ => return None,
        };
        self.segments += 1;
        Some(stroke)
    }

    pub fn end(&mut self) {
        if self.is_active() {
            debug!("stroke end");
        }
        self.session = Session::Idle;
    }

    /// Pointer left the surface; same as `end`.
    pub fn leave(&mut self) {
        self.end();
    }
}
