// Window + software drawing utilities for the host.
// Visual effects provided here:
// 1) A resizable window that shows the canvas under a thin HUD strip.
// 2) A crosshair that follows your mouse over the canvas.
// 3) A tiny 5x7 bitmap font to render HUD text in the strip.

use glossy_canvas::engine::{Phase, PointerEvent};
use glossy_canvas::error::Error;
use glossy_canvas::types::{Raster, Rgba};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Logical height of the HUD strip above the canvas.
pub const HUD_HEIGHT: u32 = 20;

/// The screen image we push to the window each frame (0x00RRGGBB).
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    /// Reallocate if the size changed.
    pub fn ensure_size(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }
}

/// Chrome actions the keyboard can trigger this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Brush,
    Eraser,
    Layers,
    Thinner,
    Thicker,
    Fainter,
    Stronger,
    Swatch(usize),
    Clear,
    New,
    Save,
    Export,
}

const KEY_ACTIONS: [(Key, KeyAction); 17] = [
    (Key::B, KeyAction::Brush),
    (Key::E, KeyAction::Eraser),
    (Key::L, KeyAction::Layers),
    (Key::LeftBracket, KeyAction::Thinner),
    (Key::RightBracket, KeyAction::Thicker),
    (Key::Minus, KeyAction::Fainter),
    (Key::Equal, KeyAction::Stronger),
    (Key::Key1, KeyAction::Swatch(0)),
    (Key::Key2, KeyAction::Swatch(1)),
    (Key::Key3, KeyAction::Swatch(2)),
    (Key::Key4, KeyAction::Swatch(3)),
    (Key::Key5, KeyAction::Swatch(4)),
    (Key::Key6, KeyAction::Swatch(5)),
    (Key::C, KeyAction::Clear),
    (Key::N, KeyAction::New),
    (Key::S, KeyAction::Save),
    (Key::X, KeyAction::Export),
];

pub struct Drawer {
    window: Window,   // the on-screen window you see
    was_down: bool,   // left button state last frame
    was_inside: bool, // mouse over the canvas last frame
}

impl Drawer {
    /// Create a resizable window of the given logical size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let opts = WindowOptions { resize: true, ..WindowOptions::default() };
        let window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window, was_down: false, was_inside: false })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we'll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current window size in logical pixels.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in window coordinates, if the pointer is over the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// Keys pressed this frame, mapped to chrome actions.
    pub fn key_actions(&self) -> Vec<KeyAction> {
        KEY_ACTIONS
            .iter()
            .filter(|(key, _)| self.window.is_key_pressed(*key, KeyRepeat::No))
            .map(|(_, action)| *action)
            .collect()
    }

    /// Turn this frame's mouse state into begin/move/end/leave events.
    /// `canvas_top` is where the canvas starts below the HUD strip.
    pub fn pointer_events(&mut self, canvas_top: f32) -> Vec<PointerEvent> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos = self.mouse_pos().filter(|&(_, y)| y >= canvas_top);
        let mut events = Vec::new();

        match pos {
            Some((x, y)) => {
                if down && !self.was_down {
                    events.push(PointerEvent::mouse(Phase::Begin, x, y));
                } else if down {
                    events.push(PointerEvent::mouse(Phase::Move, x, y));
                } else if self.was_down {
                    events.push(PointerEvent::mouse(Phase::End, x, y));
                }
                self.was_inside = true;
            }
            None => {
                if self.was_inside && self.was_down {
                    events.push(PointerEvent::mouse(Phase::Leave, 0.0, 0.0));
                }
                self.was_inside = false;
            }
        }
        self.was_down = down;
        events
    }
}

/* ---------- Compositing the canvas into the screen ---------- */

/// Blend the (straight-alpha) canvas over a solid backdrop into the screen,
/// starting `top` physical rows down.
pub fn compose_canvas(screen: &mut FrameBuffer, canvas: &Raster, top: usize, backdrop: Rgba) {
    let rows = canvas.height.min(screen.height.saturating_sub(top));
    let cols = canvas.width.min(screen.width);
    for y in 0..rows {
        for x in 0..cols {
            let src = canvas.pixels[y * canvas.width + x];
            let a = src.a as u32;
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
            let shown = Rgba::rgb(mix(src.r, backdrop.r), mix(src.g, backdrop.g), mix(src.b, backdrop.b));
            screen.pixels[(y + top) * screen.width + x] = shown.to_u32_rgb();
        }
    }
}

/// Fill the HUD strip.
pub fn fill_rows(screen: &mut FrameBuffer, rows: usize, color: u32) {
    let end = (rows * screen.width).min(screen.pixels.len());
    screen.pixels[..end].fill(color);
}

/* ---------- Software drawing: pixels, crosshair, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Visual: a "+" (gap in the middle) marking where the brush will land.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/// Return a 5x7 glyph bitmap. Lowercase is drawn as uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '#' => g!(0b01010,0b11111,0b01010,0b01010,0b01010,0b11111,0b01010),
        '%' => g!(0b11001,0b11010,0b00010,0b00100,0b01000,0b01011,0b10011),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass offset by (1,1), then the glyph itself
        for (ofs, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + ofs, y + ry as i32 + ofs, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs, 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
