// Tool parameters handed to the core by the chrome, plus the host's startup settings.
// The core only ever reads a `ToolConfig`; the host owns and mutates it.

use crate::error::{Error, Result};
use crate::types::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "GLOSSY_CANVAS_CONFIG";

pub const MIN_WIDTH: f32 = 1.0;
pub const MAX_WIDTH: f32 = 60.0;
pub const MIN_OPACITY: f32 = 0.05;
pub const MAX_OPACITY: f32 = 1.0;

/// Swatches offered next to the color picker.
pub const PALETTE: [Rgba; 6] = [
    Rgba::rgb(0x22, 0xd3, 0xee),
    Rgba::rgb(0xa7, 0x8b, 0xfa),
    Rgba::rgb(0xf4, 0x72, 0xb6),
    Rgba::rgb(0xfa, 0xcc, 0x15),
    Rgba::rgb(0x34, 0xd3, 0x99),
    Rgba::rgb(0x60, 0xa5, 0xfa),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Brush,
    Eraser,
    Layers,
    #[serde(rename = "color")]
    ColorPicker,
    Shape,
    Undo,
    Redo,
}

impl Tool {
    /// Only the brush and the eraser touch pixels; every other tool is UI-only.
    pub fn draws(self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Brush => "BRUSH",
            Tool::Eraser => "ERASER",
            Tool::Layers => "LAYERS",
            Tool::ColorPicker => "COLOR",
            Tool::Shape => "SHAPE",
            Tool::Undo => "UNDO",
            Tool::Redo => "REDO",
        }
    }
}

/// What the brush looks like for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStyle {
    pub width: f32,
    pub color: Rgba,
    pub opacity: f32,
}

impl BrushStyle {
    /// Halo radius drawn around the core line.
    pub fn glow_radius(&self) -> f32 {
        self.width * 0.8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub tool: Tool,
    pub width: f32,
    pub opacity: f32,
    #[serde(with = "hex_color")]
    pub color: Rgba,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            width: 18.0,
            opacity: 0.9,
            color: PALETTE[0],
        }
    }
}

impl ToolConfig {
    /// Pull width and opacity back into the slider ranges; NaN falls back to the default.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let width = if self.width.is_finite() { self.width } else { defaults.width };
        let opacity = if self.opacity.is_finite() { self.opacity } else { defaults.opacity };
        Self {
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            opacity: opacity.clamp(MIN_OPACITY, MAX_OPACITY),
            ..self
        }
    }

    pub fn brush_style(&self) -> BrushStyle {
        let c = self.clamped();
        BrushStyle {
            width: c.width,
            color: c.color,
            opacity: c.opacity,
        }
    }
}

mod hex_color {
    use crate::types::Rgba;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Rgba, D::Error> {
        let text = String::deserialize(d)?;
        Rgba::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Startup settings for the host window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub device_scale: f32,
    pub tool: ToolConfig,
    /// Where Save writes the snapshot.
    pub storage_path: PathBuf,
    /// Where Export writes the snapshot.
    pub export_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas_width: 960,
            canvas_height: 600,
            device_scale: 1.0,
            tool: ToolConfig::default(),
            storage_path: PathBuf::from("glossy-canvas.png"),
            export_path: PathBuf::from("glossy-art.png"),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            tool: cfg.tool.clamped(),
            ..cfg
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// First CLI argument, then `GLOSSY_CANVAS_CONFIG`, then defaults.
    pub fn discover(arg: Option<PathBuf>) -> Result<Self> {
        let path = arg.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(p) => {
                tracing::info!(path = %p.display(), "loading config");
                Self::load(&p)
            }
            None => Ok(Self::default()),
        }
    }
}
