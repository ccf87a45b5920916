// Glossy canvas: a pointer-driven paint surface with a glowing brush and an eraser.
// `surface::Surface` owns the pixels and the logical→physical mapping.
// `engine::StrokeEngine` turns pointer events into paint/erase segments on it.
// `studio::Studio` bundles both with the tool settings for a host window.

pub mod config;
pub mod engine;
pub mod error;
pub mod fps;
pub mod paint;
pub mod save;
pub mod schedule;
pub mod shimmer;
pub mod studio;
pub mod surface;
pub mod types;

pub use config::{Tool, ToolConfig};
pub use engine::{Canvas, Phase, PointerEvent, StrokeEngine};
pub use error::{Error, Result};
pub use surface::{SnapshotFormat, Surface};
