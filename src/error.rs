// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A surface was requested with a zero-sized side.
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Device scale factor must be finite and positive.
    #[error("invalid device scale factor {0}")]
    InvalidScale(f32),

    /// Physical buffer would exceed the per-side pixel limit.
    #[error("surface too large: {width}x{height} physical pixels")]
    SurfaceTooLarge { width: usize, height: usize },

    /// Encoding the snapshot failed.
    #[error("snapshot export failed: {0}")]
    Export(String),

    #[error("unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
