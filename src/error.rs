use thiserror::Error;

/// Errors surfaced by the editor core.
///
/// Pixel access never fails; these only cover contract violations at the
/// edges (canvas dimensions, configuration, names and colors coming from the UI).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error("invalid canvas dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("canvas {width}x{height} exceeds the {max} cell limit")]
    CanvasTooLarge { width: u32, height: u32, max: u64 },

    #[error("cell size must be at least 1 display pixel")]
    InvalidCellSize,

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid hex color: {0}")]
    InvalidHex(String),

    #[error("swatch index {index} out of range (palette has {len})")]
    SwatchIndex { index: usize, len: usize },
}
