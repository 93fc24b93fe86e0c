use thiserror::Error;

use deepbrot_core::CoreError;

/// Errors surfaced by the renderer facade and its helpers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// At least one iteration is required per sample.
    #[error("invalid iteration count: {0} (must be at least 1)")]
    InvalidIterations(u32),

    /// At least one worker thread is required.
    #[error("invalid thread count: {0} (must be at least 1)")]
    InvalidThreads(u32),

    /// Screen dimensions must both be nonzero.
    #[error("invalid screen dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The visible extent must be a positive finite number.
    #[error("invalid view extent: {0}")]
    InvalidExtent(f64),

    /// Zoom factors must be positive finite numbers.
    #[error("invalid zoom factor: {0}")]
    InvalidZoomFactor(f64),

    /// Palettes need at least two control colors and one entry.
    #[error("invalid palette: {controls} control colors, {size} entries")]
    InvalidPalette { controls: usize, size: usize },

    /// The pixel surface does not match the screen dimensions.
    #[error("surface size mismatch: expected {expected} pixels, got {actual}")]
    SurfaceSizeMismatch { expected: usize, actual: usize },

    /// A new generation cannot start while workers from the previous one
    /// are still attached; terminate them first.
    #[error("a render generation is still active")]
    RenderActive,

    /// Arithmetic failure bubbled up from the numeric core.
    #[error(transparent)]
    Core(#[from] CoreError),
}
