pub mod band;
pub mod cancel;
pub mod error;
pub mod export;
pub mod palette;
pub mod renderer;
pub mod surface;

pub use band::{build_bands, Band};
pub use cancel::CancelToken;
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use palette::{
    Palette, PaletteConfig, DEFAULT_CONTROL_COLORS, DEFAULT_PALETTE_SIZE, INTERIOR_COLOR,
};
pub use renderer::{
    RenderState, Renderer, RepaintHook, DEFAULT_EXTENT, DEFAULT_ITERATIONS, DEFAULT_ORIGIN_X,
    DEFAULT_ORIGIN_Y, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
pub use surface::PixelSurface;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
