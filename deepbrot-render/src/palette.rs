//! Escape-time color palettes.
//!
//! A palette is a precomputed lookup table interpolated from a short list
//! of control colors. Escape counts index into the table; samples that
//! never escape render as opaque black.

use serde::{Deserialize, Serialize};

use deepbrot_core::EscapeResult;

use crate::error::RenderError;
use crate::Result;

/// Color for samples that never escape.
pub const INTERIOR_COLOR: u32 = 0xFF00_0000;

/// Default control gradient: red, green, blue, magenta, back to red.
pub const DEFAULT_CONTROL_COLORS: [u32; 5] = [
    0xFFFF_0000,
    0xFF00_FF00,
    0xFF00_00FF,
    0xFFFF_00FF,
    0xFFFF_0000,
];

/// Default lookup-table size.
pub const DEFAULT_PALETTE_SIZE: usize = 1024;

/// Immutable ARGB lookup table plus the iteration-to-index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    /// Builds a table of `size` entries interpolating linearly between
    /// consecutive `controls`.
    ///
    /// The table divides evenly among the segments and the last segment
    /// absorbs any remainder. An entry at an exact segment start equals its
    /// control color; the final control is approached but only reached in
    /// the limit, which keeps cyclic gradients seamless when the first and
    /// last controls match.
    pub fn from_controls(controls: &[u32], size: usize) -> Result<Self> {
        if controls.len() < 2 || size == 0 {
            return Err(RenderError::InvalidPalette {
                controls: controls.len(),
                size,
            });
        }
        Ok(Palette {
            colors: build_lut(controls, size),
        })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Raw table entry.
    pub fn entry(&self, index: usize) -> u32 {
        self.colors[index]
    }

    /// Maps one escape sample to its display color.
    ///
    /// Interior samples get [`INTERIOR_COLOR`]. Escaped counts spread over
    /// the table: an iteration budget smaller than the table stretches the
    /// counts by an integer factor so shallow renders still use the full
    /// gradient, and a budget larger than the table wraps around it.
    pub fn color_for(&self, result: EscapeResult, num_iterations: u32) -> u32 {
        match result.iterations() {
            None => INTERIOR_COLOR,
            Some(n) => {
                let len = self.colors.len();
                let stretch = if (num_iterations as usize) < len {
                    len / num_iterations.max(1) as usize
                } else {
                    1
                };
                self.colors[(n as usize * stretch) % len]
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: build_lut(&DEFAULT_CONTROL_COLORS, DEFAULT_PALETTE_SIZE),
        }
    }
}

// Callers have already validated controls.len() >= 2 and size >= 1.
fn build_lut(controls: &[u32], size: usize) -> Vec<u32> {
    let segments = controls.len() - 1;
    let step = size / segments;
    let mut colors = vec![0u32; size];
    for segment in 0..segments {
        let start = segment * step;
        let end = if segment == segments - 1 {
            size
        } else {
            start + step
        };
        let span = (end - start) as f64;
        for (offset, color) in colors[start..end].iter_mut().enumerate() {
            let t = offset as f64 / span;
            *color = lerp_argb(controls[segment], controls[segment + 1], t);
        }
    }
    colors
}

/// Linear blend of two ARGB colors; alpha is forced opaque.
fn lerp_argb(from: u32, to: u32, t: f64) -> u32 {
    let channel = |shift: u32| {
        let a = ((from >> shift) & 0xFF) as f64;
        let b = ((to >> shift) & 0xFF) as f64;
        let blended = a + (b - a) * t;
        (blended.clamp(0.0, 255.0) as u32) & 0xFF
    };
    0xFF00_0000 | (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

/// Serializable palette description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub controls: Vec<u32>,
    pub size: usize,
}

impl PaletteConfig {
    pub fn build(&self) -> Result<Palette> {
        Palette::from_controls(&self.controls, self.size)
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig {
            controls: DEFAULT_CONTROL_COLORS.to_vec(),
            size: DEFAULT_PALETTE_SIZE,
        }
    }
}
