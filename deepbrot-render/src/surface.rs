//! Shared pixel storage for in-progress renders.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::RenderError;
use crate::Result;

/// A `width` by `height` grid of ARGB pixels that worker threads write
/// while readers take snapshots.
///
/// Stores use relaxed atomics: rows written by different workers never
/// overlap, and a reader racing a writer sees either the old or the new
/// pixel, never a torn one. Joining the workers at generation end makes
/// every write visible.
#[derive(Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len);
        pixels.resize_with(len, || AtomicU32::new(0));
        Ok(PixelSurface {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Overwrites every pixel with one color.
    pub fn fill(&self, color: u32) {
        for pixel in &self.pixels {
            pixel.store(color, Ordering::Relaxed);
        }
    }

    /// Writes one pixel by row-major linear index.
    pub fn store_index(&self, index: usize, color: u32) {
        self.pixels[index].store(color, Ordering::Relaxed);
    }

    /// Reads the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        let index = y as usize * self.width as usize + x as usize;
        self.pixels[index].load(Ordering::Relaxed)
    }

    /// Copies the current contents into a plain buffer.
    pub fn snapshot(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|pixel| pixel.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            PixelSurface::new(0, 10),
            Err(RenderError::InvalidDimensions {
                width: 0,
                height: 10
            })
        ));
        assert!(matches!(
            PixelSurface::new(10, 0),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn starts_zeroed_and_sized() {
        let surface = PixelSurface::new(4, 3).unwrap();
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.len(), 12);
        assert!(!surface.is_empty());
        assert_eq!(surface.get(3, 2), 0);
    }

    #[test]
    fn fill_store_and_get_agree_on_indexing() {
        let surface = PixelSurface::new(4, 3).unwrap();
        surface.fill(0xFF11_2233);
        assert_eq!(surface.get(0, 0), 0xFF11_2233);
        surface.store_index(2 * 4 + 1, 0xFFAB_CDEF);
        assert_eq!(surface.get(1, 2), 0xFFAB_CDEF);
        assert_eq!(surface.get(0, 2), 0xFF11_2233);
    }

    #[test]
    fn snapshot_copies_current_pixels() {
        let surface = PixelSurface::new(2, 2).unwrap();
        surface.store_index(0, 1);
        surface.store_index(3, 4);
        assert_eq!(surface.snapshot(), vec![1, 0, 0, 4]);
    }
}
