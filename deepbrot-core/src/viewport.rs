//! Complex-plane viewport and pixel-to-plane mapping.

use crate::backend::EscapeBackend;
use crate::Result;

/// The visible region: an origin corner plus a horizontal extent.
///
/// Only the horizontal extent is stored; the vertical span is derived from
/// the screen aspect ratio when bounds are computed, so resizing a window
/// rescales the view instead of distorting it.
#[derive(Debug, Clone)]
pub struct Viewport<V> {
    pub x_origin: V,
    pub y_origin: V,
    pub extent: V,
}

/// Concrete plane bounds for one screen size.
///
/// Workers receive a clone taken when a render generation starts, and pan or
/// zoom for the next generation is computed against the same snapshot, so a
/// viewport edit never shears what a worker is currently drawing.
#[derive(Debug, Clone)]
pub struct PlaneBounds<V> {
    pub x_min: V,
    pub y_min: V,
    pub x_max: V,
    pub y_max: V,
}

impl<V: Clone> Viewport<V> {
    pub fn new(x_origin: V, y_origin: V, extent: V) -> Self {
        Viewport {
            x_origin,
            y_origin,
            extent,
        }
    }

    /// Computes bounds for a `width` by `height` pixel screen.
    ///
    /// The vertical span scales the extent by `height` before dividing by
    /// `width`, so it stays exact in backends with exact division.
    pub fn bounds<B>(&self, backend: &B, width: u32, height: u32) -> Result<PlaneBounds<V>>
    where
        B: EscapeBackend<Value = V>,
    {
        let x_max = backend.add(&self.x_origin, &self.extent)?;
        let scaled = backend.scale(&self.extent, f64::from(height))?;
        let y_extent = backend.div_dim(&scaled, width)?;
        let y_max = backend.add(&self.y_origin, &y_extent)?;
        Ok(PlaneBounds {
            x_min: self.x_origin.clone(),
            y_min: self.y_origin.clone(),
            x_max,
            y_max,
        })
    }

    /// Shifts the origin by a whole-pixel delta measured on `bounds`.
    /// Positive deltas drag the content right and down, which moves the
    /// origin toward smaller coordinates.
    pub fn pan<B>(
        &mut self,
        backend: &B,
        bounds: &PlaneBounds<V>,
        dx: i32,
        dy: i32,
        width: u32,
        height: u32,
    ) -> Result<()>
    where
        B: EscapeBackend<Value = V>,
    {
        let span_x = backend.sub(&bounds.x_max, &bounds.x_min)?;
        let span_y = backend.sub(&bounds.y_max, &bounds.y_min)?;
        let shift_x = backend.div_dim(&backend.scale(&span_x, f64::from(dx))?, width)?;
        let shift_y = backend.div_dim(&backend.scale(&span_y, f64::from(dy))?, height)?;
        self.x_origin = backend.sub(&self.x_origin, &shift_x)?;
        self.y_origin = backend.sub(&self.y_origin, &shift_y)?;
        Ok(())
    }

    /// Rescales the view around the plane point under pixel `(px, py)`.
    ///
    /// The anchored point keeps its screen position: its fractional offset
    /// inside the view is preserved while both spans are multiplied by
    /// `factor`. The offsets are formed in `f64`, which costs at most a
    /// sub-pixel shift per zoom step.
    #[allow(clippy::too_many_arguments)]
    pub fn zoom_at<B>(
        &mut self,
        backend: &B,
        bounds: &PlaneBounds<V>,
        px: u32,
        py: u32,
        factor: f64,
        width: u32,
        height: u32,
    ) -> Result<()>
    where
        B: EscapeBackend<Value = V>,
    {
        let span_x = backend.sub(&bounds.x_max, &bounds.x_min)?;
        let span_y = backend.sub(&bounds.y_max, &bounds.y_min)?;
        let x_pos = backend.add(
            &bounds.x_min,
            &backend.div_dim(&backend.scale(&span_x, f64::from(px))?, width)?,
        )?;
        let y_pos = backend.add(
            &bounds.y_min,
            &backend.div_dim(&backend.scale(&span_y, f64::from(py))?, height)?,
        )?;
        let x_ratio = f64::from(px) / f64::from(width);
        let y_ratio = f64::from(py) / f64::from(height);
        let new_span_x = backend.scale(&span_x, factor)?;
        let new_span_y = backend.scale(&span_y, factor)?;
        self.x_origin = backend.sub(&x_pos, &backend.scale(&new_span_x, x_ratio)?)?;
        self.y_origin = backend.sub(&y_pos, &backend.scale(&new_span_y, y_ratio)?)?;
        self.extent = new_span_x;
        Ok(())
    }
}

impl<V: Clone> PlaneBounds<V> {
    /// Plane x-coordinate of every pixel column.
    ///
    /// All columns share one step value, so rows are identical no matter
    /// which worker computes them.
    pub fn column_coords<B>(&self, backend: &B, width: u32) -> Result<Vec<V>>
    where
        B: EscapeBackend<Value = V>,
    {
        let span = backend.sub(&self.x_max, &self.x_min)?;
        let step = backend.div_dim(&span, width)?;
        let mut columns = Vec::with_capacity(width as usize);
        for px in 0..width {
            columns.push(backend.add(&self.x_min, &backend.scale(&step, f64::from(px))?)?);
        }
        Ok(columns)
    }

    /// Plane y-coordinate of pixel row `py`. Row zero maps to `y_min`.
    pub fn row_coord<B>(&self, backend: &B, py: u32, height: u32) -> Result<V>
    where
        B: EscapeBackend<Value = V>,
    {
        let span = backend.sub(&self.y_max, &self.y_min)?;
        let step = backend.div_dim(&span, height)?;
        backend.add(&self.y_min, &backend.scale(&step, f64::from(py))?)
    }

    /// Plane coordinates of an arbitrary pixel, for position readouts.
    pub fn coordinate_at<B>(
        &self,
        backend: &B,
        px: u32,
        py: u32,
        width: u32,
        height: u32,
    ) -> Result<(V, V)>
    where
        B: EscapeBackend<Value = V>,
    {
        let span_x = backend.sub(&self.x_max, &self.x_min)?;
        let x = backend.add(
            &self.x_min,
            &backend.div_dim(&backend.scale(&span_x, f64::from(px))?, width)?,
        )?;
        let span_y = backend.sub(&self.y_max, &self.y_min)?;
        let y = backend.add(
            &self.y_min,
            &backend.div_dim(&backend.scale(&span_y, f64::from(py))?, height)?,
        )?;
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeBackend;

    const W: u32 = 640;
    const H: u32 = 480;

    fn home() -> Viewport<f64> {
        Viewport::new(-2.0, -1.2, 3.0)
    }

    #[test]
    fn bounds_follow_the_aspect_ratio() {
        let backend = NativeBackend::new();
        let bounds = home().bounds(&backend, W, H).unwrap();
        assert_eq!(bounds.x_min, -2.0);
        assert_eq!(bounds.x_max, 1.0);
        assert_eq!(bounds.y_min, -1.2);
        assert!((bounds.y_max - 1.05).abs() < 1e-12);
    }

    #[test]
    fn column_coords_start_at_x_min_and_step_evenly() {
        let backend = NativeBackend::new();
        let bounds = home().bounds(&backend, 4, 4).unwrap();
        let cols = bounds.column_coords(&backend, 4).unwrap();
        assert_eq!(cols.len(), 4);
        assert_eq!(cols[0], -2.0);
        assert!((cols[1] - (-1.25)).abs() < 1e-12);
        assert!((cols[3] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn row_zero_maps_to_y_min() {
        let backend = NativeBackend::new();
        let bounds = home().bounds(&backend, 4, 4).unwrap();
        assert_eq!(bounds.row_coord(&backend, 0, 4).unwrap(), -1.2);
        let row3 = bounds.row_coord(&backend, 3, 4).unwrap();
        assert!((row3 - 1.05).abs() < 1e-12);
    }

    #[test]
    fn pan_moves_the_origin_against_the_drag() {
        let backend = NativeBackend::new();
        let mut viewport = home();
        let bounds = viewport.bounds(&backend, W, H).unwrap();
        viewport.pan(&backend, &bounds, 64, -48, W, H).unwrap();
        // 64 px of a 3.0-wide, 640-px view is 0.3 plane units.
        assert!((viewport.x_origin - (-2.3)).abs() < 1e-12);
        // -48 px of a 2.25-tall, 480-px view is -0.225 plane units.
        assert!((viewport.y_origin - (-0.975)).abs() < 1e-12);
        assert_eq!(viewport.extent, 3.0);
    }

    #[test]
    fn zoom_keeps_the_anchor_point_fixed() {
        let backend = NativeBackend::new();
        let mut viewport = home();
        let bounds = viewport.bounds(&backend, W, H).unwrap();
        let (ax, ay) = bounds.coordinate_at(&backend, 480, 120, W, H).unwrap();
        viewport.zoom_at(&backend, &bounds, 480, 120, 0.8, W, H).unwrap();
        let zoomed = viewport.bounds(&backend, W, H).unwrap();
        let (bx, by) = zoomed.coordinate_at(&backend, 480, 120, W, H).unwrap();
        assert!((ax - bx).abs() < 1e-12, "{ax} vs {bx}");
        assert!((ay - by).abs() < 1e-12, "{ay} vs {by}");
        assert!((viewport.extent - 2.4).abs() < 1e-12);
    }

    #[test]
    fn zoom_round_trip_restores_the_view() {
        let backend = NativeBackend::new();
        let mut viewport = home();
        let bounds = viewport.bounds(&backend, W, H).unwrap();
        viewport.zoom_at(&backend, &bounds, 200, 300, 0.8, W, H).unwrap();
        let bounds = viewport.bounds(&backend, W, H).unwrap();
        viewport.zoom_at(&backend, &bounds, 200, 300, 1.25, W, H).unwrap();
        assert!((viewport.x_origin - (-2.0)).abs() < 1e-9);
        assert!((viewport.y_origin - (-1.2)).abs() < 1e-9);
        assert!((viewport.extent - 3.0).abs() < 1e-9);
    }

    #[test]
    fn decimal_backend_viewport_math_is_exact() {
        use crate::context::PrecisionContext;
        use crate::decimal::DecimalBackend;

        let backend = DecimalBackend::new(PrecisionContext::new(12).unwrap()).unwrap();
        let viewport = Viewport::new(
            backend.from_f64(-2.0).unwrap(),
            backend.from_f64(-1.2).unwrap(),
            backend.from_f64(3.0).unwrap(),
        );
        let bounds = viewport.bounds(&backend, 640, 480).unwrap();
        assert_eq!(bounds.x_max.to_string(), "1");
        assert_eq!(bounds.y_max.to_string(), "1.05");
        let cols = bounds.column_coords(&backend, 640).unwrap();
        assert_eq!(cols[0].to_string(), "-2");
        assert_eq!(cols[639].to_string(), "0.9953125");
    }
}
