//! Hardware double-precision backend.

use crate::backend::{BackendKind, EscapeBackend, EscapeResult};
use crate::error::CoreError;
use crate::Result;

// Points whose orbit returns this close to a previously saved point are
// treated as periodic, hence interior.
const PERIODICITY_EPS: f64 = 1e-14;

/// Escape iteration on plain `f64`.
///
/// The fast path for shallow zooms; once pixel spans approach `1e-15` the
/// coordinate grid collapses into single values and the arbitrary-precision
/// backends take over.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        NativeBackend
    }
}

/// Main cardioid membership test; these points never escape.
fn in_cardioid(x: f64, y: f64) -> bool {
    let q = (x - 0.25) * (x - 0.25) + y * y;
    q * (q + (x - 0.25)) <= 0.25 * y * y
}

/// Period-2 bulb membership test (the disk of radius 1/4 around -1).
fn in_period2_bulb(x: f64, y: f64) -> bool {
    (x + 1.0) * (x + 1.0) + y * y <= 0.0625
}

impl EscapeBackend for NativeBackend {
    type Value = f64;

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn from_f64(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteInput(value));
        }
        Ok(value)
    }

    fn to_f64(&self, value: &f64) -> f64 {
        *value
    }

    fn add(&self, a: &f64, b: &f64) -> Result<f64> {
        Ok(a + b)
    }

    fn sub(&self, a: &f64, b: &f64) -> Result<f64> {
        Ok(a - b)
    }

    fn scale(&self, a: &f64, factor: f64) -> Result<f64> {
        Ok(a * factor)
    }

    fn div_dim(&self, a: &f64, dim: u32) -> Result<f64> {
        if dim == 0 {
            return Err(CoreError::DivisionByZero);
        }
        Ok(a / f64::from(dim))
    }

    fn escape(&self, x0: &f64, y0: &f64, max_iterations: u32) -> Result<EscapeResult> {
        let (x0, y0) = (*x0, *y0);
        if in_cardioid(x0, y0) || in_period2_bulb(x0, y0) {
            return Ok(EscapeResult::Interior);
        }
        let mut x = 0.0f64;
        let mut y = 0.0f64;
        let mut xsq = 0.0f64;
        let mut ysq = 0.0f64;
        // Periodicity probe: remember one orbit point and double the
        // comparison window each time it is refreshed.
        let mut saved_x = 0.0f64;
        let mut saved_y = 0.0f64;
        let mut next_save = 8u32;
        for n in 0..max_iterations {
            y = 2.0 * x * y + y0;
            x = xsq - ysq + x0;
            xsq = x * x;
            ysq = y * y;
            if xsq + ysq > 4.0 {
                return Ok(EscapeResult::Escaped { iterations: n });
            }
            if (x - saved_x).abs() < PERIODICITY_EPS && (y - saved_y).abs() < PERIODICITY_EPS {
                return Ok(EscapeResult::Interior);
            }
            if n == next_save {
                saved_x = x;
                saved_y = y;
                next_save = next_save.saturating_mul(2);
            }
        }
        Ok(EscapeResult::Interior)
    }
}
