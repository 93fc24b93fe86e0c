//! The closed set of escape-time numeric backends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Classification of a single escape-time sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeResult {
    /// The orbit left the bailout circle on the given iteration.
    Escaped { iterations: u32 },
    /// The orbit stayed bounded for the full iteration budget.
    Interior,
}

impl EscapeResult {
    pub fn is_interior(&self) -> bool {
        matches!(self, EscapeResult::Interior)
    }

    /// Iteration count for escaped samples, `None` for interior ones.
    pub fn iterations(&self) -> Option<u32> {
        match self {
            EscapeResult::Escaped { iterations } => Some(*iterations),
            EscapeResult::Interior => None,
        }
    }
}

/// Identifies one of the available numeric backends.
///
/// The set is closed: render paths match on the kind instead of accepting
/// arbitrary implementations from outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hardware `f64`: fastest, limited to roughly fifteen digits.
    Native,
    /// Fixed-capacity truncating decimal arithmetic.
    Decimal,
    /// Binary arbitrary-precision floats from `dashu`.
    BigFloat,
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Decimal => "decimal",
            BackendKind::BigFloat => "bigfloat",
        }
    }
}

/// Arithmetic and iteration kernel for one numeric representation.
///
/// The renderer stays generic over the backend: plane coordinates are kept
/// in [`EscapeBackend::Value`] end to end, so precision is only lost where a
/// backend chooses to lose it. The small arithmetic surface covers exactly
/// what viewport math needs; the per-sample hot loop lives behind
/// [`EscapeBackend::escape`] where each backend specializes it.
pub trait EscapeBackend: Send + Sync + 'static {
    /// Plane coordinate representation.
    type Value: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn kind(&self) -> BackendKind;

    /// Converts a finite `f64` into the backend representation.
    fn from_f64(&self, value: f64) -> Result<Self::Value>;

    /// Best-effort conversion back to `f64`.
    fn to_f64(&self, value: &Self::Value) -> f64;

    fn add(&self, a: &Self::Value, b: &Self::Value) -> Result<Self::Value>;

    fn sub(&self, a: &Self::Value, b: &Self::Value) -> Result<Self::Value>;

    /// Multiplies by a small native factor (pixel offsets, zoom factors).
    fn scale(&self, a: &Self::Value, factor: f64) -> Result<Self::Value>;

    /// Divides by a screen dimension.
    fn div_dim(&self, a: &Self::Value, dim: u32) -> Result<Self::Value>;

    /// Runs the escape iteration `z <- z^2 + c` for `c = (x0, y0)`, with
    /// bailout when `|z|^2` exceeds 4.
    fn escape(&self, x0: &Self::Value, y0: &Self::Value, max_iterations: u32)
        -> Result<EscapeResult>;
}
