//! Binary arbitrary-precision backend on `dashu` floats.

use std::fmt;

use dashu_float::FBig;
use tracing::warn;

use crate::backend::{BackendKind, EscapeBackend, EscapeResult};
use crate::error::CoreError;
use crate::Result;

/// Bits needed to carry `digits` decimal digits (log2 of 10 is about 3.32),
/// with a few guard bits on top.
fn bits_for_digits(digits: u32) -> usize {
    digits as usize * 10 / 3 + 8
}

/// A plane coordinate held as a binary big float pinned to a precision.
#[derive(Debug, Clone)]
pub struct BigFloat {
    value: FBig,
}

impl BigFloat {
    fn from_f64(value: f64, precision: usize) -> Result<Self> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteInput(value));
        }
        let value = match FBig::try_from(value) {
            Ok(v) => v.with_precision(precision).value(),
            Err(_) => {
                // try_from only fails on non-finite input, which the guard
                // above already rejected.
                warn!(value, "finite f64 failed big float conversion");
                FBig::ZERO.with_precision(precision).value()
            }
        };
        Ok(BigFloat { value })
    }

    fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }
}

impl fmt::Display for BigFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render in base ten with about as many significant digits as the
        // binary mantissa carries.
        let digits = (self.value.precision() as f64 * 0.30103).ceil() as usize + 1;
        let decimal = self.value.clone().with_base_and_precision::<10>(digits).value();
        write!(f, "{decimal}")
    }
}

/// Escape-time backend on `dashu` arbitrary-precision binary floats.
///
/// The orbit update runs at the configured precision while the bailout test
/// measures the orbit with a native-double approximation; a double is plenty
/// to detect `|z|` passing 2.
#[derive(Debug, Clone)]
pub struct BigFloatBackend {
    precision: usize,
}

impl BigFloatBackend {
    /// Creates a backend computing with `precision` bits. Values below 16
    /// are bumped up: `dashu` treats zero precision as unlimited, which
    /// would let mantissas grow without bound over an orbit.
    pub fn new(precision: usize) -> Self {
        BigFloatBackend {
            precision: precision.max(16),
        }
    }

    /// Sizes the binary precision to carry `digits` significant decimal
    /// digits.
    pub fn with_decimal_digits(digits: u32) -> Self {
        BigFloatBackend::new(bits_for_digits(digits))
    }

    pub fn precision(&self) -> usize {
        self.precision
    }
}

impl EscapeBackend for BigFloatBackend {
    type Value = BigFloat;

    fn kind(&self) -> BackendKind {
        BackendKind::BigFloat
    }

    fn from_f64(&self, value: f64) -> Result<BigFloat> {
        BigFloat::from_f64(value, self.precision)
    }

    fn to_f64(&self, value: &BigFloat) -> f64 {
        value.to_f64()
    }

    fn add(&self, a: &BigFloat, b: &BigFloat) -> Result<BigFloat> {
        Ok(BigFloat {
            value: &a.value + &b.value,
        })
    }

    fn sub(&self, a: &BigFloat, b: &BigFloat) -> Result<BigFloat> {
        Ok(BigFloat {
            value: &a.value - &b.value,
        })
    }

    fn scale(&self, a: &BigFloat, factor: f64) -> Result<BigFloat> {
        let factor = BigFloat::from_f64(factor, self.precision)?;
        Ok(BigFloat {
            value: &a.value * &factor.value,
        })
    }

    fn div_dim(&self, a: &BigFloat, dim: u32) -> Result<BigFloat> {
        if dim == 0 {
            return Err(CoreError::DivisionByZero);
        }
        let dim = BigFloat::from_f64(f64::from(dim), self.precision)?;
        Ok(BigFloat {
            value: &a.value / &dim.value,
        })
    }

    fn escape(
        &self,
        x0: &BigFloat,
        y0: &BigFloat,
        max_iterations: u32,
    ) -> Result<EscapeResult> {
        let mut x = FBig::ZERO.with_precision(self.precision).value();
        let mut y = x.clone();
        for n in 0..max_iterations {
            let xx = &x * &x;
            let yy = &y * &y;
            let xy = &x * &y;
            let twice = &xy + &xy;
            y = twice + &y0.value;
            x = &xx - &yy + &x0.value;
            let xf = x.to_f64().value();
            let yf = y.to_f64().value();
            if xf * xf + yf * yf > 4.0 {
                return Ok(EscapeResult::Escaped { iterations: n });
            }
        }
        Ok(EscapeResult::Interior)
    }
}
