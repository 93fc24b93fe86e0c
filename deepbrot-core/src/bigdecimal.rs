//! Truncating decimal floating point built on [`BigInt`].

use std::cmp::Ordering;
use std::fmt;

use crate::bigint::BigInt;
use crate::context::PrecisionContext;
use crate::error::CoreError;
use crate::Result;

/// A decimal floating-point value: `mantissa * 10^exponent`.
///
/// All arithmetic goes through a [`PrecisionContext`]. Results are truncated
/// back to the context precision so mantissas stay bounded across long
/// iteration chains; truncation drops low-order digits toward zero, it never
/// rounds. Operations return fresh values and leave both operands untouched.
#[derive(Debug, Clone)]
pub struct BigDecimal {
    mantissa: BigInt,
    exponent: i32,
}

// ---------------------------------------------------------------------------
// Construction and conversion
// ---------------------------------------------------------------------------

impl BigDecimal {
    /// Zero at exponent zero.
    pub fn zero(ctx: &PrecisionContext) -> Self {
        BigDecimal {
            mantissa: BigInt::with_capacity(ctx.capacity()),
            exponent: 0,
        }
    }

    pub fn from_i64(value: i64, ctx: &PrecisionContext) -> Result<Self> {
        let mut out = BigDecimal {
            mantissa: BigInt::from_i64(value, ctx.capacity())?,
            exponent: 0,
        };
        out.truncate(ctx);
        Ok(out)
    }

    /// Converts an `f64`, capturing the decimal digits the binary value can
    /// actually carry before truncating to the context precision.
    pub fn from_f64(value: f64, ctx: &PrecisionContext) -> Result<Self> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteInput(value));
        }
        let mut exponent = 0i32;
        let mut scaled = value;
        // Shed magnitude that cannot hold significant digits.
        while scaled.abs() >= 9.0e17 {
            scaled /= 10.0;
            exponent += 1;
        }
        // Scale fractional values up until the digits are integral. Past
        // 2^53 every f64 is an integer, so this terminates on its own; the
        // magnitude guard keeps the result inside i64 range regardless.
        while scaled.fract() != 0.0 && scaled.abs() < 9.0e16 {
            scaled *= 10.0;
            exponent -= 1;
        }
        let mut out = BigDecimal {
            mantissa: BigInt::from_i64(scaled.trunc() as i64, ctx.capacity())?,
            exponent,
        };
        out.truncate(ctx);
        Ok(out)
    }

    /// Best-effort conversion back to `f64`.
    pub fn to_f64(&self) -> f64 {
        let mut acc = 0.0f64;
        for i in (0..self.mantissa.num_digits()).rev() {
            acc = acc * 10.0 + f64::from(self.mantissa.digit(i));
        }
        if self.mantissa.sign() < 0 {
            acc = -acc;
        }
        acc * 10f64.powi(self.exponent)
    }

    /// Number of significant digits currently in the mantissa.
    pub fn mantissa_digits(&self) -> usize {
        self.mantissa.num_digits()
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// `+1` for positive values and zero, `-1` for negative values.
    pub fn sign(&self) -> i8 {
        self.mantissa.sign()
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

impl BigDecimal {
    pub fn add(&self, rhs: &Self, ctx: &PrecisionContext) -> Result<Self> {
        self.combine(rhs, false, ctx)
    }

    pub fn sub(&self, rhs: &Self, ctx: &PrecisionContext) -> Result<Self> {
        self.combine(rhs, true, ctx)
    }

    pub fn mul(&self, rhs: &Self, ctx: &PrecisionContext) -> Result<Self> {
        let mut out = self.clone();
        out.mantissa.mul_assign(&rhs.mantissa)?;
        out.exponent += rhs.exponent;
        out.truncate(ctx);
        Ok(out)
    }

    /// Truncating division.
    ///
    /// The dividend mantissa is padded with enough zeros that the integer
    /// quotient carries the context precision, then the exponent absorbs the
    /// padding.
    pub fn div(&self, rhs: &Self, ctx: &PrecisionContext) -> Result<Self> {
        if rhs.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        let mut out = self.clone();
        if out.is_zero() {
            return Ok(out);
        }
        let precision = i64::from(ctx.precision());
        let digit_gap = out.mantissa.num_digits() as i64 - rhs.mantissa.num_digits() as i64;
        let padding = (precision - digit_gap).max(0) as usize;
        out.mantissa.mul_by_pow10(padding)?;
        out.mantissa.div_assign(&rhs.mantissa)?;
        out.exponent -= rhs.exponent + padding as i32;
        out.truncate(ctx);
        Ok(out)
    }

    /// Returns the negation.
    pub fn neg(&self) -> Self {
        let mut out = self.clone();
        out.mantissa.negate();
        out
    }

    /// Truncates the mantissa to the context precision, shifting the dropped
    /// digits into the exponent. Truncation is toward zero.
    pub fn truncate(&mut self, ctx: &PrecisionContext) {
        let precision = ctx.precision() as usize;
        if self.mantissa.num_digits() > precision {
            let excess = self.mantissa.num_digits() - precision;
            self.mantissa.div_by_pow10(excess);
            self.exponent += excess as i32;
        }
    }

    /// Strips trailing zero digits from the mantissa into the exponent.
    /// The value is unchanged; this only tidies the representation for
    /// display. Zero resets to exponent zero.
    pub fn normalize(&mut self) {
        if self.mantissa.is_zero() {
            self.exponent = 0;
            return;
        }
        while self.mantissa.digit(0) == 0 {
            self.mantissa.div_by_pow10(1);
            self.exponent += 1;
        }
    }

    // Shared add/sub path. Operands are cloned and the clone with the larger
    // exponent is shifted down to align; the originals are never mutated.
    fn combine(&self, rhs: &Self, subtract: bool, ctx: &PrecisionContext) -> Result<Self> {
        let mut a = self.clone();
        let mut b = rhs.clone();
        if subtract {
            b.mantissa.negate();
        }
        if a.exponent > b.exponent {
            a.mantissa.mul_by_pow10((a.exponent - b.exponent) as usize)?;
            a.exponent = b.exponent;
        } else if b.exponent > a.exponent {
            b.mantissa.mul_by_pow10((b.exponent - a.exponent) as usize)?;
            b.exponent = a.exponent;
        }
        a.mantissa.add_assign(&b.mantissa)?;
        a.truncate(ctx);
        Ok(a)
    }

    fn cmp_value(&self, rhs: &Self) -> Ordering {
        match (self.is_zero(), rhs.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => {
                return if rhs.sign() > 0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                return if self.sign() > 0 {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => {}
        }
        if self.sign() != rhs.sign() {
            return if self.sign() > rhs.sign() {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        // Compare by the position of the leading digit first; only values
        // with the same magnitude order need digit-by-digit alignment.
        let self_order = i64::from(self.exponent) + self.mantissa.num_digits() as i64;
        let rhs_order = i64::from(rhs.exponent) + rhs.mantissa.num_digits() as i64;
        let magnitude = match self_order.cmp(&rhs_order) {
            Ordering::Equal => {
                if self.exponent >= rhs.exponent {
                    self.mantissa
                        .cmp_magnitude_shifted((self.exponent - rhs.exponent) as usize, &rhs.mantissa)
                } else {
                    rhs.mantissa
                        .cmp_magnitude_shifted((rhs.exponent - self.exponent) as usize, &self.mantissa)
                        .reverse()
                }
            }
            other => other,
        };
        if self.sign() > 0 {
            magnitude
        } else {
            magnitude.reverse()
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison and formatting
// ---------------------------------------------------------------------------

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_value(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.clone();
        value.normalize();
        if value.sign() < 0 {
            f.write_str("-")?;
        }
        let digits: Vec<u8> = (0..value.mantissa.num_digits())
            .rev()
            .map(|i| value.mantissa.digit(i))
            .collect();
        if value.exponent >= 0 {
            for d in &digits {
                write!(f, "{d}")?;
            }
            for _ in 0..value.exponent {
                f.write_str("0")?;
            }
            return Ok(());
        }
        let point = digits.len() as i32 + value.exponent;
        if point > 0 {
            for d in &digits[..point as usize] {
                write!(f, "{d}")?;
            }
            f.write_str(".")?;
            for d in &digits[point as usize..] {
                write!(f, "{d}")?;
            }
        } else {
            f.write_str("0.")?;
            for _ in 0..-point {
                f.write_str("0")?;
            }
            for d in &digits {
                write!(f, "{d}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
