//! Precision configuration threaded through decimal arithmetic.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::Result;

/// Default number of significant decimal digits.
pub const DEFAULT_PRECISION: u32 = 10;

/// Immutable precision settings for [`BigDecimal`](crate::BigDecimal)
/// operations.
///
/// Every operation that can grow a mantissa truncates its result back to
/// `precision` significant digits. Digit buffers are provisioned from
/// [`PrecisionContext::capacity`], which leaves enough headroom for the
/// widest intermediate a single operation can produce (a product of two
/// truncated mantissas, plus alignment shifts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrecisionContext {
    precision: u32,
}

impl PrecisionContext {
    /// Creates a context carrying `precision` significant decimal digits.
    pub fn new(precision: u32) -> Result<Self> {
        if precision == 0 {
            return Err(CoreError::InvalidPrecision(precision));
        }
        Ok(PrecisionContext { precision })
    }

    /// Significant decimal digits results are truncated to.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Digit slots to allocate per mantissa.
    ///
    /// Four times the precision, plus room for conversions from `f64`,
    /// which can carry up to nineteen digits before truncation.
    pub fn capacity(&self) -> usize {
        self.precision as usize * 4 + 24
    }
}

impl Default for PrecisionContext {
    fn default() -> Self {
        PrecisionContext {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl<'de> Deserialize<'de> for PrecisionContext {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            precision: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        PrecisionContext::new(raw.precision).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_precision() {
        assert!(matches!(
            PrecisionContext::new(0),
            Err(CoreError::InvalidPrecision(0))
        ));
    }

    #[test]
    fn capacity_leaves_headroom_over_precision() {
        let ctx = PrecisionContext::new(10).unwrap();
        assert!(ctx.capacity() >= 2 * ctx.precision() as usize);
    }

    #[test]
    fn default_is_ten_digits() {
        assert_eq!(PrecisionContext::default().precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn serde_round_trip_preserves_precision() {
        let ctx = PrecisionContext::new(24).unwrap();
        let json = serde_json::to_string(&ctx).unwrap();
        let back: PrecisionContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn serde_rejects_zero_precision() {
        assert!(serde_json::from_str::<PrecisionContext>(r#"{"precision":0}"#).is_err());
    }
}
