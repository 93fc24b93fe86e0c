//! Escape iteration on truncating decimal arithmetic.

use crate::backend::{BackendKind, EscapeBackend, EscapeResult};
use crate::bigdecimal::BigDecimal;
use crate::context::PrecisionContext;
use crate::Result;

/// Escape-time backend running every operation through [`BigDecimal`].
///
/// The iteration matches the native loop term for term: squares carry over
/// between iterations and `2xy` is formed by doubling, so one pass costs two
/// full multiplications plus additions. Every intermediate truncates to the
/// context precision.
#[derive(Debug, Clone)]
pub struct DecimalBackend {
    ctx: PrecisionContext,
    four: BigDecimal,
}

impl DecimalBackend {
    pub fn new(ctx: PrecisionContext) -> Result<Self> {
        let four = BigDecimal::from_i64(4, &ctx)?;
        Ok(DecimalBackend { ctx, four })
    }

    pub fn context(&self) -> &PrecisionContext {
        &self.ctx
    }
}

impl EscapeBackend for DecimalBackend {
    type Value = BigDecimal;

    fn kind(&self) -> BackendKind {
        BackendKind::Decimal
    }

    fn from_f64(&self, value: f64) -> Result<BigDecimal> {
        BigDecimal::from_f64(value, &self.ctx)
    }

    fn to_f64(&self, value: &BigDecimal) -> f64 {
        value.to_f64()
    }

    fn add(&self, a: &BigDecimal, b: &BigDecimal) -> Result<BigDecimal> {
        a.add(b, &self.ctx)
    }

    fn sub(&self, a: &BigDecimal, b: &BigDecimal) -> Result<BigDecimal> {
        a.sub(b, &self.ctx)
    }

    fn scale(&self, a: &BigDecimal, factor: f64) -> Result<BigDecimal> {
        let factor = BigDecimal::from_f64(factor, &self.ctx)?;
        a.mul(&factor, &self.ctx)
    }

    fn div_dim(&self, a: &BigDecimal, dim: u32) -> Result<BigDecimal> {
        let dim = BigDecimal::from_i64(i64::from(dim), &self.ctx)?;
        a.div(&dim, &self.ctx)
    }

    fn escape(
        &self,
        x0: &BigDecimal,
        y0: &BigDecimal,
        max_iterations: u32,
    ) -> Result<EscapeResult> {
        let ctx = &self.ctx;
        let mut x = BigDecimal::zero(ctx);
        let mut y = BigDecimal::zero(ctx);
        let mut xsq = BigDecimal::zero(ctx);
        let mut ysq = BigDecimal::zero(ctx);
        for n in 0..max_iterations {
            let xy = x.mul(&y, ctx)?;
            y = xy.add(&xy, ctx)?.add(y0, ctx)?;
            x = xsq.sub(&ysq, ctx)?.add(x0, ctx)?;
            xsq = x.mul(&x, ctx)?;
            ysq = y.mul(&y, ctx)?;
            if xsq.add(&ysq, ctx)? > self.four {
                return Ok(EscapeResult::Escaped { iterations: n });
            }
        }
        Ok(EscapeResult::Interior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeBackend;
    use crate::CoreError;

    fn backend() -> DecimalBackend {
        DecimalBackend::new(PrecisionContext::new(12).unwrap()).unwrap()
    }

    fn escape(x: f64, y: f64, max: u32) -> EscapeResult {
        let b = backend();
        let x0 = b.from_f64(x).unwrap();
        let y0 = b.from_f64(y).unwrap();
        b.escape(&x0, &y0, max).unwrap()
    }

    #[test]
    fn origin_is_interior() {
        assert!(escape(0.0, 0.0, 200).is_interior());
    }

    #[test]
    fn known_escape_count_at_c_equals_one() {
        assert_eq!(escape(1.0, 0.0, 100), EscapeResult::Escaped { iterations: 2 });
    }

    #[test]
    fn far_exterior_point_escapes_immediately() {
        assert_eq!(escape(3.0, 2.0, 100), EscapeResult::Escaped { iterations: 0 });
    }

    #[test]
    fn agrees_with_native_away_from_the_boundary() {
        let decimal = backend();
        let native = NativeBackend::new();
        let points = [
            (0.5, 0.5),
            (0.3, 0.0),
            (0.0, 1.5),
            (-1.8, 0.0),
            (-0.2, -0.2),
        ];
        for (px, py) in points {
            let x0 = decimal.from_f64(px).unwrap();
            let y0 = decimal.from_f64(py).unwrap();
            let d = decimal.escape(&x0, &y0, 64).unwrap();
            let n = native.escape(&px, &py, 64).unwrap();
            assert_eq!(d, n, "({px}, {py})");
        }
    }

    #[test]
    fn low_precision_still_classifies_gross_geometry() {
        let b = DecimalBackend::new(PrecisionContext::new(5).unwrap()).unwrap();
        let x0 = b.from_f64(0.5).unwrap();
        let y0 = b.from_f64(0.5).unwrap();
        assert!(!b.escape(&x0, &y0, 64).unwrap().is_interior());
        let zero = b.from_f64(0.0).unwrap();
        assert!(b.escape(&zero, &zero, 64).unwrap().is_interior());
    }

    #[test]
    fn scale_by_pixel_offsets_is_exact() {
        let b = backend();
        let step = b.from_f64(0.25).unwrap();
        assert_eq!(b.scale(&step, 3.0).unwrap().to_string(), "0.75");
    }

    #[test]
    fn div_dim_by_zero_errors() {
        let b = backend();
        let v = b.from_f64(1.0).unwrap();
        assert!(matches!(b.div_dim(&v, 0), Err(CoreError::DivisionByZero)));
        assert_eq!(b.kind(), BackendKind::Decimal);
    }
}
