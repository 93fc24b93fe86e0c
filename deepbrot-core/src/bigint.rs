//! Fixed-capacity sign-magnitude decimal integers.
//!
//! [`BigInt`] stores base-10 digits little-endian in a buffer whose size is
//! chosen at construction and never grows. Operations that would need more
//! digits than the buffer holds fail with
//! [`CoreError::CapacityExceeded`](crate::CoreError::CapacityExceeded) before
//! touching the operand, so a failed operation never leaves a value
//! half-written. The digit-at-a-time algorithms (schoolbook multiplication,
//! trial-digit long division) follow the pencil-and-paper forms.

use std::cmp::Ordering;
use std::fmt;

use crate::error::CoreError;
use crate::Result;

/// A signed integer with a fixed number of base-10 digit slots.
///
/// Digits are stored least significant first. `num_digits` counts the
/// significant digits and every slot at or above it holds zero. Zero has a
/// single canonical form: positive sign, one significant digit of value zero.
#[derive(Debug, Clone)]
pub struct BigInt {
    sign: i8,
    digits: Vec<u8>,
    num_digits: usize,
    // Scratch rows used by `mul_assign`; never part of the value.
    mul_row: Vec<u8>,
    mul_acc: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Construction and inspection
// ---------------------------------------------------------------------------

impl BigInt {
    /// Creates a zero with room for `capacity` decimal digits.
    ///
    /// Capacities below one are bumped to one so that zero stays
    /// representable.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        BigInt {
            sign: 1,
            digits: vec![0; capacity],
            num_digits: 1,
            mul_row: vec![0; capacity],
            mul_acc: vec![0; capacity],
        }
    }

    /// Converts `value`, failing if its decimal digits do not fit.
    pub fn from_i64(value: i64, capacity: usize) -> Result<Self> {
        let mut out = BigInt::with_capacity(capacity);
        let mut magnitude = value.unsigned_abs();
        if magnitude == 0 {
            return Ok(out);
        }
        let mut required = 0usize;
        let mut probe = magnitude;
        while probe > 0 {
            required += 1;
            probe /= 10;
        }
        if required > out.digits.len() {
            return Err(CoreError::CapacityExceeded {
                required,
                capacity: out.digits.len(),
            });
        }
        let mut i = 0;
        while magnitude > 0 {
            out.digits[i] = (magnitude % 10) as u8;
            magnitude /= 10;
            i += 1;
        }
        out.num_digits = i;
        out.sign = if value < 0 { -1 } else { 1 };
        Ok(out)
    }

    /// Number of digit slots allocated for this value.
    pub fn capacity(&self) -> usize {
        self.digits.len()
    }

    /// Number of significant digits. Zero counts as one digit.
    pub fn num_digits(&self) -> usize {
        self.num_digits
    }

    /// Digit at position `i`, with the units digit at position zero.
    /// Positions past the significant digits read as zero.
    pub fn digit(&self, i: usize) -> u8 {
        if i < self.num_digits {
            self.digits[i]
        } else {
            0
        }
    }

    /// `+1` for positive values and zero, `-1` for negative values.
    pub fn sign(&self) -> i8 {
        self.sign
    }

    pub fn is_zero(&self) -> bool {
        self.num_digits == 1 && self.digits[0] == 0
    }

    /// Resets to canonical zero without changing capacity.
    pub fn set_zero(&mut self) {
        self.digits.fill(0);
        self.num_digits = 1;
        self.sign = 1;
    }

    /// Flips the sign. Zero stays positive.
    pub fn negate(&mut self) {
        if !self.is_zero() {
            self.sign = -self.sign;
        }
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

impl BigInt {
    /// `self += rhs`. Fails without modifying `self` if the sum could need
    /// more digits than the capacity holds.
    pub fn add_assign(&mut self, rhs: &BigInt) -> Result<()> {
        self.add_with_sign(rhs, rhs.sign)
    }

    /// `self -= rhs`, with the same capacity rule as [`BigInt::add_assign`].
    pub fn sub_assign(&mut self, rhs: &BigInt) -> Result<()> {
        self.add_with_sign(rhs, -rhs.sign)
    }

    /// `self *= rhs` by schoolbook convolution over decimal digits.
    ///
    /// The product of an `n`-digit and an `m`-digit value needs at most
    /// `n + m` digits; the operation fails up front when that bound exceeds
    /// the capacity.
    pub fn mul_assign(&mut self, rhs: &BigInt) -> Result<()> {
        if self.is_zero() || rhs.is_zero() {
            self.set_zero();
            return Ok(());
        }
        let required = self.num_digits + rhs.num_digits;
        if required > self.digits.len() {
            return Err(CoreError::CapacityExceeded {
                required,
                capacity: self.digits.len(),
            });
        }
        self.mul_acc[..required].fill(0);
        for j in 0..rhs.num_digits {
            let factor = rhs.digits[j] as u16;
            if factor == 0 {
                continue;
            }
            // One row of the product: self scaled by a single digit.
            let mut carry = 0u16;
            let mut row_len = self.num_digits;
            for i in 0..self.num_digits {
                let p = self.digits[i] as u16 * factor + carry;
                self.mul_row[i] = (p % 10) as u8;
                carry = p / 10;
            }
            if carry > 0 {
                self.mul_row[row_len] = carry as u8;
                row_len += 1;
            }
            // Fold the row into the accumulator, shifted j places up.
            let mut carry = 0u8;
            for i in 0..row_len {
                let sum = self.mul_acc[i + j] + self.mul_row[i] + carry;
                self.mul_acc[i + j] = sum % 10;
                carry = sum / 10;
            }
            let mut k = j + row_len;
            while carry > 0 {
                let sum = self.mul_acc[k] + carry;
                self.mul_acc[k] = sum % 10;
                carry = sum / 10;
                k += 1;
            }
        }
        self.digits[..required].copy_from_slice(&self.mul_acc[..required]);
        self.num_digits = required;
        self.trim();
        self.sign *= rhs.sign;
        Ok(())
    }

    /// `self /= rhs`, truncating toward zero.
    ///
    /// Trial-digit long division: for each output position the shifted
    /// divisor is scaled by candidate digits `1..=9` and the largest product
    /// still at or below the remainder is subtracted off.
    pub fn div_assign(&mut self, rhs: &BigInt) -> Result<()> {
        if rhs.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(());
        }
        if self.cmp_magnitude(rhs) == Ordering::Less {
            self.set_zero();
            return Ok(());
        }
        let result_sign = self.sign * rhs.sign;
        let shift = self.num_digits - rhs.num_digits;
        let mut step = BigInt::with_capacity(self.digits.len());
        step.copy_magnitude_from(rhs)?;
        step.mul_by_pow10(shift)?;
        // The trial product can run one digit past the dividend.
        let mut product = BigInt::with_capacity(self.digits.len() + 1);
        let mut quotient = BigInt::with_capacity(self.digits.len());
        self.sign = 1;
        for _ in 0..=shift {
            let mut digit = 0u8;
            for candidate in 1..=9u8 {
                product.copy_scaled_from(&step, candidate)?;
                if product.cmp_magnitude(self) == Ordering::Greater {
                    break;
                }
                digit = candidate;
            }
            if digit > 0 {
                product.copy_scaled_from(&step, digit)?;
                self.unchecked_sub(&product);
            }
            quotient.push_low_digit(digit)?;
            step.div_by_pow10(1);
        }
        self.copy_magnitude_from(&quotient)?;
        self.sign = if self.is_zero() { 1 } else { result_sign };
        Ok(())
    }

    /// Multiplies by `10^count` by shifting digits toward the most
    /// significant slots. Zero is unaffected.
    pub fn mul_by_pow10(&mut self, count: usize) -> Result<()> {
        if count == 0 || self.is_zero() {
            return Ok(());
        }
        let required = self.num_digits + count;
        if required > self.digits.len() {
            return Err(CoreError::CapacityExceeded {
                required,
                capacity: self.digits.len(),
            });
        }
        for i in (0..self.num_digits).rev() {
            self.digits[i + count] = self.digits[i];
        }
        self.digits[..count].fill(0);
        self.num_digits = required;
        Ok(())
    }

    /// Divides by `10^count`, truncating toward zero. Shifting out every
    /// digit leaves canonical zero.
    pub fn div_by_pow10(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if count >= self.num_digits {
            self.set_zero();
            return;
        }
        let remaining = self.num_digits - count;
        for i in 0..remaining {
            self.digits[i] = self.digits[i + count];
        }
        self.digits[remaining..self.num_digits].fill(0);
        self.num_digits = remaining;
    }

    fn add_with_sign(&mut self, rhs: &BigInt, rhs_sign: i8) -> Result<()> {
        if rhs.is_zero() {
            return Ok(());
        }
        if self.sign == rhs_sign {
            let required = self.num_digits.max(rhs.num_digits) + 1;
            if required > self.digits.len() {
                return Err(CoreError::CapacityExceeded {
                    required,
                    capacity: self.digits.len(),
                });
            }
            self.unchecked_add(rhs);
            return Ok(());
        }
        match self.cmp_magnitude(rhs) {
            Ordering::Equal => self.set_zero(),
            Ordering::Greater => self.unchecked_sub(rhs),
            Ordering::Less => {
                if rhs.num_digits > self.digits.len() {
                    return Err(CoreError::CapacityExceeded {
                        required: rhs.num_digits,
                        capacity: self.digits.len(),
                    });
                }
                self.unchecked_rsub(rhs);
                self.sign = rhs_sign;
            }
        }
        Ok(())
    }

    // Magnitude addition; the caller has already checked capacity.
    fn unchecked_add(&mut self, rhs: &BigInt) {
        let n = self.num_digits.max(rhs.num_digits);
        let mut carry = 0u8;
        for i in 0..n {
            let sum = self.digit(i) + rhs.digit(i) + carry;
            self.digits[i] = sum % 10;
            carry = sum / 10;
        }
        if carry > 0 {
            self.digits[n] = carry;
            self.num_digits = n + 1;
        } else {
            self.num_digits = n;
        }
    }

    // Magnitude subtraction, requires |self| >= |rhs|.
    fn unchecked_sub(&mut self, rhs: &BigInt) {
        let mut borrow = 0i8;
        for i in 0..self.num_digits {
            let mut diff = self.digits[i] as i8 - rhs.digit(i) as i8 - borrow;
            if diff < 0 {
                diff += 10;
                borrow = 1;
            } else {
                borrow = 0;
            }
            self.digits[i] = diff as u8;
        }
        self.trim();
    }

    // Reverse magnitude subtraction: self <- rhs - self, requires
    // |rhs| >= |self|.
    fn unchecked_rsub(&mut self, rhs: &BigInt) {
        let mut borrow = 0i8;
        for i in 0..rhs.num_digits {
            let mut diff = rhs.digits[i] as i8 - self.digit(i) as i8 - borrow;
            if diff < 0 {
                diff += 10;
                borrow = 1;
            } else {
                borrow = 0;
            }
            self.digits[i] = diff as u8;
        }
        self.num_digits = rhs.num_digits;
        self.trim();
    }

    fn trim(&mut self) {
        while self.num_digits > 1 && self.digits[self.num_digits - 1] == 0 {
            self.num_digits -= 1;
        }
    }

    // self <- |src| * factor, for factor in 1..=9.
    fn copy_scaled_from(&mut self, src: &BigInt, factor: u8) -> Result<()> {
        let required = src.num_digits + 1;
        if required > self.digits.len() {
            return Err(CoreError::CapacityExceeded {
                required,
                capacity: self.digits.len(),
            });
        }
        self.digits.fill(0);
        let mut carry = 0u16;
        for i in 0..src.num_digits {
            let p = src.digits[i] as u16 * factor as u16 + carry;
            self.digits[i] = (p % 10) as u8;
            carry = p / 10;
        }
        let mut len = src.num_digits;
        if carry > 0 {
            self.digits[len] = carry as u8;
            len += 1;
        }
        self.num_digits = len;
        self.sign = 1;
        Ok(())
    }

    // Copies the digits of `src`, keeping our own capacity and sign.
    fn copy_magnitude_from(&mut self, src: &BigInt) -> Result<()> {
        if src.num_digits > self.digits.len() {
            return Err(CoreError::CapacityExceeded {
                required: src.num_digits,
                capacity: self.digits.len(),
            });
        }
        self.digits.fill(0);
        self.digits[..src.num_digits].copy_from_slice(&src.digits[..src.num_digits]);
        self.num_digits = src.num_digits;
        Ok(())
    }

    // Appends one decimal digit at the least significant position.
    fn push_low_digit(&mut self, digit: u8) -> Result<()> {
        self.mul_by_pow10(1)?;
        self.digits[0] = digit;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Comparison and formatting
// ---------------------------------------------------------------------------

impl BigInt {
    /// Compares absolute values, ignoring signs.
    pub fn cmp_magnitude(&self, rhs: &BigInt) -> Ordering {
        self.cmp_magnitude_shifted(0, rhs)
    }

    /// Compares `|self| * 10^shift` against `|rhs|` without materializing
    /// the shifted value.
    pub fn cmp_magnitude_shifted(&self, shift: usize, rhs: &BigInt) -> Ordering {
        match (self.is_zero(), rhs.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        let self_top = self.num_digits + shift;
        match self_top.cmp(&rhs.num_digits) {
            Ordering::Equal => {}
            other => return other,
        }
        for pos in (0..rhs.num_digits).rev() {
            let a = if pos >= shift { self.digits[pos - shift] } else { 0 };
            let b = rhs.digits[pos];
            match a.cmp(&b) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.sign, other.sign) {
            (1, -1) => Ordering::Greater,
            (-1, 1) => Ordering::Less,
            (-1, -1) => self.cmp_magnitude(other).reverse(),
            _ => self.cmp_magnitude(other),
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign < 0 {
            f.write_str("-")?;
        }
        for i in (0..self.num_digits).rev() {
            write!(f, "{}", self.digits[i])?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: usize = 16;

    fn big(v: i64) -> BigInt {
        BigInt::from_i64(v, CAP).unwrap()
    }

    // -- Construction --

    #[test]
    fn zero_is_canonical() {
        let z = BigInt::with_capacity(CAP);
        assert!(z.is_zero());
        assert_eq!(z.sign(), 1);
        assert_eq!(z.num_digits(), 1);
        assert_eq!(z.to_string(), "0");
    }

    #[test]
    fn from_i64_round_trips_through_display() {
        for v in [0, 1, -1, 9, 10, -10, 123, -4567, 999_999_999, i64::from(i32::MAX)] {
            assert_eq!(big(v).to_string(), v.to_string());
        }
    }

    #[test]
    fn from_i64_rejects_values_wider_than_capacity() {
        let err = BigInt::from_i64(12_345, 4).unwrap_err();
        assert!(matches!(
            err,
            CoreError::CapacityExceeded { required: 5, capacity: 4 }
        ));
    }

    #[test]
    fn negating_zero_keeps_it_positive() {
        let mut z = big(0);
        z.negate();
        assert_eq!(z.sign(), 1);
    }

    // -- Addition and subtraction --

    #[test]
    fn add_and_sub_match_i64_for_small_values() {
        for a in -40..=40i64 {
            for b in -40..=40i64 {
                let mut sum = big(a);
                sum.add_assign(&big(b)).unwrap();
                assert_eq!(sum, big(a + b), "{a} + {b}");
                let mut diff = big(a);
                diff.sub_assign(&big(b)).unwrap();
                assert_eq!(diff, big(a - b), "{a} - {b}");
            }
        }
    }

    #[test]
    fn add_carries_across_every_digit() {
        let mut v = big(123);
        v.add_assign(&big(877)).unwrap();
        assert_eq!(v, big(1000));
        assert_eq!(v.num_digits(), 4);
    }

    #[test]
    fn sub_to_exact_zero_is_canonical() {
        let mut v = big(-555);
        v.add_assign(&big(555)).unwrap();
        assert!(v.is_zero());
        assert_eq!(v.sign(), 1);
    }

    #[test]
    fn add_on_full_buffer_fails_and_leaves_value_intact() {
        let mut v = BigInt::from_i64(999_999, 6).unwrap();
        let err = v.add_assign(&BigInt::from_i64(1, 6).unwrap()).unwrap_err();
        assert!(matches!(err, CoreError::CapacityExceeded { .. }));
        assert_eq!(v, BigInt::from_i64(999_999, 6).unwrap());
    }

    // -- Multiplication --

    #[test]
    fn mul_matches_i64_for_small_values() {
        for a in -30..=30i64 {
            for b in -30..=30i64 {
                let mut product = big(a);
                product.mul_assign(&big(b)).unwrap();
                assert_eq!(product, big(a * b), "{a} * {b}");
            }
        }
    }

    #[test]
    fn mul_handles_multi_digit_carries() {
        let mut v = big(9999);
        v.mul_assign(&big(9999)).unwrap();
        assert_eq!(v, big(99_980_001));
    }

    #[test]
    fn mul_by_zero_collapses_to_canonical_zero() {
        let mut v = big(-1234);
        v.mul_assign(&big(0)).unwrap();
        assert!(v.is_zero());
        assert_eq!(v.sign(), 1);
    }

    #[test]
    fn mul_rejects_products_beyond_capacity() {
        let mut v = BigInt::from_i64(1_000, 6).unwrap();
        let err = v.mul_assign(&BigInt::from_i64(1_000, 6).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::CapacityExceeded { required: 8, capacity: 6 }
        ));
        assert_eq!(v, BigInt::from_i64(1_000, 6).unwrap());
    }

    // -- Division --

    #[test]
    fn div_matches_i64_truncation() {
        let cases = [
            (100_000, 7),
            (1_000, 8),
            (81, 9),
            (100, 4),
            (17, 5),
            (999_999, 1),
            (5, 5),
            (100, 99),
        ];
        for (a, b) in cases {
            for (a, b) in [(a, b), (-a, b), (a, -b), (-a, -b)] {
                let mut q = big(a);
                q.div_assign(&big(b)).unwrap();
                assert_eq!(q, big(a / b), "{a} / {b}");
            }
        }
    }

    #[test]
    fn div_of_smaller_magnitude_is_zero() {
        let mut q = big(3);
        q.div_assign(&big(10)).unwrap();
        assert!(q.is_zero());
    }

    #[test]
    fn div_by_zero_errors() {
        let mut q = big(42);
        assert!(matches!(q.div_assign(&big(0)), Err(CoreError::DivisionByZero)));
    }

    // -- Powers of ten --

    #[test]
    fn mul_by_pow10_shifts_and_checks_capacity() {
        let mut v = big(42);
        v.mul_by_pow10(3).unwrap();
        assert_eq!(v, big(42_000));
        let err = v.mul_by_pow10(12).unwrap_err();
        assert!(matches!(err, CoreError::CapacityExceeded { .. }));
        assert_eq!(v, big(42_000));
    }

    #[test]
    fn mul_by_pow10_leaves_zero_alone() {
        let mut v = big(0);
        v.mul_by_pow10(5).unwrap();
        assert!(v.is_zero());
    }

    #[test]
    fn div_by_pow10_truncates_toward_zero() {
        let mut v = big(-12_345);
        v.div_by_pow10(2);
        assert_eq!(v, big(-123));
        v.div_by_pow10(3);
        assert!(v.is_zero());
        assert_eq!(v.sign(), 1);
    }

    // -- Comparison --

    #[test]
    fn ordering_is_sign_aware() {
        assert!(big(3) > big(2));
        assert!(big(-3) < big(-2));
        assert!(big(-1) < big(1));
        assert!(big(0) > big(-7));
        assert_eq!(big(12).cmp(&big(12)), Ordering::Equal);
    }

    #[test]
    fn equality_ignores_capacity() {
        assert_eq!(
            BigInt::from_i64(77, 4).unwrap(),
            BigInt::from_i64(77, 32).unwrap()
        );
    }

    #[test]
    fn cmp_magnitude_shifted_scales_the_left_side() {
        assert_eq!(big(123).cmp_magnitude_shifted(2, &big(12_300)), Ordering::Equal);
        assert_eq!(big(123).cmp_magnitude_shifted(2, &big(12_301)), Ordering::Less);
        assert_eq!(big(123).cmp_magnitude_shifted(2, &big(12_299)), Ordering::Greater);
        assert_eq!(big(0).cmp_magnitude_shifted(4, &big(1)), Ordering::Less);
    }
}
