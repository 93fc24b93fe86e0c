use thiserror::Error;

/// Errors produced by the arithmetic kernel and the numeric backends.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Attempted to divide by an exact zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An operation would need more decimal digits than the value was
    /// allocated with. The operand is left unchanged.
    #[error("digit capacity exceeded: {required} digits required, {capacity} available")]
    CapacityExceeded { required: usize, capacity: usize },

    /// Precision contexts require at least one significant digit.
    #[error("invalid precision {0}: must be at least 1 digit")]
    InvalidPrecision(u32),

    /// A NaN or infinite value reached a conversion that needs a real number.
    #[error("non-finite input: {0}")]
    NonFiniteInput(f64),
}
