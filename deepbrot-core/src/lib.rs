//! Numeric core for Deepbrot: fixed-capacity decimal arithmetic, the
//! escape-time backends built on it, and the viewport math that maps pixels
//! onto the complex plane.
//!
//! Everything render-facing is generic over [`EscapeBackend`], which keeps
//! plane coordinates in the backend's own representation from viewport
//! construction all the way into the per-sample escape loop.

pub mod backend;
pub mod bigdecimal;
pub mod bigfloat;
pub mod bigint;
pub mod context;
pub mod decimal;
pub mod error;
pub mod native;
pub mod viewport;

pub use backend::{BackendKind, EscapeBackend, EscapeResult};
pub use bigdecimal::BigDecimal;
pub use bigfloat::{BigFloat, BigFloatBackend};
pub use bigint::BigInt;
pub use context::{PrecisionContext, DEFAULT_PRECISION};
pub use decimal::DecimalBackend;
pub use error::CoreError;
pub use native::NativeBackend;
pub use viewport::{PlaneBounds, Viewport};

/// Convenience alias for results carrying [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
