//! Runtime error taxonomy for the Thistle evaluator.
//!
//! A `RuntimeError` never unwinds: it is carried inside
//! [`crate::Value::Error`] as the result of the failing sub-expression, and
//! operators that require a concrete shape pass it onward unchanged.

use thiserror::Error;

/// Runtime failure, surfaced as an error *value*.
///
/// The `Display` form is the canonical human-readable message the driver
/// prints for an error result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Name not bound in any enclosing scope.
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// A coercion or call received an incompatible value.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Call with the wrong number of arguments.
    #[error("arity mismatch: {0}")]
    ArityMismatch(String),
    /// Substring indices outside the subject string.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
}
