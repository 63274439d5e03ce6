//! Thistle tree-walking evaluator: reference implementation.
//!
//! Executes Thistle programs directly from the AST. The evaluator receives a
//! fully-built, immutable [`thistle_types::ast::Program`] from the external
//! parser and produces a [`Value`]. Runtime failures are [`Value::Error`]
//! results, never panics — errors are ordinary values that propagate through
//! the operators that consume them.

mod env;
mod error;
mod evaluator;
mod output;
mod value;

pub use env::{EnvArena, ScopeId};
pub use error::RuntimeError;
pub use evaluator::Evaluator;
pub use output::PrintSink;
pub use value::{FunctionValue, Value};
