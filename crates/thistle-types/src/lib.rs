//! Shared types for the Thistle interpreter.
//!
//! This crate defines the AST node types and source spans consumed by the
//! evaluator. The AST is produced by an external parser and is immutable
//! once built.

mod span;
pub mod ast;

pub use span::Span;
