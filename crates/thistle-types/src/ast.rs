//! AST node types for the Thistle language.
//!
//! Every node carries a [`Span`] for error reporting.
//! Recursive variants are boxed to keep the enum size reasonable.
//! The tree is strictly acyclic: each node owns its children, and the
//! evaluator never mutates it.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Thistle program: an ordered sequence of top-level expressions.
///
/// Expressions evaluate left to right; the value of the last one is the
/// program result.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub exprs: Vec<Expr>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `42`, `3.14`
    NumberLit(f64),
    /// `"hello"`
    StringLit(String),
    /// `null`
    NullLit,

    // ── Names & Binding ──
    /// `my_var`
    Identifier(String),
    /// `name := expr` — bind in the current scope; evaluates to null.
    Define { name: Ident, value: Box<Expr> },

    // ── Operators ──
    /// `a + b`, `a < b`, `a and b`, etc.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `not a`
    Not(Box<Expr>),

    // ── Control Flow ──
    /// `if cond then a [else b]`
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    /// `while cond body`
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    /// `(a; b; c)` — value of the last element, null when empty.
    Seq(Vec<Expr>),

    // ── Functions ──
    /// `define name(params) = body` — binds and evaluates to the function.
    FunctionDef {
        name: Ident,
        params: Vec<Ident>,
        body: Box<Expr>,
    },
    /// `name(args...)`
    Call { name: Ident, args: Vec<Expr> },

    // ── Side Effects ──
    /// `print(expr)` — emits the value, evaluates to it unchanged.
    Print(Box<Expr>),
    /// `random()` — a number in [0, 1).
    Random,

    // ── Strings ──
    /// `cat(a, b)`
    Concat { left: Box<Expr>, right: Box<Expr> },
    /// `slength(s)`
    StrLength(Box<Expr>),
    /// `smid(s, start, end)` — 0-based, start inclusive, end exclusive.
    Substring {
        subject: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },
}

// ── Binary Operators ──────────────────────────────────────────────────────────

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    // Comparison
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    // Logical (no short-circuit: both operands always evaluate)
    And,
    Or,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
            BinOp::Eq => "=",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}
