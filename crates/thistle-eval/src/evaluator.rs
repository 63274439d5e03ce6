//! Core expression evaluator.

use crate::env::{EnvArena, ScopeId};
use crate::error::RuntimeError;
use crate::output::PrintSink;
use crate::value::{FunctionValue, Value};
use rand::{Rng, RngCore};
use std::rc::Rc;
use thistle_types::ast::{BinOp, Expr, ExprKind, Ident, Program};

/// The core evaluator — walks AST nodes and produces Values.
///
/// Evaluation is depth-first recursion with the scope handle threaded down
/// the call tree, never up. Runtime failures become [`Value::Error`] results
/// of the failing sub-expression; the evaluator itself never panics on
/// user-program input.
pub struct Evaluator {
    /// Arena of parent-linked scopes.
    envs: EnvArena,
    /// Injected pseudorandom source behind the `random` node.
    rng: Box<dyn RngCore>,
    /// Injected sink behind the `print` node.
    out: PrintSink,
}

impl Evaluator {
    /// Evaluator with the default capabilities: stdout printing and the
    /// thread-local RNG.
    pub fn new() -> Self {
        Self::with_capabilities(Box::new(rand::thread_rng()), PrintSink::Stdout)
    }

    /// Evaluator with injected capabilities — a seeded RNG and a capturing
    /// sink make evaluation fully deterministic for tests.
    pub fn with_capabilities(rng: Box<dyn RngCore>, out: PrintSink) -> Self {
        Self {
            envs: EnvArena::new(),
            rng,
            out,
        }
    }

    /// The global scope — root of every chain, created once per evaluator.
    pub fn global_scope(&self) -> ScopeId {
        self.envs.global()
    }

    /// Lines captured by a buffering print sink (empty for stdout).
    pub fn printed(&self) -> &[String] {
        self.out.captured()
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a program: top-level expressions run left to right in the
    /// global scope, and the last one's value is the result. An empty
    /// program is `Null`. Earlier results — error values included — are
    /// discarded, not propagated.
    pub fn eval_program(&mut self, program: &Program) -> Value {
        let global = self.envs.global();
        let mut result = Value::Null;
        for expr in &program.exprs {
            result = self.eval_expr(expr, global);
        }
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value in the given scope.
    pub fn eval_expr(&mut self, expr: &Expr, scope: ScopeId) -> Value {
        match &expr.kind {
            ExprKind::NumberLit(n) => Value::Number(*n),
            ExprKind::StringLit(s) => Value::Str(s.clone()),
            ExprKind::NullLit => Value::Null,

            ExprKind::Identifier(name) => self.eval_identifier(name, scope),
            ExprKind::Define { name, value } => self.eval_define(name, value, scope),

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right, scope),
            ExprKind::Not(operand) => self.eval_not(operand, scope),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.eval_if(condition, then_branch, else_branch.as_deref(), scope),
            ExprKind::While { condition, body } => self.eval_while(condition, body, scope),
            ExprKind::Seq(exprs) => self.eval_seq(exprs, scope),

            ExprKind::FunctionDef { name, params, body } => {
                self.eval_function_def(name, params, body, scope)
            }
            ExprKind::Call { name, args } => self.eval_call(name, args, scope),

            ExprKind::Print(operand) => self.eval_print(operand, scope),
            ExprKind::Random => Value::Number(self.rng.gen::<f64>()),

            ExprKind::Concat { left, right } => self.eval_concat(left, right, scope),
            ExprKind::StrLength(operand) => self.eval_str_length(operand, scope),
            ExprKind::Substring {
                subject,
                start,
                end,
            } => self.eval_substring(subject, start, end, scope),
        }
    }

    // ── Names & Binding ──────────────────────────────────────────────────

    fn eval_identifier(&self, name: &str, scope: ScopeId) -> Value {
        match self.envs.get(scope, name) {
            Some(v) => v.clone(),
            None => Value::Error(RuntimeError::UndefinedVariable(name.to_string())),
        }
    }

    /// `name := value` — bind in the current scope, result `Null`.
    fn eval_define(&mut self, name: &Ident, value: &Expr, scope: ScopeId) -> Value {
        let v = self.eval_expr(value, scope);
        self.envs.define(scope, &name.name, v);
        Value::Null
    }

    // ── Operators ────────────────────────────────────────────────────────

    /// Both operands always evaluate, left first — no short-circuit, not
    /// even for `and`/`or`. A left-operand error is reported before a
    /// right-operand one.
    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr, scope: ScopeId) -> Value {
        let lv = self.eval_expr(left, scope);
        let rv = self.eval_expr(right, scope);

        match op {
            BinOp::Add => Self::eval_arith(&lv, &rv, |a, b| a + b),
            BinOp::Sub => Self::eval_arith(&lv, &rv, |a, b| a - b),
            BinOp::Mul => Self::eval_arith(&lv, &rv, |a, b| a * b),
            // IEEE division: /0 yields inf or NaN, never a trapped error.
            BinOp::Div => Self::eval_arith(&lv, &rv, |a, b| a / b),
            BinOp::Pow => Self::eval_arith(&lv, &rv, f64::powf),
            BinOp::Eq => Self::eval_equality(&lv, &rv, false),
            BinOp::NotEq => Self::eval_equality(&lv, &rv, true),
            BinOp::Less => Self::eval_comparison(&lv, &rv, |a, b| a < b),
            BinOp::LessEq => Self::eval_comparison(&lv, &rv, |a, b| a <= b),
            BinOp::Greater => Self::eval_comparison(&lv, &rv, |a, b| a > b),
            BinOp::GreaterEq => Self::eval_comparison(&lv, &rv, |a, b| a >= b),
            BinOp::And => Self::eval_logical(&lv, &rv, |a, b| a && b),
            BinOp::Or => Self::eval_logical(&lv, &rv, |a, b| a || b),
        }
    }

    fn eval_arith(lv: &Value, rv: &Value, op: fn(f64, f64) -> f64) -> Value {
        match (lv.as_number(), rv.as_number()) {
            (Ok(a), Ok(b)) => Value::Number(op(a, b)),
            (Err(e), _) | (_, Err(e)) => Value::Error(e),
        }
    }

    fn eval_comparison(lv: &Value, rv: &Value, op: fn(f64, f64) -> bool) -> Value {
        match (lv.as_number(), rv.as_number()) {
            (Ok(a), Ok(b)) => Self::bool_value(op(a, b)),
            (Err(e), _) | (_, Err(e)) => Value::Error(e),
        }
    }

    fn eval_logical(lv: &Value, rv: &Value, op: fn(bool, bool) -> bool) -> Value {
        match (lv.as_bool(), rv.as_bool()) {
            (Ok(a), Ok(b)) => Self::bool_value(op(a, b)),
            (Err(e), _) | (_, Err(e)) => Value::Error(e),
        }
    }

    /// `=` / `!=` — structural across all non-error variants; an error
    /// operand propagates.
    fn eval_equality(lv: &Value, rv: &Value, negate: bool) -> Value {
        if let Value::Error(e) = lv {
            return Value::Error(e.clone());
        }
        if let Value::Error(e) = rv {
            return Value::Error(e.clone());
        }
        Self::bool_value(Self::structural_eq(lv, rv) != negate)
    }

    /// Structural equality. Numbers by value (NaN != NaN), strings by
    /// content, Null = Null, functions never equal, mixed kinds unequal.
    fn structural_eq(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => !x.is_nan() && !y.is_nan() && x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }

    fn eval_not(&mut self, operand: &Expr, scope: ScopeId) -> Value {
        match self.eval_expr(operand, scope).as_bool() {
            Ok(b) => Self::bool_value(!b),
            Err(e) => Value::Error(e),
        }
    }

    /// Booleans are numbers: 1 for true, 0 for false.
    fn bool_value(b: bool) -> Value {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn eval_if(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: Option<&Expr>,
        scope: ScopeId,
    ) -> Value {
        match self.eval_expr(condition, scope).as_bool() {
            Ok(true) => self.eval_expr(then_branch, scope),
            Ok(false) => match else_branch {
                Some(els) => self.eval_expr(els, scope),
                None => Value::Null,
            },
            Err(e) => Value::Error(e),
        }
    }

    /// The condition re-evaluates before every iteration. The loop's value
    /// is the last iteration's body value, `Null` for zero iterations.
    fn eval_while(&mut self, condition: &Expr, body: &Expr, scope: ScopeId) -> Value {
        let mut last = Value::Null;
        loop {
            match self.eval_expr(condition, scope).as_bool() {
                Ok(true) => last = self.eval_expr(body, scope),
                Ok(false) => return last,
                Err(e) => return Value::Error(e),
            }
        }
    }

    /// `(a; b; c)` — value of the last element, `Null` when empty.
    /// Intermediate values are discarded; an intermediate error value is
    /// discarded too, since nothing consumes it.
    fn eval_seq(&mut self, exprs: &[Expr], scope: ScopeId) -> Value {
        let mut last = Value::Null;
        for expr in exprs {
            last = self.eval_expr(expr, scope);
        }
        last
    }

    // ── Functions ────────────────────────────────────────────────────────

    /// Capture the current scope as the closure, bind the name there, and
    /// evaluate to the function itself. The name is visible inside the
    /// body via the closure, which is what enables recursion.
    fn eval_function_def(
        &mut self,
        name: &Ident,
        params: &[Ident],
        body: &Expr,
        scope: ScopeId,
    ) -> Value {
        let function = Value::Function(FunctionValue {
            params: params.iter().map(|p| p.name.clone()).collect(),
            body: Rc::new(body.clone()),
            scope,
        });
        self.envs.define(scope, &name.name, function.clone());
        function
    }

    fn eval_call(&mut self, name: &Ident, args: &[Expr], scope: ScopeId) -> Value {
        let function = match self.envs.get(scope, &name.name) {
            Some(Value::Function(f)) => f.clone(),
            Some(Value::Error(e)) => return Value::Error(e.clone()),
            Some(other) => {
                return Value::Error(RuntimeError::TypeMismatch(format!(
                    "'{}' is not callable: got {}",
                    name.name,
                    other.type_name()
                )));
            }
            None => return Value::Error(RuntimeError::UndefinedVariable(name.name.clone())),
        };

        // Call-by-value: arguments evaluate fully in the caller's scope,
        // left to right. Error values bind like any other value.
        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_expr(arg, scope));
        }

        if arg_vals.len() != function.params.len() {
            return Value::Error(RuntimeError::ArityMismatch(format!(
                "{} expects {} arguments, got {}",
                name.name,
                function.params.len(),
                arg_vals.len()
            )));
        }

        // One fresh scope per call, parented to the captured closure scope —
        // not the caller's. Free variables resolve lexically.
        let frame = self.envs.child(function.scope);
        for (param, val) in function.params.iter().zip(arg_vals) {
            self.envs.define(frame, param, val);
        }
        self.eval_expr(&function.body, frame)
    }

    // ── Side Effects ─────────────────────────────────────────────────────

    /// Emit the value's display form and return the value unchanged, so
    /// `print(x)` can be used inline in larger expressions.
    fn eval_print(&mut self, operand: &Expr, scope: ScopeId) -> Value {
        let v = self.eval_expr(operand, scope);
        self.out.emit(&v.to_string());
        v
    }

    // ── Strings ──────────────────────────────────────────────────────────

    fn eval_concat(&mut self, left: &Expr, right: &Expr, scope: ScopeId) -> Value {
        let lv = self.eval_expr(left, scope);
        let rv = self.eval_expr(right, scope);
        match (lv.as_text(), rv.as_text()) {
            (Ok(a), Ok(b)) => Value::Str(format!("{a}{b}")),
            (Err(e), _) | (_, Err(e)) => Value::Error(e),
        }
    }

    fn eval_str_length(&mut self, operand: &Expr, scope: ScopeId) -> Value {
        match self.eval_expr(operand, scope).as_text() {
            Ok(s) => Value::Number(s.chars().count() as f64),
            Err(e) => Value::Error(e),
        }
    }

    /// 0-based character indices, start inclusive, end exclusive.
    /// Out-of-range indices are rejected, never clamped; fractional index
    /// numbers truncate toward zero.
    fn eval_substring(&mut self, subject: &Expr, start: &Expr, end: &Expr, scope: ScopeId) -> Value {
        let sv = self.eval_expr(subject, scope);
        let start_v = self.eval_expr(start, scope);
        let end_v = self.eval_expr(end, scope);

        let text = match sv.as_text() {
            Ok(t) => t,
            Err(e) => return Value::Error(e),
        };
        let (s, e) = match (start_v.as_number(), end_v.as_number()) {
            (Ok(a), Ok(b)) => (a.trunc(), b.trunc()),
            (Err(err), _) | (_, Err(err)) => return Value::Error(err),
        };

        let len = text.chars().count();
        // NaN compares false against everything, so a non-finite index would
        // slip past the range check below. Reject it up front.
        if !s.is_finite() || !e.is_finite() || s < 0.0 || e < s || e > len as f64 {
            return Value::Error(RuntimeError::IndexOutOfRange(format!(
                "substring {s}..{e} of a {len}-character string"
            )));
        }
        let (s, e) = (s as usize, e as usize);
        Value::Str(text.chars().skip(s).take(e - s).collect())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
