//! Runtime values for the Thistle evaluator.

use crate::env::ScopeId;
use crate::error::RuntimeError;
use std::fmt;
use std::rc::Rc;
use thistle_types::ast::Expr;

/// A user-defined function: parameter names, shared body, and the handle of
/// the scope captured at the definition site (the closure).
///
/// The handle is a non-owning link into the evaluator's scope arena — the
/// function does not own the environment's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub params: Vec<String>,
    pub body: Rc<Expr>,
    pub scope: ScopeId,
}

/// A runtime value. Immutable once constructed.
///
/// `Error` is a value, not an exception: a failing sub-expression evaluates
/// to `Error`, and only consuming operators propagate it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Null,
    Function(FunctionValue),
    Error(RuntimeError),
}

impl Value {
    /// The value's kind name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Null => "null",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
        }
    }

    /// True for `Error` values.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Coerce to a number. Only `Number` converts; an `Error` input
    /// propagates unchanged.
    pub fn as_number(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Error(e) => Err(e.clone()),
            other => Err(RuntimeError::TypeMismatch(format!(
                "expected number, got {}",
                other.type_name()
            ))),
        }
    }

    /// Truthiness: number != 0. Only numbers carry truthiness.
    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        Ok(self.as_number()? != 0.0)
    }

    /// Coerce to text, as used by concat/length/substring. `Number`, `Str`
    /// and `Null` convert to their display form; a `Function` does not.
    pub fn as_text(&self) -> Result<String, RuntimeError> {
        match self {
            Value::Number(_) | Value::Str(_) | Value::Null => Ok(self.to_string()),
            Value::Error(e) => Err(e.clone()),
            other => Err(RuntimeError::TypeMismatch(format!(
                "expected string, got {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    /// Canonical display form: numbers without unnecessary trailing zeros,
    /// strings verbatim, literal markers for null and functions, errors as
    /// their message text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => write!(f, "{s}"),
            Value::Null => write!(f, "<null>"),
            Value::Function(_) => write!(f, "<function>"),
            Value::Error(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_number_integral() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(0.0).to_string(), "0");
    }

    #[test]
    fn display_number_fractional() {
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn display_number_nonfinite() {
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn display_markers() {
        assert_eq!(Value::Null.to_string(), "<null>");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
        assert_eq!(
            Value::Error(RuntimeError::UndefinedVariable("x".into())).to_string(),
            "undefined variable: x"
        );
    }

    #[test]
    fn as_number_coercions() {
        assert_eq!(Value::Number(4.0).as_number(), Ok(4.0));
        assert!(matches!(
            Value::Str("4".into()).as_number(),
            Err(RuntimeError::TypeMismatch(_))
        ));
        assert!(matches!(
            Value::Null.as_number(),
            Err(RuntimeError::TypeMismatch(_))
        ));
    }

    #[test]
    fn as_number_propagates_error() {
        let e = RuntimeError::UndefinedVariable("x".into());
        assert_eq!(Value::Error(e.clone()).as_number(), Err(e));
    }

    #[test]
    fn truthiness_is_nonzero() {
        assert_eq!(Value::Number(1.0).as_bool(), Ok(true));
        assert_eq!(Value::Number(-0.5).as_bool(), Ok(true));
        assert_eq!(Value::Number(0.0).as_bool(), Ok(false));
        assert!(Value::Str("true".into()).as_bool().is_err());
    }

    #[test]
    fn as_text_display_forms() {
        assert_eq!(Value::Number(4.0).as_text(), Ok("4".into()));
        assert_eq!(Value::Str("ab".into()).as_text(), Ok("ab".into()));
        assert_eq!(Value::Null.as_text(), Ok("<null>".into()));
    }
}
