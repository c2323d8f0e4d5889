//! Expression error types.

use thiserror::Error;

/// Errors produced while parsing or evaluating a formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("empty formula")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        pos: usize,
        expected: &'static str,
    },

    #[error("unexpected end of formula, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("formula nests deeper than {0} levels")]
    TooDeep(usize),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("function {name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("no metric samples available for {0}")]
    NoMetrics(&'static str),

    #[error("formula evaluated to a boolean, expected a number")]
    BooleanResult,

    #[error("result is not a finite number: {0}")]
    NonFinite(f64),

    #[error("result {0} does not fit an instance count")]
    OutOfRange(f64),
}

pub type ExprResult<T> = Result<T, ExprError>;
