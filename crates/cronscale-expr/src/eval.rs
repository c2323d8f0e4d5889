//! Tree-walking evaluation of parsed formulas.

use cronscale_core::TimestampedMetric;

use crate::error::{ExprError, ExprResult};
use crate::parser::{BinaryOp, Expr, LogicalOp, UnaryOp};

/// Values a formula is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    /// Current instance count, exposed as `Count`.
    pub count: i64,
    /// Metric series, ordered oldest first.
    pub metrics: &'a [TimestampedMetric],
}

impl<'a> Bindings<'a> {
    pub fn new(count: i64, metrics: &'a [TimestampedMetric]) -> Self {
        Self { count, metrics }
    }

    /// Look up a named variable.
    pub fn variable(&self, name: &str) -> ExprResult<f64> {
        let values = self.metrics.iter().map(|m| m.value);
        match name {
            "Count" => Ok(self.count as f64),
            "MetricsCount" => Ok(self.metrics.len() as f64),
            "MetricsSum" => Ok(values.sum()),
            "MetricsMax" => values.reduce(f64::max).ok_or(ExprError::NoMetrics("MetricsMax")),
            "MetricsMin" => values.reduce(f64::min).ok_or(ExprError::NoMetrics("MetricsMin")),
            "MetricsAvg" => {
                if self.metrics.is_empty() {
                    return Err(ExprError::NoMetrics("MetricsAvg"));
                }
                Ok(values.sum::<f64>() / self.metrics.len() as f64)
            }
            "MetricsFirst" => self
                .metrics
                .first()
                .map(|m| m.value)
                .ok_or(ExprError::NoMetrics("MetricsFirst")),
            "MetricsLast" => self
                .metrics
                .last()
                .map(|m| m.value)
                .ok_or(ExprError::NoMetrics("MetricsLast")),
            _ => Err(ExprError::UnknownVariable(name.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    fn number(self, context: &str) -> ExprResult<f64> {
        match self {
            Value::Number(n) => Ok(n),
            Value::Bool(_) => Err(ExprError::TypeMismatch(format!(
                "{context} expects a number, got a boolean"
            ))),
        }
    }

    fn boolean(self, context: &str) -> ExprResult<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Number(_) => Err(ExprError::TypeMismatch(format!(
                "{context} expects a boolean, got a number"
            ))),
        }
    }
}

/// Evaluate an expression tree.
pub fn evaluate(expr: &Expr, bindings: &Bindings<'_>) -> ExprResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Var(name) => bindings.variable(name).map(Value::Number),
        Expr::Call { name, args } => call(name, args, bindings).map(Value::Number),
        Expr::Unary { op, expr } => {
            let value = evaluate(expr, bindings)?;
            match op {
                UnaryOp::Neg => Ok(Value::Number(-value.number("'-'")?)),
                UnaryOp::Not => Ok(Value::Bool(!value.boolean("'!'")?)),
            }
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, bindings),
        Expr::Logical { op, lhs, rhs } => logical(*op, lhs, rhs, bindings).map(Value::Bool),
        Expr::Conditional {
            cond,
            then,
            otherwise,
        } => {
            if evaluate(cond, bindings)?.boolean("'?:' condition")? {
                evaluate(then, bindings)
            } else {
                evaluate(otherwise, bindings)
            }
        }
    }
}

/// `&&` and `||`; the right-hand side is only evaluated when needed.
fn logical(op: LogicalOp, lhs: &Expr, rhs: &Expr, bindings: &Bindings<'_>) -> ExprResult<bool> {
    let (context, short_circuit) = match op {
        LogicalOp::And => ("'&&'", false),
        LogicalOp::Or => ("'||'", true),
    };
    let l = evaluate(lhs, bindings)?.boolean(context)?;
    if l == short_circuit {
        return Ok(l);
    }
    evaluate(rhs, bindings)?.boolean(context)
}

fn binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, bindings: &Bindings<'_>) -> ExprResult<Value> {
    let l = evaluate(lhs, bindings)?;
    let r = evaluate(rhs, bindings)?;

    match (op, l, r) {
        (BinaryOp::Eq, Value::Bool(a), Value::Bool(b)) => return Ok(Value::Bool(a == b)),
        (BinaryOp::Ne, Value::Bool(a), Value::Bool(b)) => return Ok(Value::Bool(a != b)),
        _ => {}
    }

    let a = l.number("arithmetic and comparison operators")?;
    let b = r.number("arithmetic and comparison operators")?;

    let value = match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div if b == 0.0 => return Err(ExprError::DivisionByZero),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Rem if b == 0.0 => return Err(ExprError::DivisionByZero),
        BinaryOp::Rem => Value::Number(a % b),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::Ne => Value::Bool(a != b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
    };
    Ok(value)
}

fn call(name: &str, args: &[Expr], bindings: &Bindings<'_>) -> ExprResult<f64> {
    let values = args
        .iter()
        .map(|arg| evaluate(arg, bindings)?.number(name))
        .collect::<ExprResult<Vec<f64>>>()?;

    let single = |f: fn(f64) -> f64| match values.as_slice() {
        [x] => Ok(f(*x)),
        _ => Err(ExprError::Arity {
            name: name.to_string(),
            expected: "1",
            got: values.len(),
        }),
    };

    match name {
        "abs" => single(f64::abs),
        "ceil" => single(f64::ceil),
        "floor" => single(f64::floor),
        "round" => single(f64::round),
        "max" | "min" => {
            let fold: fn(f64, f64) -> f64 = if name == "max" { f64::max } else { f64::min };
            values.iter().copied().reduce(fold).ok_or(ExprError::Arity {
                name: name.to_string(),
                expected: "at least 1",
                got: 0,
            })
        }
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

/// Convert a final value to an instance count, truncating toward zero.
pub fn to_count(value: Value) -> ExprResult<i64> {
    let n = match value {
        Value::Number(n) => n,
        Value::Bool(_) => return Err(ExprError::BooleanResult),
    };
    if !n.is_finite() {
        return Err(ExprError::NonFinite(n));
    }
    let truncated = n.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(ExprError::OutOfRange(n));
    }
    Ok(truncated as i64)
}
