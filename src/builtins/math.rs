// Arithmetic and comparison words
// Provides: + - * / = < >
// Numeric promotion: both-i32 stays i32 (wrapping), any float widens to
// f64, any other mix widens to i64, both-u64 stays u64.

use crate::error::{TallyError, TallyResult};
use crate::interp::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

pub(super) fn register(interp: &mut Interpreter, scope: &mut Scope) {
    super::native(interp, scope, "+", add);
    super::native(interp, scope, "-", sub);
    super::native(interp, scope, "*", mul);
    super::native(interp, scope, "/", div);
    super::native(interp, scope, "=", eq);
    super::native(interp, scope, "<", lt);
    super::native(interp, scope, ">", gt);
}

#[derive(Clone, Copy)]
enum Arith {
    Add,
    Sub,
    Mul,
    Div,
}

impl Arith {
    fn word(self) -> &'static str {
        match self {
            Arith::Add => "+",
            Arith::Sub => "-",
            Arith::Mul => "*",
            Arith::Div => "/",
        }
    }
}

fn add(interp: &mut Interpreter) -> TallyResult<()> {
    arith(interp, Arith::Add)
}

fn sub(interp: &mut Interpreter) -> TallyResult<()> {
    arith(interp, Arith::Sub)
}

fn mul(interp: &mut Interpreter) -> TallyResult<()> {
    arith(interp, Arith::Mul)
}

fn div(interp: &mut Interpreter) -> TallyResult<()> {
    arith(interp, Arith::Div)
}

fn arith(interp: &mut Interpreter, op: Arith) -> TallyResult<()> {
    let b = interp.data.pop()?;
    let a = interp.data.pop()?;
    let result = match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => Value::Int(apply_i32(op, *x, *y)?),
        (Value::Uint64(x), Value::Uint64(y)) => Value::Uint64(apply_u64(op, *x, *y)?),
        _ if is_float(&a) || is_float(&b) => {
            Value::Float(apply_f64(op, as_f64(&a, op)?, as_f64(&b, op)?))
        }
        _ => Value::Int64(apply_i64(op, as_i64(&a, op)?, as_i64(&b, op)?)?),
    };
    interp.data.push(result);
    Ok(())
}

fn apply_i32(op: Arith, a: i32, b: i32) -> TallyResult<i32> {
    Ok(match op {
        Arith::Add => a.wrapping_add(b),
        Arith::Sub => a.wrapping_sub(b),
        Arith::Mul => a.wrapping_mul(b),
        Arith::Div => a.checked_div(b).ok_or(TallyError::DivisionByZero)?,
    })
}

fn apply_i64(op: Arith, a: i64, b: i64) -> TallyResult<i64> {
    Ok(match op {
        Arith::Add => a.wrapping_add(b),
        Arith::Sub => a.wrapping_sub(b),
        Arith::Mul => a.wrapping_mul(b),
        Arith::Div => a.checked_div(b).ok_or(TallyError::DivisionByZero)?,
    })
}

fn apply_u64(op: Arith, a: u64, b: u64) -> TallyResult<u64> {
    Ok(match op {
        Arith::Add => a.wrapping_add(b),
        Arith::Sub => a.wrapping_sub(b),
        Arith::Mul => a.wrapping_mul(b),
        Arith::Div => a.checked_div(b).ok_or(TallyError::DivisionByZero)?,
    })
}

fn apply_f64(op: Arith, a: f64, b: f64) -> f64 {
    match op {
        Arith::Add => a + b,
        Arith::Sub => a - b,
        Arith::Mul => a * b,
        Arith::Div => a / b,
    }
}

fn eq(interp: &mut Interpreter) -> TallyResult<()> {
    let b = interp.data.pop()?;
    let a = interp.data.pop()?;
    let equal = match (numeric(&a), numeric(&b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    };
    interp.data.push(Value::Bool(equal));
    Ok(())
}

fn lt(interp: &mut Interpreter) -> TallyResult<()> {
    compare(interp, "<", |a, b| a < b)
}

fn gt(interp: &mut Interpreter) -> TallyResult<()> {
    compare(interp, ">", |a, b| a > b)
}

fn compare(
    interp: &mut Interpreter,
    word: &str,
    cmp: fn(f64, f64) -> bool,
) -> TallyResult<()> {
    let b = interp.data.pop()?;
    let a = interp.data.pop()?;
    match (numeric(&a), numeric(&b)) {
        (Some(x), Some(y)) => {
            interp.data.push(Value::Bool(cmp(x, y)));
            Ok(())
        }
        _ => Err(TallyError::Syntax(format!(
            "'{word}' expects numbers, got {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn is_float(value: &Value) -> bool {
    matches!(value, Value::Float(_))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(f64::from(*n)),
        Value::Int64(n) => Some(*n as f64),
        Value::Uint64(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn as_f64(value: &Value, op: Arith) -> TallyResult<f64> {
    numeric(value).ok_or_else(|| type_error(value, op))
}

fn as_i64(value: &Value, op: Arith) -> TallyResult<i64> {
    match value {
        Value::Int(n) => Ok(i64::from(*n)),
        Value::Int64(n) => Ok(*n),
        Value::Uint64(n) => Ok(*n as i64),
        _ => Err(type_error(value, op)),
    }
}

fn type_error(value: &Value, op: Arith) -> TallyError {
    TallyError::Syntax(format!(
        "'{}' expects numbers, got {}",
        op.word(),
        value.type_name()
    ))
}
