use crate::filter::expr::EvalError;
use crate::filter::expr::parser::{BinaryOp, Expr, UnaryOp};
use serde_json::{Map, Value};
use std::cmp::Ordering;

pub(crate) fn evaluate(expr: &Expr, vars: &Map<String, Value>) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Array(items) => items
            .iter()
            .map(|item| evaluate(item, vars))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expr::Variable(name) => Ok(vars.get(name).cloned().unwrap_or(Value::Null)),
        Expr::Member(target, member) => Ok(match evaluate(target, vars)? {
            Value::Object(mut map) => map.remove(member).unwrap_or(Value::Null),
            _ => Value::Null,
        }),
        Expr::Index(target, index) => {
            let target = evaluate(target, vars)?;
            let index = evaluate(index, vars)?;
            Ok(lookup(target, &index))
        }
        Expr::Unary(UnaryOp::Not, operand) => Ok(Value::Bool(!truthy(&evaluate(operand, vars)?))),
        Expr::Unary(UnaryOp::Neg, operand) => match evaluate(operand, vars)? {
            Value::Number(n) => match n.as_i64() {
                Some(i) => i
                    .checked_neg()
                    .map(Value::from)
                    .ok_or(EvalError::Overflow { op: "-" }),
                None => Ok(Value::from(-n.as_f64().unwrap_or(0.0))),
            },
            other => Err(EvalError::UnaryType {
                op: "-",
                operand: type_name(&other),
            }),
        },
        Expr::Binary(BinaryOp::Or, lhs, rhs) => {
            let result = truthy(&evaluate(lhs, vars)?) || truthy(&evaluate(rhs, vars)?);
            Ok(Value::Bool(result))
        }
        Expr::Binary(BinaryOp::And, lhs, rhs) => {
            let result = truthy(&evaluate(lhs, vars)?) && truthy(&evaluate(rhs, vars)?);
            Ok(Value::Bool(result))
        }
        Expr::Binary(op, lhs, rhs) => {
            let lhs = evaluate(lhs, vars)?;
            let rhs = evaluate(rhs, vars)?;
            binary(*op, &lhs, &rhs)
        }
        Expr::Matches(subject, regex) => match evaluate(subject, vars)? {
            Value::String(s) => Ok(Value::Bool(regex.is_match(&s))),
            other => Err(EvalError::Type {
                op: "matches",
                left: type_name(&other),
                right: "regex",
            }),
        },
    }
}

fn lookup(target: Value, index: &Value) -> Value {
    match (target, index) {
        (Value::Object(mut map), Value::String(key)) => map.remove(key).unwrap_or(Value::Null),
        (Value::Array(mut items), Value::Number(n)) => n
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i < items.len())
            .map_or(Value::Null, |i| items.swap_remove(i)),
        _ => Value::Null,
    }
}

fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    let mismatch = || EvalError::Type {
        op: op.symbol(),
        left: type_name(lhs),
        right: type_name(rhs),
    };

    let value = match op {
        BinaryOp::Eq => Value::Bool(loose_eq(lhs, rhs)),
        BinaryOp::NotEq => Value::Bool(!loose_eq(lhs, rhs)),
        BinaryOp::Identical => Value::Bool(lhs == rhs),
        BinaryOp::NotIdentical => Value::Bool(lhs != rhs),
        // A missing member is null; ordering against it never matches.
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
            if lhs.is_null() || rhs.is_null() =>
        {
            Value::Bool(false)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare(lhs, rhs).ok_or_else(mismatch)?;
            Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            })
        }
        BinaryOp::In | BinaryOp::NotIn => {
            let found = match rhs {
                Value::Array(items) => items.iter().any(|item| loose_eq(lhs, item)),
                Value::Object(map) => match lhs {
                    Value::String(key) => map.contains_key(key),
                    _ => return Err(mismatch()),
                },
                _ => return Err(mismatch()),
            };
            Value::Bool(found == (op == BinaryOp::In))
        }
        BinaryOp::Contains | BinaryOp::StartsWith | BinaryOp::EndsWith => {
            let (Value::String(haystack), Value::String(needle)) = (lhs, rhs) else {
                return Err(mismatch());
            };
            Value::Bool(match op {
                BinaryOp::Contains => haystack.contains(needle.as_str()),
                BinaryOp::StartsWith => haystack.starts_with(needle.as_str()),
                _ => haystack.ends_with(needle.as_str()),
            })
        }
        BinaryOp::Concat => Value::from(format!("{}{}", stringify(lhs), stringify(rhs))),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, lhs, rhs).ok_or_else(mismatch)??
        }
        BinaryOp::Or | BinaryOp::And => Value::Bool(truthy(lhs) && truthy(rhs)),
    };

    Ok(value)
}

/// `None` when the operands are not both numbers.
fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Option<Result<Value, EvalError>> {
    let (Value::Number(a), Value::Number(b)) = (lhs, rhs) else {
        return None;
    };

    if op != BinaryOp::Div {
        if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
            let result = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                BinaryOp::Mul => a.checked_mul(b),
                _ if b == 0 => return Some(Err(EvalError::DivisionByZero)),
                _ => a.checked_rem(b),
            };
            return Some(
                result
                    .map(Value::from)
                    .ok_or(EvalError::Overflow { op: op.symbol() }),
            );
        }
    }

    let (a, b) = (a.as_f64()?, b.as_f64()?);
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        _ if b == 0.0 => return Some(Err(EvalError::DivisionByZero)),
        BinaryOp::Div => a / b,
        _ => a % b,
    };

    Some(Ok(Value::from(result)))
}

/// Numbers compare by value whatever their representation; everything else
/// structurally.
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => lhs == rhs,
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
