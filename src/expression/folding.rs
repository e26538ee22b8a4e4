//! Constant Folding
//!
//! Evaluates expressions captured from the caller's environment at
//! translation time. A call is evaluable when its function is in the known
//! side-effect-free set and no operand references the query root; the folded
//! result becomes a query parameter instead of a Cypher fragment.
//!
//! Folding failures are loud: a foldable call over the wrong value kinds
//! raises `ExpressionError::CompilationFailed` rather than emitting Cypher
//! that might be wrong.

use chrono::{Datelike, Duration, Months, Timelike};

use super::errors::ExpressionError;
use super::visitors::is_server_bound;
use super::{BinaryOp, CypherValue, Expr, HostFn, UnaryOp};

/// Functions that may be evaluated at translation time.
pub fn is_evaluable(function: HostFn) -> bool {
    matches!(
        function,
        HostFn::Concat
            | HostFn::ToLower
            | HostFn::ToUpper
            | HostFn::Trim
            | HostFn::TrimStart
            | HostFn::TrimEnd
            | HostFn::Replace
            | HostFn::Substring
            | HostFn::Length
            | HostFn::Abs
            | HostFn::Floor
            | HostFn::Ceiling
            | HostFn::Round
            | HostFn::Sqrt
            | HostFn::Sign
            | HostFn::Sin
            | HostFn::Cos
            | HostFn::Tan
            | HostFn::Exp
            | HostFn::Log
            | HostFn::Pow
            | HostFn::AddYears
            | HostFn::AddMonths
            | HostFn::AddDays
            | HostFn::AddHours
            | HostFn::AddMinutes
            | HostFn::AddSeconds
            | HostFn::Year
            | HostFn::Month
            | HostFn::Day
            | HostFn::Hour
            | HostFn::Minute
            | HostFn::Second
            | HostFn::NewGuid
    )
}

/// True when `expr` should be folded instead of translated: every leaf is a
/// captured value and any calls involved are side-effect free.
pub fn is_foldable(expr: &Expr) -> bool {
    if is_server_bound(expr) {
        return false;
    }
    match expr {
        Expr::Constant(_) => true,
        Expr::Call { function, args } => {
            is_evaluable(*function) && args.iter().all(is_foldable)
        }
        Expr::Binary { op, lhs, rhs } => {
            !op.is_logical() && !op.is_comparison() && is_foldable(lhs) && is_foldable(rhs)
        }
        Expr::Unary { op, operand } => *op != UnaryOp::Not && is_foldable(operand),
        Expr::List(items) => items.iter().all(is_foldable),
        _ => false,
    }
}

/// Evaluate a foldable expression to a value.
pub fn fold_constant(expr: &Expr) -> Result<CypherValue, ExpressionError> {
    match expr {
        Expr::Constant(value) => Ok(value.clone()),
        Expr::List(items) => {
            let folded: Result<Vec<CypherValue>, ExpressionError> =
                items.iter().map(fold_constant).collect();
            Ok(CypherValue::List(folded?))
        }
        Expr::Binary { op, lhs, rhs } => fold_binary(*op, fold_constant(lhs)?, fold_constant(rhs)?),
        Expr::Unary { op, operand } => fold_unary(*op, fold_constant(operand)?),
        Expr::Call { function, args } => {
            let values: Result<Vec<CypherValue>, ExpressionError> =
                args.iter().map(fold_constant).collect();
            fold_call(*function, &values?)
        }
        other => Err(ExpressionError::compilation_failed(
            other.describe(),
            "expression is not a captured value",
        )),
    }
}

fn fold_binary(
    op: BinaryOp,
    lhs: CypherValue,
    rhs: CypherValue,
) -> Result<CypherValue, ExpressionError> {
    use CypherValue::*;
    let result = match (op, &lhs, &rhs) {
        (BinaryOp::Addition, Int(a), Int(b)) => Int(a + b),
        (BinaryOp::Subtraction, Int(a), Int(b)) => Int(a - b),
        (BinaryOp::Multiplication, Int(a), Int(b)) => Int(a * b),
        (BinaryOp::Division, Int(a), Int(b)) if *b != 0 => Int(a / b),
        (BinaryOp::ModuloDivision, Int(a), Int(b)) if *b != 0 => Int(a % b),
        (BinaryOp::Addition, Str(a), Str(b)) => Str(format!("{}{}", a, b)),
        (op, a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => {
                let value = match op {
                    BinaryOp::Addition => a + b,
                    BinaryOp::Subtraction => a - b,
                    BinaryOp::Multiplication => a * b,
                    BinaryOp::Division if b != 0.0 => a / b,
                    BinaryOp::ModuloDivision if b != 0.0 => a % b,
                    _ => {
                        return Err(ExpressionError::compilation_failed(
                            format!("{} {} {}", lhs, op.cypher_symbol(), rhs),
                            "operator is not evaluable at translation time",
                        ))
                    }
                };
                Float(value)
            }
            _ => {
                return Err(ExpressionError::compilation_failed(
                    format!("{} {} {}", lhs, op.cypher_symbol(), rhs),
                    "operand kinds do not support translation-time arithmetic",
                ))
            }
        },
    };
    Ok(result)
}

fn fold_unary(op: UnaryOp, value: CypherValue) -> Result<CypherValue, ExpressionError> {
    let result = match (op, &value) {
        (UnaryOp::ToInteger, v) => match v.as_f64() {
            Some(f) => CypherValue::Int(f as i64),
            None => return conversion_error("integer", &value),
        },
        (UnaryOp::ToFloat, v) => match v.as_f64() {
            Some(f) => CypherValue::Float(f),
            None => return conversion_error("float", &value),
        },
        (UnaryOp::ToBoolean, CypherValue::Bool(b)) => CypherValue::Bool(*b),
        (UnaryOp::ToBoolean, CypherValue::Str(s)) => match s.parse::<bool>() {
            Ok(b) => CypherValue::Bool(b),
            Err(_) => return conversion_error("boolean", &value),
        },
        (UnaryOp::ToStringValue, v) => CypherValue::Str(match v {
            CypherValue::Str(s) => s.clone(),
            other => other.to_string(),
        }),
        (UnaryOp::ToDateTime, CypherValue::DateTime(dt)) => CypherValue::DateTime(*dt),
        (UnaryOp::ToDateTime, CypherValue::Str(s)) => {
            match chrono::DateTime::parse_from_rfc3339(s) {
                Ok(dt) => CypherValue::DateTime(dt.with_timezone(&chrono::Utc)),
                Err(e) => {
                    return Err(ExpressionError::compilation_failed(
                        format!("datetime('{}')", s),
                        e.to_string(),
                    ))
                }
            }
        }
        _ => return conversion_error("value", &value),
    };
    Ok(result)
}

fn conversion_error(target: &str, value: &CypherValue) -> Result<CypherValue, ExpressionError> {
    Err(ExpressionError::compilation_failed(
        format!("conversion to {}", target),
        format!("cannot convert {} value", value.kind()),
    ))
}

fn fold_call(function: HostFn, args: &[CypherValue]) -> Result<CypherValue, ExpressionError> {
    use CypherValue::*;
    let fail = |message: &str| {
        Err(ExpressionError::compilation_failed(
            function.name(),
            message,
        ))
    };

    match function {
        HostFn::Concat => {
            let mut out = String::new();
            for arg in args {
                match arg {
                    Str(s) => out.push_str(s),
                    other => out.push_str(&other.to_string()),
                }
            }
            Ok(Str(out))
        }
        HostFn::ToLower | HostFn::ToUpper | HostFn::Trim | HostFn::TrimStart
        | HostFn::TrimEnd | HostFn::Length => match args {
            [Str(s)] => Ok(match function {
                HostFn::ToLower => Str(s.to_lowercase()),
                HostFn::ToUpper => Str(s.to_uppercase()),
                HostFn::Trim => Str(s.trim().to_string()),
                HostFn::TrimStart => Str(s.trim_start().to_string()),
                HostFn::TrimEnd => Str(s.trim_end().to_string()),
                HostFn::Length => Int(s.chars().count() as i64),
                _ => unreachable!(),
            }),
            _ => fail("expects one string argument"),
        },
        HostFn::Replace => match args {
            [Str(s), Str(from), Str(to)] => Ok(Str(s.replace(from.as_str(), to))),
            _ => fail("expects (string, string, string)"),
        },
        HostFn::Substring => match args {
            [Str(s), Int(start)] => Ok(Str(s.chars().skip(*start as usize).collect())),
            [Str(s), Int(start), Int(len)] => Ok(Str(s
                .chars()
                .skip(*start as usize)
                .take(*len as usize)
                .collect())),
            _ => fail("expects (string, integer[, integer])"),
        },
        HostFn::Abs => match args {
            [Int(i)] => Ok(Int(i.abs())),
            [Float(f)] => Ok(Float(f.abs())),
            _ => fail("expects one numeric argument"),
        },
        HostFn::Sign => match args {
            [Int(i)] => Ok(Int(i.signum())),
            [Float(f)] => Ok(Int(if *f > 0.0 {
                1
            } else if *f < 0.0 {
                -1
            } else {
                0
            })),
            _ => fail("expects one numeric argument"),
        },
        HostFn::Floor | HostFn::Ceiling | HostFn::Round | HostFn::Sqrt | HostFn::Sin
        | HostFn::Cos | HostFn::Tan | HostFn::Exp | HostFn::Log => {
            let f = match args {
                [v] => match v.as_f64() {
                    Some(f) => f,
                    None => return fail("expects one numeric argument"),
                },
                _ => return fail("expects one numeric argument"),
            };
            Ok(match function {
                HostFn::Floor => Float(f.floor()),
                HostFn::Ceiling => Float(f.ceil()),
                HostFn::Round => Float(f.round()),
                HostFn::Sqrt => Float(f.sqrt()),
                HostFn::Sin => Float(f.sin()),
                HostFn::Cos => Float(f.cos()),
                HostFn::Tan => Float(f.tan()),
                HostFn::Exp => Float(f.exp()),
                HostFn::Log => Float(f.ln()),
                _ => unreachable!(),
            })
        }
        HostFn::Pow => match (args.first().and_then(|v| v.as_f64()), args.get(1).and_then(|v| v.as_f64())) {
            (Some(base), Some(exp)) if args.len() == 2 => Ok(Float(base.powf(exp))),
            _ => fail("expects (number, number)"),
        },
        HostFn::AddYears | HostFn::AddMonths | HostFn::AddDays | HostFn::AddHours
        | HostFn::AddMinutes | HostFn::AddSeconds => match args {
            [DateTime(dt), Int(n)] => {
                let shifted = match function {
                    HostFn::AddYears => shift_months(*dt, n.checked_mul(12)),
                    HostFn::AddMonths => shift_months(*dt, Some(*n)),
                    HostFn::AddDays => dt.checked_add_signed(Duration::days(*n)),
                    HostFn::AddHours => dt.checked_add_signed(Duration::hours(*n)),
                    HostFn::AddMinutes => dt.checked_add_signed(Duration::minutes(*n)),
                    HostFn::AddSeconds => dt.checked_add_signed(Duration::seconds(*n)),
                    _ => unreachable!(),
                };
                match shifted {
                    Some(dt) => Ok(DateTime(dt)),
                    None => fail("date arithmetic overflowed"),
                }
            }
            _ => fail("expects (datetime, integer)"),
        },
        HostFn::Year | HostFn::Month | HostFn::Day | HostFn::Hour | HostFn::Minute
        | HostFn::Second => match args {
            [DateTime(dt)] => Ok(Int(match function {
                HostFn::Year => dt.year() as i64,
                HostFn::Month => dt.month() as i64,
                HostFn::Day => dt.day() as i64,
                HostFn::Hour => dt.hour() as i64,
                HostFn::Minute => dt.minute() as i64,
                HostFn::Second => dt.second() as i64,
                _ => unreachable!(),
            })),
            _ => fail("expects one datetime argument"),
        },
        HostFn::NewGuid => {
            if args.is_empty() {
                Ok(Str(uuid::Uuid::new_v4().to_string()))
            } else {
                fail("expects no arguments")
            }
        }
        _ => fail("function is not evaluable at translation time"),
    }
}

fn shift_months(
    dt: chrono::DateTime<chrono::Utc>,
    months: Option<i64>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    let months = months?;
    if months >= 0 {
        dt.checked_add_months(Months::new(u32::try_from(months).ok()?))
    } else {
        dt.checked_sub_months(Months::new(u32::try_from(-months).ok()?))
    }
}
