//! Expression Combinators
//!
//! Fluent helpers for building `Expr` trees. The queryable surface hands the
//! caller a typed root proxy (`query::Var`); everything the proxy returns is
//! an `Expr`, and the methods here chain further operations onto it.
//!
//! # Example
//! ```ignore
//! use cypherable::expression::combinators::lit;
//!
//! let predicate = p.prop("Age").gt(lit(30)).and(p.prop("Name").starts_with(lit("A")));
//! ```

use super::{BinaryOp, CypherValue, Expr, HostFn, UnaryOp};

/// Lift a captured value into an expression.
pub fn lit(value: impl Into<CypherValue>) -> Expr {
    Expr::Constant(value.into())
}

/// The null literal; `x.eq(null())` translates to `x IS NULL`.
pub fn null() -> Expr {
    Expr::Constant(CypherValue::Null)
}

/// The bare lambda parameter.
pub fn root() -> Expr {
    Expr::Root
}

/// Member access on the lambda parameter: `prop("Age")` is `root.Age`.
pub fn prop(name: impl Into<String>) -> Expr {
    Expr::Property {
        base: Box::new(Expr::Root),
        name: name.into(),
    }
}

/// Negate a predicate.
pub fn not(expr: Expr) -> Expr {
    Expr::Unary {
        op: UnaryOp::Not,
        operand: Box::new(expr),
    }
}

/// Combine predicates with AND.
///
/// - Empty vec → None
/// - Single predicate → Some(predicate)
/// - Multiple → Some(pred1 AND pred2 AND ...)
pub fn and_all(predicates: Vec<Expr>) -> Option<Expr> {
    combine(predicates, BinaryOp::And)
}

/// Combine predicates with OR.
pub fn or_all(predicates: Vec<Expr>) -> Option<Expr> {
    combine(predicates, BinaryOp::Or)
}

fn combine(predicates: Vec<Expr>, op: BinaryOp) -> Option<Expr> {
    let mut iter = predicates.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, next| Expr::Binary {
        op,
        lhs: Box::new(acc),
        rhs: Box::new(next),
    }))
}

/// Anonymous projection record builder for `select`.
///
/// ```ignore
/// select(|g| record().field("City", g.key()).field("Count", g.count()))
/// ```
pub fn record() -> RecordBuilder {
    RecordBuilder { fields: Vec::new() }
}

#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    fields: Vec<(String, Expr)>,
}

impl RecordBuilder {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Expr {
        Expr::Record(self.fields)
    }
}

impl From<RecordBuilder> for Expr {
    fn from(builder: RecordBuilder) -> Expr {
        builder.build()
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn call(function: HostFn, args: Vec<Expr>) -> Expr {
    Expr::Call { function, args }
}

impl Expr {
    // ----- comparisons -----

    pub fn eq(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::Equal, self, rhs.into())
    }

    pub fn ne(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::NotEqual, self, rhs.into())
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::LessThan, self, rhs.into())
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::LessThanEqual, self, rhs.into())
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::GreaterThan, self, rhs.into())
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::GreaterThanEqual, self, rhs.into())
    }

    /// `self = null`, rendered as `IS NULL`.
    pub fn is_null(self) -> Expr {
        self.eq(null())
    }

    /// `self <> null`, rendered as `IS NOT NULL`.
    pub fn is_not_null(self) -> Expr {
        self.ne(null())
    }

    // ----- boolean logic -----

    pub fn and(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::And, self, rhs.into())
    }

    pub fn or(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::Or, self, rhs.into())
    }

    // ----- arithmetic -----

    pub fn add(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::Addition, self, rhs.into())
    }

    pub fn sub(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::Subtraction, self, rhs.into())
    }

    pub fn mul(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::Multiplication, self, rhs.into())
    }

    pub fn div(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::Division, self, rhs.into())
    }

    pub fn rem(self, rhs: impl Into<Expr>) -> Expr {
        binary(BinaryOp::ModuloDivision, self, rhs.into())
    }

    // ----- conversions -----

    pub fn to_integer(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::ToInteger,
            operand: Box::new(self),
        }
    }

    pub fn to_float(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::ToFloat,
            operand: Box::new(self),
        }
    }

    pub fn to_boolean(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::ToBoolean,
            operand: Box::new(self),
        }
    }

    pub fn to_string_value(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::ToStringValue,
            operand: Box::new(self),
        }
    }

    pub fn to_datetime(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::ToDateTime,
            operand: Box::new(self),
        }
    }

    /// Ternary conditional: `CASE WHEN self THEN a ELSE b END`.
    pub fn if_else(self, then_value: impl Into<Expr>, else_value: impl Into<Expr>) -> Expr {
        Expr::Conditional {
            condition: Box::new(self),
            then_value: Box::new(then_value.into()),
            else_value: Box::new(else_value.into()),
        }
    }

    // ----- string calls -----

    pub fn contains(self, needle: impl Into<Expr>) -> Expr {
        call(HostFn::Contains, vec![self, needle.into()])
    }

    pub fn starts_with(self, prefix: impl Into<Expr>) -> Expr {
        call(HostFn::StartsWith, vec![self, prefix.into()])
    }

    pub fn ends_with(self, suffix: impl Into<Expr>) -> Expr {
        call(HostFn::EndsWith, vec![self, suffix.into()])
    }

    pub fn to_lower(self) -> Expr {
        call(HostFn::ToLower, vec![self])
    }

    pub fn to_upper(self) -> Expr {
        call(HostFn::ToUpper, vec![self])
    }

    pub fn trim(self) -> Expr {
        call(HostFn::Trim, vec![self])
    }

    pub fn trim_start(self) -> Expr {
        call(HostFn::TrimStart, vec![self])
    }

    pub fn trim_end(self) -> Expr {
        call(HostFn::TrimEnd, vec![self])
    }

    pub fn replace(self, from: impl Into<Expr>, to: impl Into<Expr>) -> Expr {
        call(HostFn::Replace, vec![self, from.into(), to.into()])
    }

    pub fn substring(self, start: impl Into<Expr>) -> Expr {
        call(HostFn::Substring, vec![self, start.into()])
    }

    pub fn substring_len(self, start: impl Into<Expr>, len: impl Into<Expr>) -> Expr {
        call(HostFn::Substring, vec![self, start.into(), len.into()])
    }

    /// String length property, rendered as `size(..)`.
    pub fn length(self) -> Expr {
        call(HostFn::Length, vec![self])
    }

    pub fn is_null_or_empty(self) -> Expr {
        call(HostFn::IsNullOrEmpty, vec![self])
    }

    pub fn is_null_or_white_space(self) -> Expr {
        call(HostFn::IsNullOrWhiteSpace, vec![self])
    }

    // ----- math calls -----

    pub fn abs(self) -> Expr {
        call(HostFn::Abs, vec![self])
    }

    pub fn floor(self) -> Expr {
        call(HostFn::Floor, vec![self])
    }

    pub fn ceiling(self) -> Expr {
        call(HostFn::Ceiling, vec![self])
    }

    pub fn round(self) -> Expr {
        call(HostFn::Round, vec![self])
    }

    pub fn sqrt(self) -> Expr {
        call(HostFn::Sqrt, vec![self])
    }

    pub fn sign(self) -> Expr {
        call(HostFn::Sign, vec![self])
    }

    pub fn sin(self) -> Expr {
        call(HostFn::Sin, vec![self])
    }

    pub fn cos(self) -> Expr {
        call(HostFn::Cos, vec![self])
    }

    pub fn tan(self) -> Expr {
        call(HostFn::Tan, vec![self])
    }

    pub fn exp(self) -> Expr {
        call(HostFn::Exp, vec![self])
    }

    pub fn log(self) -> Expr {
        call(HostFn::Log, vec![self])
    }

    pub fn pow(self, exponent: impl Into<Expr>) -> Expr {
        call(HostFn::Pow, vec![self, exponent.into()])
    }

    // ----- date/time calls -----

    pub fn add_years(self, n: impl Into<Expr>) -> Expr {
        call(HostFn::AddYears, vec![self, n.into()])
    }

    pub fn add_months(self, n: impl Into<Expr>) -> Expr {
        call(HostFn::AddMonths, vec![self, n.into()])
    }

    pub fn add_days(self, n: impl Into<Expr>) -> Expr {
        call(HostFn::AddDays, vec![self, n.into()])
    }

    pub fn add_hours(self, n: impl Into<Expr>) -> Expr {
        call(HostFn::AddHours, vec![self, n.into()])
    }

    pub fn add_minutes(self, n: impl Into<Expr>) -> Expr {
        call(HostFn::AddMinutes, vec![self, n.into()])
    }

    pub fn add_seconds(self, n: impl Into<Expr>) -> Expr {
        call(HostFn::AddSeconds, vec![self, n.into()])
    }

    pub fn year(self) -> Expr {
        call(HostFn::Year, vec![self])
    }

    pub fn month(self) -> Expr {
        call(HostFn::Month, vec![self])
    }

    pub fn day(self) -> Expr {
        call(HostFn::Day, vec![self])
    }

    pub fn hour(self) -> Expr {
        call(HostFn::Hour, vec![self])
    }

    pub fn minute(self) -> Expr {
        call(HostFn::Minute, vec![self])
    }

    pub fn second(self) -> Expr {
        call(HostFn::Second, vec![self])
    }

    // ----- collection calls -----

    /// `self IN collection`.
    pub fn in_collection(self, collection: impl Into<Expr>) -> Expr {
        call(HostFn::InCollection, vec![self, collection.into()])
    }

    /// `ANY(x IN self WHERE pred)`.
    pub fn any_item(self, variable: &str, pred: impl FnOnce(Expr) -> Expr) -> Expr {
        lambda_over(HostFn::AnyIn, self, variable, pred)
    }

    /// `ALL(x IN self WHERE pred)`.
    pub fn all_items(self, variable: &str, pred: impl FnOnce(Expr) -> Expr) -> Expr {
        lambda_over(HostFn::AllIn, self, variable, pred)
    }

    /// `NONE(x IN self WHERE pred)`.
    pub fn no_items(self, variable: &str, pred: impl FnOnce(Expr) -> Expr) -> Expr {
        lambda_over(HostFn::NoneIn, self, variable, pred)
    }

    /// `SINGLE(x IN self WHERE pred)`.
    pub fn single_item(self, variable: &str, pred: impl FnOnce(Expr) -> Expr) -> Expr {
        lambda_over(HostFn::SingleIn, self, variable, pred)
    }

    /// Collection cardinality, rendered as `size(..)`.
    pub fn size(self) -> Expr {
        call(HostFn::Size, vec![self])
    }
}

fn lambda_over(
    function: HostFn,
    collection: Expr,
    variable: &str,
    pred: impl FnOnce(Expr) -> Expr,
) -> Expr {
    let body = pred(Expr::Variable(variable.to_string()));
    call(
        function,
        vec![
            collection,
            Expr::Lambda {
                variable: variable.to_string(),
                body: Box::new(body),
            },
        ],
    )
}

/// `datetime()`: current transaction time on the server.
pub fn now() -> Expr {
    call(HostFn::Now, vec![])
}

/// `datetime.realtime()`: wall-clock time on the server.
pub fn utc_now() -> Expr {
    call(HostFn::UtcNow, vec![])
}

/// `date()`: current date on the server.
pub fn today() -> Expr {
    call(HostFn::Today, vec![])
}

/// A fresh GUID, evaluated at translation time and parameterized.
pub fn new_guid() -> Expr {
    call(HostFn::NewGuid, vec![])
}

/// Variadic string concatenation; folded when no operand references the root.
pub fn concat(parts: Vec<Expr>) -> Expr {
    call(HostFn::Concat, parts)
}

macro_rules! expr_from_value {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for Expr {
            fn from(value: $ty) -> Expr {
                Expr::Constant(value.into())
            }
        })*
    };
}

expr_from_value!(
    i64,
    i32,
    f64,
    bool,
    &str,
    String,
    chrono::DateTime<chrono::Utc>,
    CypherValue,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_builds_binary() {
        let expr = prop("Age").gt(lit(30));
        match expr {
            Expr::Binary { op, lhs, .. } => {
                assert_eq!(op, BinaryOp::GreaterThan);
                assert!(matches!(*lhs, Expr::Property { .. }));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn and_all_empty_is_none() {
        assert!(and_all(vec![]).is_none());
    }

    #[test]
    fn and_all_single_returns_it() {
        let pred = prop("A").is_null();
        assert_eq!(and_all(vec![pred.clone()]), Some(pred));
    }

    #[test]
    fn and_all_folds_left() {
        let combined = and_all(vec![
            prop("A").is_null(),
            prop("B").is_null(),
            prop("C").is_null(),
        ])
        .unwrap();
        // ((A AND B) AND C)
        match combined {
            Expr::Binary { op, lhs, .. } => {
                assert_eq!(op, BinaryOp::And);
                assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::And, .. }));
            }
            other => panic!("expected nested AND, got {:?}", other),
        }
    }

    #[test]
    fn record_builder_preserves_order() {
        let rec = record()
            .field("City", prop("City"))
            .field("Count", lit(1))
            .build();
        match rec {
            Expr::Record(fields) => {
                assert_eq!(fields[0].0, "City");
                assert_eq!(fields[1].0, "Count");
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn lambda_binds_variable() {
        let expr = prop("Tags").any_item("x", |x| x.eq(lit("rust")));
        match expr {
            Expr::Call { function, args } => {
                assert_eq!(function, HostFn::AnyIn);
                assert!(matches!(&args[1], Expr::Lambda { variable, .. } if variable == "x"));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }
}
