//! Expression Types
//!
//! This module defines the expression tree produced by the combinator DSL and
//! consumed by the translator. Expressions are intermediate representations
//! between the typed queryable surface and generated Cypher fragments.
//!
//! # Module Organization
//!
//! - **mod.rs** (this file): Type definitions and Display implementations
//! - **combinators.rs**: Fluent helpers for building expressions
//! - **visitors.rs**: Traversal helpers (walk, root detection)
//! - **folding.rs**: Constant folding of evaluable host calls
//! - **errors.rs**: Error types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod combinators;
pub mod errors;
pub mod folding;
pub mod visitors;

pub use errors::ExpressionError;

/// A runtime value captured from the caller's environment.
///
/// Captured values never appear inline in generated Cypher; the translator
/// moves them into the parameter table and emits a `$pN` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CypherValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(DateTime<Utc>),
    List(Vec<CypherValue>),
    Map(Vec<(String, CypherValue)>),
}

impl CypherValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CypherValue::Null)
    }

    /// Human-readable value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CypherValue::Null => "null",
            CypherValue::Bool(_) => "boolean",
            CypherValue::Int(_) => "integer",
            CypherValue::Float(_) => "float",
            CypherValue::Str(_) => "string",
            CypherValue::DateTime(_) => "datetime",
            CypherValue::List(_) => "list",
            CypherValue::Map(_) => "map",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CypherValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CypherValue::Float(f) => Some(*f),
            CypherValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CypherValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CypherValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CypherValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl From<i64> for CypherValue {
    fn from(v: i64) -> Self {
        CypherValue::Int(v)
    }
}

impl From<i32> for CypherValue {
    fn from(v: i32) -> Self {
        CypherValue::Int(v as i64)
    }
}

impl From<f64> for CypherValue {
    fn from(v: f64) -> Self {
        CypherValue::Float(v)
    }
}

impl From<bool> for CypherValue {
    fn from(v: bool) -> Self {
        CypherValue::Bool(v)
    }
}

impl From<&str> for CypherValue {
    fn from(v: &str) -> Self {
        CypherValue::Str(v.to_string())
    }
}

impl From<String> for CypherValue {
    fn from(v: String) -> Self {
        CypherValue::Str(v)
    }
}

impl From<DateTime<Utc>> for CypherValue {
    fn from(v: DateTime<Utc>) -> Self {
        CypherValue::DateTime(v)
    }
}

impl<V: Into<CypherValue>> From<Vec<V>> for CypherValue {
    fn from(v: Vec<V>) -> Self {
        CypherValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CypherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CypherValue::Null => write!(f, "null"),
            CypherValue::Bool(b) => write!(f, "{}", b),
            CypherValue::Int(i) => write!(f, "{}", i),
            CypherValue::Float(v) => write!(f, "{}", v),
            CypherValue::Str(s) => write!(f, "'{}'", s),
            CypherValue::DateTime(dt) => write!(f, "datetime('{}')", dt.to_rfc3339()),
            CypherValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            CypherValue::Map(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

/// Binary operator in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    And,
    Or,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    ModuloDivision,
}

impl BinaryOp {
    /// The Cypher token for this operator.
    pub fn cypher_symbol(&self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanEqual => ">=",
            BinaryOp::Addition => "+",
            BinaryOp::Subtraction => "-",
            BinaryOp::Multiplication => "*",
            BinaryOp::Division => "/",
            BinaryOp::ModuloDivision => "%",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanEqual
        )
    }
}

/// Unary operator: logical negation and host-language conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    ToInteger,
    ToFloat,
    ToBoolean,
    ToStringValue,
    ToDateTime,
}

/// Host-language call recognized by the translator.
///
/// Each variant corresponds to one method/property of the host surface;
/// the function mapping table in `translator::functions` decides the Cypher
/// rendering, and `folding` decides evaluability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostFn {
    // String
    Contains,
    StartsWith,
    EndsWith,
    ToLower,
    ToUpper,
    Trim,
    TrimStart,
    TrimEnd,
    Replace,
    Substring,
    Length,
    IsNullOrEmpty,
    IsNullOrWhiteSpace,
    Concat,
    // Math
    Abs,
    Floor,
    Ceiling,
    Round,
    Sqrt,
    Sign,
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Pow,
    // Date and time
    Now,
    UtcNow,
    Today,
    AddYears,
    AddMonths,
    AddDays,
    AddHours,
    AddMinutes,
    AddSeconds,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    NewGuid,
    // Collections
    InCollection,
    AnyIn,
    AllIn,
    NoneIn,
    SingleIn,
    Size,
    // Aggregates (valid in SELECT / GROUP BY contexts)
    Count,
    CountWhere,
    Sum,
    Avg,
    Min,
    Max,
    Collect,
}

impl HostFn {
    /// Host-surface name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            HostFn::Contains => "contains",
            HostFn::StartsWith => "starts_with",
            HostFn::EndsWith => "ends_with",
            HostFn::ToLower => "to_lower",
            HostFn::ToUpper => "to_upper",
            HostFn::Trim => "trim",
            HostFn::TrimStart => "trim_start",
            HostFn::TrimEnd => "trim_end",
            HostFn::Replace => "replace",
            HostFn::Substring => "substring",
            HostFn::Length => "length",
            HostFn::IsNullOrEmpty => "is_null_or_empty",
            HostFn::IsNullOrWhiteSpace => "is_null_or_white_space",
            HostFn::Concat => "concat",
            HostFn::Abs => "abs",
            HostFn::Floor => "floor",
            HostFn::Ceiling => "ceiling",
            HostFn::Round => "round",
            HostFn::Sqrt => "sqrt",
            HostFn::Sign => "sign",
            HostFn::Sin => "sin",
            HostFn::Cos => "cos",
            HostFn::Tan => "tan",
            HostFn::Exp => "exp",
            HostFn::Log => "log",
            HostFn::Pow => "pow",
            HostFn::Now => "now",
            HostFn::UtcNow => "utc_now",
            HostFn::Today => "today",
            HostFn::AddYears => "add_years",
            HostFn::AddMonths => "add_months",
            HostFn::AddDays => "add_days",
            HostFn::AddHours => "add_hours",
            HostFn::AddMinutes => "add_minutes",
            HostFn::AddSeconds => "add_seconds",
            HostFn::Year => "year",
            HostFn::Month => "month",
            HostFn::Day => "day",
            HostFn::Hour => "hour",
            HostFn::Minute => "minute",
            HostFn::Second => "second",
            HostFn::NewGuid => "new_guid",
            HostFn::InCollection => "in_collection",
            HostFn::AnyIn => "any_in",
            HostFn::AllIn => "all_in",
            HostFn::NoneIn => "none_in",
            HostFn::SingleIn => "single_in",
            HostFn::Size => "size",
            HostFn::Count => "count",
            HostFn::CountWhere => "count_where",
            HostFn::Sum => "sum",
            HostFn::Avg => "avg",
            HostFn::Min => "min",
            HostFn::Max => "max",
            HostFn::Collect => "collect",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            HostFn::Count
                | HostFn::CountWhere
                | HostFn::Sum
                | HostFn::Avg
                | HostFn::Min
                | HostFn::Max
                | HostFn::Collect
        )
    }
}

/// Sort direction for ORDER BY items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn cypher_keyword(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    pub fn reversed(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The expression tree.
///
/// `Root` stands for the lambda parameter of the enclosing predicate or
/// selector: the node, relationship, path segment or grouping being queried.
/// Member access is modelled structurally (`Property`, `StartNode`, ...) so
/// the translator can resolve aliases without host reflection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// The element the enclosing lambda ranges over.
    Root,

    /// A variable bound by an enclosing `Lambda` or an UNWIND item.
    Variable(String),

    /// A value captured from the caller's environment.
    Constant(CypherValue),

    /// Member access: `base.name`.
    Property { base: Box<Expr>, name: String },

    /// Path-segment start node (`seg.start_node()`).
    StartNode(Box<Expr>),

    /// Path-segment end node (`seg.end_node()`).
    EndNode(Box<Expr>),

    /// Path-segment relationship (`seg.relationship()`).
    Relationship(Box<Expr>),

    /// Identifier of a relationship's start node.
    StartNodeId(Box<Expr>),

    /// Identifier of a relationship's end node.
    EndNodeId(Box<Expr>),

    /// The key of a grouping (`g.key()`).
    GroupKey,

    /// Anonymous projection record: `{ name: expr, ... }`.
    Record(Vec<(String, Expr)>),

    /// A list of expressions.
    List(Vec<Expr>),

    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Ternary conditional, rendered as `CASE WHEN .. THEN .. ELSE .. END`.
    Conditional {
        condition: Box<Expr>,
        then_value: Box<Expr>,
        else_value: Box<Expr>,
    },

    /// A host-language call.
    Call { function: HostFn, args: Vec<Expr> },

    /// A one-parameter lambda used by collection predicates
    /// (`ANY(x IN col WHERE ...)`).
    Lambda { variable: String, body: Box<Expr> },
}

impl Expr {
    /// A short structural description, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Root => "root".to_string(),
            Expr::Variable(v) => format!("variable '{}'", v),
            Expr::Constant(v) => format!("constant ({})", v.kind()),
            Expr::Property { name, .. } => format!("member access '.{}'", name),
            Expr::StartNode(_) => "start-node access".to_string(),
            Expr::EndNode(_) => "end-node access".to_string(),
            Expr::Relationship(_) => "relationship access".to_string(),
            Expr::StartNodeId(_) => "start-node-id access".to_string(),
            Expr::EndNodeId(_) => "end-node-id access".to_string(),
            Expr::GroupKey => "group key".to_string(),
            Expr::Record(fields) => format!("record with {} fields", fields.len()),
            Expr::List(items) => format!("list with {} items", items.len()),
            Expr::Binary { op, .. } => format!("binary '{}'", op.cypher_symbol()),
            Expr::Unary { op, .. } => format!("unary {:?}", op),
            Expr::Conditional { .. } => "conditional".to_string(),
            Expr::Call { function, .. } => format!("call '{}'", function.name()),
            Expr::Lambda { variable, .. } => format!("lambda |{}|", variable),
        }
    }

    /// True when this expression is the bare lambda parameter.
    pub fn is_identity(&self) -> bool {
        matches!(self, Expr::Root)
    }

    pub fn is_constant_null(&self) -> bool {
        matches!(self, Expr::Constant(CypherValue::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_display() {
        assert_eq!(CypherValue::Null.to_string(), "null");
        assert_eq!(CypherValue::Int(42).to_string(), "42");
        assert_eq!(CypherValue::Str("x".into()).to_string(), "'x'");
        assert_eq!(
            CypherValue::List(vec![CypherValue::Int(1), CypherValue::Int(2)]).to_string(),
            "[1, 2]"
        );
    }

    #[test]
    fn value_conversions() {
        assert_eq!(CypherValue::from(3), CypherValue::Int(3));
        assert_eq!(CypherValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(CypherValue::Str("a".into()).as_str(), Some("a"));
        assert!(CypherValue::Null.is_null());
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(BinaryOp::NotEqual.cypher_symbol(), "<>");
        assert!(BinaryOp::And.is_logical());
        assert!(BinaryOp::GreaterThanEqual.is_comparison());
        assert!(!BinaryOp::Addition.is_comparison());
    }

    #[test]
    fn sort_direction_reversal() {
        assert_eq!(
            SortDirection::Ascending.reversed(),
            SortDirection::Descending
        );
        assert_eq!(SortDirection::Descending.cypher_keyword(), "DESC");
    }
}
