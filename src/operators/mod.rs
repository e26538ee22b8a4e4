//! Operator Tree
//!
//! The lazy record of query operators chained by the user. Each queryable
//! holds an immutable `OperatorTree`; chaining clones the tree and appends
//! one operator. Nothing here performs I/O; the tree is inert data until a
//! terminal operator hands it to the provider.
//!
//! Operator kinds are a closed enum with statically-typed payloads; the
//! visitor dispatches on `OperatorKind` through the handler registry instead
//! of reflecting over generic method signatures.

use crate::cypher::{Direction, QueryRootKind};
use crate::expression::{CypherValue, Expr, SortDirection};
use crate::schema::ElementInfo;
use crate::transaction::Transaction;

/// Root queryable of an operator tree.
#[derive(Debug, Clone)]
pub struct QueryRoot {
    pub kind: QueryRootKind,
    pub element: ElementInfo,
}

impl QueryRoot {
    pub fn node(element: ElementInfo) -> Self {
        QueryRoot {
            kind: QueryRootKind::Node,
            element,
        }
    }

    pub fn relationship(element: ElementInfo) -> Self {
        QueryRoot {
            kind: QueryRootKind::Relationship,
            element,
        }
    }
}

/// Options applied to an open traversal in one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOptions {
    pub min_depth: Option<u32>,
    pub max_depth: Option<u32>,
    pub direction: Option<Direction>,
}

/// One recorded, non-terminal operator.
#[derive(Debug, Clone)]
pub enum QueryOp {
    Where(Expr),
    Select(Expr),
    SelectMany {
        collection: Expr,
        item_variable: String,
        result: Option<Expr>,
    },
    OrderBy {
        key: Expr,
        direction: SortDirection,
    },
    ThenBy {
        key: Expr,
        direction: SortDirection,
    },
    Take(i64),
    Skip(i64),
    Distinct,
    GroupBy {
        key: Expr,
        element: Option<Expr>,
    },
    Join {
        inner: Box<OperatorTree>,
        outer_key: Expr,
        inner_key: Expr,
        result: Expr,
    },
    Union(Box<OperatorTree>),
    Concat(Box<OperatorTree>),
    Traverse {
        relationship: ElementInfo,
        target: ElementInfo,
    },
    ThenTraverse {
        relationship: ElementInfo,
        target: ElementInfo,
    },
    WithDepth {
        min: Option<u32>,
        max: Option<u32>,
    },
    InDirection(Direction),
    /// Project the relationships of the open traversal.
    TraversalRelationships,
    /// Retarget the open traversal to a different target type.
    TraversalTo(ElementInfo),
    PathSegments {
        relationship: ElementInfo,
        target: ElementInfo,
    },
    WithTransaction(Transaction),
}

/// A terminal operator; triggers execution.
#[derive(Debug, Clone)]
pub enum Terminal {
    ToList,
    ToArray,
    First {
        or_default: bool,
        predicate: Option<Expr>,
    },
    Single {
        or_default: bool,
        predicate: Option<Expr>,
    },
    Last {
        or_default: bool,
        predicate: Option<Expr>,
    },
    Any {
        predicate: Option<Expr>,
    },
    All {
        predicate: Expr,
    },
    Count {
        predicate: Option<Expr>,
    },
    Sum(Expr),
    Average(Expr),
    MinOf(Expr),
    MaxOf(Expr),
    ContainsItem(CypherValue),
    ElementAt(i64),
}

/// Discriminant used for handler registration and lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Root,
    Where,
    Select,
    SelectMany,
    OrderBy,
    ThenBy,
    Take,
    Skip,
    Distinct,
    GroupBy,
    Join,
    Union,
    Concat,
    Traverse,
    ThenTraverse,
    WithDepth,
    InDirection,
    TraversalRelationships,
    TraversalTo,
    PathSegments,
    WithTransaction,
    ToList,
    ToArray,
    First,
    Single,
    Last,
    Any,
    All,
    Count,
    Sum,
    Average,
    MinOf,
    MaxOf,
    ContainsItem,
    ElementAt,
}

impl OperatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::Root => "root",
            OperatorKind::Where => "where",
            OperatorKind::Select => "select",
            OperatorKind::SelectMany => "select_many",
            OperatorKind::OrderBy => "order_by",
            OperatorKind::ThenBy => "then_by",
            OperatorKind::Take => "take",
            OperatorKind::Skip => "skip",
            OperatorKind::Distinct => "distinct",
            OperatorKind::GroupBy => "group_by",
            OperatorKind::Join => "join",
            OperatorKind::Union => "union",
            OperatorKind::Concat => "concat",
            OperatorKind::Traverse => "traverse",
            OperatorKind::ThenTraverse => "then_traverse",
            OperatorKind::WithDepth => "with_depth",
            OperatorKind::InDirection => "in_direction",
            OperatorKind::TraversalRelationships => "relationships",
            OperatorKind::TraversalTo => "to",
            OperatorKind::PathSegments => "path_segments",
            OperatorKind::WithTransaction => "with_transaction",
            OperatorKind::ToList => "to_list",
            OperatorKind::ToArray => "to_array",
            OperatorKind::First => "first",
            OperatorKind::Single => "single",
            OperatorKind::Last => "last",
            OperatorKind::Any => "any",
            OperatorKind::All => "all",
            OperatorKind::Count => "count",
            OperatorKind::Sum => "sum",
            OperatorKind::Average => "average",
            OperatorKind::MinOf => "min",
            OperatorKind::MaxOf => "max",
            OperatorKind::ContainsItem => "contains",
            OperatorKind::ElementAt => "element_at",
        }
    }
}

impl QueryOp {
    pub fn kind(&self) -> OperatorKind {
        match self {
            QueryOp::Where(_) => OperatorKind::Where,
            QueryOp::Select(_) => OperatorKind::Select,
            QueryOp::SelectMany { .. } => OperatorKind::SelectMany,
            QueryOp::OrderBy { .. } => OperatorKind::OrderBy,
            QueryOp::ThenBy { .. } => OperatorKind::ThenBy,
            QueryOp::Take(_) => OperatorKind::Take,
            QueryOp::Skip(_) => OperatorKind::Skip,
            QueryOp::Distinct => OperatorKind::Distinct,
            QueryOp::GroupBy { .. } => OperatorKind::GroupBy,
            QueryOp::Join { .. } => OperatorKind::Join,
            QueryOp::Union(_) => OperatorKind::Union,
            QueryOp::Concat(_) => OperatorKind::Concat,
            QueryOp::Traverse { .. } => OperatorKind::Traverse,
            QueryOp::ThenTraverse { .. } => OperatorKind::ThenTraverse,
            QueryOp::WithDepth { .. } => OperatorKind::WithDepth,
            QueryOp::InDirection(_) => OperatorKind::InDirection,
            QueryOp::TraversalRelationships => OperatorKind::TraversalRelationships,
            QueryOp::TraversalTo(_) => OperatorKind::TraversalTo,
            QueryOp::PathSegments { .. } => OperatorKind::PathSegments,
            QueryOp::WithTransaction(_) => OperatorKind::WithTransaction,
        }
    }

    /// Number of captured sub-expressions; one of the registry lookup keys.
    pub fn arity(&self) -> usize {
        match self {
            QueryOp::Where(_) | QueryOp::Select(_) => 1,
            QueryOp::SelectMany { result, .. } => 1 + usize::from(result.is_some()),
            QueryOp::OrderBy { .. } | QueryOp::ThenBy { .. } => 1,
            QueryOp::GroupBy { element, .. } => 1 + usize::from(element.is_some()),
            QueryOp::Join { .. } => 3,
            _ => 0,
        }
    }
}

impl Terminal {
    pub fn kind(&self) -> OperatorKind {
        match self {
            Terminal::ToList => OperatorKind::ToList,
            Terminal::ToArray => OperatorKind::ToArray,
            Terminal::First { .. } => OperatorKind::First,
            Terminal::Single { .. } => OperatorKind::Single,
            Terminal::Last { .. } => OperatorKind::Last,
            Terminal::Any { .. } => OperatorKind::Any,
            Terminal::All { .. } => OperatorKind::All,
            Terminal::Count { .. } => OperatorKind::Count,
            Terminal::Sum(_) => OperatorKind::Sum,
            Terminal::Average(_) => OperatorKind::Average,
            Terminal::MinOf(_) => OperatorKind::MinOf,
            Terminal::MaxOf(_) => OperatorKind::MaxOf,
            Terminal::ContainsItem(_) => OperatorKind::ContainsItem,
            Terminal::ElementAt(_) => OperatorKind::ElementAt,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Terminal::First { predicate, .. }
            | Terminal::Single { predicate, .. }
            | Terminal::Last { predicate, .. }
            | Terminal::Any { predicate }
            | Terminal::Count { predicate } => usize::from(predicate.is_some()),
            Terminal::All { .. }
            | Terminal::Sum(_)
            | Terminal::Average(_)
            | Terminal::MinOf(_)
            | Terminal::MaxOf(_) => 1,
            _ => 0,
        }
    }
}

/// The lazy operator record a queryable carries.
#[derive(Debug, Clone)]
pub struct OperatorTree {
    pub root: QueryRoot,
    pub ops: Vec<QueryOp>,
}

impl OperatorTree {
    pub fn new(root: QueryRoot) -> Self {
        OperatorTree {
            root,
            ops: Vec::new(),
        }
    }

    /// Clone-and-append; the receiver is left untouched.
    pub fn append(&self, op: QueryOp) -> Self {
        let mut ops = self.ops.clone();
        ops.push(op);
        OperatorTree {
            root: self.root.clone(),
            ops,
        }
    }

    /// True when any `select` in the chain is a non-identity projection.
    pub fn has_projection(&self) -> bool {
        self.ops.iter().any(|op| match op {
            QueryOp::Select(expr) => !expr.is_identity(),
            _ => false,
        })
    }
}
