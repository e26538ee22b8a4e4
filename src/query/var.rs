//! Expression Root Proxies
//!
//! A `Var<T>` is what a predicate or selector closure receives: a typed
//! handle on the element the lambda ranges over. Everything it produces is
//! an `Expr`; the type parameter exists so path segments, relationships and
//! groupings can expose their structural members with the right element
//! types.

use std::marker::PhantomData;

use crate::expression::{Expr, HostFn};
use crate::schema::RelationshipElement;

use super::path_segment::PathSegment;
use super::Grouping;

pub struct Var<T: ?Sized> {
    expr: Expr,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ?Sized> Clone for Var<T> {
    fn clone(&self) -> Self {
        Var {
            expr: self.expr.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Var<T> {
    pub(crate) fn root() -> Self {
        Var {
            expr: Expr::Root,
            _marker: PhantomData,
        }
    }

    pub(crate) fn from_expr(expr: Expr) -> Self {
        Var {
            expr,
            _marker: PhantomData,
        }
    }

    /// Member access: `p.prop("Age")` is the element's `Age` property.
    pub fn prop(&self, name: impl Into<String>) -> Expr {
        Expr::Property {
            base: Box::new(self.expr.clone()),
            name: name.into(),
        }
    }

    /// The element itself (identity projection, equality against captured
    /// values).
    pub fn value(&self) -> Expr {
        self.expr.clone()
    }
}

impl<T: RelationshipElement> Var<T> {
    /// Identifier of the relationship's start node.
    pub fn start_node_id(&self) -> Expr {
        Expr::StartNodeId(Box::new(self.expr.clone()))
    }

    /// Identifier of the relationship's end node.
    pub fn end_node_id(&self) -> Expr {
        Expr::EndNodeId(Box::new(self.expr.clone()))
    }
}

impl<S: 'static, R: 'static, T: 'static> Var<PathSegment<S, R, T>> {
    pub fn start_node(&self) -> Var<S> {
        Var::from_expr(Expr::StartNode(Box::new(self.expr.clone())))
    }

    pub fn end_node(&self) -> Var<T> {
        Var::from_expr(Expr::EndNode(Box::new(self.expr.clone())))
    }

    pub fn relationship(&self) -> Var<R> {
        Var::from_expr(Expr::Relationship(Box::new(self.expr.clone())))
    }
}

impl<T: 'static> Var<Grouping<T>> {
    /// The grouping key.
    pub fn key(&self) -> Expr {
        Expr::GroupKey
    }

    /// Number of elements in the group.
    pub fn count(&self) -> Expr {
        Expr::Call {
            function: HostFn::Count,
            args: vec![],
        }
    }

    /// Number of group elements satisfying the predicate.
    pub fn count_where(&self, predicate: impl FnOnce(Var<T>) -> Expr) -> Expr {
        Expr::Call {
            function: HostFn::CountWhere,
            args: vec![predicate(Var::root())],
        }
    }

    pub fn sum(&self, selector: impl FnOnce(Var<T>) -> Expr) -> Expr {
        self.aggregate(HostFn::Sum, selector)
    }

    pub fn avg(&self, selector: impl FnOnce(Var<T>) -> Expr) -> Expr {
        self.aggregate(HostFn::Avg, selector)
    }

    pub fn min_of(&self, selector: impl FnOnce(Var<T>) -> Expr) -> Expr {
        self.aggregate(HostFn::Min, selector)
    }

    pub fn max_of(&self, selector: impl FnOnce(Var<T>) -> Expr) -> Expr {
        self.aggregate(HostFn::Max, selector)
    }

    /// The group's elements collected into a list.
    pub fn elements(&self) -> Expr {
        Expr::Call {
            function: HostFn::Collect,
            args: vec![],
        }
    }

    fn aggregate(&self, function: HostFn, selector: impl FnOnce(Var<T>) -> Expr) -> Expr {
        Expr::Call {
            function,
            args: vec![selector(Var::root())],
        }
    }
}
