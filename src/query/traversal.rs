//! Traversal Queryable
//!
//! The element type is the traversal target; predicates and selectors range
//! over target nodes. Depth and direction only annotate the open traversal;
//! the pattern itself is compiled when a terminal operator fires.

use std::marker::PhantomData;

use crate::client::{CancellationToken, Record};
use crate::cypher::{CypherQuery, Direction};
use crate::errors::GraphQueryError;
use crate::expression::{CypherValue, Expr, SortDirection};
use crate::operators::{QueryOp, Terminal, TraversalOptions};
use crate::schema::{ElementInfo, NodeElement, RelationshipElement};
use crate::transaction::Transaction;

use super::generic::GenericQuery;
use super::var::Var;
use super::{Grouping, QueryCore};

pub struct TraversalQuery<S: 'static, R: RelationshipElement, T: NodeElement> {
    core: QueryCore,
    _marker: PhantomData<fn() -> (S, R, T)>,
}

impl<S: 'static, R: RelationshipElement, T: NodeElement> Clone for TraversalQuery<S, R, T> {
    fn clone(&self) -> Self {
        Self::wrap(self.core.clone())
    }
}

impl<S: 'static, R: RelationshipElement, T: NodeElement> TraversalQuery<S, R, T> {
    pub(crate) fn wrap(core: QueryCore) -> Self {
        TraversalQuery {
            core,
            _marker: PhantomData,
        }
    }

    fn with(&self, op: QueryOp) -> Self {
        Self::wrap(self.core.append(op))
    }

    // ----- traversal-specific operators -----

    /// Traversal direction; at most one call per chain.
    pub fn in_direction(&self, direction: Direction) -> Self {
        self.with(QueryOp::InDirection(direction))
    }

    /// Maximum depth (`*1..max`).
    pub fn with_depth(&self, max: u32) -> Self {
        self.with(QueryOp::WithDepth {
            min: None,
            max: Some(max),
        })
    }

    /// Depth range (`*min..max`).
    pub fn with_depth_range(&self, min: u32, max: u32) -> Self {
        self.with(QueryOp::WithDepth {
            min: Some(min),
            max: Some(max),
        })
    }

    /// Apply several traversal options in one call.
    pub fn with_options(&self, options: TraversalOptions) -> Self {
        let mut query = self.clone();
        if options.min_depth.is_some() || options.max_depth.is_some() {
            query = query.with(QueryOp::WithDepth {
                min: options.min_depth,
                max: options.max_depth,
            });
        }
        if let Some(direction) = options.direction {
            query = query.with(QueryOp::InDirection(direction));
        }
        query
    }

    /// Continue traversing from the current targets.
    pub fn then_traverse<R2: RelationshipElement, T2: NodeElement>(
        &self,
    ) -> TraversalQuery<T, R2, T2> {
        TraversalQuery::wrap(self.core.append(QueryOp::ThenTraverse {
            relationship: ElementInfo::relationship::<R2>(),
            target: ElementInfo::node::<T2>(),
        }))
    }

    /// Project the traversed relationships instead of the target nodes.
    pub fn relationships(&self) -> GenericQuery<R> {
        GenericQuery::wrap(self.core.append(QueryOp::TraversalRelationships))
    }

    /// Retarget the open traversal at a different node type.
    pub fn to<NewTgt: NodeElement>(&self) -> GenericQuery<NewTgt> {
        GenericQuery::wrap(
            self.core
                .append(QueryOp::TraversalTo(ElementInfo::node::<NewTgt>())),
        )
    }

    // ----- common operators (over the target element) -----

    pub fn where_(&self, predicate: impl FnOnce(Var<T>) -> Expr) -> Self {
        self.with(QueryOp::Where(predicate(Var::root())))
    }

    pub fn select<P: 'static>(&self, selector: impl FnOnce(Var<T>) -> Expr) -> GenericQuery<P> {
        GenericQuery::wrap(self.core.append(QueryOp::Select(selector(Var::root()))))
    }

    pub fn order_by(&self, key: impl FnOnce(Var<T>) -> Expr) -> Self {
        self.with(QueryOp::OrderBy {
            key: key(Var::root()),
            direction: SortDirection::Ascending,
        })
    }

    pub fn order_by_desc(&self, key: impl FnOnce(Var<T>) -> Expr) -> Self {
        self.with(QueryOp::OrderBy {
            key: key(Var::root()),
            direction: SortDirection::Descending,
        })
    }

    pub fn then_by(&self, key: impl FnOnce(Var<T>) -> Expr) -> Self {
        self.with(QueryOp::ThenBy {
            key: key(Var::root()),
            direction: SortDirection::Ascending,
        })
    }

    pub fn then_by_desc(&self, key: impl FnOnce(Var<T>) -> Expr) -> Self {
        self.with(QueryOp::ThenBy {
            key: key(Var::root()),
            direction: SortDirection::Descending,
        })
    }

    pub fn take(&self, count: i64) -> Self {
        self.with(QueryOp::Take(count))
    }

    pub fn skip(&self, count: i64) -> Self {
        self.with(QueryOp::Skip(count))
    }

    pub fn distinct(&self) -> Self {
        self.with(QueryOp::Distinct)
    }

    pub fn group_by(&self, key: impl FnOnce(Var<T>) -> Expr) -> GenericQuery<Grouping<T>> {
        GenericQuery::wrap(self.core.append(QueryOp::GroupBy {
            key: key(Var::root()),
            element: None,
        }))
    }

    pub fn with_transaction(&self, transaction: &Transaction) -> Self {
        self.with(QueryOp::WithTransaction(transaction.clone()))
    }

    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self::wrap(self.core.with_cancellation(token))
    }

    // ----- compilation -----

    pub fn to_cypher(&self) -> Result<CypherQuery, GraphQueryError> {
        self.core.compile(&Terminal::ToList)
    }

    pub fn to_cypher_for(&self, terminal: &Terminal) -> Result<CypherQuery, GraphQueryError> {
        self.core.compile(terminal)
    }

    // ----- terminal operators -----

    pub async fn to_list(&self) -> Result<Vec<Record>, GraphQueryError> {
        self.core.run_to_list().await
    }

    pub async fn to_array(&self) -> Result<Vec<Record>, GraphQueryError> {
        self.core.run_to_list().await
    }

    pub async fn first(&self) -> Result<Record, GraphQueryError> {
        super::required(self.core.run_first(false, None).await?, "first")
    }

    pub async fn first_or_default(&self) -> Result<Option<Record>, GraphQueryError> {
        self.core.run_first(true, None).await
    }

    pub async fn single(&self) -> Result<Record, GraphQueryError> {
        super::required(self.core.run_single(false, None).await?, "single")
    }

    pub async fn single_or_default(&self) -> Result<Option<Record>, GraphQueryError> {
        self.core.run_single(true, None).await
    }

    pub async fn last(&self) -> Result<Record, GraphQueryError> {
        super::required(self.core.run_last(false, None).await?, "last")
    }

    pub async fn last_or_default(&self) -> Result<Option<Record>, GraphQueryError> {
        self.core.run_last(true, None).await
    }

    pub async fn any(&self) -> Result<bool, GraphQueryError> {
        self.core.run_any(None).await
    }

    pub async fn any_where(
        &self,
        predicate: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<bool, GraphQueryError> {
        self.core.run_any(Some(predicate(Var::root()))).await
    }

    pub async fn all(
        &self,
        predicate: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<bool, GraphQueryError> {
        self.core.run_all(predicate(Var::root())).await
    }

    pub async fn count(&self) -> Result<i64, GraphQueryError> {
        self.core.run_count(None).await
    }

    pub async fn count_where(
        &self,
        predicate: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<i64, GraphQueryError> {
        self.core.run_count(Some(predicate(Var::root()))).await
    }

    pub async fn sum(
        &self,
        selector: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::Sum(selector(Var::root())))
            .await
    }

    pub async fn average(
        &self,
        selector: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::Average(selector(Var::root())))
            .await
    }

    pub async fn min_of(
        &self,
        selector: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::MinOf(selector(Var::root())))
            .await
    }

    pub async fn max_of(
        &self,
        selector: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::MaxOf(selector(Var::root())))
            .await
    }

    pub async fn contains_item(
        &self,
        value: impl Into<CypherValue>,
    ) -> Result<bool, GraphQueryError> {
        self.core.run_contains(value.into()).await
    }

    pub async fn element_at(&self, index: i64) -> Result<Option<Record>, GraphQueryError> {
        self.core.run_element_at(index).await
    }
}
