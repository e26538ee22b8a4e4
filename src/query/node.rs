//! Node Queryable

use std::marker::PhantomData;

use crate::client::{CancellationToken, Record};
use crate::cypher::CypherQuery;
use crate::errors::GraphQueryError;
use crate::expression::{CypherValue, Expr, SortDirection};
use crate::operators::{OperatorTree, QueryOp, QueryRoot, Terminal};
use crate::schema::{ElementInfo, NodeElement, RelationshipElement};
use crate::transaction::Transaction;

use super::generic::GenericQuery;
use super::path_segment::PathSegmentQuery;
use super::traversal::TraversalQuery;
use super::var::Var;
use super::{GraphContext, Grouping, QueryCore};

/// A lazily-evaluated query over nodes of type `T`.
pub struct NodeQuery<T: NodeElement> {
    core: QueryCore,
    _marker: PhantomData<fn() -> T>,
}

impl<T: NodeElement> Clone for NodeQuery<T> {
    fn clone(&self) -> Self {
        Self::wrap(self.core.clone())
    }
}

impl<T: NodeElement> NodeQuery<T> {
    pub(crate) fn new(context: GraphContext) -> Self {
        let tree = OperatorTree::new(QueryRoot::node(ElementInfo::node::<T>()));
        Self::wrap(QueryCore::new(context, tree))
    }

    fn wrap(core: QueryCore) -> Self {
        NodeQuery {
            core,
            _marker: PhantomData,
        }
    }

    fn with(&self, op: QueryOp) -> Self {
        Self::wrap(self.core.append(op))
    }

    // ----- common operators -----

    pub fn where_(&self, predicate: impl FnOnce(Var<T>) -> Expr) -> Self {
        self.with(QueryOp::Where(predicate(Var::root())))
    }

    /// Projection; the resulting rows are no longer node entities.
    pub fn select<P: 'static>(&self, selector: impl FnOnce(Var<T>) -> Expr) -> GenericQuery<P> {
        GenericQuery::wrap(self.core.append(QueryOp::Select(selector(Var::root()))))
    }

    /// Flatten a collection-valued property; rows become its items.
    pub fn select_many<P: 'static>(
        &self,
        collection: impl FnOnce(Var<T>) -> Expr,
    ) -> GenericQuery<P> {
        GenericQuery::wrap(self.core.append(QueryOp::SelectMany {
            collection: collection(Var::root()),
            item_variable: "item".to_string(),
            result: None,
        }))
    }

    /// Flatten a collection-valued property and project each (element, item)
    /// pair; the item is visible to the selector as a bound variable.
    pub fn select_many_with<P: 'static>(
        &self,
        collection: impl FnOnce(Var<T>) -> Expr,
        result: impl FnOnce(Var<T>, Var<CypherValue>) -> Expr,
    ) -> GenericQuery<P> {
        let item: Var<CypherValue> = Var::from_expr(Expr::Variable("item".to_string()));
        GenericQuery::wrap(self.core.append(QueryOp::SelectMany {
            collection: collection(Var::root()),
            item_variable: "item".to_string(),
            result: Some(result(Var::root(), item)),
        }))
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

    pub fn group_by_with(
        &self,
        key: impl FnOnce(Var<T>) -> Expr,
        element: impl FnOnce(Var<T>) -> Expr,
    ) -> GenericQuery<Grouping<T>> {
        GenericQuery::wrap(self.core.append(QueryOp::GroupBy {
            key: key(Var::root()),
            element: Some(element(Var::root())),
        }))
    }

    /// Cartesian join with key equality; the result selector sees the inner
    /// element through its own `Var`.
    pub fn join<I: NodeElement, P: 'static>(
        &self,
        inner: &NodeQuery<I>,
        outer_key: impl FnOnce(Var<T>) -> Expr,
        inner_key: impl FnOnce(Var<I>) -> Expr,
        result: impl FnOnce(Var<T>, Var<I>) -> Expr,
    ) -> GenericQuery<P> {
        let inner_var: Var<I> = Var::from_expr(Expr::Variable("joined".to_string()));
        GenericQuery::wrap(self.core.append(QueryOp::Join {
            inner: Box::new(inner.core.tree().clone()),
            outer_key: outer_key(Var::root()),
            inner_key: inner_key(Var::root()),
            result: result(Var::root(), inner_var),
        }))
    }

    pub fn union(&self, other: &Self) -> Self {
        self.with(QueryOp::Union(Box::new(other.core.tree().clone())))
    }

    pub fn concat(&self, other: &Self) -> Self {
        self.with(QueryOp::Concat(Box::new(other.core.tree().clone())))
    }

    pub fn with_transaction(&self, transaction: &Transaction) -> Self {
        self.with(QueryOp::WithTransaction(transaction.clone()))
    }

    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self::wrap(self.core.with_cancellation(token))
    }

    // ----- node-specific operators -----

    /// Traverse a relationship to target nodes.
    pub fn traverse<R: RelationshipElement, Tgt: NodeElement>(
        &self,
    ) -> TraversalQuery<T, R, Tgt> {
        TraversalQuery::wrap(self.core.append(QueryOp::Traverse {
            relationship: ElementInfo::relationship::<R>(),
            target: ElementInfo::node::<Tgt>(),
        }))
    }

    /// Query (start, relationship, end) triples.
    pub fn path_segments<R: RelationshipElement, Tgt: NodeElement>(
        &self,
    ) -> PathSegmentQuery<T, R, Tgt> {
        PathSegmentQuery::wrap(self.core.append(QueryOp::PathSegments {
            relationship: ElementInfo::relationship::<R>(),
            target: ElementInfo::node::<Tgt>(),
        }))
    }

    // ----- compilation -----

    /// Compile to Cypher without executing (terminal shape: `to_list`).
    pub fn to_cypher(&self) -> Result<CypherQuery, GraphQueryError> {
        self.core.compile(&Terminal::ToList)
    }

    /// Compile with an explicit terminal operator.
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

    pub async fn first_where(
        &self,
        predicate: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<Record, GraphQueryError> {
        super::required(
            self.core
                .run_first(false, Some(predicate(Var::root())))
                .await?,
            "first",
        )
    }

    pub async fn single(&self) -> Result<Record, GraphQueryError> {
        super::required(self.core.run_single(false, None).await?, "single")
    }

    pub async fn single_or_default(&self) -> Result<Option<Record>, GraphQueryError> {
        self.core.run_single(true, None).await
    }

    pub async fn single_where(
        &self,
        predicate: impl FnOnce(Var<T>) -> Expr,
    ) -> Result<Record, GraphQueryError> {
        super::required(
            self.core
                .run_single(false, Some(predicate(Var::root())))
                .await?,
            "single",
        )
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
