//! Path-Segment Queryable
//!
//! A path segment is the (start node, relationship, end node) triple matched
//! by `(src)-[r]->(tgt)`. Predicates and selectors range over the whole
//! triple; `Var<PathSegment<..>>` exposes the three components.

use std::marker::PhantomData;

use crate::client::{CancellationToken, Record};
use crate::cypher::CypherQuery;
use crate::errors::GraphQueryError;
use crate::expression::{CypherValue, Expr, SortDirection};
use crate::operators::{QueryOp, Terminal};
use crate::transaction::Transaction;

use super::generic::GenericQuery;
use super::var::Var;
use super::QueryCore;

/// The triple record a path-segment query yields.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment<S, R, T> {
    pub start_node: S,
    pub relationship: R,
    pub end_node: T,
}

pub struct PathSegmentQuery<S: 'static, R: 'static, T: 'static> {
    core: QueryCore,
    _marker: PhantomData<fn() -> (S, R, T)>,
}

impl<S: 'static, R: 'static, T: 'static> Clone for PathSegmentQuery<S, R, T> {
    fn clone(&self) -> Self {
        Self::wrap(self.core.clone())
    }
}

impl<S: 'static, R: 'static, T: 'static> PathSegmentQuery<S, R, T> {
    pub(crate) fn wrap(core: QueryCore) -> Self {
        PathSegmentQuery {
            core,
            _marker: PhantomData,
        }
    }

    fn with(&self, op: QueryOp) -> Self {
        Self::wrap(self.core.append(op))
    }

    // ----- common operators (over the segment) -----

    pub fn where_(
        &self,
        predicate: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Self {
        self.with(QueryOp::Where(predicate(Var::root())))
    }

    pub fn select<P: 'static>(
        &self,
        selector: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> GenericQuery<P> {
        GenericQuery::wrap(self.core.append(QueryOp::Select(selector(Var::root()))))
    }

    pub fn order_by(
        &self,
        key: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Self {
        self.with(QueryOp::OrderBy {
            key: key(Var::root()),
            direction: SortDirection::Ascending,
        })
    }

    pub fn order_by_desc(
        &self,
        key: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Self {
        self.with(QueryOp::OrderBy {
            key: key(Var::root()),
            direction: SortDirection::Descending,
        })
    }

    pub fn then_by(
        &self,
        key: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Self {
        self.with(QueryOp::ThenBy {
            key: key(Var::root()),
            direction: SortDirection::Ascending,
        })
    }

    pub fn then_by_desc(
        &self,
        key: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Self {
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
        predicate: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<bool, GraphQueryError> {
        self.core.run_any(Some(predicate(Var::root()))).await
    }

    pub async fn all(
        &self,
        predicate: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<bool, GraphQueryError> {
        self.core.run_all(predicate(Var::root())).await
    }

    pub async fn count(&self) -> Result<i64, GraphQueryError> {
        self.core.run_count(None).await
    }

    pub async fn count_where(
        &self,
        predicate: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<i64, GraphQueryError> {
        self.core.run_count(Some(predicate(Var::root()))).await
    }

    pub async fn sum(
        &self,
        selector: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::Sum(selector(Var::root())))
            .await
    }

    pub async fn average(
        &self,
        selector: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::Average(selector(Var::root())))
            .await
    }

    pub async fn min_of(
        &self,
        selector: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::MinOf(selector(Var::root())))
            .await
    }

    pub async fn max_of(
        &self,
        selector: impl FnOnce(Var<PathSegment<S, R, T>>) -> Expr,
    ) -> Result<CypherValue, GraphQueryError> {
        self.core
            .run_aggregate(Terminal::MaxOf(selector(Var::root())))
            .await
    }

    pub async fn element_at(&self, index: i64) -> Result<Option<Record>, GraphQueryError> {
        self.core.run_element_at(index).await
    }
}
