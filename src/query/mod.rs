//! Queryable Surface
//!
//! The typed entry points callers chain operators on. Every queryable is an
//! immutable wrapper around a `QueryCore` (graph context + operator tree);
//! chaining clones the tree and returns a new queryable. No operator
//! performs I/O; the async terminal methods hand the tree to the provider.
//!
//! # Module Organization
//!
//! - **mod.rs** (this file): `GraphContext`, the shared `QueryCore`
//! - **var.rs**: typed expression-root proxies handed to closures
//! - **node.rs / relationship.rs / traversal.rs / path_segment.rs /
//!   generic.rs**: the queryable variants

use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::{CancellationToken, QueryRunner, Record};
use crate::config::ProviderConfig;
use crate::cypher::CypherQuery;
use crate::errors::GraphQueryError;
use crate::expression::{CypherValue, Expr};
use crate::operators::{OperatorTree, QueryOp, Terminal};
use crate::provider::{results, QueryProvider};
use crate::schema::EntityFactory;

pub mod generic;
pub mod node;
pub mod path_segment;
pub mod relationship;
pub mod traversal;
pub mod var;

pub use generic::GenericQuery;
pub use node::NodeQuery;
pub use path_segment::{PathSegment, PathSegmentQuery};
pub use relationship::RelationshipQuery;
pub use traversal::TraversalQuery;
pub use var::Var;

/// Marker element for grouped queryables; `Var<Grouping<T>>` exposes the key
/// and the aggregate combinators.
pub struct Grouping<T: 'static> {
    _marker: PhantomData<fn() -> T>,
}

/// Entry point: a graph connection's query surface.
///
/// Cheap to clone; the runner and factory are shared, the configuration is
/// copied.
#[derive(Clone)]
pub struct GraphContext {
    runner: Arc<dyn QueryRunner>,
    factory: Arc<dyn EntityFactory>,
    config: ProviderConfig,
}

impl GraphContext {
    pub fn new(runner: Arc<dyn QueryRunner>, factory: Arc<dyn EntityFactory>) -> Self {
        GraphContext {
            runner,
            factory,
            config: ProviderConfig::default(),
        }
    }

    pub fn with_config(
        runner: Arc<dyn QueryRunner>,
        factory: Arc<dyn EntityFactory>,
        config: ProviderConfig,
    ) -> Self {
        GraphContext {
            runner,
            factory,
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Query over nodes of type `T`.
    pub fn nodes<T: crate::schema::NodeElement>(&self) -> NodeQuery<T> {
        NodeQuery::new(self.clone())
    }

    /// Query over relationships of type `R`.
    pub fn relationships<R: crate::schema::RelationshipElement>(&self) -> RelationshipQuery<R> {
        RelationshipQuery::new(self.clone())
    }
}

/// Unwrap a cardinality-checked row, naming the operator on violation.
pub(crate) fn required(
    record: Option<Record>,
    operator: &str,
) -> Result<Record, GraphQueryError> {
    record.ok_or_else(|| GraphQueryError::SequenceEmpty {
        operator: operator.to_string(),
    })
}

/// Type-erased query state shared by every queryable variant.
#[derive(Clone)]
pub(crate) struct QueryCore {
    context: GraphContext,
    tree: OperatorTree,
    token: CancellationToken,
}

impl QueryCore {
    pub(crate) fn new(context: GraphContext, tree: OperatorTree) -> Self {
        QueryCore {
            context,
            tree,
            token: CancellationToken::none(),
        }
    }

    pub(crate) fn append(&self, op: QueryOp) -> Self {
        QueryCore {
            context: self.context.clone(),
            tree: self.tree.append(op),
            token: self.token.clone(),
        }
    }

    pub(crate) fn with_cancellation(&self, token: CancellationToken) -> Self {
        QueryCore {
            context: self.context.clone(),
            tree: self.tree.clone(),
            token,
        }
    }

    pub(crate) fn tree(&self) -> &OperatorTree {
        &self.tree
    }

    /// Compile without executing; the terminal shapes paging and RETURN.
    pub(crate) fn compile(&self, terminal: &Terminal) -> Result<CypherQuery, GraphQueryError> {
        QueryProvider::compile(
            &self.tree,
            terminal,
            &*self.context.factory,
            &self.context.config,
        )
    }

    async fn execute(&self, terminal: &Terminal) -> Result<Vec<Record>, GraphQueryError> {
        QueryProvider::execute(
            &self.tree,
            terminal,
            &*self.context.runner,
            &*self.context.factory,
            &self.context.config,
            &self.token,
        )
        .await
    }

    // ----- terminal helpers, shared by the typed wrappers -----

    pub(crate) async fn run_to_list(&self) -> Result<Vec<Record>, GraphQueryError> {
        self.execute(&Terminal::ToList).await
    }

    pub(crate) async fn run_first(
        &self,
        or_default: bool,
        predicate: Option<Expr>,
    ) -> Result<Option<Record>, GraphQueryError> {
        let rows = self
            .execute(&Terminal::First {
                or_default,
                predicate,
            })
            .await?;
        results::first_of(rows, or_default, "first")
    }

    pub(crate) async fn run_single(
        &self,
        or_default: bool,
        predicate: Option<Expr>,
    ) -> Result<Option<Record>, GraphQueryError> {
        let rows = self
            .execute(&Terminal::Single {
                or_default,
                predicate,
            })
            .await?;
        results::at_most_one(rows, or_default, "single")
    }

    pub(crate) async fn run_last(
        &self,
        or_default: bool,
        predicate: Option<Expr>,
    ) -> Result<Option<Record>, GraphQueryError> {
        let rows = self
            .execute(&Terminal::Last {
                or_default,
                predicate,
            })
            .await?;
        results::first_of(rows, or_default, "last")
    }

    pub(crate) async fn run_any(
        &self,
        predicate: Option<Expr>,
    ) -> Result<bool, GraphQueryError> {
        let rows = self.execute(&Terminal::Any { predicate }).await?;
        results::scalar_bool(&rows)
    }

    pub(crate) async fn run_all(&self, predicate: Expr) -> Result<bool, GraphQueryError> {
        let rows = self.execute(&Terminal::All { predicate }).await?;
        results::scalar_bool(&rows)
    }

    pub(crate) async fn run_count(
        &self,
        predicate: Option<Expr>,
    ) -> Result<i64, GraphQueryError> {
        let rows = self.execute(&Terminal::Count { predicate }).await?;
        results::scalar_i64(&rows)
    }

    pub(crate) async fn run_aggregate(
        &self,
        terminal: Terminal,
    ) -> Result<CypherValue, GraphQueryError> {
        let rows = self.execute(&terminal).await?;
        results::scalar_value(&rows)
    }

    pub(crate) async fn run_contains(
        &self,
        value: CypherValue,
    ) -> Result<bool, GraphQueryError> {
        let rows = self.execute(&Terminal::ContainsItem(value)).await?;
        results::scalar_bool(&rows)
    }

    pub(crate) async fn run_element_at(
        &self,
        index: i64,
    ) -> Result<Option<Record>, GraphQueryError> {
        let rows = self.execute(&Terminal::ElementAt(index)).await?;
        Ok(rows.into_iter().next())
    }
}
