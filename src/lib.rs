//! Cypherable - Typed graph queries compiled to Cypher
//!
//! This crate provides a lazily-evaluated query surface over graph data:
//! - Typed queryables over nodes, relationships, traversals and path segments
//! - A combinator expression DSL for predicates, projections and orderings
//! - Translation of operator trees into single Cypher statements with
//!   de-duplicated parameter tables
//! - A thin async boundary (`QueryRunner`) to whatever driver executes the
//!   statements
//!
//! ```ignore
//! use cypherable::expression::combinators::lit;
//!
//! let adults = graph
//!     .nodes::<Person>()
//!     .where_(|p| p.prop("Age").gt(lit(30)))
//!     .order_by(|p| p.prop("Name"))
//!     .take(10)
//!     .to_list()
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod cypher;
pub mod errors;
pub mod expression;
pub mod operators;
pub mod provider;
pub mod query;
pub mod schema;
pub mod translator;
pub mod transaction;
pub mod visitor;

pub use client::{CancellationSource, CancellationToken, DriverError, QueryRunner, Record};
pub use config::ProviderConfig;
pub use cypher::{CypherQuery, Direction, PathSegmentProjection, QueryRootKind, ResultShape};
pub use errors::GraphQueryError;
pub use expression::combinators::{lit, null, prop, record};
pub use expression::{CypherValue, Expr, SortDirection};
pub use query::{
    GenericQuery, GraphContext, Grouping, NodeQuery, PathSegment, PathSegmentQuery,
    RelationshipQuery, TraversalQuery, Var,
};
pub use schema::{
    ElementInfo, ElementKind, EntityFactory, EntitySchema, GraphElement, MapEntityFactory,
    NodeElement, PropertyInfo, RelationshipElement,
};
pub use transaction::Transaction;
