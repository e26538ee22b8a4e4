//! Cypher Statement State and Assembly
//!
//! - **query.rs**: the finished `CypherQuery` artifact and result-shape hints
//! - **scope.rs**: the alias/type environment built up during translation
//! - **builder.rs**: clause accumulation and final statement assembly
//! - **errors.rs**: error types

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod errors;
pub mod query;
pub mod scope;

pub use builder::{CypherQueryBuilder, ParameterTable};
pub use errors::BuilderError;
pub use query::{CypherQuery, PathSegmentProjection, QueryRootKind, ResultShape};
pub use scope::{QueryScope, TraversalStep};

/// Direction of a traversal pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}
