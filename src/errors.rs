//! Error Taxonomy
//!
//! Crate-level aggregation of the per-module error types. Translation errors
//! carry the offending expression or operator name plus the scope state at
//! the time of failure; driver errors propagate unchanged.

use thiserror::Error;

use crate::client::DriverError;
use crate::cypher::BuilderError;
use crate::expression::ExpressionError;
use crate::schema::SchemaError;
use crate::transaction::TransactionError;

#[derive(Debug, Error)]
pub enum GraphQueryError {
    /// An operator with no matching handler in the registry.
    #[error(
        "unsupported operator '{operator}' (current alias: {current_alias}, root type: {root_type})"
    )]
    UnsupportedOperator {
        operator: String,
        current_alias: String,
        root_type: String,
    },

    /// An expression shape the translator cannot encode.
    #[error("{source} (current alias: {current_alias}, root type: {root_type})")]
    UnsupportedExpression {
        #[source]
        source: ExpressionError,
        current_alias: String,
        root_type: String,
    },

    /// Evaluating a captured expression at translation time threw.
    #[error("{source} (current alias: {current_alias}, root type: {root_type})")]
    ExpressionCompilationFailed {
        #[source]
        source: ExpressionError,
        current_alias: String,
        root_type: String,
    },

    /// Structurally impossible statement.
    #[error(transparent)]
    InvalidQuery(#[from] BuilderError),

    #[error(transparent)]
    AmbiguousTransaction(#[from] TransactionError),

    #[error(transparent)]
    SchemaMissing(#[from] SchemaError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    /// The terminal operator's cancellation token fired before the driver
    /// call returned.
    #[error("query execution was cancelled")]
    Cancelled,

    /// `first` / `single` / `last` over an empty result.
    #[error("sequence contains no elements (operator '{operator}')")]
    SequenceEmpty { operator: String },

    /// `single` observed a second row.
    #[error("sequence contains more than one element (operator '{operator}')")]
    MoreThanOneElement { operator: String },
}

impl GraphQueryError {
    /// Attach scope state to an expression-level failure.
    pub fn expression(
        source: ExpressionError,
        current_alias: Option<&str>,
        root_type: Option<&str>,
    ) -> Self {
        let current_alias = current_alias.unwrap_or("<none>").to_string();
        let root_type = root_type.unwrap_or("<none>").to_string();
        match source {
            ExpressionError::CompilationFailed { .. } => {
                GraphQueryError::ExpressionCompilationFailed {
                    source,
                    current_alias,
                    root_type,
                }
            }
            _ => GraphQueryError::UnsupportedExpression {
                source,
                current_alias,
                root_type,
            },
        }
    }

    pub fn unsupported_operator(
        operator: &str,
        current_alias: Option<&str>,
        root_type: Option<&str>,
    ) -> Self {
        GraphQueryError::UnsupportedOperator {
            operator: operator.to_string(),
            current_alias: current_alias.unwrap_or("<none>").to_string(),
            root_type: root_type.unwrap_or("<none>").to_string(),
        }
    }
}
