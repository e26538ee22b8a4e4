//! Query Context
//!
//! One `QueryContext` exists per terminal execution. It owns the scope and
//! the builder, borrows the entity factory and configuration, and is threaded
//! mutably through every handler and expression sub-visitor. No handler ever
//! holds state of its own.

use crate::config::ProviderConfig;
use crate::cypher::query::PathSegmentProjection;
use crate::cypher::{CypherQueryBuilder, QueryScope, ResultShape};
use crate::errors::GraphQueryError;
use crate::expression::ExpressionError;
use crate::schema::{ElementInfo, EntityFactory, EntitySchema, SchemaError};
use crate::transaction::Transaction;

pub struct QueryContext<'a> {
    pub scope: QueryScope,
    pub builder: CypherQueryBuilder,
    pub factory: &'a dyn EntityFactory,
    pub config: &'a ProviderConfig,
    pub result_shape: ResultShape,
    pub transaction: Option<Transaction>,
}

impl<'a> QueryContext<'a> {
    pub fn new(factory: &'a dyn EntityFactory, config: &'a ProviderConfig) -> Self {
        QueryContext {
            scope: QueryScope::new(),
            builder: CypherQueryBuilder::new(&config.parameter_prefix, config.pretty_print),
            factory,
            config,
            result_shape: ResultShape::default(),
            transaction: None,
        }
    }

    /// Schema for an element type, if the factory knows one.
    pub fn schema_for(&self, element: &ElementInfo) -> Option<&'a EntitySchema> {
        self.factory.schema(element.type_id)
    }

    /// Schema for an element type, required by the calling operation.
    pub fn require_schema(
        &self,
        element: &ElementInfo,
        operation: &str,
    ) -> Result<&'a EntitySchema, GraphQueryError> {
        self.schema_for(element)
            .ok_or_else(|| {
                SchemaError::SchemaMissing {
                    type_name: element.type_name.clone(),
                    operation: operation.to_string(),
                }
                .into()
            })
    }

    /// Attach the scope state to an expression-level failure.
    pub fn expression_error(&self, source: ExpressionError) -> GraphQueryError {
        GraphQueryError::expression(
            source,
            self.scope.current_alias.as_deref(),
            self.scope.root_type.as_ref().map(|t| t.type_name.as_str()),
        )
    }

    pub fn operator_error(&self, operator: &str) -> GraphQueryError {
        GraphQueryError::unsupported_operator(
            operator,
            self.scope.current_alias.as_deref(),
            self.scope.root_type.as_ref().map(|t| t.type_name.as_str()),
        )
    }
}

/// Target alias for a predicate or projection, given the current scope and
/// projection state.
///
/// Resolution order:
/// 1. Path-segment context with a user projection: relationship roots pin to
///    `r`; node roots follow the selected path-segment component.
/// 2. Path-segment context: the current alias, defaulting to `src`.
/// 3. User projection over a relationship root: `r`.
/// 4. Otherwise: the current alias, defaulting to `src`.
pub fn determine_context_alias(ctx: &QueryContext) -> String {
    let scope = &ctx.scope;
    let builder = &ctx.builder;

    if scope.is_path_segment_context && builder.has_user_projections {
        if scope.root_is_relationship() {
            return "r".to_string();
        }
        return match builder.path_segment_projection {
            PathSegmentProjection::EndNode => "tgt".to_string(),
            PathSegmentProjection::Relationship => "r".to_string(),
            PathSegmentProjection::StartNode | PathSegmentProjection::None => "src".to_string(),
        };
    }

    if scope.is_path_segment_context {
        return scope
            .current_alias
            .clone()
            .unwrap_or_else(|| "src".to_string());
    }

    if builder.has_user_projections && scope.root_is_relationship() {
        return "r".to_string();
    }

    scope
        .current_alias
        .clone()
        .unwrap_or_else(|| "src".to_string())
}
