//! Traversal
//!
//! `traverse` and its modifiers only record state on the scope; the actual
//! pattern is compiled by `finalize` once depth and direction are known.

use crate::cypher::{QueryRootKind, TraversalStep};
use crate::errors::GraphQueryError;
use crate::operators::QueryOp;
use crate::visitor::context::QueryContext;

use super::payload_mismatch;

pub fn handle_traverse(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Traverse {
        relationship,
        target,
    } = op
    else {
        return Err(payload_mismatch(ctx, op, "traversal"));
    };
    ctx.scope
        .traversal_steps
        .push(TraversalStep::new(relationship.clone(), target.clone()));
    ctx.result_shape.query_root_kind = QueryRootKind::Traversal;
    ctx.result_shape.result_type = Some(target.type_name.clone());
    Ok(())
}

pub fn handle_then_traverse(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::ThenTraverse {
        relationship,
        target,
    } = op
    else {
        return Err(payload_mismatch(ctx, op, "traversal"));
    };
    if ctx.scope.traversal_steps.is_empty() {
        return Err(ctx.operator_error("then_traverse"));
    }
    ctx.scope
        .traversal_steps
        .push(TraversalStep::new(relationship.clone(), target.clone()));
    ctx.result_shape.result_type = Some(target.type_name.clone());
    Ok(())
}

pub fn handle_with_depth(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::WithDepth { min, max } = op else {
        return Err(payload_mismatch(ctx, op, "depth range"));
    };
    let configured_max = ctx.config.max_traversal_depth;
    ctx.scope
        .set_traversal_depth(*min, *max, configured_max)
        .map_err(GraphQueryError::from)
}

pub fn handle_in_direction(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::InDirection(direction) = op else {
        return Err(payload_mismatch(ctx, op, "direction"));
    };
    ctx.scope
        .set_traversal_direction(*direction)
        .map_err(GraphQueryError::from)
}

pub fn handle_relationships(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::TraversalRelationships = op else {
        return Err(payload_mismatch(ctx, op, "unit"));
    };
    let Some(step) = ctx.scope.traversal_steps.last() else {
        return Err(ctx.operator_error("relationships"));
    };
    let relationship = step.relationship.clone();
    let alias = ctx.scope.alias_for(&relationship);
    if let Some(step) = ctx.scope.last_traversal_step_mut() {
        step.relationship_alias = Some(alias);
    }
    ctx.result_shape.result_type = Some(relationship.type_name.clone());
    Ok(())
}

pub fn handle_to(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::TraversalTo(target) = op else {
        return Err(payload_mismatch(ctx, op, "target element"));
    };
    let Some(step) = ctx.scope.last_traversal_step_mut() else {
        return Err(ctx.operator_error("to"));
    };
    step.target = target.clone();
    ctx.result_shape.result_type = Some(target.type_name.clone());
    Ok(())
}
