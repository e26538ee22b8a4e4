//! Ordering, Paging, Distinct

use crate::errors::GraphQueryError;
use crate::operators::QueryOp;
use crate::translator::{translate_expr, Usage};
use crate::visitor::context::QueryContext;

use super::payload_mismatch;

pub fn handle_order_by(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::OrderBy { key, direction } = op else {
        return Err(payload_mismatch(ctx, op, "key selector"));
    };
    let fragment = translate_expr(ctx, Usage::OrderBy, key)?;
    ctx.builder.add_order_by(fragment, *direction);
    Ok(())
}

pub fn handle_then_by(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::ThenBy { key, direction } = op else {
        return Err(payload_mismatch(ctx, op, "key selector"));
    };
    let fragment = translate_expr(ctx, Usage::OrderBy, key)?;
    ctx.builder.add_order_by(fragment, *direction);
    Ok(())
}

pub fn handle_take(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Take(count) = op else {
        return Err(payload_mismatch(ctx, op, "count"));
    };
    ctx.builder.set_limit(*count);
    Ok(())
}

pub fn handle_skip(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Skip(count) = op else {
        return Err(payload_mismatch(ctx, op, "count"));
    };
    ctx.builder.set_skip(*count);
    Ok(())
}

pub fn handle_distinct(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Distinct = op else {
        return Err(payload_mismatch(ctx, op, "unit"));
    };
    ctx.builder.set_distinct();
    Ok(())
}
