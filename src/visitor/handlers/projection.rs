//! Projection
//!
//! `select`, `select_many`, `join`, and the stubbed `union` / `concat`
//! composition operators.

use crate::cypher::query::PathSegmentProjection;
use crate::errors::GraphQueryError;
use crate::expression::{Expr, ExpressionError};
use crate::operators::QueryOp;
use crate::translator::{translate_expr, Usage};
use crate::visitor::context::QueryContext;

use super::payload_mismatch;

pub fn handle_select(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Select(selector) = op else {
        return Err(payload_mismatch(ctx, op, "selector"));
    };

    match selector {
        // Identity projection: the default RETURN already yields the
        // element; nothing changes.
        Expr::Root => Ok(()),

        // Path-segment component selection.
        Expr::StartNode(_) | Expr::EndNode(_) | Expr::Relationship(_)
            if ctx.scope.is_path_segment_context =>
        {
            let (projection, alias) = match selector {
                Expr::StartNode(_) => (PathSegmentProjection::StartNode, "src"),
                Expr::EndNode(_) => (PathSegmentProjection::EndNode, "tgt"),
                _ => (PathSegmentProjection::Relationship, "r"),
            };
            ctx.builder.path_segment_projection = projection;
            ctx.builder.mark_projected();
            ctx.builder.clear_return_items();
            ctx.builder.add_return(alias, None);
            ctx.result_shape.is_projection = true;
            ctx.scope.current_alias = Some(alias.to_string());
            Ok(())
        }

        // Anonymous record: one RETURN item per field, aliased.
        Expr::Record(fields) => {
            ctx.builder.mark_projected();
            ctx.builder.clear_return_items();
            for (name, value) in fields {
                let fragment = translate_expr(ctx, Usage::Select, value)?;
                ctx.builder.add_return(fragment, Some(name.clone()));
            }
            ctx.result_shape.is_projection = true;
            ctx.result_shape.projection_type = None;
            Ok(())
        }

        // Single member or computed expression.
        other => {
            ctx.builder.mark_projected();
            let fragment = translate_expr(ctx, Usage::Select, other)?;
            ctx.builder.clear_return_items();
            ctx.builder.add_return(fragment, None);
            ctx.result_shape.is_projection = true;
            Ok(())
        }
    }
}

pub fn handle_select_many(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::SelectMany {
        collection,
        item_variable,
        result,
    } = op
    else {
        return Err(payload_mismatch(ctx, op, "collection selector"));
    };

    // Only collection-valued member access unwinds; traversal-shaped
    // flattening goes through the traversal queryable.
    let Expr::Property { .. } = collection else {
        return Err(ctx.expression_error(ExpressionError::unsupported(
            collection.describe(),
            "select_many expects a collection-valued member access",
        )));
    };

    let fragment = translate_expr(ctx, Usage::Select, collection)?;
    ctx.builder.add_unwind(fragment, item_variable.clone());
    ctx.scope
        .bind_variable(item_variable.clone(), item_variable.clone());
    ctx.scope.current_alias = Some(item_variable.clone());

    if let Some(result_selector) = result {
        let fragment = translate_expr(ctx, Usage::Select, result_selector)?;
        ctx.builder.mark_projected();
        ctx.builder.clear_return_items();
        ctx.builder.add_return(fragment, None);
        ctx.result_shape.is_projection = true;
    }
    Ok(())
}

pub fn handle_join(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Join {
        inner,
        outer_key,
        inner_key,
        result,
    } = op
    else {
        return Err(payload_mismatch(ctx, op, "join"));
    };

    // Cartesian MATCH + key equality. Operator chains on the inner
    // queryable beyond its root are not merged.
    let inner_alias = ctx.scope.alias_for(&inner.root.element);
    ctx.builder.add_match_pattern(format!(
        "({}:{})",
        inner_alias, inner.root.element.label
    ));

    let outer_fragment = translate_expr(ctx, Usage::Where, outer_key)?;

    // The inner key ranges over the joined element: retarget the root for
    // the duration of its translation.
    let saved_alias = ctx.scope.current_alias.clone();
    let saved_root = ctx.scope.root_type.clone();
    ctx.scope.current_alias = Some(inner_alias.clone());
    ctx.scope.root_type = Some(inner.root.element.clone());
    let inner_fragment = translate_expr(ctx, Usage::Where, inner_key);
    ctx.scope.current_alias = saved_alias;
    ctx.scope.root_type = saved_root;
    let inner_fragment = inner_fragment?;

    ctx.builder
        .add_where(format!("{} = {}", outer_fragment, inner_fragment));

    // The result selector sees the joined element through a bound variable.
    ctx.scope.bind_variable("joined", inner_alias);
    handle_select(ctx, &QueryOp::Select(result.clone()))
}

pub fn handle_union(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Union(_) = op else {
        return Err(payload_mismatch(ctx, op, "queryable"));
    };
    log::warn!("union over a second query is not composed; emitting a marker comment");
    ctx.builder
        .add_trailing_comment("UNION of a second query is not supported");
    Ok(())
}

pub fn handle_concat(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Concat(_) = op else {
        return Err(payload_mismatch(ctx, op, "queryable"));
    };
    log::warn!("concat over a second query is not composed; emitting a marker comment");
    ctx.builder
        .add_trailing_comment("UNION ALL of a second query is not supported");
    Ok(())
}
