//! Terminal Operators
//!
//! Cardinality terminals (`first`, `single`, `last`, `element_at`) shape
//! paging; aggregate terminals replace the RETURN clause with a scalar and
//! disable complex-property loading. Driver-side cardinality checks (`single`
//! fetching two rows) live in the provider.

use crate::errors::GraphQueryError;
use crate::expression::{Expr, SortDirection};
use crate::operators::Terminal;
use crate::translator::{translate_expr, Usage};
use crate::visitor::context::{determine_context_alias, QueryContext};

fn apply_predicate(
    ctx: &mut QueryContext,
    predicate: &Option<Expr>,
) -> Result<(), GraphQueryError> {
    if let Some(predicate) = predicate {
        let fragment = translate_expr(ctx, Usage::Where, predicate)?;
        ctx.builder.add_where(fragment);
    }
    Ok(())
}

fn mark_scalar(ctx: &mut QueryContext) {
    ctx.result_shape.is_scalar = true;
    ctx.builder.needs_complex_property_loading = false;
}

pub fn handle_to_list(_ctx: &mut QueryContext, _terminal: &Terminal) -> Result<(), GraphQueryError> {
    Ok(())
}

pub fn handle_first(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::First { predicate, .. } = terminal else {
        return Err(ctx.operator_error("first"));
    };
    apply_predicate(ctx, predicate)?;
    ctx.builder.set_limit(1);
    Ok(())
}

pub fn handle_single(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::Single { predicate, .. } = terminal else {
        return Err(ctx.operator_error("single"));
    };
    apply_predicate(ctx, predicate)?;
    // Two rows are fetched so the provider can detect a violated
    // single-element expectation.
    ctx.builder.set_limit(2);
    Ok(())
}

/// With no explicit ordering, `last` falls back to `ORDER BY id(..) DESC`.
/// Internal ids are not stable across stores; this mirrors the original
/// provider and is flagged in DESIGN.md.
pub fn handle_last(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::Last { predicate, .. } = terminal else {
        return Err(ctx.operator_error("last"));
    };
    apply_predicate(ctx, predicate)?;
    if ctx.builder.has_order_by() {
        ctx.builder.reverse_order_by();
    } else {
        let alias = determine_context_alias(ctx);
        ctx.builder
            .add_order_by(format!("id({})", alias), SortDirection::Descending);
    }
    ctx.builder.set_limit(1);
    Ok(())
}

pub fn handle_any(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::Any { predicate } = terminal else {
        return Err(ctx.operator_error("any"));
    };
    let alias = determine_context_alias(ctx);
    let expression = match predicate {
        Some(predicate) => {
            let fragment = translate_expr(ctx, Usage::Where, predicate)?;
            format!("COUNT(CASE WHEN {} THEN {} END) > 0", fragment, alias)
        }
        None => format!("COUNT({}) > 0", alias),
    };
    ctx.builder.clear_return_items();
    ctx.builder.add_return(expression, Some("result".to_string()));
    ctx.builder.set_limit(1);
    ctx.builder.is_exists_query = true;
    mark_scalar(ctx);
    Ok(())
}

pub fn handle_all(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::All { predicate } = terminal else {
        return Err(ctx.operator_error("all"));
    };
    let alias = determine_context_alias(ctx);
    let fragment = translate_expr(ctx, Usage::Where, predicate)?;
    ctx.builder.clear_return_items();
    ctx.builder.add_return(
        format!("COUNT(CASE WHEN NOT ({}) THEN {} END) = 0", fragment, alias),
        Some("result".to_string()),
    );
    ctx.builder.is_not_exists_query = true;
    mark_scalar(ctx);
    Ok(())
}

pub fn handle_count(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::Count { predicate } = terminal else {
        return Err(ctx.operator_error("count"));
    };
    let alias = determine_context_alias(ctx);
    let expression = match predicate {
        Some(predicate) => {
            let fragment = translate_expr(ctx, Usage::Where, predicate)?;
            format!("COUNT(CASE WHEN {} THEN {} END)", fragment, alias)
        }
        None => format!("COUNT({})", alias),
    };
    ctx.builder.clear_return_items();
    ctx.builder.add_return(expression, None);
    mark_scalar(ctx);
    Ok(())
}

pub fn handle_sum(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::Sum(selector) = terminal else {
        return Err(ctx.operator_error("sum"));
    };
    scalar_aggregate(ctx, selector, |fragment| format!("SUM({})", fragment))
}

pub fn handle_average(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::Average(selector) = terminal else {
        return Err(ctx.operator_error("average"));
    };
    scalar_aggregate(ctx, selector, |fragment| {
        format!("AVG(toFloat({}))", fragment)
    })
}

pub fn handle_min(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::MinOf(selector) = terminal else {
        return Err(ctx.operator_error("min"));
    };
    scalar_aggregate(ctx, selector, |fragment| format!("MIN({})", fragment))
}

pub fn handle_max(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::MaxOf(selector) = terminal else {
        return Err(ctx.operator_error("max"));
    };
    scalar_aggregate(ctx, selector, |fragment| format!("MAX({})", fragment))
}

fn scalar_aggregate(
    ctx: &mut QueryContext,
    selector: &Expr,
    shape: impl FnOnce(String) -> String,
) -> Result<(), GraphQueryError> {
    let fragment = translate_expr(ctx, Usage::Select, selector)?;
    ctx.builder.clear_return_items();
    ctx.builder.add_return(shape(fragment), None);
    mark_scalar(ctx);
    Ok(())
}

pub fn handle_contains(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::ContainsItem(value) = terminal else {
        return Err(ctx.operator_error("contains"));
    };
    let alias = determine_context_alias(ctx);
    let placeholder = ctx.builder.add_parameter(value.clone());
    ctx.builder.clear_return_items();
    ctx.builder.add_return(
        format!(
            "COUNT(CASE WHEN {} = {} THEN {} END) > 0",
            alias, placeholder, alias
        ),
        Some("result".to_string()),
    );
    ctx.builder.is_exists_query = true;
    mark_scalar(ctx);
    Ok(())
}

pub fn handle_element_at(ctx: &mut QueryContext, terminal: &Terminal) -> Result<(), GraphQueryError> {
    let Terminal::ElementAt(index) = terminal else {
        return Err(ctx.operator_error("element_at"));
    };
    ctx.builder.set_skip(*index);
    ctx.builder.set_limit(1);
    Ok(())
}
