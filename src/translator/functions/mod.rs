//! Host Call Translation
//!
//! Entry point for `Expr::Call` nodes. Dispatches to the category modules;
//! plain renames go through the registry, structural shapes (infix string
//! predicates, duration arithmetic, quantifiers, aggregate CASE forms) are
//! rendered by their category.
//!
//! Calls reaching this module are server-bound: fully captured calls were
//! already folded by the chain head.

use crate::errors::GraphQueryError;
use crate::expression::{Expr, ExpressionError, HostFn};
use crate::visitor::context::QueryContext;

use super::{translate_expr, Usage};

pub mod collections;
pub mod datetime;
pub mod math;
pub mod registry;
pub mod strings;

pub fn translate_call(
    ctx: &mut QueryContext,
    usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    let Expr::Call { function, args } = expr else {
        return Ok(None);
    };

    if let Some(fragment) = strings::translate(ctx, usage, *function, args)? {
        return Ok(Some(fragment));
    }
    if let Some(fragment) = datetime::translate(ctx, usage, *function, args)? {
        return Ok(Some(fragment));
    }
    if let Some(fragment) = math::translate(ctx, usage, *function, args)? {
        return Ok(Some(fragment));
    }
    if let Some(fragment) = collections::translate(ctx, usage, *function, args)? {
        return Ok(Some(fragment));
    }

    Err(ctx.expression_error(ExpressionError::unsupported(
        format!("call '{}'", function.name()),
        "no Cypher translation exists for this host call",
    )))
}

/// Render arguments for a plain function-call shape.
pub(crate) fn render_args(
    ctx: &mut QueryContext,
    usage: Usage,
    args: &[Expr],
) -> Result<Vec<String>, GraphQueryError> {
    args.iter()
        .map(|arg| translate_expr(ctx, usage, arg))
        .collect()
}

/// `name(arg, ...)` through the registry rename table.
pub(crate) fn render_registry_call(
    ctx: &mut QueryContext,
    usage: Usage,
    function: HostFn,
    args: &[Expr],
) -> Result<Option<String>, GraphQueryError> {
    let Some(name) = registry::cypher_function_name(function) else {
        return Ok(None);
    };
    let rendered = render_args(ctx, usage, args)?;
    Ok(Some(format!("{}({})", name, rendered.join(", "))))
}
