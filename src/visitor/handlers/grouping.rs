//! Grouping
//!
//! `group_by` stores the key fragment in the scope; a following `select`
//! resolves `g.key()` against it. When no projection follows, finalization
//! emits the default `key AS key, collect(..) AS elements` shape.

use crate::errors::GraphQueryError;
use crate::operators::QueryOp;
use crate::translator::{translate_expr, Usage};
use crate::visitor::context::QueryContext;

use super::payload_mismatch;

pub fn handle_group_by(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::GroupBy { key, element } = op else {
        return Err(payload_mismatch(ctx, op, "key selector"));
    };
    let key_fragment = translate_expr(ctx, Usage::GroupBy, key)?;
    ctx.scope.group_by_expression = Some(key_fragment);

    if let Some(element_selector) = element {
        let element_fragment = translate_expr(ctx, Usage::GroupBy, element_selector)?;
        ctx.scope.group_element_expression = Some(element_fragment);
    }
    Ok(())
}
