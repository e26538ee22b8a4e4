//! Filtering
//!
//! `where_` does not translate its predicate immediately: the target alias
//! can depend on projection state that later operators establish
//! (path-segment projections in particular). The predicate is parked on the
//! builder and resolved during finalization.

use crate::errors::GraphQueryError;
use crate::operators::QueryOp;
use crate::visitor::context::{determine_context_alias, QueryContext};

use super::payload_mismatch;

pub fn handle_where(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::Where(predicate) = op else {
        return Err(payload_mismatch(ctx, op, "predicate"));
    };

    // Outside path-segment context the alias is pinned now, so a traversal
    // recorded later filters the nodes this predicate was written against.
    // Inside path-segment context resolution waits for the projection.
    let target_alias = if ctx.scope.is_path_segment_context {
        None
    } else {
        Some(determine_context_alias(ctx))
    };
    ctx.builder
        .push_pending_where(predicate.clone(), target_alias);
    ctx.builder.has_applied_root_where = true;
    Ok(())
}
