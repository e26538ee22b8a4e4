//! Path Segments
//!
//! Opens the `(src)-[r]->(tgt)` context. Previously accumulated MATCH
//! patterns are replaced by the single segment pattern; a `where_` recorded
//! before `path_segments` is therefore translated against the segment
//! aliases, mirroring the aggressive clearing of the original provider.

use crate::cypher::QueryRootKind;
use crate::errors::GraphQueryError;
use crate::operators::QueryOp;
use crate::visitor::context::QueryContext;

use super::payload_mismatch;

pub fn handle_path_segments(ctx: &mut QueryContext, op: &QueryOp) -> Result<(), GraphQueryError> {
    let QueryOp::PathSegments {
        relationship,
        target,
    } = op
    else {
        return Err(payload_mismatch(ctx, op, "segment types"));
    };

    let source = ctx
        .scope
        .root_type
        .clone()
        .ok_or_else(|| ctx.operator_error("path_segments"))?;

    ctx.builder.replace_matches(format!(
        "(src:{})-[r:{}]->(tgt:{})",
        source.label, relationship.label, target.label
    ));

    ctx.scope.bind_alias(&source, "src".to_string());
    ctx.scope.bind_alias(relationship, "r".to_string());
    ctx.scope.bind_alias(target, "tgt".to_string());
    ctx.scope.current_alias = Some("src".to_string());
    ctx.scope.is_path_segment_context = true;

    ctx.builder.path_segment_source_alias = Some("src".to_string());
    ctx.builder.path_segment_relationship_alias = Some("r".to_string());
    ctx.builder.path_segment_target_alias = Some("tgt".to_string());
    ctx.builder.mark_path_segment_open();

    // Default tuple projection; a later select replaces it.
    ctx.builder.clear_return_items();
    ctx.builder.add_return("src", None);
    ctx.builder.add_return("r", None);
    ctx.builder.add_return("tgt", None);

    ctx.result_shape.query_root_kind = QueryRootKind::PathSegment;
    ctx.result_shape.is_projection = true;
    Ok(())
}
