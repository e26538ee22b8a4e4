//! Root Queryable
//!
//! Installs the root MATCH, seeds the scope, and prepares complex-property
//! loading for node roots. Relationship roots match the full
//! `(src)-[r:TYPE]->(tgt)` pattern so endpoint-id access has declared
//! aliases.

use crate::cypher::QueryRootKind;
use crate::errors::GraphQueryError;
use crate::operators::QueryRoot;
use crate::visitor::context::QueryContext;

pub fn install_root(ctx: &mut QueryContext, root: &QueryRoot) -> Result<(), GraphQueryError> {
    match root.kind {
        QueryRootKind::Node => install_node_root(ctx, root),
        QueryRootKind::Relationship => install_relationship_root(ctx, root),
        _ => Err(ctx.operator_error("root")),
    }
}

fn install_node_root(ctx: &mut QueryContext, root: &QueryRoot) -> Result<(), GraphQueryError> {
    let alias = ctx.scope.alias_for(&root.element);
    ctx.builder
        .set_root_match(format!("({}:{})", alias, root.element.label))?;
    ctx.scope.current_alias = Some(alias.clone());
    ctx.scope.root_type = Some(root.element.clone());
    ctx.result_shape.query_root_kind = QueryRootKind::Node;
    ctx.result_shape.result_type = Some(root.element.type_name.clone());

    // Complex properties load through OPTIONAL MATCH; whether the patterns
    // survive to the final statement is decided at finalization.
    if let Some(schema) = ctx.schema_for(&root.element) {
        let complex: Vec<_> = schema.complex_properties.clone();
        if !complex.is_empty() && ctx.config.load_complex_properties {
            ctx.builder.needs_complex_property_loading = true;
        }
        for property in complex {
            let synthesized = format!("{}_{}", alias, property.name);
            ctx.builder.add_complex_property_match(
                format!(
                    "({})-[:{}]->({}:{})",
                    alias, property.relationship_type, synthesized, property.target_label
                ),
                synthesized,
            );
        }
    }
    Ok(())
}

fn install_relationship_root(
    ctx: &mut QueryContext,
    root: &QueryRoot,
) -> Result<(), GraphQueryError> {
    ctx.scope.bind_alias(&root.element, "r".to_string());
    ctx.builder
        .set_root_match(format!("(src)-[r:{}]->(tgt)", root.element.label))?;
    ctx.scope.current_alias = Some("r".to_string());
    ctx.scope.root_type = Some(root.element.clone());
    ctx.builder.is_relationship_query = true;
    ctx.builder.path_segment_source_alias = Some("src".to_string());
    ctx.builder.path_segment_relationship_alias = Some("r".to_string());
    ctx.builder.path_segment_target_alias = Some("tgt".to_string());
    ctx.result_shape.query_root_kind = QueryRootKind::Relationship;
    ctx.result_shape.result_type = Some(root.element.type_name.clone());
    Ok(())
}
