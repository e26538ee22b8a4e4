//! Finalization
//!
//! Two passes around the terminal handler:
//!
//! - **structure** (before): compile the traversal pattern now that depth and
//!   direction are known, then resolve deferred WHERE predicates against
//!   their pinned aliases.
//! - **result** (after): settle the complex-property loading decision and
//!   emit the default RETURN when no operator produced one.

use crate::cypher::Direction;
use crate::errors::GraphQueryError;
use crate::translator::{translate_expr, Usage};
use crate::visitor::context::{determine_context_alias, QueryContext};

pub fn finalize_structure(ctx: &mut QueryContext) -> Result<(), GraphQueryError> {
    compile_traversal_pattern(ctx)?;
    resolve_pending_where(ctx)
}

/// Replace accumulated MATCHes with the single traversal pattern and
/// retarget the current alias at the traversal target.
fn compile_traversal_pattern(ctx: &mut QueryContext) -> Result<(), GraphQueryError> {
    if ctx.scope.traversal_steps.is_empty() {
        return Ok(());
    }
    let root = ctx
        .scope
        .root_type
        .clone()
        .ok_or_else(|| ctx.operator_error("traverse"))?;

    // Node roots anchor the pattern at their labelled alias; a traversal
    // from a relationship root starts at the relationship's source nodes.
    let (source_alias, mut pattern) = if root.is_relationship() {
        ("src".to_string(), "(src)".to_string())
    } else {
        let alias = ctx
            .scope
            .alias_of_type(root.type_id)
            .unwrap_or("n")
            .to_string();
        let pattern = format!("({}:{})", alias, root.label);
        (alias, pattern)
    };
    let steps = ctx.scope.traversal_steps.clone();
    let mut final_alias = source_alias;
    let mut projected_relationship: Option<String> = None;

    for step in &steps {
        let depth = step.depth_fragment();
        let relationship = match &step.relationship_alias {
            Some(alias) => {
                projected_relationship = Some(alias.clone());
                format!("{}:{}{}", alias, step.relationship.label, depth)
            }
            None => format!(":{}{}", step.relationship.label, depth),
        };
        let target_alias = ctx.scope.assign_fresh_alias(&step.target);
        let target = format!("({}:{})", target_alias, step.target.label);
        let hop = match step.direction {
            Direction::Outgoing => format!("-[{}]->{}", relationship, target),
            Direction::Incoming => format!("<-[{}]-{}", relationship, target),
            Direction::Both => format!("-[{}]-{}", relationship, target),
        };
        pattern.push_str(&hop);
        final_alias = target_alias;
    }

    ctx.builder.replace_matches(pattern);
    ctx.scope.current_alias = Some(projected_relationship.unwrap_or(final_alias));
    // The traversal result is the target, not the root entity; loading the
    // root's complex properties would return unrelated columns.
    ctx.builder.needs_complex_property_loading = false;
    Ok(())
}

/// Translate deferred predicates. A pinned alias temporarily overrides the
/// current alias so predicates recorded before a traversal still filter the
/// element they were written against.
fn resolve_pending_where(ctx: &mut QueryContext) -> Result<(), GraphQueryError> {
    let pending = ctx.builder.take_pending_where();
    for (predicate, target_alias) in pending {
        let saved = ctx.scope.current_alias.clone();
        if let Some(alias) = &target_alias {
            ctx.scope.current_alias = Some(alias.clone());
        }
        let fragment = translate_expr(ctx, Usage::Where, &predicate);
        ctx.scope.current_alias = saved;
        ctx.builder.add_where(fragment?);
    }
    Ok(())
}

pub fn finalize_result(ctx: &mut QueryContext) -> Result<(), GraphQueryError> {
    // Complex-property loading survives only identity results of node roots.
    if ctx.builder.needs_complex_property_loading {
        let keep = ctx.scope.root_is_node()
            && !ctx.result_shape.is_scalar
            && !ctx.builder.has_user_projections
            && !ctx.scope.is_path_segment_context;
        ctx.builder.needs_complex_property_loading = keep;
    }

    if ctx.builder.has_return_clause() {
        return Ok(());
    }

    if let Some(key_fragment) = ctx.scope.group_by_expression.clone() {
        let elements = ctx
            .scope
            .group_element_expression
            .clone()
            .unwrap_or_else(|| determine_context_alias(ctx));
        ctx.builder.add_return(key_fragment, Some("key".to_string()));
        ctx.builder
            .add_return(format!("collect({})", elements), Some("elements".to_string()));
        ctx.result_shape.is_projection = true;
        return Ok(());
    }

    let alias = determine_context_alias(ctx);
    ctx.builder.add_return(alias, None);
    if ctx.builder.needs_complex_property_loading {
        for complex_alias in ctx.builder.complex_property_aliases() {
            ctx.builder.add_return(complex_alias, None);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::cypher::{ResultShape, TraversalStep};
    use crate::expression::combinators::{lit, prop};
    use crate::operators::QueryRoot;
    use crate::schema::{
        ElementInfo, EmptyEntityFactory, GraphElement, NodeElement, RelationshipElement,
    };
    use crate::visitor::handlers::root::install_root;
    use crate::visitor::context::QueryContext;

    struct Person;
    impl GraphElement for Person {}
    impl NodeElement for Person {}

    struct Knows;
    impl GraphElement for Knows {}
    impl RelationshipElement for Knows {}

    static FACTORY: EmptyEntityFactory = EmptyEntityFactory;

    #[test]
    fn traversal_pattern_replaces_matches() {
        let config = ProviderConfig::default();
        let mut ctx = QueryContext::new(&FACTORY, &config);
        install_root(&mut ctx, &QueryRoot::node(ElementInfo::node::<Person>())).unwrap();
        let mut step = TraversalStep::new(
            ElementInfo::relationship::<Knows>(),
            ElementInfo::node::<Person>(),
        );
        step.min_depth = Some(1);
        step.max_depth = Some(3);
        ctx.scope.traversal_steps.push(step);

        finalize_structure(&mut ctx).unwrap();
        finalize_result(&mut ctx).unwrap();
        let query = ctx.builder.build(ResultShape::default()).unwrap();
        assert_eq!(
            query.text,
            "MATCH (n:Person)-[:KNOWS*1..3]->(n2:Person) RETURN n2"
        );
    }

    #[test]
    fn pending_where_uses_pinned_alias() {
        let config = ProviderConfig::default();
        let mut ctx = QueryContext::new(&FACTORY, &config);
        install_root(&mut ctx, &QueryRoot::node(ElementInfo::node::<Person>())).unwrap();
        ctx.builder
            .push_pending_where(prop("Age").gt(lit(30)), Some("n".to_string()));
        ctx.scope
            .traversal_steps
            .push(TraversalStep::new(
                ElementInfo::relationship::<Knows>(),
                ElementInfo::node::<Person>(),
            ));

        finalize_structure(&mut ctx).unwrap();
        finalize_result(&mut ctx).unwrap();
        let query = ctx.builder.build(ResultShape::default()).unwrap();
        assert_eq!(
            query.text,
            "MATCH (n:Person)-[:KNOWS]->(n2:Person) WHERE n.Age > $p0 RETURN n2"
        );
    }

    #[test]
    fn default_group_return() {
        let config = ProviderConfig::default();
        let mut ctx = QueryContext::new(&FACTORY, &config);
        install_root(&mut ctx, &QueryRoot::node(ElementInfo::node::<Person>())).unwrap();
        ctx.scope.group_by_expression = Some("n.City".to_string());
        finalize_result(&mut ctx).unwrap();
        let query = ctx.builder.build(ResultShape::default()).unwrap();
        assert_eq!(
            query.text,
            "MATCH (n:Person) RETURN n.City AS key, collect(n) AS elements"
        );
    }
}
