//! Member Access Resolution
//!
//! Maps structural member access onto declared aliases:
//!
//! - path-segment members → `src` / `tgt` / `r`
//! - relationship endpoint ids → `src.{IdProp}` / `tgt.{IdProp}`
//! - simple properties → `{alias}.{member}`
//! - one complex-property hop → a synthesized OPTIONAL MATCH alias
//!
//! Multi-level complex-property chains are reserved for a later revision and
//! fail loudly.

use crate::errors::GraphQueryError;
use crate::expression::{Expr, ExpressionError};
use crate::schema::PropertyInfo;
use crate::visitor::context::{determine_context_alias, QueryContext};

use super::Usage;

pub fn translate_member(
    ctx: &mut QueryContext,
    _usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    match expr {
        Expr::StartNode(_) => Ok(Some(path_segment_alias(ctx, "src"))),
        Expr::EndNode(_) => Ok(Some(path_segment_alias(ctx, "tgt"))),
        Expr::Relationship(_) => Ok(Some(path_segment_alias(ctx, "r"))),
        Expr::StartNodeId(_) => Ok(Some(endpoint_id(ctx, "src"))),
        Expr::EndNodeId(_) => Ok(Some(endpoint_id(ctx, "tgt"))),
        Expr::Property { base, name } => translate_property(ctx, base, name).map(Some),
        _ => Ok(None),
    }
}

fn path_segment_alias(ctx: &QueryContext, default: &str) -> String {
    let builder = &ctx.builder;
    let configured = match default {
        "src" => builder.path_segment_source_alias.as_deref(),
        "tgt" => builder.path_segment_target_alias.as_deref(),
        _ => builder.path_segment_relationship_alias.as_deref(),
    };
    configured.unwrap_or(default).to_string()
}

/// `src.{IdProp}` for relationship-typed roots. The id property name comes
/// from the relationship's schema when the factory knows one.
fn endpoint_id(ctx: &QueryContext, endpoint: &str) -> String {
    let id_property = ctx
        .scope
        .root_type
        .as_ref()
        .and_then(|root| ctx.schema_for(root))
        .map(|schema| schema.id_property_name.clone())
        .unwrap_or_else(|| "Id".to_string());
    format!("{}.{}", endpoint, id_property)
}

fn translate_property(
    ctx: &mut QueryContext,
    base: &Expr,
    name: &str,
) -> Result<String, GraphQueryError> {
    match base {
        // Direct member on the lambda parameter.
        Expr::Root => {
            let alias = root_alias(ctx);
            // A member that is itself a complex property resolves to the
            // synthesized node alias, not a stored property.
            if let Some(property) = complex_property_of_root(ctx, name) {
                let synthesized = ensure_complex_alias(ctx, &alias, &property);
                return Ok(synthesized);
            }
            Ok(format!("{}.{}", alias, name))
        }

        // Second hop: the first member must be a complex property.
        Expr::Property {
            base: inner_base,
            name: first,
        } => {
            if !matches!(**inner_base, Expr::Root) {
                return Err(ctx.expression_error(ExpressionError::unsupported(
                    format!("member access '.{}.{}'", first, name),
                    "multi-level complex-property navigation is not supported",
                )));
            }
            // Navigating through a property needs schema metadata to tell
            // complex properties from scalars.
            if let Some(root) = ctx.scope.root_type.clone() {
                if root.is_node() {
                    ctx.require_schema(&root, "complex-property navigation")?;
                }
            }
            let alias = root_alias(ctx);
            match complex_property_of_root(ctx, first) {
                Some(property) => {
                    let synthesized = ensure_complex_alias(ctx, &alias, &property);
                    Ok(format!("{}.{}", synthesized, name))
                }
                None => Err(ctx.expression_error(ExpressionError::unsupported(
                    format!("member access '.{}.{}'", first, name),
                    "the first member is not a complex property of the root type",
                ))),
            }
        }

        // Members of path-segment components.
        Expr::StartNode(_) => Ok(format!("{}.{}", path_segment_alias(ctx, "src"), name)),
        Expr::EndNode(_) => Ok(format!("{}.{}", path_segment_alias(ctx, "tgt"), name)),
        Expr::Relationship(_) => Ok(format!("{}.{}", path_segment_alias(ctx, "r"), name)),

        // Members of bound variables (UNWIND items, lambda parameters).
        Expr::Variable(variable) => match ctx.scope.variable_alias(variable) {
            Some(alias) => Ok(format!("{}.{}", alias, name)),
            None => Err(ctx.expression_error(ExpressionError::unsupported(
                format!("member access '{}.{}'", variable, name),
                "variable is not bound in this scope",
            ))),
        },

        other => Err(ctx.expression_error(ExpressionError::unsupported(
            format!("member access '.{}' on {}", name, other.describe()),
            "member access is only supported on query roots, path segments and variables",
        ))),
    }
}

fn root_alias(ctx: &QueryContext) -> String {
    determine_context_alias(ctx)
}

fn complex_property_of_root(ctx: &QueryContext, name: &str) -> Option<PropertyInfo> {
    let root = ctx.scope.root_type.as_ref()?;
    if !root.is_node() {
        return None;
    }
    ctx.schema_for(root)?.complex_property(name).cloned()
}

/// OPTIONAL MATCH for one complex-property hop; idempotent per pattern.
/// Returns the synthesized alias of the related node.
fn ensure_complex_alias(
    ctx: &mut QueryContext,
    base_alias: &str,
    property: &PropertyInfo,
) -> String {
    let synthesized = format!("{}_{}", base_alias, property.name);
    let pattern = format!(
        "({})-[:{}]->({}:{})",
        base_alias, property.relationship_type, synthesized, property.target_label
    );
    ctx.builder.add_optional_match(pattern);
    synthesized
}
