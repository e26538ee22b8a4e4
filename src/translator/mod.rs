//! Expression Translator
//!
//! Converts predicate, projection, ordering and grouping expressions into
//! Cypher fragments whose free identifiers are declared aliases and
//! `$`-parameters.
//!
//! The pipeline is a responsibility chain of small stateless functions: each
//! sub-visitor either handles the node (`Ok(Some(fragment))`) or passes
//! (`Ok(None)`) and the next is tried. A node no sub-visitor claims is an
//! unsupported expression, reported with the scope state attached.
//!
//! # Module Organization
//!
//! - **mod.rs** (this file): entry point, chain, captured-value folding
//! - **operators.rs**: binary / unary / conditional rendering
//! - **member_access.rs**: alias resolution for member chains
//! - **functions/**: host-language call translation

use crate::expression::folding::{fold_constant, is_foldable};
use crate::expression::{CypherValue, Expr, ExpressionError};
use crate::errors::GraphQueryError;
use crate::visitor::context::{determine_context_alias, QueryContext};

pub mod functions;
pub mod member_access;
pub mod operators;

/// Usage context of the expression being translated; a few rules differ
/// between clause positions (aggregates, projection records).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Where,
    Select,
    OrderBy,
    GroupBy,
}

/// A link of the responsibility chain.
pub type SubVisitor =
    fn(&mut QueryContext<'_>, Usage, &Expr) -> Result<Option<String>, GraphQueryError>;

/// Chain order matters: captured-value folding runs first so evaluable calls
/// never reach the Cypher renderers, roots and constants before the
/// structural visitors.
const CHAIN: &[SubVisitor] = &[
    translate_captured,
    translate_root,
    member_access::translate_member,
    operators::translate_binary,
    operators::translate_unary,
    operators::translate_conditional,
    translate_list,
    functions::translate_call,
];

/// Translate one expression into a Cypher fragment.
pub fn translate_expr(
    ctx: &mut QueryContext,
    usage: Usage,
    expr: &Expr,
) -> Result<String, GraphQueryError> {
    for visitor in CHAIN {
        if let Some(fragment) = visitor(ctx, usage, expr)? {
            log::debug!("translated {} -> {}", expr.describe(), fragment);
            return Ok(fragment);
        }
    }
    Err(ctx.expression_error(ExpressionError::unsupported(
        expr.describe(),
        "no translation rule matched this expression shape",
    )))
}

/// Captured values and evaluable calls: fold to a value, then parameterize.
/// `null` is emitted literally so the null-law rewrites in `operators` can
/// see it; every other value becomes a `$`-placeholder.
fn translate_captured(
    ctx: &mut QueryContext,
    _usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    if !is_foldable(expr) {
        return Ok(None);
    }
    let value = fold_constant(expr).map_err(|e| ctx.expression_error(e))?;
    Ok(Some(parameterize(ctx, value)))
}

/// Add a folded value to the parameter table, or emit the null literal.
pub(crate) fn parameterize(ctx: &mut QueryContext, value: CypherValue) -> String {
    if value.is_null() {
        "null".to_string()
    } else {
        ctx.builder.add_parameter(value)
    }
}

/// The lambda parameter, bound variables and the grouping key.
fn translate_root(
    ctx: &mut QueryContext,
    _usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    match expr {
        Expr::Root => {
            if ctx.scope.root_is_relationship() {
                // A relationship-typed parameter always resolves to its alias.
                return Ok(Some(
                    ctx.scope
                        .current_alias
                        .clone()
                        .unwrap_or_else(|| "r".to_string()),
                ));
            }
            Ok(Some(determine_context_alias(ctx)))
        }
        Expr::Variable(name) => match ctx.scope.variable_alias(name) {
            Some(alias) => Ok(Some(alias.to_string())),
            None => Err(ctx.expression_error(ExpressionError::unsupported(
                format!("variable '{}'", name),
                "variable is not bound in this scope",
            ))),
        },
        Expr::GroupKey => Ok(Some(
            ctx.scope
                .group_by_expression
                .clone()
                .unwrap_or_else(|| determine_context_alias(ctx)),
        )),
        _ => Ok(None),
    }
}

/// List literals: fully captured lists collapse into one parameter, mixed
/// lists render element-wise.
fn translate_list(
    ctx: &mut QueryContext,
    usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    let Expr::List(items) = expr else {
        return Ok(None);
    };
    let rendered: Result<Vec<String>, GraphQueryError> = items
        .iter()
        .map(|item| translate_expr(ctx, usage, item))
        .collect();
    Ok(Some(format!("[{}]", rendered?.join(", "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::expression::combinators::{lit, prop};
    use crate::schema::{ElementInfo, EmptyEntityFactory, GraphElement, NodeElement};

    struct Person;
    impl GraphElement for Person {}
    impl NodeElement for Person {}

    static FACTORY: EmptyEntityFactory = EmptyEntityFactory;

    fn rooted_context(config: &ProviderConfig) -> QueryContext<'_> {
        let mut ctx = QueryContext::new(&FACTORY, config);
        let person = ElementInfo::node::<Person>();
        let alias = ctx.scope.alias_for(&person);
        ctx.scope.current_alias = Some(alias);
        ctx.scope.root_type = Some(person);
        ctx
    }

    #[test]
    fn captured_value_becomes_parameter() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        let fragment = translate_expr(&mut ctx, Usage::Where, &lit(30)).unwrap();
        assert_eq!(fragment, "$p0");
        assert_eq!(ctx.builder.parameters().get("p0"), Some(&CypherValue::Int(30)));
    }

    #[test]
    fn same_value_reuses_parameter() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        assert_eq!(translate_expr(&mut ctx, Usage::Where, &lit(30)).unwrap(), "$p0");
        assert_eq!(translate_expr(&mut ctx, Usage::Where, &lit(30)).unwrap(), "$p0");
        assert_eq!(ctx.builder.parameters().len(), 1);
    }

    #[test]
    fn evaluable_call_is_folded() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        let fragment = translate_expr(&mut ctx, Usage::Where, &lit(-3).abs()).unwrap();
        assert_eq!(fragment, "$p0");
        assert_eq!(ctx.builder.parameters().get("p0"), Some(&CypherValue::Int(3)));
    }

    #[test]
    fn root_resolves_to_current_alias() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        assert_eq!(
            translate_expr(&mut ctx, Usage::Select, &Expr::Root).unwrap(),
            "n"
        );
    }

    #[test]
    fn unbound_variable_fails() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        let err = translate_expr(&mut ctx, Usage::Where, &Expr::Variable("x".into())).unwrap_err();
        assert!(err.to_string().contains("not bound"));
    }

    #[test]
    fn mixed_list_renders_elementwise() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        let expr = Expr::List(vec![prop("Age"), lit(1)]);
        let fragment = translate_expr(&mut ctx, Usage::Where, &expr).unwrap();
        assert_eq!(fragment, "[n.Age, $p0]");
    }

    #[test]
    fn captured_list_is_one_parameter() {
        let config = ProviderConfig::default();
        let mut ctx = rooted_context(&config);
        let expr = Expr::List(vec![lit(1), lit(2)]);
        let fragment = translate_expr(&mut ctx, Usage::Where, &expr).unwrap();
        assert_eq!(fragment, "$p0");
        assert_eq!(
            ctx.builder.parameters().get("p0"),
            Some(&CypherValue::List(vec![CypherValue::Int(1), CypherValue::Int(2)]))
        );
    }
}
