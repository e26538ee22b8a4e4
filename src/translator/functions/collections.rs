//! Collection and Aggregate Call Translation
//!
//! Membership (`IN`), quantifier predicates (`ANY` / `ALL` / `NONE` /
//! `SINGLE` over a bound variable), `size`, and the aggregate family used in
//! SELECT and GROUP BY positions.

use crate::errors::GraphQueryError;
use crate::expression::{Expr, ExpressionError, HostFn};
use crate::visitor::context::{determine_context_alias, QueryContext};

use super::super::{translate_expr, Usage};
use super::{render_registry_call, registry};

pub fn translate(
    ctx: &mut QueryContext,
    usage: Usage,
    function: HostFn,
    args: &[Expr],
) -> Result<Option<String>, GraphQueryError> {
    match function {
        HostFn::InCollection => {
            let item = translate_expr(ctx, usage, &args[0])?;
            let collection = translate_expr(ctx, usage, &args[1])?;
            Ok(Some(format!("{} IN {}", item, collection)))
        }

        HostFn::AnyIn | HostFn::AllIn | HostFn::NoneIn | HostFn::SingleIn => {
            let keyword = match function {
                HostFn::AnyIn => "ANY",
                HostFn::AllIn => "ALL",
                HostFn::NoneIn => "NONE",
                _ => "SINGLE",
            };
            let collection = translate_expr(ctx, usage, &args[0])?;
            let Expr::Lambda { variable, body } = &args[1] else {
                return Err(ctx.expression_error(ExpressionError::unsupported(
                    format!("call '{}'", function.name()),
                    "quantifier predicates require a lambda argument",
                )));
            };
            let predicate = with_bound_variable(ctx, variable, |ctx| {
                translate_expr(ctx, usage, body)
            })?;
            Ok(Some(format!(
                "{}({} IN {} WHERE {})",
                keyword, variable, collection, predicate
            )))
        }

        HostFn::Size => render_registry_call(ctx, usage, function, args),

        HostFn::CountWhere => {
            let predicate = translate_expr(ctx, usage, &args[0])?;
            Ok(Some(format!("count(CASE WHEN {} THEN 1 END)", predicate)))
        }

        HostFn::Count | HostFn::Sum | HostFn::Avg | HostFn::Min | HostFn::Max
        | HostFn::Collect => {
            let name =
                registry::cypher_function_name(function).unwrap_or_else(|| function.name());
            // Zero-argument aggregates range over the grouped element.
            if args.is_empty() {
                let target = ctx
                    .scope
                    .group_element_expression
                    .clone()
                    .unwrap_or_else(|| determine_context_alias(ctx));
                return Ok(Some(format!("{}({})", name, target)));
            }
            let rendered = translate_expr(ctx, usage, &args[0])?;
            Ok(Some(format!("{}({})", name, rendered)))
        }

        _ => Ok(None),
    }
}

/// Bind a lambda variable to itself for the duration of `body`, restoring
/// any shadowed binding afterwards.
fn with_bound_variable<T>(
    ctx: &mut QueryContext,
    variable: &str,
    body: impl FnOnce(&mut QueryContext) -> Result<T, GraphQueryError>,
) -> Result<T, GraphQueryError> {
    let shadowed = ctx
        .scope
        .variable_alias(variable)
        .map(str::to_string);
    ctx.scope.bind_variable(variable, variable);
    let result = body(ctx);
    match shadowed {
        Some(previous) => ctx.scope.bind_variable(variable, previous),
        None => {
            ctx.scope.variable_aliases.remove(variable);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use crate::config::ProviderConfig;
    use crate::expression::combinators::{lit, prop};
    use crate::expression::{Expr, HostFn};
    use crate::schema::{ElementInfo, EmptyEntityFactory, GraphElement, NodeElement};
    use crate::translator::{translate_expr, Usage};
    use crate::visitor::context::QueryContext;

    struct Person;
    impl GraphElement for Person {}
    impl NodeElement for Person {}

    static FACTORY: EmptyEntityFactory = EmptyEntityFactory;

    fn ctx(config: &ProviderConfig) -> QueryContext<'_> {
        let mut ctx = QueryContext::new(&FACTORY, config);
        let person = ElementInfo::node::<Person>();
        let alias = ctx.scope.alias_for(&person);
        ctx.scope.current_alias = Some(alias);
        ctx.scope.root_type = Some(person);
        ctx
    }

    #[test]
    fn membership() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        let expr = prop("City").in_collection(lit(vec!["Paris", "Rome"]));
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &expr).unwrap(),
            "n.City IN $p0"
        );
    }

    #[test]
    fn quantifier_predicates() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        let expr = prop("Tags").any_item("x", |x| x.eq(lit("rust")));
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &expr).unwrap(),
            "ANY(x IN n.Tags WHERE x = $p0)"
        );
        let expr = prop("Scores").all_items("s", |s| s.ge(lit(10)));
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &expr).unwrap(),
            "ALL(s IN n.Scores WHERE s >= $p1)"
        );
    }

    #[test]
    fn size_of_collection() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &prop("Tags").size()).unwrap(),
            "size(n.Tags)"
        );
    }

    #[test]
    fn zero_argument_count_ranges_over_alias() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        let expr = Expr::Call {
            function: HostFn::Count,
            args: vec![],
        };
        assert_eq!(
            translate_expr(&mut ctx, Usage::Select, &expr).unwrap(),
            "count(n)"
        );
    }

    #[test]
    fn count_where_renders_case() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        let expr = Expr::Call {
            function: HostFn::CountWhere,
            args: vec![prop("Age").ge(lit(18))],
        };
        assert_eq!(
            translate_expr(&mut ctx, Usage::Select, &expr).unwrap(),
            "count(CASE WHEN n.Age >= $p0 THEN 1 END)"
        );
    }

    #[test]
    fn aggregate_over_selector() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        let expr = Expr::Call {
            function: HostFn::Sum,
            args: vec![prop("Salary")],
        };
        assert_eq!(
            translate_expr(&mut ctx, Usage::Select, &expr).unwrap(),
            "sum(n.Salary)"
        );
    }
}
