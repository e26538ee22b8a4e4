//! Date/Time Call Translation
//!
//! Clock calls map to the server clock (`datetime()`, `datetime.realtime()`,
//! `date()`), component accessors to `datetime(x).year` style access, and
//! shifts to duration arithmetic. Shifts over captured datetimes never reach
//! here; folding evaluates them client-side.

use crate::errors::GraphQueryError;
use crate::expression::{Expr, HostFn};
use crate::visitor::context::QueryContext;

use super::super::{translate_expr, Usage};

pub fn translate(
    ctx: &mut QueryContext,
    usage: Usage,
    function: HostFn,
    args: &[Expr],
) -> Result<Option<String>, GraphQueryError> {
    match function {
        HostFn::Now => Ok(Some("datetime()".to_string())),
        HostFn::UtcNow => Ok(Some("datetime.realtime()".to_string())),
        HostFn::Today => Ok(Some("date()".to_string())),

        HostFn::AddYears
        | HostFn::AddMonths
        | HostFn::AddDays
        | HostFn::AddHours
        | HostFn::AddMinutes
        | HostFn::AddSeconds => {
            let value = translate_expr(ctx, usage, &args[0])?;
            let amount = translate_expr(ctx, usage, &args[1])?;
            let unit = match function {
                HostFn::AddYears => "years",
                HostFn::AddMonths => "months",
                HostFn::AddDays => "days",
                HostFn::AddHours => "hours",
                HostFn::AddMinutes => "minutes",
                _ => "seconds",
            };
            Ok(Some(format!(
                "{} + duration({{{}: {}}})",
                value, unit, amount
            )))
        }

        HostFn::Year
        | HostFn::Month
        | HostFn::Day
        | HostFn::Hour
        | HostFn::Minute
        | HostFn::Second => {
            let value = translate_expr(ctx, usage, &args[0])?;
            let component = match function {
                HostFn::Year => "year",
                HostFn::Month => "month",
                HostFn::Day => "day",
                HostFn::Hour => "hour",
                HostFn::Minute => "minute",
                _ => "second",
            };
            Ok(Some(format!("datetime({}).{}", value, component)))
        }

        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ProviderConfig;
    use crate::expression::combinators::{lit, now, prop, today, utc_now};
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
    fn clock_calls() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &now()).unwrap(),
            "datetime()"
        );
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &utc_now()).unwrap(),
            "datetime.realtime()"
        );
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &today()).unwrap(),
            "date()"
        );
    }

    #[test]
    fn duration_shift_on_property() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        assert_eq!(
            translate_expr(&mut ctx, Usage::Select, &prop("Since").add_days(lit(7))).unwrap(),
            "n.Since + duration({days: $p0})"
        );
        assert_eq!(
            translate_expr(&mut ctx, Usage::Select, &prop("Since").add_years(lit(1))).unwrap(),
            "n.Since + duration({years: $p1})"
        );
    }

    #[test]
    fn component_accessors() {
        let config = ProviderConfig::default();
        let mut ctx = ctx(&config);
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &prop("Since").year()).unwrap(),
            "datetime(n.Since).year"
        );
        assert_eq!(
            translate_expr(&mut ctx, Usage::Where, &prop("Since").minute()).unwrap(),
            "datetime(n.Since).minute"
        );
    }
}
