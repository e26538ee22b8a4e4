//! String Call Translation

use crate::errors::GraphQueryError;
use crate::expression::{Expr, HostFn};
use crate::visitor::context::QueryContext;

use super::super::{translate_expr, Usage};
use super::{render_args, render_registry_call};

pub fn translate(
    ctx: &mut QueryContext,
    usage: Usage,
    function: HostFn,
    args: &[Expr],
) -> Result<Option<String>, GraphQueryError> {
    match function {
        // Infix string predicates.
        HostFn::Contains | HostFn::StartsWith | HostFn::EndsWith => {
            let lhs = translate_expr(ctx, usage, &args[0])?;
            let rhs = translate_expr(ctx, usage, &args[1])?;
            let keyword = match function {
                HostFn::Contains => "CONTAINS",
                HostFn::StartsWith => "STARTS WITH",
                _ => "ENDS WITH",
            };
            Ok(Some(format!("{} {} {}", lhs, keyword, rhs)))
        }

        HostFn::IsNullOrEmpty => {
            let value = translate_expr(ctx, usage, &args[0])?;
            Ok(Some(format!(
                "({} IS NULL OR size({}) = 0)",
                value, value
            )))
        }

        HostFn::IsNullOrWhiteSpace => {
            let value = translate_expr(ctx, usage, &args[0])?;
            Ok(Some(format!(
                "({} IS NULL OR size(trim({})) = 0)",
                value, value
            )))
        }

        // Server-side concatenation uses `+`.
        HostFn::Concat => {
            let rendered = render_args(ctx, usage, args)?;
            Ok(Some(format!("({})", rendered.join(" + "))))
        }

        // toLower / toUpper / trim / ltrim / rtrim / replace / substring /
        // size through the rename table.
        HostFn::ToLower
        | HostFn::ToUpper
        | HostFn::Trim
        | HostFn::TrimStart
        | HostFn::TrimEnd
        | HostFn::Replace
        | HostFn::Substring
        | HostFn::Length => render_registry_call(ctx, usage, function, args),

        _ => Ok(None),
    }
}
