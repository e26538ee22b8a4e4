//! Math Call Translation
//!
//! Same-named Cypher functions via the rename table; `pow` is the `^`
//! operator in Cypher.

use crate::errors::GraphQueryError;
use crate::expression::{Expr, HostFn};
use crate::visitor::context::QueryContext;

use super::super::{translate_expr, Usage};
use super::render_registry_call;

pub fn translate(
    ctx: &mut QueryContext,
    usage: Usage,
    function: HostFn,
    args: &[Expr],
) -> Result<Option<String>, GraphQueryError> {
    match function {
        HostFn::Pow => {
            let base = translate_expr(ctx, usage, &args[0])?;
            let exponent = translate_expr(ctx, usage, &args[1])?;
            Ok(Some(format!("({} ^ {})", base, exponent)))
        }

        HostFn::Abs
        | HostFn::Floor
        | HostFn::Ceiling
        | HostFn::Round
        | HostFn::Sqrt
        | HostFn::Sign
        | HostFn::Sin
        | HostFn::Cos
        | HostFn::Tan
        | HostFn::Exp
        | HostFn::Log => render_registry_call(ctx, usage, function, args),

        _ => Ok(None),
    }
}
