//! Operator Rendering
//!
//! Binary, unary and conditional expressions. Two local rewrites live here:
//! null-aware equality (`x == null` → `x IS NULL`) and datetime parameter
//! wrapping (`x > $p0` → `x > datetime($p0)` when the captured operand is a
//! datetime).

use crate::errors::GraphQueryError;
use crate::expression::folding::{fold_constant, is_foldable};
use crate::expression::{BinaryOp, CypherValue, Expr, UnaryOp};
use crate::visitor::context::QueryContext;

use super::{parameterize, translate_expr, Usage};

pub fn translate_binary(
    ctx: &mut QueryContext,
    usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    let Expr::Binary { op, lhs, rhs } = expr else {
        return Ok(None);
    };

    // Null-aware equality: the null literal never reaches the operand
    // renderer.
    if op.is_equality() {
        if rhs.is_constant_null() {
            let operand = translate_expr(ctx, usage, lhs)?;
            return Ok(Some(null_check(*op, operand)));
        }
        if lhs.is_constant_null() {
            let operand = translate_expr(ctx, usage, rhs)?;
            return Ok(Some(null_check(*op, operand)));
        }
    }

    let lhs_fragment = translate_operand(ctx, usage, lhs)?;
    let rhs_fragment = translate_operand(ctx, usage, rhs)?;
    let symbol = op.cypher_symbol();

    let fragment = if op.is_logical() {
        format!("({} {} {})", lhs_fragment, symbol, rhs_fragment)
    } else if op.is_comparison() {
        format!("{} {} {}", lhs_fragment, symbol, rhs_fragment)
    } else {
        // arithmetic
        format!("({} {} {})", lhs_fragment, symbol, rhs_fragment)
    };
    Ok(Some(fragment))
}

fn null_check(op: BinaryOp, operand: String) -> String {
    match op {
        BinaryOp::Equal => format!("{} IS NULL", operand),
        _ => format!("{} IS NOT NULL", operand),
    }
}

/// Render a binary operand; captured datetime values are parameterized and
/// wrapped in `datetime(..)` so the server compares temporal values, not
/// strings.
fn translate_operand(
    ctx: &mut QueryContext,
    usage: Usage,
    operand: &Expr,
) -> Result<String, GraphQueryError> {
    if is_foldable(operand) {
        let value = fold_constant(operand).map_err(|e| ctx.expression_error(e))?;
        if matches!(value, CypherValue::DateTime(_)) {
            let placeholder = parameterize(ctx, value);
            return Ok(format!("datetime({})", placeholder));
        }
        return Ok(parameterize(ctx, value));
    }
    translate_expr(ctx, usage, operand)
}

pub fn translate_unary(
    ctx: &mut QueryContext,
    usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    let Expr::Unary { op, operand } = expr else {
        return Ok(None);
    };
    let inner = translate_expr(ctx, usage, operand)?;
    let fragment = match op {
        UnaryOp::Not => format!("NOT ({})", inner),
        UnaryOp::ToInteger => format!("toInteger({})", inner),
        UnaryOp::ToFloat => format!("toFloat({})", inner),
        UnaryOp::ToBoolean => format!("toBoolean({})", inner),
        UnaryOp::ToStringValue => format!("toString({})", inner),
        UnaryOp::ToDateTime => format!("datetime({})", inner),
    };
    Ok(Some(fragment))
}

pub fn translate_conditional(
    ctx: &mut QueryContext,
    usage: Usage,
    expr: &Expr,
) -> Result<Option<String>, GraphQueryError> {
    let Expr::Conditional {
        condition,
        then_value,
        else_value,
    } = expr
    else {
        return Ok(None);
    };
    let condition = translate_expr(ctx, usage, condition)?;
    let then_value = translate_expr(ctx, usage, then_value)?;
    let else_value = translate_expr(ctx, usage, else_value)?;
    Ok(Some(format!(
        "CASE WHEN {} THEN {} ELSE {} END",
        condition, then_value, else_value
    )))
}
