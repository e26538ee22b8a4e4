//! Expression Traversal
//!
//! Pre-order walks over `Expr` trees. Used by evaluability scanning (does an
//! expression reference the query root?) and by the handlers that need to
//! inspect sub-expression shapes before translation.

use super::Expr;

/// Walk `expr` pre-order, calling `visit` on every node.
/// Returning `false` from `visit` stops descent into that node's children.
pub fn walk(expr: &Expr, visit: &mut impl FnMut(&Expr) -> bool) {
    if !visit(expr) {
        return;
    }
    match expr {
        Expr::Root | Expr::Variable(_) | Expr::Constant(_) | Expr::GroupKey => {}
        Expr::Property { base, .. }
        | Expr::StartNode(base)
        | Expr::EndNode(base)
        | Expr::Relationship(base)
        | Expr::StartNodeId(base)
        | Expr::EndNodeId(base) => walk(base, visit),
        Expr::Record(fields) => {
            for (_, value) in fields {
                walk(value, visit);
            }
        }
        Expr::List(items) => {
            for item in items {
                walk(item, visit);
            }
        }
        Expr::Binary { lhs, rhs, .. } => {
            walk(lhs, visit);
            walk(rhs, visit);
        }
        Expr::Unary { operand, .. } => walk(operand, visit),
        Expr::Conditional {
            condition,
            then_value,
            else_value,
        } => {
            walk(condition, visit);
            walk(then_value, visit);
            walk(else_value, visit);
        }
        Expr::Call { args, .. } => {
            for arg in args {
                walk(arg, visit);
            }
        }
        Expr::Lambda { body, .. } => walk(body, visit),
    }
}

/// True when the expression references the lambda parameter (directly or
/// through a member chain). Expressions without a root reference are
/// candidates for translation-time evaluation.
pub fn references_root(expr: &Expr) -> bool {
    let mut found = false;
    walk(expr, &mut |node| {
        if matches!(node, Expr::Root | Expr::GroupKey) {
            found = true;
            return false;
        }
        true
    });
    found
}

/// True when the expression references a bound variable (lambda or UNWIND
/// item). Such expressions cannot be folded either.
pub fn references_variable(expr: &Expr) -> bool {
    let mut found = false;
    walk(expr, &mut |node| {
        if matches!(node, Expr::Variable(_)) {
            found = true;
            return false;
        }
        true
    });
    found
}

/// True when the expression can only be resolved server-side.
pub fn is_server_bound(expr: &Expr) -> bool {
    references_root(expr) || references_variable(expr)
}

/// Count root references; `determine_context_alias` callers use this to tell
/// identity projections apart from computed ones.
pub fn count_root_references(expr: &Expr) -> usize {
    let mut count = 0;
    walk(expr, &mut |node| {
        if matches!(node, Expr::Root) {
            count += 1;
        }
        true
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::combinators::{lit, prop};

    #[test]
    fn detects_root_reference() {
        assert!(references_root(&prop("Age").gt(lit(30))));
        assert!(!references_root(&lit(1).add(lit(2))));
    }

    #[test]
    fn group_key_counts_as_root() {
        assert!(references_root(&Expr::GroupKey));
    }

    #[test]
    fn detects_lambda_variable() {
        let expr = prop("Tags").any_item("x", |x| x.eq(lit("a")));
        assert!(references_variable(&expr));
        assert!(!references_variable(&lit(1)));
    }

    #[test]
    fn walk_visits_all_nodes() {
        let expr = prop("A").add(lit(1)).mul(lit(2));
        let mut seen = 0;
        walk(&expr, &mut |_| {
            seen += 1;
            true
        });
        // mul(add(prop(root, A), 1), 2) = 6 nodes
        assert_eq!(seen, 6);
    }
}
