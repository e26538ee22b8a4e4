//! Operator Handlers
//!
//! One module per operator family. Handlers receive the mutable
//! `QueryContext` and mutate scope, builder and result shape; they never
//! perform I/O and never hold state between calls.

pub mod aggregation;
pub mod filtering;
pub mod finalize;
pub mod grouping;
pub mod ordering;
pub mod path_segments;
pub mod projection;
pub mod root;
pub mod transactions;
pub mod traversal;

use crate::errors::GraphQueryError;
use crate::expression::ExpressionError;
use crate::operators::QueryOp;
use crate::visitor::context::QueryContext;

/// A handler received a payload it is not registered for; indicates a
/// registry bootstrap mistake, not a user error.
pub(crate) fn payload_mismatch(
    ctx: &QueryContext,
    op: &QueryOp,
    expected: &str,
) -> GraphQueryError {
    ctx.expression_error(ExpressionError::unsupported(
        op.kind().name(),
        format!("handler expected a {} payload", expected),
    ))
}
