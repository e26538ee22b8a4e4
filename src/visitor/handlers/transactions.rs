//! Transaction Forwarding
//!
//! The dedicated extraction walk (`transaction::extract_transaction`) decides
//! which transaction a query runs under before translation starts; the
//! handler only mirrors the chosen handle into the context and guards
//! against a conflicting second handle.

use crate::errors::GraphQueryError;
use crate::operators::QueryOp;
use crate::transaction::TransactionError;
use crate::visitor::context::QueryContext;

use super::payload_mismatch;

pub fn handle_with_transaction(
    ctx: &mut QueryContext,
    op: &QueryOp,
) -> Result<(), GraphQueryError> {
    let QueryOp::WithTransaction(transaction) = op else {
        return Err(payload_mismatch(ctx, op, "transaction"));
    };
    match &ctx.transaction {
        None => {
            ctx.transaction = Some(transaction.clone());
            Ok(())
        }
        Some(existing) if existing == transaction => Ok(()),
        Some(_) => Err(TransactionError::Ambiguous { count: 2 }.into()),
    }
}
