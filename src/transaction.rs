//! Transactions
//!
//! The provider never manages driver transactions itself; it only decides
//! which handle a statement runs under. Before execution a dedicated walk
//! collects every transaction referenced by the operator tree:
//!
//! - none found → the context opens a read-only transaction and disposes it
//!   after execution,
//! - exactly one → it is borrowed and left open,
//! - more than one distinct handle → `AmbiguousTransaction`, no execution.

use thiserror::Error;
use uuid::Uuid;

use crate::operators::{OperatorTree, QueryOp};

/// Opaque handle for a driver transaction. Identity is the uuid; clones of
/// the same handle compare equal.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: Uuid,
    owned_by_context: bool,
}

impl Transaction {
    /// A handle supplied by the caller (opened externally).
    pub fn new() -> Self {
        Transaction {
            id: Uuid::new_v4(),
            owned_by_context: false,
        }
    }

    /// Mark this handle as opened by the query context; such handles are
    /// disposed after execution.
    pub(crate) fn into_context_owned(mut self) -> Self {
        self.owned_by_context = true;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_owned_by_context(&self) -> bool {
        self.owned_by_context
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction::new()
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

#[derive(Debug, Clone, Error)]
pub enum TransactionError {
    #[error(
        "ambiguous transaction: {count} distinct transactions referenced by one query \
         (a query must run under exactly one transaction)"
    )]
    Ambiguous { count: usize },
}

/// Collect the transaction an operator tree should run under.
///
/// Walks `with_transaction` operators, including those inside trees captured
/// by `join` / `union` / `concat` operands.
pub fn extract_transaction(
    tree: &OperatorTree,
) -> Result<Option<Transaction>, TransactionError> {
    let mut found: Vec<Transaction> = Vec::new();
    collect(tree, &mut found);
    found.dedup_by(|a, b| a == b);
    // dedup only removes adjacent duplicates; do a full distinct pass
    let mut distinct: Vec<Transaction> = Vec::new();
    for tx in found {
        if !distinct.contains(&tx) {
            distinct.push(tx);
        }
    }
    match distinct.len() {
        0 => Ok(None),
        1 => Ok(distinct.pop()),
        count => Err(TransactionError::Ambiguous { count }),
    }
}

fn collect(tree: &OperatorTree, found: &mut Vec<Transaction>) {
    for op in &tree.ops {
        match op {
            QueryOp::WithTransaction(tx) => found.push(tx.clone()),
            QueryOp::Join { inner, .. } => collect(inner, found),
            QueryOp::Union(inner) | QueryOp::Concat(inner) => collect(inner, found),
            _ => {}
        }
    }
}
