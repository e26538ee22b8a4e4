//! Cypher Query Visitor
//!
//! Walks an operator tree in source order: install the root MATCH, dispatch
//! every operator through the handler registry, finalize structure (traversal
//! pattern, deferred predicates), run the terminal handler, finalize the
//! result (default RETURN, complex-property decision).
//!
//! # Module Organization
//!
//! - **context.rs**: per-execution `QueryContext` and alias resolution
//! - **registry.rs**: four-tier `HandlerRegistry`
//! - **handlers/**: one module per operator family

pub mod context;
pub mod handlers;
pub mod registry;

use crate::errors::GraphQueryError;
use crate::operators::{OperatorTree, Terminal};

use context::QueryContext;
use registry::HandlerRegistry;

pub struct CypherQueryVisitor<'r> {
    registry: &'r HandlerRegistry,
}

impl Default for CypherQueryVisitor<'_> {
    fn default() -> Self {
        CypherQueryVisitor {
            registry: registry::global(),
        }
    }
}

impl<'r> CypherQueryVisitor<'r> {
    pub fn new(registry: &'r HandlerRegistry) -> Self {
        CypherQueryVisitor { registry }
    }

    /// Drive one tree plus terminal through the handlers, mutating `ctx`.
    pub fn visit(
        &self,
        ctx: &mut QueryContext,
        tree: &OperatorTree,
        terminal: &Terminal,
    ) -> Result<(), GraphQueryError> {
        handlers::root::install_root(ctx, &tree.root)?;

        for op in &tree.ops {
            let handler = self.registry.op_handler(ctx, op, tree.root.kind)?;
            handler(ctx, op)?;
        }

        handlers::finalize::finalize_structure(ctx)?;

        let handler = self.registry.terminal_handler(ctx, terminal, tree.root.kind)?;
        handler(ctx, terminal)?;

        handlers::finalize::finalize_result(ctx)
    }
}
