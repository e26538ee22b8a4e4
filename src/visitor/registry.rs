//! Method Handler Registry
//!
//! Maps operator kinds to handler functions. Lookup is four-tiered, most
//! specific first:
//!
//! 1. exact: (kind, root kind, arity)
//! 2. type-specific: (kind, root kind)
//! 3. arity-specific: (kind, arity)
//! 4. kind fallback
//!
//! First match wins; a miss raises `UnsupportedOperator`. The registry is
//! built once at process start and is read-only afterwards.

use std::collections::HashMap;

use crate::cypher::QueryRootKind;
use crate::errors::GraphQueryError;
use crate::operators::{OperatorKind, QueryOp, Terminal};

use super::context::QueryContext;
use super::handlers;

pub type OpHandler = fn(&mut QueryContext<'_>, &QueryOp) -> Result<(), GraphQueryError>;
pub type TerminalHandler = fn(&mut QueryContext<'_>, &Terminal) -> Result<(), GraphQueryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    pub kind: OperatorKind,
    pub root: Option<QueryRootKind>,
    pub arity: Option<usize>,
}

impl HandlerKey {
    pub fn kind(kind: OperatorKind) -> Self {
        HandlerKey {
            kind,
            root: None,
            arity: None,
        }
    }

    pub fn for_root(kind: OperatorKind, root: QueryRootKind) -> Self {
        HandlerKey {
            kind,
            root: Some(root),
            arity: None,
        }
    }
}

pub struct HandlerRegistry {
    op_handlers: HashMap<HandlerKey, OpHandler>,
    terminal_handlers: HashMap<HandlerKey, TerminalHandler>,
}

impl HandlerRegistry {
    fn new() -> Self {
        HandlerRegistry {
            op_handlers: HashMap::new(),
            terminal_handlers: HashMap::new(),
        }
    }

    fn register_op(&mut self, key: HandlerKey, handler: OpHandler) {
        self.op_handlers.insert(key, handler);
    }

    fn register_terminal(&mut self, key: HandlerKey, handler: TerminalHandler) {
        self.terminal_handlers.insert(key, handler);
    }

    /// Tiered lookup; `None` when no tier matches.
    fn lookup<'h, H>(
        table: &'h HashMap<HandlerKey, H>,
        kind: OperatorKind,
        root: QueryRootKind,
        arity: usize,
    ) -> Option<&'h H> {
        let tiers = [
            HandlerKey {
                kind,
                root: Some(root),
                arity: Some(arity),
            },
            HandlerKey {
                kind,
                root: Some(root),
                arity: None,
            },
            HandlerKey {
                kind,
                root: None,
                arity: Some(arity),
            },
            HandlerKey {
                kind,
                root: None,
                arity: None,
            },
        ];
        tiers.iter().find_map(|key| table.get(key))
    }

    pub fn op_handler(
        &self,
        ctx: &QueryContext,
        op: &QueryOp,
        root: QueryRootKind,
    ) -> Result<OpHandler, GraphQueryError> {
        Self::lookup(&self.op_handlers, op.kind(), root, op.arity())
            .copied()
            .ok_or_else(|| ctx.operator_error(op.kind().name()))
    }

    pub fn terminal_handler(
        &self,
        ctx: &QueryContext,
        terminal: &Terminal,
        root: QueryRootKind,
    ) -> Result<TerminalHandler, GraphQueryError> {
        Self::lookup(&self.terminal_handlers, terminal.kind(), root, terminal.arity())
            .copied()
            .ok_or_else(|| ctx.operator_error(terminal.kind().name()))
    }
}

lazy_static::lazy_static! {
    static ref REGISTRY: HandlerRegistry = bootstrap();
}

/// The process-wide registry.
pub fn global() -> &'static HandlerRegistry {
    &REGISTRY
}

fn bootstrap() -> HandlerRegistry {
    use OperatorKind::*;

    let mut registry = HandlerRegistry::new();

    // Common operators, valid on every root kind.
    registry.register_op(HandlerKey::kind(Where), handlers::filtering::handle_where);
    registry.register_op(HandlerKey::kind(Select), handlers::projection::handle_select);
    registry.register_op(
        HandlerKey::kind(SelectMany),
        handlers::projection::handle_select_many,
    );
    registry.register_op(HandlerKey::kind(OrderBy), handlers::ordering::handle_order_by);
    registry.register_op(HandlerKey::kind(ThenBy), handlers::ordering::handle_then_by);
    registry.register_op(HandlerKey::kind(Take), handlers::ordering::handle_take);
    registry.register_op(HandlerKey::kind(Skip), handlers::ordering::handle_skip);
    registry.register_op(
        HandlerKey::kind(Distinct),
        handlers::ordering::handle_distinct,
    );
    registry.register_op(HandlerKey::kind(GroupBy), handlers::grouping::handle_group_by);
    registry.register_op(HandlerKey::kind(Join), handlers::projection::handle_join);
    registry.register_op(HandlerKey::kind(Union), handlers::projection::handle_union);
    registry.register_op(HandlerKey::kind(Concat), handlers::projection::handle_concat);
    registry.register_op(
        HandlerKey::kind(WithTransaction),
        handlers::transactions::handle_with_transaction,
    );

    // Traversal operators: node and relationship roots only.
    for root in [QueryRootKind::Node, QueryRootKind::Relationship] {
        registry.register_op(
            HandlerKey::for_root(Traverse, root),
            handlers::traversal::handle_traverse,
        );
    }
    registry.register_op(
        HandlerKey::kind(ThenTraverse),
        handlers::traversal::handle_then_traverse,
    );
    registry.register_op(
        HandlerKey::kind(WithDepth),
        handlers::traversal::handle_with_depth,
    );
    registry.register_op(
        HandlerKey::kind(InDirection),
        handlers::traversal::handle_in_direction,
    );
    registry.register_op(
        HandlerKey::kind(TraversalRelationships),
        handlers::traversal::handle_relationships,
    );
    registry.register_op(
        HandlerKey::kind(TraversalTo),
        handlers::traversal::handle_to,
    );

    // Path segments open on node roots only.
    registry.register_op(
        HandlerKey::for_root(PathSegments, QueryRootKind::Node),
        handlers::path_segments::handle_path_segments,
    );

    // Terminals.
    registry.register_terminal(HandlerKey::kind(ToList), handlers::aggregation::handle_to_list);
    registry.register_terminal(
        HandlerKey::kind(ToArray),
        handlers::aggregation::handle_to_list,
    );
    registry.register_terminal(HandlerKey::kind(First), handlers::aggregation::handle_first);
    registry.register_terminal(HandlerKey::kind(Single), handlers::aggregation::handle_single);
    registry.register_terminal(HandlerKey::kind(Last), handlers::aggregation::handle_last);
    registry.register_terminal(HandlerKey::kind(Any), handlers::aggregation::handle_any);
    registry.register_terminal(HandlerKey::kind(All), handlers::aggregation::handle_all);
    registry.register_terminal(HandlerKey::kind(Count), handlers::aggregation::handle_count);
    registry.register_terminal(HandlerKey::kind(Sum), handlers::aggregation::handle_sum);
    registry.register_terminal(
        HandlerKey::kind(Average),
        handlers::aggregation::handle_average,
    );
    registry.register_terminal(HandlerKey::kind(MinOf), handlers::aggregation::handle_min);
    registry.register_terminal(HandlerKey::kind(MaxOf), handlers::aggregation::handle_max);
    registry.register_terminal(
        HandlerKey::kind(ContainsItem),
        handlers::aggregation::handle_contains,
    );
    registry.register_terminal(
        HandlerKey::kind(ElementAt),
        handlers::aggregation::handle_element_at,
    );

    registry
}
