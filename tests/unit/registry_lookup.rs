use cypherable::config::ProviderConfig;
use cypherable::expression::combinators::prop;
use cypherable::operators::{QueryOp, Terminal};
use cypherable::schema::{ElementInfo, EmptyEntityFactory};
use cypherable::visitor::context::QueryContext;
use cypherable::visitor::registry;
use cypherable::{GraphElement, NodeElement, QueryRootKind, RelationshipElement};

struct Person;
impl GraphElement for Person {}
impl NodeElement for Person {}

struct Knows;
impl GraphElement for Knows {}
impl RelationshipElement for Knows {}

static FACTORY: EmptyEntityFactory = EmptyEntityFactory;

#[test]
fn every_common_operator_has_a_handler() {
    let config = ProviderConfig::default();
    let ctx = QueryContext::new(&FACTORY, &config);
    let ops = [
        QueryOp::Where(prop("A").is_null()),
        QueryOp::Select(prop("A")),
        QueryOp::Take(1),
        QueryOp::Skip(1),
        QueryOp::Distinct,
        QueryOp::OrderBy {
            key: prop("A"),
            direction: cypherable::SortDirection::Ascending,
        },
        QueryOp::GroupBy {
            key: prop("A"),
            element: None,
        },
    ];
    for op in &ops {
        for root in [QueryRootKind::Node, QueryRootKind::Relationship] {
            assert!(
                registry::global().op_handler(&ctx, op, root).is_ok(),
                "missing handler for {:?} on {:?}",
                op.kind(),
                root
            );
        }
    }
}

#[test]
fn every_terminal_has_a_handler() {
    let config = ProviderConfig::default();
    let ctx = QueryContext::new(&FACTORY, &config);
    let terminals = [
        Terminal::ToList,
        Terminal::ToArray,
        Terminal::First {
            or_default: true,
            predicate: None,
        },
        Terminal::Single {
            or_default: false,
            predicate: None,
        },
        Terminal::Last {
            or_default: false,
            predicate: None,
        },
        Terminal::Any { predicate: None },
        Terminal::All {
            predicate: prop("A").is_null(),
        },
        Terminal::Count { predicate: None },
        Terminal::Sum(prop("A")),
        Terminal::Average(prop("A")),
        Terminal::MinOf(prop("A")),
        Terminal::MaxOf(prop("A")),
        Terminal::ContainsItem(cypherable::CypherValue::Int(1)),
        Terminal::ElementAt(3),
    ];
    for terminal in &terminals {
        assert!(
            registry::global()
                .terminal_handler(&ctx, terminal, QueryRootKind::Node)
                .is_ok(),
            "missing handler for {:?}",
            terminal.kind()
        );
    }
}

#[test]
fn path_segments_is_node_only() {
    let config = ProviderConfig::default();
    let ctx = QueryContext::new(&FACTORY, &config);
    let op = QueryOp::PathSegments {
        relationship: ElementInfo::relationship::<Knows>(),
        target: ElementInfo::node::<Person>(),
    };
    assert!(registry::global()
        .op_handler(&ctx, &op, QueryRootKind::Node)
        .is_ok());
    let err = registry::global()
        .op_handler(&ctx, &op, QueryRootKind::Relationship)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("unsupported operator"), "{}", message);
    assert!(message.contains("path_segments"), "{}", message);
}
