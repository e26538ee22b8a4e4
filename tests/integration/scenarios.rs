//! Literal translation scenarios: operator chain in, exact Cypher + parameter
//! table out.

use cypherable::expression::combinators::lit;
use cypherable::operators::Terminal;
use cypherable::{CypherValue, Direction, QueryRootKind};

use super::common::{graph, Company, Knows, MockRunner, Person, WorksFor};

#[test]
fn filtered_node_query() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .where_(|p| p.prop("Age").gt(lit(30)))
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) WHERE n.Age > $p0 RETURN n"
    );
    assert_eq!(query.parameters.get("p0"), Some(&CypherValue::Int(30)));
    assert_eq!(query.parameters.len(), 1);
    assert_eq!(query.result_shape.query_root_kind, QueryRootKind::Node);
    assert!(!query.result_shape.is_scalar);
}

#[test]
fn string_predicate_with_ordering_and_paging() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .where_(|p| p.prop("Name").starts_with(lit("A")))
        .order_by(|p| p.prop("Name"))
        .take(10)
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) WHERE n.Name STARTS WITH $p0 RETURN n ORDER BY n.Name ASC LIMIT 10"
    );
    assert_eq!(
        query.parameters.get("p0"),
        Some(&CypherValue::Str("A".to_string()))
    );
}

#[test]
fn any_with_predicate_compiles_to_exists_count() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .to_cypher_for(&Terminal::Any {
            predicate: Some(cypherable::prop("Age").ge(lit(18))),
        })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN COUNT(CASE WHEN n.Age >= $p0 THEN n END) > 0 AS result LIMIT 1"
    );
    assert_eq!(query.parameters.get("p0"), Some(&CypherValue::Int(18)));
    assert!(query.result_shape.is_scalar);
}

#[test]
fn path_segment_predicate_and_projection() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .path_segments::<WorksFor, Company>()
        .where_(|seg| seg.end_node().prop("Name").eq(lit("Acme")))
        .select::<CypherValue>(|seg| seg.relationship().prop("Since"))
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (src:Person)-[r:WORKS_FOR]->(tgt:Company) WHERE tgt.Name = $p0 RETURN r.Since"
    );
    assert_eq!(
        query.parameters.get("p0"),
        Some(&CypherValue::Str("Acme".to_string()))
    );
    assert_eq!(
        query.result_shape.query_root_kind,
        QueryRootKind::PathSegment
    );
}

#[test]
fn bounded_outgoing_traversal() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .traverse::<Knows, Person>()
        .with_depth_range(1, 3)
        .in_direction(Direction::Outgoing)
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person)-[:KNOWS*1..3]->(n2:Person) RETURN n2"
    );
    assert!(query.parameters.is_empty());
    assert_eq!(query.result_shape.query_root_kind, QueryRootKind::Traversal);
}

#[test]
fn group_by_with_projected_key_and_count() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .group_by(|p| p.prop("City"))
        .select::<CypherValue>(|g| {
            cypherable::record()
                .field("City", g.key())
                .field("Count", g.count())
                .build()
        })
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN n.City AS City, count(n) AS Count"
    );
    assert!(query.parameters.is_empty());
    assert!(query.result_shape.is_projection);
}

#[test]
fn group_by_without_projection_collects_elements() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .group_by(|p| p.prop("City"))
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN n.City AS key, collect(n) AS elements"
    );
}

#[test]
fn relationship_root_query() {
    let context = graph(MockRunner::empty());
    let query = context
        .relationships::<WorksFor>()
        .where_(|r| r.prop("Since").gt(lit(2020)))
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (src)-[r:WORKS_FOR]->(tgt) WHERE r.Since > $p0 RETURN r"
    );
    assert_eq!(
        query.result_shape.query_root_kind,
        QueryRootKind::Relationship
    );
}

#[test]
fn relationship_endpoint_id_access() {
    let context = graph(MockRunner::empty());
    let query = context
        .relationships::<WorksFor>()
        .where_(|r| r.start_node_id().eq(lit(42)))
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (src)-[r:WORKS_FOR]->(tgt) WHERE src.Id = $p0 RETURN r"
    );
}

#[test]
fn traversal_relationship_projection() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .traverse::<Knows, Person>()
        .relationships()
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person)-[r:KNOWS]->(n2:Person) RETURN r"
    );
}

#[test]
fn chained_traversal() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .traverse::<Knows, Person>()
        .then_traverse::<WorksFor, Company>()
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person)-[:KNOWS]->(n2:Person)-[:WORKS_FOR]->(n3:Company) RETURN n3"
    );
}

#[test]
fn select_many_unwinds_collection_property() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .select_many::<CypherValue>(|p| p.prop("Nicknames"))
        .to_cypher()
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) UNWIND n.Nicknames AS item RETURN item"
    );
}

#[test]
fn count_with_predicate() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .to_cypher_for(&Terminal::Count {
            predicate: Some(cypherable::prop("City").eq(lit("Paris"))),
        })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN COUNT(CASE WHEN n.City = $p0 THEN n END)"
    );
    assert!(query.result_shape.is_scalar);
}

#[test]
fn all_compiles_to_negated_count() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .to_cypher_for(&Terminal::All {
            predicate: cypherable::prop("Age").ge(lit(18)),
        })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN COUNT(CASE WHEN NOT (n.Age >= $p0) THEN n END) = 0 AS result"
    );
}

#[test]
fn element_at_pages_to_one_row() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .to_cypher_for(&Terminal::ElementAt(4))
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN n SKIP 4 LIMIT 1"
    );
}

#[test]
fn last_without_ordering_uses_internal_id() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .to_cypher_for(&Terminal::Last {
            or_default: false,
            predicate: None,
        })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN n ORDER BY id(n) DESC LIMIT 1"
    );
}

#[test]
fn last_with_ordering_reverses_directions() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .order_by(|p| p.prop("Name"))
        .to_cypher_for(&Terminal::Last {
            or_default: false,
            predicate: None,
        })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN n ORDER BY n.Name DESC LIMIT 1"
    );
}

#[test]
fn complex_properties_load_through_optional_match() {
    let context = super::common::graph_with_address(MockRunner::empty());
    let query = context.nodes::<Person>().to_cypher().unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) OPTIONAL MATCH (n)-[:ADDRESS]->(n_Address:Address) \
         RETURN n, n_Address"
    );
}

#[test]
fn scalar_terminals_skip_complex_property_loading() {
    let context = super::common::graph_with_address(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .to_cypher_for(&Terminal::Count { predicate: None })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) RETURN COUNT(n)"
    );
}

#[test]
fn nested_complex_property_access_in_predicate() {
    let context = super::common::graph_with_address(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .where_(|p| {
            cypherable::Expr::Property {
                base: Box::new(p.prop("Address")),
                name: "City".to_string(),
            }
            .eq(lit("Berlin"))
        })
        .to_cypher_for(&Terminal::Count { predicate: None })
        .unwrap();

    assert_eq!(
        query.normalized_text(),
        "MATCH (n:Person) OPTIONAL MATCH (n)-[:ADDRESS]->(n_Address:Address) \
         WHERE n_Address.City = $p0 RETURN COUNT(n)"
    );
}
