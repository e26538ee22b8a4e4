//! Universal translation properties: alias stability, parameter discipline,
//! idempotence and the null law.

use cypherable::expression::combinators::lit;
use cypherable::CypherValue;

use super::common::{graph, Knows, MockRunner, Person};

#[test]
fn translation_is_deterministic() {
    let context = graph(MockRunner::empty());
    let build = || {
        context
            .nodes::<Person>()
            .where_(|p| p.prop("Age").gt(lit(30)))
            .order_by(|p| p.prop("Name"))
            .traverse::<Knows, Person>()
            .to_cypher()
            .unwrap()
    };
    let first = build();
    let second = build();
    assert_eq!(first.text, second.text);
    assert_eq!(first.parameters, second.parameters);
}

#[test]
fn one_parameter_per_captured_value() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .where_(|p| p.prop("Age").gt(lit(30)).or(p.prop("Height").gt(lit(30))))
        .where_(|p| p.prop("Name").ne(lit("x")))
        .to_cypher()
        .unwrap();

    // 30 is captured twice but parameterized once.
    assert_eq!(query.parameters.len(), 2);
    assert_eq!(query.parameters.get("p0"), Some(&CypherValue::Int(30)));
    assert_eq!(
        query.parameters.get("p1"),
        Some(&CypherValue::Str("x".to_string()))
    );
    let occurrences = query.text.matches("$p0").count();
    assert_eq!(occurrences, 2);
}

#[test]
fn distinct_is_idempotent() {
    let context = graph(MockRunner::empty());
    let once = context.nodes::<Person>().distinct().to_cypher().unwrap();
    let twice = context
        .nodes::<Person>()
        .distinct()
        .distinct()
        .to_cypher()
        .unwrap();
    assert_eq!(once.text, twice.text);
    assert_eq!(once.text, "MATCH (n:Person) RETURN DISTINCT n");
}

#[test]
fn null_law() {
    let context = graph(MockRunner::empty());
    let is_null = context
        .nodes::<Person>()
        .where_(|p| p.prop("Nickname").is_null())
        .to_cypher()
        .unwrap();
    assert_eq!(
        is_null.normalized_text(),
        "MATCH (n:Person) WHERE n.Nickname IS NULL RETURN n"
    );
    assert!(is_null.parameters.is_empty());

    let is_not_null = context
        .nodes::<Person>()
        .where_(|p| p.prop("Nickname").is_not_null())
        .to_cypher()
        .unwrap();
    assert_eq!(
        is_not_null.normalized_text(),
        "MATCH (n:Person) WHERE n.Nickname IS NOT NULL RETURN n"
    );
}

#[test]
fn aliases_are_declared_before_use() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .path_segments::<super::common::WorksFor, super::common::Company>()
        .where_(|seg| seg.end_node().prop("Name").eq(lit("Acme")))
        .to_cypher()
        .unwrap();

    let text = query.normalized_text();
    let match_end = text.find(" WHERE").unwrap_or(text.len());
    let declared = &text[..match_end];
    for alias in ["src", "r", "tgt"] {
        assert!(
            declared.contains(alias),
            "alias {} not declared in MATCH: {}",
            alias,
            text
        );
    }
}

#[test]
fn parameters_appear_in_first_use_order() {
    let context = graph(MockRunner::empty());
    let query = context
        .nodes::<Person>()
        .where_(|p| p.prop("A").eq(lit("first")))
        .where_(|p| p.prop("B").eq(lit("second")))
        .where_(|p| p.prop("C").eq(lit("third")))
        .to_cypher()
        .unwrap();

    let names: Vec<&str> = query.parameters.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["p0", "p1", "p2"]);
    let p0 = query.text.find("$p0").unwrap();
    let p1 = query.text.find("$p1").unwrap();
    let p2 = query.text.find("$p2").unwrap();
    assert!(p0 < p1 && p1 < p2);
}

#[test]
fn chaining_does_not_mutate_the_source_query() {
    let context = graph(MockRunner::empty());
    let base = context.nodes::<Person>();
    let filtered = base.where_(|p| p.prop("Age").gt(lit(30)));

    let base_query = base.to_cypher().unwrap();
    let filtered_query = filtered.to_cypher().unwrap();
    assert_eq!(base_query.text, "MATCH (n:Person) RETURN n");
    assert_ne!(base_query.text, filtered_query.text);
}

#[test]
fn custom_parameter_prefix_is_honored() {
    let config = cypherable::ProviderConfig {
        parameter_prefix: "param".to_string(),
        ..Default::default()
    };
    let context = cypherable::GraphContext::with_config(
        MockRunner::empty(),
        std::sync::Arc::new(super::common::factory()),
        config,
    );
    let query = context
        .nodes::<Person>()
        .where_(|p| p.prop("Age").gt(lit(30)))
        .to_cypher()
        .unwrap();
    assert!(query.text.contains("$param0"));
    assert_eq!(query.parameters.get("param0"), Some(&CypherValue::Int(30)));
}
