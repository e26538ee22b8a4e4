//! End-to-end execution against the recording mock driver: predicate
//! round-trips, transaction policy, cancellation and cardinality checks.

use std::time::Duration;

use anyhow::Result;
use cypherable::expression::combinators::lit;
use cypherable::{CancellationSource, CypherValue, GraphQueryError, Record, Transaction};

use super::common::{age_of, graph, person_row, MockRunner, Person};

fn dataset() -> Vec<Record> {
    vec![
        person_row("Alice", 34, "Paris"),
        person_row("Bob", 28, "Rome"),
        person_row("Carol", 41, "Paris"),
    ]
}

#[tokio::test]
async fn where_round_trip_returns_matching_rows() -> Result<()> {
    // The mock driver plays the part of the store: it receives the compiled
    // statement and serves the rows the predicate admits.
    let matching: Vec<Record> = dataset()
        .into_iter()
        .filter(|row| age_of(row) > 30)
        .collect();
    let runner = MockRunner::returning(matching.clone());
    let context = graph(runner.clone());

    let rows = context
        .nodes::<Person>()
        .where_(|p| p.prop("Age").gt(lit(30)))
        .to_list()
        .await?;

    assert_eq!(rows, matching);
    let executed = runner.last_query();
    assert_eq!(
        executed.normalized_text(),
        "MATCH (n:Person) WHERE n.Age > $p0 RETURN n"
    );
    assert_eq!(executed.parameters.get("p0"), Some(&CypherValue::Int(30)));
    assert_eq!(runner.executed_count(), 1);
    Ok(())
}

#[tokio::test]
async fn chained_operators_execute_once() -> Result<()> {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());

    let _ = context
        .nodes::<Person>()
        .where_(|p| p.prop("City").eq(lit("Paris")))
        .order_by_desc(|p| p.prop("Age"))
        .skip(1)
        .take(5)
        .to_list()
        .await?;

    assert_eq!(runner.executed_count(), 1);
    assert_eq!(
        runner.last_query().normalized_text(),
        "MATCH (n:Person) WHERE n.City = $p0 RETURN n ORDER BY n.Age DESC SKIP 1 LIMIT 5"
    );
    Ok(())
}

#[tokio::test]
async fn context_opens_and_disposes_its_own_transaction() -> Result<()> {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());

    let _ = context.nodes::<Person>().to_list().await?;

    assert_eq!(runner.transactions_begun(), 1);
    assert_eq!(runner.transactions_closed(), 1);
    Ok(())
}

#[tokio::test]
async fn borrowed_transaction_is_not_disposed() -> Result<()> {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());
    let transaction = Transaction::new();

    let _ = context
        .nodes::<Person>()
        .with_transaction(&transaction)
        .to_list()
        .await?;

    assert_eq!(runner.transactions_begun(), 0);
    assert_eq!(runner.transactions_closed(), 0);
    Ok(())
}

#[tokio::test]
async fn two_distinct_transactions_abort_before_execution() {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());

    let result = context
        .nodes::<Person>()
        .with_transaction(&Transaction::new())
        .with_transaction(&Transaction::new())
        .to_list()
        .await;

    assert!(matches!(
        result,
        Err(GraphQueryError::AmbiguousTransaction(_))
    ));
    assert_eq!(runner.executed_count(), 0);
}

#[tokio::test]
async fn cancellation_aborts_the_driver_and_disposes_the_transaction() {
    let runner = MockRunner::slow(dataset(), Duration::from_millis(250));
    let context = graph(runner.clone());
    let source = CancellationSource::new();

    let query = context
        .nodes::<Person>()
        .with_cancellation(source.token());
    let task = tokio::spawn(async move { query.to_list().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    source.cancel();

    let result = task.await.unwrap();
    assert!(matches!(result, Err(GraphQueryError::Cancelled)));
    assert_eq!(runner.aborts(), 1);
    assert_eq!(runner.transactions_begun(), 1);
    assert_eq!(runner.transactions_closed(), 1);
}

#[tokio::test]
async fn pre_cancelled_token_skips_the_driver() {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());
    let source = CancellationSource::new();
    source.cancel();

    let result = context
        .nodes::<Person>()
        .with_cancellation(source.token())
        .to_list()
        .await;

    assert!(matches!(result, Err(GraphQueryError::Cancelled)));
    assert_eq!(runner.executed_count(), 0);
    assert_eq!(runner.transactions_begun(), 0);
}

#[tokio::test]
async fn scalar_terminals_extract_driver_values() -> Result<()> {
    let runner = MockRunner::returning(vec![
        Record::new().with_column("result", CypherValue::Bool(true)),
    ]);
    let context = graph(runner.clone());
    assert!(context.nodes::<Person>().any().await?);
    assert_eq!(
        runner.last_query().normalized_text(),
        "MATCH (n:Person) RETURN COUNT(n) > 0 AS result LIMIT 1"
    );

    let runner = MockRunner::returning(vec![
        Record::new().with_column("COUNT(n)", CypherValue::Int(3)),
    ]);
    let context = graph(runner.clone());
    assert_eq!(context.nodes::<Person>().count().await?, 3);
    Ok(())
}

#[tokio::test]
async fn single_detects_cardinality_violations() {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());
    let result = context.nodes::<Person>().single().await;
    assert!(matches!(
        result,
        Err(GraphQueryError::MoreThanOneElement { .. })
    ));
    // The statement only fetched the two rows needed for the check.
    assert!(runner
        .last_query()
        .normalized_text()
        .ends_with("LIMIT 2"));
}

#[tokio::test]
async fn first_on_empty_sequence_errors_and_or_default_does_not() {
    let runner = MockRunner::empty();
    let context = graph(runner.clone());

    let strict = context.nodes::<Person>().first().await;
    assert!(matches!(strict, Err(GraphQueryError::SequenceEmpty { .. })));

    let lenient = context.nodes::<Person>().first_or_default().await.unwrap();
    assert_eq!(lenient, None);
}

#[tokio::test]
async fn aggregate_over_empty_result_is_null() -> Result<()> {
    let runner = MockRunner::empty();
    let context = graph(runner.clone());
    let sum = context
        .nodes::<Person>()
        .sum(|p| p.prop("Age"))
        .await?;
    assert_eq!(sum, CypherValue::Null);
    assert_eq!(
        runner.last_query().normalized_text(),
        "MATCH (n:Person) RETURN SUM(n.Age)"
    );
    Ok(())
}

#[tokio::test]
async fn average_wraps_selector_in_to_float() -> Result<()> {
    let runner = MockRunner::returning(vec![
        Record::new().with_column("avg", CypherValue::Float(31.5)),
    ]);
    let context = graph(runner.clone());
    let average = context.nodes::<Person>().average(|p| p.prop("Age")).await?;
    assert_eq!(average, CypherValue::Float(31.5));
    assert_eq!(
        runner.last_query().normalized_text(),
        "MATCH (n:Person) RETURN AVG(toFloat(n.Age))"
    );
    Ok(())
}

#[tokio::test]
async fn invalid_traversal_depth_fails_before_the_driver() {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());

    let result = context
        .nodes::<Person>()
        .traverse::<super::common::Knows, Person>()
        .with_depth_range(3, 1)
        .to_list()
        .await;

    assert!(matches!(result, Err(GraphQueryError::InvalidQuery(_))));
    assert_eq!(runner.executed_count(), 0);
}

#[tokio::test]
async fn unknown_nested_member_fails_loudly() {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());

    // `Age` is a simple property; navigating through it is unsupported.
    let result = context
        .nodes::<Person>()
        .where_(|p| {
            cypherable::Expr::Property {
                base: Box::new(p.prop("Age")),
                name: "Years".to_string(),
            }
            .is_null()
        })
        .to_list()
        .await;

    assert!(matches!(
        result,
        Err(GraphQueryError::UnsupportedExpression { .. })
    ));
    assert_eq!(runner.executed_count(), 0);
}

#[tokio::test]
async fn failed_captured_evaluation_is_a_compilation_error() {
    let runner = MockRunner::returning(dataset());
    let context = graph(runner.clone());

    // abs() over a captured string is evaluable by name but fails to fold.
    let result = context
        .nodes::<Person>()
        .where_(|_| lit("oops").abs().gt(lit(0)))
        .to_list()
        .await;

    assert!(matches!(
        result,
        Err(GraphQueryError::ExpressionCompilationFailed { .. })
    ));
    assert_eq!(runner.executed_count(), 0);
}

#[tokio::test]
async fn contains_item_parameterizes_the_needle() -> Result<()> {
    let runner = MockRunner::returning(vec![
        Record::new().with_column("result", CypherValue::Bool(false)),
    ]);
    let context = graph(runner.clone());
    let found = context.nodes::<Person>().contains_item("Alice").await?;
    assert!(!found);
    assert_eq!(
        runner.last_query().normalized_text(),
        "MATCH (n:Person) RETURN COUNT(CASE WHEN n = $p0 THEN n END) > 0 AS result"
    );
    Ok(())
}
