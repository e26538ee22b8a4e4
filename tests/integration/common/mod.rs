//! Shared fixtures: a small entity model, schema factories and a recording
//! mock driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cypherable::schema::{EntitySchema, MapEntityFactory, PropertyInfo};
use cypherable::{
    CypherQuery, CypherValue, DriverError, GraphContext, GraphElement, NodeElement, QueryRunner,
    Record, RelationshipElement, Transaction,
};

pub struct Person;
impl GraphElement for Person {}
impl NodeElement for Person {}

pub struct Company;
impl GraphElement for Company {}
impl NodeElement for Company {}

pub struct WorksFor;
impl GraphElement for WorksFor {}
impl RelationshipElement for WorksFor {}

pub struct Knows;
impl GraphElement for Knows {}
impl RelationshipElement for Knows {}

/// Factory with flat schemas only.
pub fn factory() -> MapEntityFactory {
    MapEntityFactory::new()
        .register::<Person>(
            EntitySchema::new("Person")
                .with_simple_property("Name")
                .with_simple_property("Age")
                .with_simple_property("City"),
        )
        .register::<Company>(EntitySchema::new("Company").with_simple_property("Name"))
        .register::<WorksFor>(EntitySchema::new("WORKS_FOR").with_simple_property("Since"))
}

/// Factory where `Person.Address` is a complex property.
pub fn factory_with_address() -> MapEntityFactory {
    MapEntityFactory::new().register::<Person>(
        EntitySchema::new("Person")
            .with_simple_property("Name")
            .with_complex_property(PropertyInfo::new("Address", "Address")),
    )
}

/// Records every statement it is asked to run and returns canned rows.
pub struct MockRunner {
    rows: Vec<Record>,
    recorded: Mutex<Vec<CypherQuery>>,
    transactions_begun: AtomicUsize,
    transactions_closed: AtomicUsize,
    aborts: AtomicUsize,
    delay: Option<Duration>,
}

impl MockRunner {
    pub fn returning(rows: Vec<Record>) -> Arc<Self> {
        Arc::new(MockRunner {
            rows,
            recorded: Mutex::new(Vec::new()),
            transactions_begun: AtomicUsize::new(0),
            transactions_closed: AtomicUsize::new(0),
            aborts: AtomicUsize::new(0),
            delay: None,
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::returning(Vec::new())
    }

    pub fn slow(rows: Vec<Record>, delay: Duration) -> Arc<Self> {
        Arc::new(MockRunner {
            rows,
            recorded: Mutex::new(Vec::new()),
            transactions_begun: AtomicUsize::new(0),
            transactions_closed: AtomicUsize::new(0),
            aborts: AtomicUsize::new(0),
            delay: Some(delay),
        })
    }

    pub fn last_query(&self) -> CypherQuery {
        self.recorded
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no statement was executed")
    }

    pub fn executed_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn transactions_begun(&self) -> usize {
        self.transactions_begun.load(Ordering::SeqCst)
    }

    pub fn transactions_closed(&self) -> usize {
        self.transactions_closed.load(Ordering::SeqCst)
    }

    pub fn aborts(&self) -> usize {
        self.aborts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryRunner for MockRunner {
    async fn begin_read_transaction(&self) -> Result<Transaction, DriverError> {
        self.transactions_begun.fetch_add(1, Ordering::SeqCst);
        Ok(Transaction::new())
    }

    async fn run(
        &self,
        query: &CypherQuery,
        _transaction: &Transaction,
    ) -> Result<Vec<Record>, DriverError> {
        self.recorded.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.rows.clone())
    }

    async fn abort(&self, _transaction: &Transaction) -> Result<(), DriverError> {
        self.aborts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close_transaction(&self, _transaction: Transaction) -> Result<(), DriverError> {
        self.transactions_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn graph(runner: Arc<MockRunner>) -> GraphContext {
    let _ = env_logger::builder().is_test(true).try_init();
    GraphContext::new(runner, Arc::new(factory()))
}

pub fn graph_with_address(runner: Arc<MockRunner>) -> GraphContext {
    let _ = env_logger::builder().is_test(true).try_init();
    GraphContext::new(runner, Arc::new(factory_with_address()))
}

/// A person row the way a driver would surface an entity column.
pub fn person_row(name: &str, age: i64, city: &str) -> Record {
    Record::new().with_column(
        "n",
        CypherValue::Map(vec![
            ("Name".to_string(), CypherValue::Str(name.to_string())),
            ("Age".to_string(), CypherValue::Int(age)),
            ("City".to_string(), CypherValue::Str(city.to_string())),
        ]),
    )
}

/// Extract a person's age from a `person_row` record.
pub fn age_of(record: &Record) -> i64 {
    match record.get("n") {
        Some(CypherValue::Map(entries)) => entries
            .iter()
            .find(|(key, _)| key == "Age")
            .and_then(|(_, value)| value.as_i64())
            .expect("person row has an Age"),
        other => panic!("unexpected row shape: {:?}", other),
    }
}
