//! Query Provider
//!
//! Orchestrates one terminal execution: extract the transaction, build the
//! `QueryContext`, run the visitor, assemble the statement, perform the
//! single driver call, and dispose whatever the context owns: on success,
//! failure and cancellation alike.
//!
//! `compile` is the pure half: operator tree in, `CypherQuery` out, no
//! driver involved. Translation is synchronous and CPU-bound; the only
//! suspension point is the driver call.

use crate::client::{CancellationToken, QueryRunner, Record};
use crate::config::ProviderConfig;
use crate::cypher::CypherQuery;
use crate::errors::GraphQueryError;
use crate::operators::{OperatorTree, Terminal};
use crate::schema::EntityFactory;
use crate::transaction::{extract_transaction, Transaction};
use crate::visitor::context::QueryContext;
use crate::visitor::CypherQueryVisitor;

pub struct QueryProvider;

impl QueryProvider {
    /// Translate a tree + terminal into a statement. Pure; usable without a
    /// driver.
    pub fn compile(
        tree: &OperatorTree,
        terminal: &Terminal,
        factory: &dyn EntityFactory,
        config: &ProviderConfig,
    ) -> Result<CypherQuery, GraphQueryError> {
        Self::compile_with_transaction(tree, terminal, factory, config, None)
    }

    fn compile_with_transaction(
        tree: &OperatorTree,
        terminal: &Terminal,
        factory: &dyn EntityFactory,
        config: &ProviderConfig,
        transaction: Option<Transaction>,
    ) -> Result<CypherQuery, GraphQueryError> {
        let mut ctx = QueryContext::new(factory, config);
        ctx.transaction = transaction;
        let visitor = CypherQueryVisitor::default();
        visitor.visit(&mut ctx, tree, terminal)?;
        let QueryContext {
            builder,
            result_shape,
            ..
        } = ctx;
        // A failing build discards the builder; no partial artifact escapes.
        Ok(builder.build(result_shape)?)
    }

    /// Execute a tree + terminal against the external driver.
    pub async fn execute(
        tree: &OperatorTree,
        terminal: &Terminal,
        runner: &dyn QueryRunner,
        factory: &dyn EntityFactory,
        config: &ProviderConfig,
        token: &CancellationToken,
    ) -> Result<Vec<Record>, GraphQueryError> {
        if token.is_cancelled() {
            return Err(GraphQueryError::Cancelled);
        }

        let extracted = extract_transaction(tree)?;
        let query = Self::compile_with_transaction(
            tree,
            terminal,
            factory,
            config,
            extracted.clone(),
        )?;

        let transaction = match extracted {
            Some(transaction) => transaction,
            None => runner
                .begin_read_transaction()
                .await?
                .into_context_owned(),
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => {
                log::debug!("execution cancelled; asking the driver to abort");
                if let Err(abort_error) = runner.abort(&transaction).await {
                    log::warn!("driver abort failed: {}", abort_error);
                }
                Err(GraphQueryError::Cancelled)
            }
            result = runner.run(&query, &transaction) => {
                result.map_err(GraphQueryError::from)
            }
        };

        if transaction.is_owned_by_context() {
            if let Err(close_error) = runner.close_transaction(transaction).await {
                log::warn!("failed to dispose context-owned transaction: {}", close_error);
            }
        }

        outcome
    }
}

/// Scalar extraction helpers shared by the terminal surface.
pub(crate) mod results {
    use crate::client::Record;
    use crate::client::DriverError;
    use crate::errors::GraphQueryError;
    use crate::expression::CypherValue;

    fn scalar(rows: &[Record]) -> Result<&CypherValue, GraphQueryError> {
        rows.first()
            .and_then(|row| row.get("result").or_else(|| row.first_value()))
            .ok_or_else(|| {
                DriverError::new("driver returned no scalar row for an aggregate query").into()
            })
    }

    pub fn scalar_bool(rows: &[Record]) -> Result<bool, GraphQueryError> {
        match scalar(rows)? {
            CypherValue::Bool(value) => Ok(*value),
            other => Err(DriverError::new(format!(
                "expected a boolean scalar, driver returned {}",
                other.kind()
            ))
            .into()),
        }
    }

    pub fn scalar_i64(rows: &[Record]) -> Result<i64, GraphQueryError> {
        match scalar(rows)? {
            CypherValue::Int(value) => Ok(*value),
            other => Err(DriverError::new(format!(
                "expected an integer scalar, driver returned {}",
                other.kind()
            ))
            .into()),
        }
    }

    pub fn scalar_value(rows: &[Record]) -> Result<CypherValue, GraphQueryError> {
        if rows.is_empty() {
            return Ok(CypherValue::Null);
        }
        scalar(&rows[..1]).cloned()
    }

    pub fn at_most_one(
        rows: Vec<Record>,
        or_default: bool,
        operator: &str,
    ) -> Result<Option<Record>, GraphQueryError> {
        let mut rows = rows;
        match rows.len() {
            0 if or_default => Ok(None),
            0 => Err(GraphQueryError::SequenceEmpty {
                operator: operator.to_string(),
            }),
            1 => Ok(rows.pop()),
            _ => Err(GraphQueryError::MoreThanOneElement {
                operator: operator.to_string(),
            }),
        }
    }

    pub fn first_of(
        rows: Vec<Record>,
        or_default: bool,
        operator: &str,
    ) -> Result<Option<Record>, GraphQueryError> {
        let mut rows = rows;
        if rows.is_empty() {
            if or_default {
                return Ok(None);
            }
            return Err(GraphQueryError::SequenceEmpty {
                operator: operator.to_string(),
            });
        }
        Ok(Some(rows.remove(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::results::*;
    use crate::client::Record;
    use crate::expression::CypherValue;

    fn row(value: CypherValue) -> Record {
        Record::new().with_column("result", value)
    }

    #[test]
    fn scalar_extraction() {
        assert!(scalar_bool(&[row(CypherValue::Bool(true))]).unwrap());
        assert_eq!(scalar_i64(&[row(CypherValue::Int(4))]).unwrap(), 4);
        assert!(scalar_i64(&[row(CypherValue::Str("x".into()))]).is_err());
        assert!(scalar_bool(&[]).is_err());
    }

    #[test]
    fn missing_aggregate_value_is_null() {
        assert_eq!(scalar_value(&[]).unwrap(), CypherValue::Null);
    }

    #[test]
    fn cardinality_checks() {
        let rows = vec![row(CypherValue::Int(1)), row(CypherValue::Int(2))];
        assert!(at_most_one(rows, false, "single").is_err());
        assert!(at_most_one(vec![], false, "single").is_err());
        assert_eq!(at_most_one(vec![], true, "single").unwrap(), None);
        assert!(first_of(vec![], false, "first").is_err());
        assert_eq!(first_of(vec![], true, "first").unwrap(), None);
    }
}
