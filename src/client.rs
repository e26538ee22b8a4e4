//! Driver Boundary
//!
//! Statement execution lives outside this crate. `QueryRunner` is the only
//! interface the provider calls: open a read transaction, run one compiled
//! statement, abort on cancellation, close what the context owns. Rows come
//! back as `Record`s of `CypherValue` columns; materializing them into host
//! entities is the caller's concern.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::cypher::CypherQuery;
use crate::expression::CypherValue;
use crate::transaction::Transaction;

/// Error reported by the external driver; propagated unchanged.
#[derive(Debug, Clone, Error)]
#[error("driver error: {message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        DriverError {
            message: message.into(),
        }
    }
}

/// One driver row: insertion-ordered named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<(String, CypherValue)>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, value: CypherValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&CypherValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_index(&self, index: usize) -> Option<&CypherValue> {
        self.columns.get(index).map(|(_, v)| v)
    }

    pub fn first_value(&self) -> Option<&CypherValue> {
        self.get_index(0)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &CypherValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// The external execution interface.
///
/// Implementations are expected to be safe for concurrent use; the provider
/// performs exactly one `run` call per terminal operator.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Open a read-only transaction for a query that referenced none.
    async fn begin_read_transaction(&self) -> Result<Transaction, DriverError>;

    /// Execute one compiled statement under the given transaction.
    async fn run(
        &self,
        query: &CypherQuery,
        transaction: &Transaction,
    ) -> Result<Vec<Record>, DriverError>;

    /// Ask the driver to abort the in-flight statement (cancellation path).
    async fn abort(&self, transaction: &Transaction) -> Result<(), DriverError>;

    /// Dispose a transaction the query context owns.
    async fn close_transaction(&self, transaction: Transaction) -> Result<(), DriverError>;
}

/// Cooperative cancellation for terminal operators.
///
/// `CancellationSource::cancel` flips the token; the provider races the
/// driver call against `cancelled()` and asks the driver to abort when the
/// token wins.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    receiver: Option<watch::Receiver<bool>>,
}

impl CancellationToken {
    /// A token that never cancels.
    pub fn none() -> Self {
        CancellationToken { receiver: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.receiver
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Resolves when the token is cancelled; pends forever for `none()`.
    pub async fn cancelled(&self) {
        match &self.receiver {
            None => futures_util::future::pending::<()>().await,
            Some(rx) => {
                let mut rx = rx.clone();
                if *rx.borrow() {
                    return;
                }
                loop {
                    if rx.changed().await.is_err() {
                        // Source dropped without cancelling; never fires.
                        futures_util::future::pending::<()>().await;
                    }
                    if *rx.borrow() {
                        return;
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct CancellationSource {
    sender: watch::Sender<bool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        CancellationSource { sender }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            receiver: Some(self.sender.subscribe()),
        }
    }

    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        CancellationSource::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lookup() {
        let record = Record::new()
            .with_column("n", CypherValue::Int(1))
            .with_column("m", CypherValue::Str("x".into()));
        assert_eq!(record.get("m"), Some(&CypherValue::Str("x".into())));
        assert_eq!(record.first_value(), Some(&CypherValue::Int(1)));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.len(), 2);
    }

    #[tokio::test]
    async fn token_cancels() {
        let source = CancellationSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        source.cancel();
        assert!(token.is_cancelled());
        token.cancelled().await; // resolves immediately
    }

    #[tokio::test]
    async fn none_token_never_cancels() {
        let token = CancellationToken::none();
        assert!(!token.is_cancelled());
        let raced = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            token.cancelled(),
        )
        .await;
        assert!(raced.is_err());
    }
}
