//! Connection and transaction traits

use async_trait::async_trait;

use crate::error::OutputResult;
use crate::value::Value;

/// An open (pooled) database connection
///
/// Implementations must be `Send + Sync`; the output shares one connection
/// across async tasks.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute a parameterized statement, returning the affected row count
    async fn execute(&self, sql: &str, args: &[Value]) -> OutputResult<u64>;

    /// Start a transaction
    async fn begin(&self) -> OutputResult<Box<dyn Transaction>>;

    /// Lightweight round trip to verify the connection
    async fn ping(&self) -> OutputResult<()>;

    /// Close the connection and release pooled resources
    async fn close(&self);
}

/// An open transaction
///
/// Dropping a transaction without calling [`Transaction::commit`] rolls it
/// back.
#[async_trait]
pub trait Transaction: Send {
    /// Prepare `sql`, execute it with `args` and release the statement
    ///
    /// Errors are reported as [`PrepareFailed`](crate::OutputError::PrepareFailed)
    /// or [`ExecutionFailed`](crate::OutputError::ExecutionFailed).
    async fn execute_prepared(&mut self, sql: &str, args: &[Value]) -> OutputResult<u64>;

    async fn commit(self: Box<Self>) -> OutputResult<()>;
}
