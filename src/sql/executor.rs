//! Execution strategies for compiled statements

use async_trait::async_trait;
use tracing::trace;

use super::connection::Connection;
use crate::dialect::ExecutionStrategy;
use crate::error::OutputResult;
use crate::template::CompiledStatement;

/// Runs a compiled statement against a connection
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn execute(
        &self,
        connection: &dyn Connection,
        statement: &CompiledStatement,
    ) -> OutputResult<u64>;
}

/// One parameterized execute call per statement
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectExecutor;

/// Begin, prepare, execute and commit per statement
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionalExecutor;

#[async_trait]
impl StatementExecutor for DirectExecutor {
    async fn execute(
        &self,
        connection: &dyn Connection,
        statement: &CompiledStatement,
    ) -> OutputResult<u64> {
        trace!("executing: {}", statement.sql);
        connection.execute(&statement.sql, &statement.args).await
    }
}

#[async_trait]
impl StatementExecutor for TransactionalExecutor {
    async fn execute(
        &self,
        connection: &dyn Connection,
        statement: &CompiledStatement,
    ) -> OutputResult<u64> {
        trace!("executing in transaction: {}", statement.sql);
        let mut tx = connection.begin().await?;
        let affected = tx.execute_prepared(&statement.sql, &statement.args).await?;
        tx.commit().await?;
        Ok(affected)
    }
}

impl ExecutionStrategy {
    pub fn executor(&self) -> Box<dyn StatementExecutor> {
        match self {
            ExecutionStrategy::Direct => Box::new(DirectExecutor),
            ExecutionStrategy::Transactional => Box::new(TransactionalExecutor),
        }
    }
}
