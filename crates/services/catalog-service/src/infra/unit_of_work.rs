//! Unit of Work: one database transaction around a block of store calls.
//!
//! The closure receives the open transaction; it is committed when the
//! closure returns `Ok` and rolled back when it returns `Err`, so a failed
//! cascade never leaves a partially deleted subtree behind.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};

use common::{AppError, AppResult};

/// Boxed future borrowed from the transaction it runs in.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Transaction runner bound to a connection pool.
#[derive(Clone)]
pub struct UnitOfWork {
    db: DatabaseConnection,
}

impl UnitOfWork {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Execute a closure within a ReadCommitted, read-write transaction.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(|e| AppError::transaction(format!("begin failed: {}", e)))?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit()
                    .await
                    .map_err(|e| AppError::transaction(format!("commit failed: {}", e)))?;
                Ok(result)
            }
            Err(e) => {
                // Rollback on error
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                } else {
                    tracing::warn!("Transaction rolled back: {}", e);
                }
                Err(e)
            }
        }
    }
}
