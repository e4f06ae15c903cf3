//! Transaction helper
//!
//! Runs a group of statements as one unit: committed when the closure
//! succeeds, rolled back when it fails.

use std::future::Future;
use std::pin::Pin;

use sqlx::{PgPool, Postgres, Transaction};

/// Boxed future borrowing the transaction for `'c`.
pub type TxFuture<'c, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>;

/// Execute a closure within a transaction.
///
/// The closure must own what it captures; copy request data into it before
/// the call.
///
/// # Example
/// ```ignore
/// let name = chat.name.clone();
/// let chat = execute_in_transaction(&pool, move |tx| Box::pin(async move {
///     let row = sqlx::query_as::<_, ChatRow>("INSERT INTO chats ... RETURNING ...")
///         .bind(name)
///         .fetch_one(&mut **tx)
///         .await?;
///     Ok::<_, sqlx::Error>(row)
/// })).await?;
/// ```
pub async fn execute_in_transaction<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> TxFuture<'c, T, E>,
    E: From<sqlx::Error> + std::fmt::Display,
{
    let mut tx = pool.begin().await?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await?;
            Ok(result)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
