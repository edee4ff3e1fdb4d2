//! Explicit transactions for decisions that move stock and item status
//! together.

use anyhow::Context;
use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

use crate::error::AppError;

pub type Tx = PgTransaction<'static>;

/// Dropping the returned transaction without committing rolls it back, so an
/// early `?` return leaves stock and items untouched.
pub async fn begin_transaction(db: &PgPool) -> Result<Tx, AppError> {
    let tx = db.begin().await.context("beginning transaction")?;
    Ok(tx)
}

pub async fn commit_transaction(tx: Tx) -> Result<(), AppError> {
    tx.commit().await.context("committing transaction")?;
    Ok(())
}
