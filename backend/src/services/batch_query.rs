//! Loads batches together with their items and evaluations and turns them
//! into views with a derived overall status.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::batch::{BatchView, OverallStatus};
use crate::repositories::batch::{BatchListFilters, BatchRepositoryTrait};
use crate::services::lifecycle::{assemble_batch_views, build_batch_view};
use crate::types::BatchId;

pub async fn load_batch_views<R>(
    repo: &R,
    pool: &PgPool,
    filters: &BatchListFilters,
    today: NaiveDate,
) -> Result<Vec<BatchView>, AppError>
where
    R: BatchRepositoryTrait + ?Sized,
{
    let rows = repo.list_rows(pool, filters).await?;
    let ids: Vec<BatchId> = rows.iter().map(|row| row.batch.id).collect();
    let items = repo.list_items(pool, &ids).await?;
    let evaluations = repo.list_evaluations(pool, &ids).await?;
    Ok(assemble_batch_views(rows, items, evaluations, today))
}

pub async fn load_batch_view<R>(
    repo: &R,
    pool: &PgPool,
    id: BatchId,
    today: NaiveDate,
) -> Result<Option<BatchView>, AppError>
where
    R: BatchRepositoryTrait + ?Sized,
{
    let Some(row) = repo.find_row(pool, id).await? else {
        return Ok(None);
    };
    let items = repo.list_items(pool, &[id]).await?;
    let evaluation = repo.list_evaluations(pool, &[id]).await?.into_iter().next();
    Ok(Some(build_batch_view(row, items, evaluation, today)))
}

/// Keeps only batches whose derived status matches.
pub fn filter_by_status(views: Vec<BatchView>, status: Option<OverallStatus>) -> Vec<BatchView> {
    match status {
        Some(status) => views
            .into_iter()
            .filter(|view| view.overall_status == status)
            .collect(),
        None => views,
    }
}
