//! Batch repository trait for dependency injection and testing.
//!
//! The trait only covers the read side plus creation and withdrawal; item
//! decisions run inside explicit transactions in `request_item`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::batch::{BatchRow, ItemRow, RequestBatch, RequestItem};
use crate::models::evaluation::Evaluation;
use crate::repositories::common::{push_clause, uuid_array};
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::{BatchId, DepartmentId};
use crate::utils::time::UpperBound;

const BATCH_ROW_SELECT: &str = "SELECT b.id, b.requester_id, b.department_id, b.event_name, \
     b.purpose, b.needed_from, b.return_by, b.created_at, b.updated_at, \
     d.name AS department_name, u.full_name AS requester_name \
     FROM request_batches b \
     JOIN departments d ON d.id = b.department_id \
     JOIN users u ON u.id = b.requester_id";

const ITEM_ROW_SELECT: &str = "SELECT i.id, i.batch_id, i.property_id, i.requested_quantity, \
     i.approved_quantity, i.status, i.decided_by, i.decided_at, i.decision_comment, \
     i.returned_at, i.created_at, i.updated_at, \
     p.name AS property_name, p.category AS property_category \
     FROM request_items i \
     JOIN properties p ON p.id = i.property_id";

/// SQL-side filters. The derived overall status is filtered later, in memory.
#[derive(Debug, Default, Clone)]
pub struct BatchListFilters {
    pub department_id: Option<DepartmentId>,
    pub search: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<UpperBound>,
}

/// Use `MockBatchRepositoryTrait` in tests to stub the queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchRepositoryTrait: Send + Sync {
    /// Inserts the batch and all of its items atomically.
    async fn create(
        &self,
        db: &PgPool,
        batch: &RequestBatch,
        items: &[RequestItem],
    ) -> Result<(), AppError>;

    async fn find_row(&self, db: &PgPool, id: BatchId) -> Result<Option<BatchRow>, AppError>;

    /// Newest first.
    async fn list_rows(
        &self,
        db: &PgPool,
        filters: &BatchListFilters,
    ) -> Result<Vec<BatchRow>, AppError>;

    async fn list_items(&self, db: &PgPool, batch_ids: &[BatchId]) -> Result<Vec<ItemRow>, AppError>;

    async fn list_evaluations(
        &self,
        db: &PgPool,
        batch_ids: &[BatchId],
    ) -> Result<Vec<Evaluation>, AppError>;

    /// Deletes the batch only while none of its items has been decided.
    /// Returns the number of deleted batches.
    async fn delete_if_undecided(&self, db: &PgPool, id: BatchId) -> Result<u64, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchRepository;

impl BatchRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BatchRepositoryTrait for BatchRepository {
    async fn create(
        &self,
        db: &PgPool,
        batch: &RequestBatch,
        items: &[RequestItem],
    ) -> Result<(), AppError> {
        let mut tx = begin_transaction(db).await?;
        sqlx::query(
            "INSERT INTO request_batches (id, requester_id, department_id, event_name, purpose, \
             needed_from, return_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(batch.id)
        .bind(batch.requester_id)
        .bind(batch.department_id)
        .bind(&batch.event_name)
        .bind(&batch.purpose)
        .bind(batch.needed_from)
        .bind(batch.return_by)
        .bind(batch.created_at)
        .bind(batch.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO request_items (id, batch_id, property_id, requested_quantity, status, \
                 created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(item.id)
            .bind(item.batch_id)
            .bind(item.property_id)
            .bind(item.requested_quantity)
            .bind(item.status.as_str())
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        commit_transaction(tx).await
    }

    async fn find_row(&self, db: &PgPool, id: BatchId) -> Result<Option<BatchRow>, AppError> {
        let row = sqlx::query_as::<_, BatchRow>(&format!("{} WHERE b.id = $1", BATCH_ROW_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    async fn list_rows(
        &self,
        db: &PgPool,
        filters: &BatchListFilters,
    ) -> Result<Vec<BatchRow>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(BATCH_ROW_SELECT);
        let mut has_clause = false;
        if let Some(department_id) = filters.department_id {
            push_clause(&mut builder, &mut has_clause);
            builder.push("b.department_id = ").push_bind(department_id);
        }
        if let Some(search) = filters.search.as_deref() {
            push_clause(&mut builder, &mut has_clause);
            builder
                .push("b.event_name ILIKE ")
                .push_bind(format!("%{}%", escape_like(search)));
        }
        if let Some(from) = filters.from {
            push_clause(&mut builder, &mut has_clause);
            builder.push("b.created_at >= ").push_bind(from);
        }
        if let Some(to) = filters.to {
            push_clause(&mut builder, &mut has_clause);
            match to {
                UpperBound::Through(limit) => builder.push("b.created_at <= ").push_bind(limit),
                UpperBound::Before(limit) => builder.push("b.created_at < ").push_bind(limit),
            };
        }
        builder.push(" ORDER BY b.created_at DESC, b.id");
        let rows = builder.build_query_as::<BatchRow>().fetch_all(db).await?;
        Ok(rows)
    }

    async fn list_items(&self, db: &PgPool, batch_ids: &[BatchId]) -> Result<Vec<ItemRow>, AppError> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE i.batch_id = ANY($1) ORDER BY i.created_at, p.name",
            ITEM_ROW_SELECT
        ))
        .bind(uuid_array(batch_ids))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    async fn list_evaluations(
        &self,
        db: &PgPool,
        batch_ids: &[BatchId],
    ) -> Result<Vec<Evaluation>, AppError> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Evaluation>(
            "SELECT id, batch_id, evaluator_id, rating, comment, created_at \
             FROM evaluations WHERE batch_id = ANY($1)",
        )
        .bind(uuid_array(batch_ids))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    async fn delete_if_undecided(&self, db: &PgPool, id: BatchId) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM request_batches b WHERE b.id = $1 AND NOT EXISTS \
             (SELECT 1 FROM request_items i WHERE i.batch_id = b.id AND i.status <> 'pending')",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
