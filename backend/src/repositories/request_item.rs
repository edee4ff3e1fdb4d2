//! Line-item updates. All functions run on a caller-owned transaction so a
//! decision and its stock movement commit together.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::models::batch::{ItemStatus, RequestItem};
use crate::types::{BatchId, RequestItemId, UserId};

const ITEM_COLUMNS: &str = "id, batch_id, property_id, requested_quantity, approved_quantity, \
     status, decided_by, decided_at, decision_comment, returned_at, created_at, updated_at";

/// Loads an item of `batch_id` and locks it until the transaction ends.
pub async fn lock_item(
    conn: &mut PgConnection,
    batch_id: BatchId,
    item_id: RequestItemId,
) -> Result<Option<RequestItem>, sqlx::Error> {
    sqlx::query_as::<_, RequestItem>(&format!(
        "SELECT {} FROM request_items WHERE id = $1 AND batch_id = $2 FOR UPDATE",
        ITEM_COLUMNS
    ))
    .bind(item_id)
    .bind(batch_id)
    .fetch_optional(conn)
    .await
}

/// Locks every pending item of a batch, in a stable order.
pub async fn lock_pending_items(
    conn: &mut PgConnection,
    batch_id: BatchId,
) -> Result<Vec<RequestItem>, sqlx::Error> {
    sqlx::query_as::<_, RequestItem>(&format!(
        "SELECT {} FROM request_items WHERE batch_id = $1 AND status = $2 \
         ORDER BY property_id FOR UPDATE",
        ITEM_COLUMNS
    ))
    .bind(batch_id)
    .bind(ItemStatus::Pending.as_str())
    .fetch_all(conn)
    .await
}

pub async fn mark_approved(
    conn: &mut PgConnection,
    item_id: RequestItemId,
    approved_quantity: i32,
    decided_by: UserId,
    comment: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE request_items SET status = $1, approved_quantity = $2, decided_by = $3, \
         decided_at = $4, decision_comment = $5, updated_at = $4 WHERE id = $6",
    )
    .bind(ItemStatus::Approved.as_str())
    .bind(approved_quantity)
    .bind(decided_by)
    .bind(now)
    .bind(comment)
    .bind(item_id)
    .execute(conn)
    .await
    .map(|_| ())
}

pub async fn mark_rejected(
    conn: &mut PgConnection,
    item_id: RequestItemId,
    decided_by: UserId,
    comment: &str,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE request_items SET status = $1, approved_quantity = NULL, decided_by = $2, \
         decided_at = $3, decision_comment = $4, updated_at = $3 WHERE id = $5",
    )
    .bind(ItemStatus::Rejected.as_str())
    .bind(decided_by)
    .bind(now)
    .bind(comment)
    .bind(item_id)
    .execute(conn)
    .await
    .map(|_| ())
}

/// Keeps the approval decision and records the hand-back.
pub async fn mark_returned(
    conn: &mut PgConnection,
    item_id: RequestItemId,
    comment: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE request_items SET status = $1, returned_at = $2, \
         decision_comment = COALESCE($3, decision_comment), updated_at = $2 WHERE id = $4",
    )
    .bind(ItemStatus::Returned.as_str())
    .bind(now)
    .bind(comment)
    .bind(item_id)
    .execute(conn)
    .await
    .map(|_| ())
}
