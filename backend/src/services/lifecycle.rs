//! Derives the overall status of a batch and assembles batch views.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::batch::{BatchItemView, BatchRow, BatchView, ItemRow, ItemStatus, OverallStatus};
use crate::models::evaluation::Evaluation;
use crate::types::BatchId;

/// Scans the line-item statuses of one batch.
///
/// Pending wins over everything; a batch is only `returned` or `rejected`
/// when every item is, and `approved` when every item was granted.
/// Any other mix is `partial`.
pub fn derive_overall_status<I>(statuses: I) -> OverallStatus
where
    I: IntoIterator<Item = ItemStatus>,
{
    let mut total = 0usize;
    let mut approved = 0usize;
    let mut rejected = 0usize;
    let mut returned = 0usize;

    for status in statuses {
        total += 1;
        match status {
            ItemStatus::Pending => return OverallStatus::Pending,
            ItemStatus::Approved => approved += 1,
            ItemStatus::Rejected => rejected += 1,
            ItemStatus::Returned => returned += 1,
        }
    }

    if total == 0 {
        OverallStatus::Pending
    } else if returned == total {
        OverallStatus::Returned
    } else if rejected == total {
        OverallStatus::Rejected
    } else if approved + returned == total {
        OverallStatus::Approved
    } else {
        OverallStatus::Partial
    }
}

/// A batch is overdue when something is still out after its return date.
pub fn is_overdue<I>(statuses: I, return_by: NaiveDate, today: NaiveDate) -> bool
where
    I: IntoIterator<Item = ItemStatus>,
{
    return_by < today
        && statuses
            .into_iter()
            .any(|status| status == ItemStatus::Approved)
}

/// Groups item rows under their batches, keeping the order of `batches`.
pub fn assemble_batch_views(
    batches: Vec<BatchRow>,
    items: Vec<ItemRow>,
    evaluations: Vec<Evaluation>,
    today: NaiveDate,
) -> Vec<BatchView> {
    let mut items_by_batch: HashMap<BatchId, Vec<ItemRow>> = HashMap::new();
    for row in items {
        items_by_batch.entry(row.item.batch_id).or_default().push(row);
    }
    let mut evaluation_by_batch: HashMap<BatchId, Evaluation> = evaluations
        .into_iter()
        .map(|evaluation| (evaluation.batch_id, evaluation))
        .collect();

    batches
        .into_iter()
        .map(|row| {
            let items = items_by_batch.remove(&row.batch.id).unwrap_or_default();
            let evaluation = evaluation_by_batch.remove(&row.batch.id);
            build_batch_view(row, items, evaluation, today)
        })
        .collect()
}

pub fn build_batch_view(
    row: BatchRow,
    items: Vec<ItemRow>,
    evaluation: Option<Evaluation>,
    today: NaiveDate,
) -> BatchView {
    let statuses: Vec<ItemStatus> = items.iter().map(|row| row.item.status).collect();
    let overall_status = derive_overall_status(statuses.iter().copied());
    let is_overdue = is_overdue(statuses.iter().copied(), row.batch.return_by, today);
    let total_requested = items
        .iter()
        .map(|row| i64::from(row.item.requested_quantity))
        .sum();
    let total_approved = items
        .iter()
        .filter(|row| row.item.status.is_granted())
        .map(|row| i64::from(row.item.approved_quantity.unwrap_or(0)))
        .sum();

    let batch = row.batch;
    BatchView {
        id: batch.id,
        requester_id: batch.requester_id,
        requester_name: row.requester_name,
        department_id: batch.department_id,
        department_name: row.department_name,
        event_name: batch.event_name,
        purpose: batch.purpose,
        needed_from: batch.needed_from,
        return_by: batch.return_by,
        overall_status,
        is_overdue,
        total_requested,
        total_approved,
        items: items.into_iter().map(BatchItemView::from).collect(),
        evaluation,
        created_at: batch.created_at,
    }
}
