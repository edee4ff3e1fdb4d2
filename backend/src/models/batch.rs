//! Request batches, their line items, and the views returned by the API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::evaluation::Evaluation;
use crate::models::property::PropertyCategory;
use crate::types::{BatchId, DepartmentId, PropertyId, RequestItemId, UserId};
use crate::validation::rules::{validate_not_blank, validate_usage_window};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
/// Workflow status of a single line item.
pub enum ItemStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Returned => "returned",
        }
    }

    /// Approved and returned items both count as granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, ItemStatus::Approved | ItemStatus::Returned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
/// Status of a batch as a whole, derived from its items.
pub enum OverallStatus {
    Pending,
    Approved,
    Rejected,
    Partial,
    Returned,
}

impl OverallStatus {
    pub const ALL: [OverallStatus; 5] = [
        OverallStatus::Pending,
        OverallStatus::Approved,
        OverallStatus::Rejected,
        OverallStatus::Partial,
        OverallStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Pending => "pending",
            OverallStatus::Approved => "approved",
            OverallStatus::Rejected => "rejected",
            OverallStatus::Partial => "partial",
            OverallStatus::Returned => "returned",
        }
    }
}

impl FromStr for OverallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        OverallStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                "`status` must be one of pending, approved, rejected, partial, returned"
                    .to_string()
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestBatch {
    pub id: BatchId,
    pub requester_id: UserId,
    pub department_id: DepartmentId,
    pub event_name: String,
    pub purpose: Option<String>,
    pub needed_from: NaiveDate,
    pub return_by: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequestBatch {
    pub fn new(
        requester_id: UserId,
        department_id: DepartmentId,
        event_name: String,
        purpose: Option<String>,
        needed_from: NaiveDate,
        return_by: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BatchId::new(),
            requester_id,
            department_id,
            event_name,
            purpose,
            needed_from,
            return_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestItem {
    pub id: RequestItemId,
    pub batch_id: BatchId,
    pub property_id: PropertyId,
    pub requested_quantity: i32,
    pub approved_quantity: Option<i32>,
    pub status: ItemStatus,
    pub decided_by: Option<UserId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decision_comment: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequestItem {
    pub fn new(batch_id: BatchId, property_id: PropertyId, requested_quantity: i32) -> Self {
        let now = Utc::now();
        Self {
            id: RequestItemId::new(),
            batch_id,
            property_id,
            requested_quantity,
            approved_quantity: None,
            status: ItemStatus::Pending,
            decided_by: None,
            decided_at: None,
            decision_comment: None,
            returned_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Batch row joined with the names the views display.
#[derive(Debug, Clone, FromRow)]
pub struct BatchRow {
    #[sqlx(flatten)]
    pub batch: RequestBatch,
    pub department_name: String,
    pub requester_name: String,
}

/// Item row joined with its property.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    #[sqlx(flatten)]
    pub item: RequestItem,
    pub property_name: String,
    pub property_category: PropertyCategory,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateBatchItem {
    pub property_id: PropertyId,
    #[validate(range(min = 1, max = 10000))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[validate(schema(function = "validate_batch_payload"))]
pub struct CreateBatch {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub event_name: String,
    #[validate(length(max = 1000))]
    pub purpose: Option<String>,
    pub needed_from: NaiveDate,
    pub return_by: NaiveDate,
    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateBatchItem>,
}

fn validate_batch_payload(payload: &CreateBatch) -> Result<(), ValidationError> {
    validate_usage_window(payload.needed_from, payload.return_by)?;
    let mut seen = std::collections::HashSet::new();
    if !payload.items.iter().all(|item| seen.insert(item.property_id)) {
        return Err(ValidationError::new("duplicate_property"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchItemView {
    pub id: RequestItemId,
    pub property_id: PropertyId,
    pub property_name: String,
    pub category: PropertyCategory,
    pub requested_quantity: i32,
    pub approved_quantity: Option<i32>,
    pub status: ItemStatus,
    pub decided_by: Option<UserId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decision_comment: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl From<ItemRow> for BatchItemView {
    fn from(row: ItemRow) -> Self {
        let item = row.item;
        Self {
            id: item.id,
            property_id: item.property_id,
            property_name: row.property_name,
            category: row.property_category,
            requested_quantity: item.requested_quantity,
            approved_quantity: item.approved_quantity,
            status: item.status,
            decided_by: item.decided_by,
            decided_at: item.decided_at,
            decision_comment: item.decision_comment,
            returned_at: item.returned_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchView {
    pub id: BatchId,
    pub requester_id: UserId,
    pub requester_name: String,
    pub department_id: DepartmentId,
    pub department_name: String,
    pub event_name: String,
    pub purpose: Option<String>,
    pub needed_from: NaiveDate,
    pub return_by: NaiveDate,
    pub overall_status: OverallStatus,
    pub is_overdue: bool,
    pub total_requested: i64,
    pub total_approved: i64,
    pub items: Vec<BatchItemView>,
    pub evaluation: Option<Evaluation>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ApproveItemPayload {
    /// Defaults to the requested quantity; may only be lowered.
    pub approved_quantity: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RejectPayload {
    pub comment: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReturnItemPayload {
    pub comment: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ManageBatchQuery {
    pub status: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub search: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
