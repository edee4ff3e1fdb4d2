//! Response shapes for the manager dashboard.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::property::PropertyCategory;
use crate::types::{DepartmentId, PropertyId};

#[derive(Debug, Default, Clone, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Inclusive lower bound on batch creation (`YYYY-MM-DD` or RFC 3339).
    pub from: Option<String>,
    /// Inclusive upper bound on batch creation.
    pub to: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusBreakdown {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub partial: i64,
    pub returned: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResourceUsage {
    pub property_id: PropertyId,
    pub name: String,
    pub category: PropertyCategory,
    /// Number of line items that asked for this property.
    pub request_count: i64,
    pub requested_quantity: i64,
    pub approved_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DepartmentRanking {
    pub rank: i64,
    pub department_id: DepartmentId,
    pub name: String,
    pub batch_count: i64,
    pub item_count: i64,
    pub approved_quantity: i64,
    pub approval_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_batches: i64,
    pub status_breakdown: StatusBreakdown,
    /// Share of decided items that were granted, in percent.
    pub approval_rate: f64,
    pub total_requested_quantity: i64,
    pub total_approved_quantity: i64,
    pub overdue_batches: i64,
    pub average_rating: Option<f64>,
    pub common_resources: Vec<ResourceUsage>,
    pub department_rankings: Vec<DepartmentRanking>,
}
