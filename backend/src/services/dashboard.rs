//! Aggregates dashboard statistics from assembled batch views.

use std::collections::HashMap;

use crate::models::batch::{BatchView, ItemStatus, OverallStatus};
use crate::models::dashboard::{DashboardStats, DepartmentRanking, ResourceUsage, StatusBreakdown};
use crate::types::DepartmentId;

pub const COMMON_RESOURCE_LIMIT: usize = 5;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DecisionTally {
    granted: i64,
    rejected: i64,
}

impl DecisionTally {
    fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Approved | ItemStatus::Returned => self.granted += 1,
            ItemStatus::Rejected => self.rejected += 1,
            ItemStatus::Pending => {}
        }
    }

    fn rate(&self) -> f64 {
        approval_rate(self.granted, self.rejected)
    }
}

/// Percentage of decided items that were granted, one decimal place.
/// Pending items never count; no decisions yields `0.0`.
pub fn approval_rate(granted: i64, rejected: i64) -> f64 {
    let decided = granted + rejected;
    if decided <= 0 {
        return 0.0;
    }
    let pct = granted as f64 * 100.0 / decided as f64;
    (pct * 10.0).round() / 10.0
}

struct DepartmentAccumulator {
    name: String,
    batch_count: i64,
    item_count: i64,
    approved_quantity: i64,
    tally: DecisionTally,
}

pub fn compute_dashboard(batches: &[BatchView]) -> DashboardStats {
    let mut breakdown = StatusBreakdown::default();
    let mut tally = DecisionTally::default();
    let mut total_requested_quantity = 0i64;
    let mut total_approved_quantity = 0i64;
    let mut overdue_batches = 0i64;
    let mut ratings: Vec<i64> = Vec::new();
    let mut resources: HashMap<_, ResourceUsage> = HashMap::new();
    let mut departments: HashMap<DepartmentId, DepartmentAccumulator> = HashMap::new();

    for batch in batches {
        match batch.overall_status {
            OverallStatus::Pending => breakdown.pending += 1,
            OverallStatus::Approved => breakdown.approved += 1,
            OverallStatus::Rejected => breakdown.rejected += 1,
            OverallStatus::Partial => breakdown.partial += 1,
            OverallStatus::Returned => breakdown.returned += 1,
        }
        if batch.is_overdue {
            overdue_batches += 1;
        }
        if let Some(evaluation) = &batch.evaluation {
            ratings.push(i64::from(evaluation.rating));
        }

        let department = departments
            .entry(batch.department_id)
            .or_insert_with(|| DepartmentAccumulator {
                name: batch.department_name.clone(),
                batch_count: 0,
                item_count: 0,
                approved_quantity: 0,
                tally: DecisionTally::default(),
            });
        department.batch_count += 1;

        for item in &batch.items {
            let requested = i64::from(item.requested_quantity);
            let approved = if item.status.is_granted() {
                i64::from(item.approved_quantity.unwrap_or(0))
            } else {
                0
            };

            tally.record(item.status);
            total_requested_quantity += requested;
            total_approved_quantity += approved;

            department.item_count += 1;
            department.approved_quantity += approved;
            department.tally.record(item.status);

            let usage = resources
                .entry(item.property_id)
                .or_insert_with(|| ResourceUsage {
                    property_id: item.property_id,
                    name: item.property_name.clone(),
                    category: item.category,
                    request_count: 0,
                    requested_quantity: 0,
                    approved_quantity: 0,
                });
            usage.request_count += 1;
            usage.requested_quantity += requested;
            usage.approved_quantity += approved;
        }
    }

    let mut common_resources: Vec<ResourceUsage> = resources.into_values().collect();
    common_resources.sort_by(|a, b| {
        b.requested_quantity
            .cmp(&a.requested_quantity)
            .then_with(|| b.request_count.cmp(&a.request_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    common_resources.truncate(COMMON_RESOURCE_LIMIT);

    let mut ranked: Vec<(DepartmentId, DepartmentAccumulator)> = departments.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        b.batch_count
            .cmp(&a.batch_count)
            .then_with(|| b.approved_quantity.cmp(&a.approved_quantity))
            .then_with(|| a.name.cmp(&b.name))
    });
    let department_rankings = ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (department_id, acc))| DepartmentRanking {
            rank: idx as i64 + 1,
            department_id,
            approval_rate: acc.tally.rate(),
            name: acc.name,
            batch_count: acc.batch_count,
            item_count: acc.item_count,
            approved_quantity: acc.approved_quantity,
        })
        .collect();

    let average_rating = if ratings.is_empty() {
        None
    } else {
        let avg = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
        Some((avg * 100.0).round() / 100.0)
    };

    DashboardStats {
        total_batches: batches.len() as i64,
        status_breakdown: breakdown,
        approval_rate: tally.rate(),
        total_requested_quantity,
        total_approved_quantity,
        overdue_batches,
        average_rating,
        common_resources,
        department_rankings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::{BatchItemView, BatchView};
    use crate::models::evaluation::Evaluation;
    use crate::models::property::PropertyCategory;
    use crate::services::lifecycle::derive_overall_status;
    use crate::types::{BatchId, PropertyId, RequestItemId, UserId};
    use chrono::{NaiveDate, Utc};

    fn item(
        property_id: PropertyId,
        name: &str,
        status: ItemStatus,
        requested: i32,
        approved: Option<i32>,
    ) -> BatchItemView {
        BatchItemView {
            id: RequestItemId::new(),
            property_id,
            property_name: name.to_string(),
            category: PropertyCategory::Equipment,
            requested_quantity: requested,
            approved_quantity: approved,
            status,
            decided_by: None,
            decided_at: None,
            decision_comment: None,
            returned_at: None,
        }
    }

    fn batch(
        department_id: DepartmentId,
        department: &str,
        items: Vec<BatchItemView>,
        rating: Option<i16>,
    ) -> BatchView {
        let id = BatchId::new();
        BatchView {
            id,
            requester_id: UserId::new(),
            requester_name: "Requester".into(),
            department_id,
            department_name: department.into(),
            event_name: "Event".into(),
            purpose: None,
            needed_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            return_by: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            overall_status: derive_overall_status(items.iter().map(|i| i.status)),
            is_overdue: false,
            total_requested: 0,
            total_approved: 0,
            items,
            evaluation: rating.map(|r| Evaluation::new(id, UserId::new(), r, None)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn approval_rate_ignores_pending_and_rounds() {
        assert_eq!(approval_rate(0, 0), 0.0);
        assert_eq!(approval_rate(1, 0), 100.0);
        assert_eq!(approval_rate(2, 1), 66.7);
        assert_eq!(approval_rate(1, 2), 33.3);
    }

    #[test]
    fn empty_dashboard_is_all_zero() {
        let stats = compute_dashboard(&[]);
        assert_eq!(stats.total_batches, 0);
        assert_eq!(stats.approval_rate, 0.0);
        assert!(stats.average_rating.is_none());
        assert!(stats.common_resources.is_empty());
        assert!(stats.department_rankings.is_empty());
    }

    #[test]
    fn aggregates_statuses_rates_resources_and_rankings() {
        let projector = PropertyId::new();
        let chairs = PropertyId::new();
        let markers = PropertyId::new();
        let sales = DepartmentId::new();
        let hr = DepartmentId::new();

        let batches = vec![
            batch(
                sales,
                "Sales",
                vec![
                    item(projector, "Projector", ItemStatus::Approved, 2, Some(1)),
                    item(chairs, "Chair", ItemStatus::Rejected, 30, None),
                ],
                Some(4),
            ),
            batch(
                sales,
                "Sales",
                vec![item(chairs, "Chair", ItemStatus::Returned, 10, Some(10))],
                Some(5),
            ),
            batch(
                hr,
                "HR",
                vec![
                    item(markers, "Marker", ItemStatus::Pending, 12, None),
                    item(projector, "Projector", ItemStatus::Approved, 1, Some(1)),
                ],
                None,
            ),
        ];

        let stats = compute_dashboard(&batches);

        assert_eq!(stats.total_batches, 3);
        assert_eq!(stats.status_breakdown.partial, 1);
        assert_eq!(stats.status_breakdown.returned, 1);
        assert_eq!(stats.status_breakdown.pending, 1);
        // granted: projector x2 + chair returned = 3, rejected: 1
        assert_eq!(stats.approval_rate, 75.0);
        assert_eq!(stats.total_requested_quantity, 55);
        assert_eq!(stats.total_approved_quantity, 12);
        assert_eq!(stats.average_rating, Some(4.5));

        let names: Vec<&str> = stats
            .common_resources
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Chair", "Marker", "Projector"]);
        assert_eq!(stats.common_resources[0].request_count, 2);
        assert_eq!(stats.common_resources[2].approved_quantity, 2);

        assert_eq!(stats.department_rankings.len(), 2);
        assert_eq!(stats.department_rankings[0].name, "Sales");
        assert_eq!(stats.department_rankings[0].rank, 1);
        assert_eq!(stats.department_rankings[0].batch_count, 2);
        assert_eq!(stats.department_rankings[0].approval_rate, 66.7);
        assert_eq!(stats.department_rankings[1].name, "HR");
        assert_eq!(stats.department_rankings[1].approval_rate, 100.0);
    }

    #[test]
    fn department_ties_break_on_approved_quantity_then_name() {
        let p = PropertyId::new();
        let batches = vec![
            batch(DepartmentId::new(), "Zeta", vec![item(p, "Desk", ItemStatus::Approved, 2, Some(2))], None),
            batch(DepartmentId::new(), "Alpha", vec![item(p, "Desk", ItemStatus::Approved, 2, Some(2))], None),
            batch(DepartmentId::new(), "Mid", vec![item(p, "Desk", ItemStatus::Approved, 5, Some(5))], None),
        ];
        let stats = compute_dashboard(&batches);
        let order: Vec<&str> = stats
            .department_rankings
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(order, vec!["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn common_resources_are_limited() {
        let dept = DepartmentId::new();
        let items: Vec<BatchItemView> = (0..8)
            .map(|i| {
                item(
                    PropertyId::new(),
                    &format!("Item {}", i),
                    ItemStatus::Pending,
                    i + 1,
                    None,
                )
            })
            .collect();
        let stats = compute_dashboard(&[batch(dept, "Ops", items, None)]);
        assert_eq!(stats.common_resources.len(), COMMON_RESOURCE_LIMIT);
        assert_eq!(stats.common_resources[0].requested_quantity, 8);
    }
}
