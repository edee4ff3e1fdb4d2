//! Rules that gate line-item decisions, stock movements and role changes.
//!
//! Everything here is pure so the handlers can check a transition before
//! touching the database and the rules can be tested without Postgres.

use thiserror::Error;

use crate::models::batch::{ItemStatus, OverallStatus, RequestItem};
use crate::models::user::UserRole;
use crate::types::{DepartmentId, UserId};

pub const MAX_DECISION_COMMENT_LENGTH: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Item is {status} and can no longer be decided")]
    ItemNotPending { status: &'static str },

    #[error("Only approved items can be returned (item is {status})")]
    ItemNotApproved { status: &'static str },

    #[error("Approved quantity {approved} must be between 1 and the requested {requested}")]
    QuantityOutOfRange { requested: i32, approved: i32 },

    #[error("Only {available} unit(s) available, {requested} requested")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Batch has no pending items")]
    BatchAlreadyDecided,

    #[error("comment is required")]
    EmptyComment,

    #[error("comment must be between 1 and {max} characters")]
    CommentTooLong { max: usize },

    #[error("Batch is {status} and cannot be evaluated yet")]
    NotEvaluable { status: &'static str },

    #[error("Total quantity cannot drop below the {in_use} unit(s) currently in use")]
    StockBelowZero { in_use: i32 },

    #[error("{0}")]
    RoleChangeDenied(String),
}

pub fn ensure_pending(item: &RequestItem) -> Result<(), WorkflowError> {
    if item.status != ItemStatus::Pending {
        return Err(WorkflowError::ItemNotPending {
            status: item.status.as_str(),
        });
    }
    Ok(())
}

pub fn ensure_approved(item: &RequestItem) -> Result<(), WorkflowError> {
    if item.status != ItemStatus::Approved {
        return Err(WorkflowError::ItemNotApproved {
            status: item.status.as_str(),
        });
    }
    Ok(())
}

/// Resolves the quantity to hand out. Managers may approve fewer units than
/// requested but never more, and never more than the shelf holds.
pub fn resolve_approved_quantity(
    requested: i32,
    override_quantity: Option<i32>,
    available: i32,
) -> Result<i32, WorkflowError> {
    let approved = override_quantity.unwrap_or(requested);
    if approved < 1 || approved > requested {
        return Err(WorkflowError::QuantityOutOfRange {
            requested,
            approved,
        });
    }
    if approved > available {
        return Err(WorkflowError::InsufficientStock {
            requested: approved,
            available,
        });
    }
    Ok(approved)
}

/// Trims the comment and enforces presence (when required) and length.
pub fn normalize_comment(
    comment: Option<&str>,
    required: bool,
) -> Result<Option<String>, WorkflowError> {
    let trimmed = comment.map(str::trim).filter(|c| !c.is_empty());
    match trimmed {
        None if required => Err(WorkflowError::EmptyComment),
        None => Ok(None),
        Some(c) if c.chars().count() > MAX_DECISION_COMMENT_LENGTH => {
            Err(WorkflowError::CommentTooLong {
                max: MAX_DECISION_COMMENT_LENGTH,
            })
        }
        Some(c) => Ok(Some(c.to_string())),
    }
}

pub fn ensure_evaluable(status: OverallStatus) -> Result<(), WorkflowError> {
    match status {
        OverallStatus::Approved | OverallStatus::Partial | OverallStatus::Returned => Ok(()),
        other => Err(WorkflowError::NotEvaluable {
            status: other.as_str(),
        }),
    }
}

/// Applies a new total to a property and returns the new available count.
pub fn rebalance_stock(
    total: i32,
    available: i32,
    new_total: i32,
) -> Result<i32, WorkflowError> {
    let in_use = total - available;
    if new_total < in_use {
        return Err(WorkflowError::StockBelowZero { in_use });
    }
    Ok(new_total - in_use)
}

/// Decides whether `actor` may move `target` to `new_role`.
///
/// Admins may assign any role to anyone but themselves. Everyone else must
/// outrank both the target's current role and the role being granted, and
/// the role must actually change.
pub fn check_role_change(
    actor_id: UserId,
    actor_role: UserRole,
    target_id: UserId,
    target_role: UserRole,
    new_role: UserRole,
) -> Result<(), WorkflowError> {
    if actor_id == target_id {
        return Err(WorkflowError::RoleChangeDenied(
            "You cannot change your own role".into(),
        ));
    }
    if actor_role.is_admin() {
        return Ok(());
    }
    if actor_role.rank() <= target_role.rank() {
        return Err(WorkflowError::RoleChangeDenied(format!(
            "A {} cannot change the role of a {}",
            actor_role.as_str(),
            target_role.as_str()
        )));
    }
    if actor_role.rank() <= new_role.rank() {
        return Err(WorkflowError::RoleChangeDenied(format!(
            "A {} cannot grant the {} role",
            actor_role.as_str(),
            new_role.as_str()
        )));
    }
    if new_role == target_role {
        return Err(WorkflowError::RoleChangeDenied(format!(
            "User is already a {}",
            new_role.as_str()
        )));
    }
    Ok(())
}

/// Only admins move users between departments. Other role managers may
/// place a user who has no department yet, e.g. when demoting a manager.
pub fn check_department_change(
    actor_role: UserRole,
    current: Option<DepartmentId>,
    requested: Option<DepartmentId>,
) -> Result<(), WorkflowError> {
    match (current, requested) {
        (_, None) => Ok(()),
        (Some(current), Some(requested)) if current == requested => Ok(()),
        _ if actor_role.is_admin() => Ok(()),
        (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err(WorkflowError::RoleChangeDenied(
            "Only admins can move users between departments".into(),
        )),
    }
}
