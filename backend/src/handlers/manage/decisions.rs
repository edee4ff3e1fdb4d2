//! Line-item decisions. Each decision and its stock movement commit in one
//! transaction; the item row is locked before the property row.

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::batches::fetch_visible_view,
    models::{
        batch::{ApproveItemPayload, BatchView, RejectPayload, ReturnItemPayload},
        user::User,
    },
    repositories::{
        property as property_repo, request_item as item_repo,
        transaction::{begin_transaction, commit_transaction},
        BatchRepository, BatchRepositoryTrait,
    },
    services::workflow::{
        ensure_approved, ensure_pending, normalize_comment, resolve_approved_quantity,
        WorkflowError,
    },
    state::AppState,
    types::{BatchId, RequestItemId},
    utils::time,
};

pub async fn approve_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((batch_id, item_id)): Path<(BatchId, RequestItemId)>,
    Json(payload): Json<ApproveItemPayload>,
) -> Result<Json<BatchView>, AppError> {
    let comment = normalize_comment(payload.comment.as_deref(), false)?;
    let now = time::now_utc(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let item = item_repo::lock_item(&mut *tx, batch_id, item_id)
        .await?
        .ok_or_else(item_not_found)?;
    ensure_pending(&item)?;

    let property = property_repo::lock_for_update(&mut *tx, item.property_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))?;
    let quantity = resolve_approved_quantity(
        item.requested_quantity,
        payload.approved_quantity,
        property.available_quantity,
    )?;
    if !property_repo::reserve_stock(&mut *tx, property.id, quantity).await? {
        return Err(WorkflowError::InsufficientStock {
            requested: quantity,
            available: property.available_quantity,
        }
        .into());
    }
    item_repo::mark_approved(&mut *tx, item.id, quantity, user.id, comment.as_deref(), now)
        .await?;
    commit_transaction(tx).await?;

    tracing::info!(
        batch_id = %batch_id,
        item_id = %item_id,
        actor_id = %user.id,
        requested = item.requested_quantity,
        approved = quantity,
        "Item approved"
    );
    Ok(Json(fetch_visible_view(&state, &user, batch_id).await?))
}

pub async fn reject_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((batch_id, item_id)): Path<(BatchId, RequestItemId)>,
    Json(payload): Json<RejectPayload>,
) -> Result<Json<BatchView>, AppError> {
    let comment = required_comment(&payload.comment)?;
    let now = time::now_utc(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let item = item_repo::lock_item(&mut *tx, batch_id, item_id)
        .await?
        .ok_or_else(item_not_found)?;
    ensure_pending(&item)?;
    item_repo::mark_rejected(&mut *tx, item.id, user.id, &comment, now).await?;
    commit_transaction(tx).await?;

    tracing::info!(
        batch_id = %batch_id,
        item_id = %item_id,
        actor_id = %user.id,
        "Item rejected"
    );
    Ok(Json(fetch_visible_view(&state, &user, batch_id).await?))
}

/// Records the hand-back of an approved item and restocks it.
pub async fn return_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((batch_id, item_id)): Path<(BatchId, RequestItemId)>,
    Json(payload): Json<ReturnItemPayload>,
) -> Result<Json<BatchView>, AppError> {
    let comment = normalize_comment(payload.comment.as_deref(), false)?;
    let now = time::now_utc(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let item = item_repo::lock_item(&mut *tx, batch_id, item_id)
        .await?
        .ok_or_else(item_not_found)?;
    ensure_approved(&item)?;
    let quantity = item.approved_quantity.unwrap_or(0);
    property_repo::release_stock(&mut *tx, item.property_id, quantity).await?;
    item_repo::mark_returned(&mut *tx, item.id, comment.as_deref(), now).await?;
    commit_transaction(tx).await?;

    tracing::info!(
        batch_id = %batch_id,
        item_id = %item_id,
        actor_id = %user.id,
        quantity,
        "Item returned"
    );
    Ok(Json(fetch_visible_view(&state, &user, batch_id).await?))
}

/// Approves every pending item at its requested quantity, or nothing.
pub async fn approve_batch(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(batch_id): Path<BatchId>,
) -> Result<Json<BatchView>, AppError> {
    ensure_batch_exists(&state, batch_id).await?;
    let now = time::now_utc(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let items = item_repo::lock_pending_items(&mut *tx, batch_id).await?;
    if items.is_empty() {
        return Err(WorkflowError::BatchAlreadyDecided.into());
    }
    for item in &items {
        let property = property_repo::lock_for_update(&mut *tx, item.property_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found".into()))?;
        if !property_repo::reserve_stock(&mut *tx, property.id, item.requested_quantity).await? {
            tracing::warn!(
                batch_id = %batch_id,
                item_id = %item.id,
                property_id = %property.id,
                requested = item.requested_quantity,
                available = property.available_quantity,
                "Bulk approval aborted: insufficient stock"
            );
            return Err(WorkflowError::InsufficientStock {
                requested: item.requested_quantity,
                available: property.available_quantity,
            }
            .into());
        }
        item_repo::mark_approved(&mut *tx, item.id, item.requested_quantity, user.id, None, now)
            .await?;
    }
    commit_transaction(tx).await?;

    tracing::info!(
        batch_id = %batch_id,
        actor_id = %user.id,
        items = items.len(),
        "Batch approved"
    );
    Ok(Json(fetch_visible_view(&state, &user, batch_id).await?))
}

pub async fn reject_batch(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(batch_id): Path<BatchId>,
    Json(payload): Json<RejectPayload>,
) -> Result<Json<BatchView>, AppError> {
    let comment = required_comment(&payload.comment)?;
    ensure_batch_exists(&state, batch_id).await?;
    let now = time::now_utc(&state.config.time_zone);

    let mut tx = begin_transaction(&state.pool).await?;
    let items = item_repo::lock_pending_items(&mut *tx, batch_id).await?;
    if items.is_empty() {
        return Err(WorkflowError::BatchAlreadyDecided.into());
    }
    for item in &items {
        item_repo::mark_rejected(&mut *tx, item.id, user.id, &comment, now).await?;
    }
    commit_transaction(tx).await?;

    tracing::info!(
        batch_id = %batch_id,
        actor_id = %user.id,
        items = items.len(),
        "Batch rejected"
    );
    Ok(Json(fetch_visible_view(&state, &user, batch_id).await?))
}

async fn ensure_batch_exists(state: &AppState, batch_id: BatchId) -> Result<(), AppError> {
    BatchRepository::new()
        .find_row(&state.pool, batch_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Batch not found".into()))
}

fn required_comment(raw: &str) -> Result<String, WorkflowError> {
    normalize_comment(Some(raw), true)?.ok_or(WorkflowError::EmptyComment)
}

fn item_not_found() -> AppError {
    AppError::NotFound("Item not found in this batch".into())
}
