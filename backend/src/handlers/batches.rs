//! Requesting-department side of the batch lifecycle.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        batch::{BatchView, CreateBatch, RequestBatch, RequestItem},
        evaluation::{CreateEvaluation, Evaluation},
        property::Property,
        user::User,
    },
    repositories::{
        evaluation as evaluation_repo, property as property_repo, BatchListFilters,
        BatchRepository, BatchRepositoryTrait,
    },
    services::{
        batch_query::{load_batch_view, load_batch_views},
        workflow::ensure_evaluable,
    },
    state::AppState,
    types::{BatchId, PropertyId},
    utils::time,
};

pub async fn create_batch(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateBatch>,
) -> Result<(StatusCode, Json<BatchView>), AppError> {
    let department_id = user.department_id.ok_or_else(|| {
        AppError::BadRequest("You must belong to a department to request property".into())
    })?;
    payload.validate()?;
    if payload.items.len() > state.config.max_items_per_batch {
        return Err(AppError::BadRequest(format!(
            "A batch may contain at most {} items",
            state.config.max_items_per_batch
        )));
    }

    let property_ids: Vec<PropertyId> = payload.items.iter().map(|i| i.property_id).collect();
    let properties: HashMap<PropertyId, Property> =
        property_repo::find_many(&state.pool, &property_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
    for property_id in &property_ids {
        match properties.get(property_id) {
            None => {
                return Err(AppError::BadRequest(format!(
                    "Property {} does not exist",
                    property_id
                )))
            }
            Some(property) if !property.is_active => {
                return Err(AppError::BadRequest(format!(
                    "{} is not available for requests",
                    property.name
                )))
            }
            Some(_) => {}
        }
    }

    let batch = RequestBatch::new(
        user.id,
        department_id,
        payload.event_name.trim().to_string(),
        payload
            .purpose
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        payload.needed_from,
        payload.return_by,
    );
    let items: Vec<RequestItem> = payload
        .items
        .iter()
        .map(|item| RequestItem::new(batch.id, item.property_id, item.quantity))
        .collect();

    let repo = BatchRepository::new();
    repo.create(&state.pool, &batch, &items).await?;
    tracing::info!(
        batch_id = %batch.id,
        actor_id = %user.id,
        department_id = %department_id,
        items = items.len(),
        "Batch submitted"
    );

    let today = time::today_local(&state.config.time_zone);
    let view = load_batch_view(&repo, &state.pool, batch.id, today)
        .await?
        .ok_or_else(|| AppError::InternalServerError(anyhow!("batch {} vanished", batch.id)))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Batches of the caller's department, newest first.
pub async fn list_my_batches(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<BatchView>>, AppError> {
    let Some(department_id) = user.department_id else {
        return Ok(Json(Vec::new()));
    };
    let filters = BatchListFilters {
        department_id: Some(department_id),
        ..Default::default()
    };
    let today = time::today_local(&state.config.time_zone);
    let views = load_batch_views(&BatchRepository::new(), &state.pool, &filters, today).await?;
    Ok(Json(views))
}

pub async fn get_batch(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(batch_id): Path<BatchId>,
) -> Result<Json<BatchView>, AppError> {
    let view = fetch_visible_view(&state, &user, batch_id).await?;
    Ok(Json(view))
}

/// Deletes a batch nobody has acted on yet.
pub async fn withdraw_batch(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(batch_id): Path<BatchId>,
) -> Result<StatusCode, AppError> {
    let view = fetch_visible_view(&state, &user, batch_id).await?;
    if view.requester_id != user.id {
        return Err(AppError::Forbidden(
            "Only the requester can withdraw a batch".into(),
        ));
    }

    let deleted = BatchRepository::new()
        .delete_if_undecided(&state.pool, batch_id)
        .await?;
    if deleted == 0 {
        return Err(AppError::Conflict(
            "Batch can no longer be withdrawn because items have been decided".into(),
        ));
    }

    tracing::info!(batch_id = %batch_id, actor_id = %user.id, "Batch withdrawn");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn evaluate_batch(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(batch_id): Path<BatchId>,
    Json(payload): Json<CreateEvaluation>,
) -> Result<(StatusCode, Json<BatchView>), AppError> {
    payload.validate()?;
    let view = fetch_visible_view(&state, &user, batch_id).await?;
    if user.department_id != Some(view.department_id) {
        return Err(AppError::Forbidden(
            "Only the requesting department can evaluate a batch".into(),
        ));
    }
    ensure_evaluable(view.overall_status)?;
    if view.evaluation.is_some() {
        return Err(AppError::Conflict("Batch has already been evaluated".into()));
    }

    let evaluation = Evaluation::new(
        batch_id,
        user.id,
        payload.rating,
        payload
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
    );
    if !evaluation_repo::insert(&state.pool, &evaluation).await? {
        return Err(AppError::Conflict("Batch has already been evaluated".into()));
    }
    tracing::info!(
        batch_id = %batch_id,
        actor_id = %user.id,
        rating = evaluation.rating,
        "Batch evaluated"
    );

    let view = fetch_visible_view(&state, &user, batch_id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Department users only see their own department's batches; anything else
/// is reported as missing.
pub(crate) async fn fetch_visible_view(
    state: &AppState,
    user: &User,
    batch_id: BatchId,
) -> Result<BatchView, AppError> {
    let today = time::today_local(&state.config.time_zone);
    let view = load_batch_view(&BatchRepository::new(), &state.pool, batch_id, today)
        .await?
        .filter(|view| user.is_approver() || user.department_id == Some(view.department_id))
        .ok_or_else(|| AppError::NotFound("Batch not found".into()))?;
    Ok(view)
}
