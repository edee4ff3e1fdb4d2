use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        property::{CreateProperty, Property, PropertyListQuery, UpdateProperty},
        user::User,
    },
    repositories::{
        property as property_repo,
        transaction::{begin_transaction, commit_transaction},
    },
    services::workflow::rebalance_stock,
    state::AppState,
    types::PropertyId,
    utils::time,
};

pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyListQuery>,
) -> Result<Json<Vec<Property>>, AppError> {
    let properties = property_repo::list(&state.pool, &query).await?;
    Ok(Json(properties))
}

pub async fn create_property(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateProperty>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    ensure_catalog_manager(&user)?;
    payload.validate()?;

    let property = Property::new(
        payload.name.trim().to_string(),
        payload.category,
        trimmed(payload.description),
        payload.total_quantity,
    );
    property_repo::insert(&state.pool, &property).await?;

    tracing::info!(
        actor_id = %user.id,
        property_id = %property.id,
        total = property.total_quantity,
        "Property added to catalog"
    );
    Ok((StatusCode::CREATED, Json(property)))
}

/// Partial update. A new total shifts the available count by the same delta.
pub async fn update_property(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(property_id): Path<PropertyId>,
    Json(payload): Json<UpdateProperty>,
) -> Result<Json<Property>, AppError> {
    ensure_catalog_manager(&user)?;
    payload.validate()?;

    let mut tx = begin_transaction(&state.pool).await?;
    let mut property = property_repo::lock_for_update(&mut *tx, property_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".into()))?;

    if let Some(name) = payload.name {
        property.name = name.trim().to_string();
    }
    if let Some(category) = payload.category {
        property.category = category;
    }
    if payload.description.is_some() {
        property.description = trimmed(payload.description);
    }
    if let Some(is_active) = payload.is_active {
        property.is_active = is_active;
    }
    if let Some(new_total) = payload.total_quantity {
        property.available_quantity =
            rebalance_stock(property.total_quantity, property.available_quantity, new_total)?;
        property.total_quantity = new_total;
    }
    property.updated_at = time::now_utc(&state.config.time_zone);

    property_repo::update(&mut *tx, &property).await?;
    commit_transaction(tx).await?;

    tracing::info!(
        actor_id = %user.id,
        property_id = %property.id,
        total = property.total_quantity,
        available = property.available_quantity,
        "Property updated"
    );
    Ok(Json(property))
}

fn ensure_catalog_manager(user: &User) -> Result<(), AppError> {
    if user.role.can_manage_catalog() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only property managers can maintain the catalog".into(),
        ))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
