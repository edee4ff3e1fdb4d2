use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};

use crate::{
    error::AppError,
    models::user::{UpdateRolePayload, User, UserListQuery, UserResponse, UserRole},
    repositories::{department as department_repo, user as user_repo},
    services::workflow::{check_department_change, check_role_change},
    state::AppState,
    types::UserId,
    utils::time,
};

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_repo::list(&state.pool, &query).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Moves a user within the role hierarchy.
pub async fn change_role(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<UserResponse>, AppError> {
    let target = user_repo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    check_role_change(actor.id, actor.role, target.id, target.role, payload.role)?;
    check_department_change(actor.role, target.department_id, payload.department_id)?;

    let department_id = payload.department_id.or(target.department_id);
    if payload.role == UserRole::DepartmentUser && department_id.is_none() {
        return Err(AppError::BadRequest(
            "Department users must belong to a department".into(),
        ));
    }
    if let Some(new_department) = payload.department_id {
        if department_repo::find_by_id(&state.pool, new_department)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Department does not exist".into()));
        }
    }

    let updated = user_repo::update_role(
        &state.pool,
        target.id,
        payload.role,
        department_id,
        time::now_utc(&state.config.time_zone),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    tracing::info!(
        actor_id = %actor.id,
        user_id = %updated.id,
        from_role = target.role.as_str(),
        to_role = updated.role.as_str(),
        "Role changed"
    );
    Ok(Json(updated.into()))
}
