//! Admin-only account and department management.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{conflict_on_unique, AppError},
    models::{
        department::{CreateDepartment, Department},
        user::{CreateUser, User, UserResponse, UserRole},
    },
    repositories::{department as department_repo, user as user_repo},
    state::AppState,
    utils::password::hash_password,
};

pub async fn create_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    if payload.role == UserRole::DepartmentUser && payload.department_id.is_none() {
        return Err(AppError::BadRequest(
            "Department users must belong to a department".into(),
        ));
    }
    if let Some(department_id) = payload.department_id {
        if department_repo::find_by_id(&state.pool, department_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Department does not exist".into()));
        }
    }

    let username = payload.username.trim().to_string();
    if user_repo::find_by_username(&state.pool, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(
        username,
        password_hash,
        payload.full_name.trim().to_string(),
        payload.role,
        payload.department_id,
    );
    user_repo::insert(&state.pool, &user)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already exists"))?;

    tracing::info!(
        actor_id = %admin.id,
        user_id = %user.id,
        role = user.role.as_str(),
        "User created"
    );
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn create_department(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Json(payload): Json<CreateDepartment>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    payload.validate()?;
    let name = payload.name.trim().to_string();
    if department_repo::exists_by_name(&state.pool, &name).await? {
        return Err(AppError::Conflict("Department already exists".into()));
    }

    let department = Department::new(name);
    department_repo::insert(&state.pool, &department)
        .await
        .map_err(|e| conflict_on_unique(e, "Department already exists"))?;

    tracing::info!(actor_id = %admin.id, department_id = %department.id, "Department created");
    Ok((StatusCode::CREATED, Json(department)))
}
