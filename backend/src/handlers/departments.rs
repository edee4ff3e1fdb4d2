use axum::{extract::State, Json};

use crate::{
    error::AppError, models::department::Department, repositories::department as department_repo,
    state::AppState,
};

pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    let departments = department_repo::list(&state.pool).await?;
    Ok(Json(departments))
}
