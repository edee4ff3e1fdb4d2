use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::manage::parse_created_range,
    models::{
        batch::{BatchView, ManageBatchQuery, OverallStatus},
        PageWindow, PaginatedResponse,
    },
    repositories::{BatchListFilters, BatchRepository},
    services::batch_query::{filter_by_status, load_batch_views},
    state::AppState,
    utils::time,
};

/// Lists every department's batches. Status is derived, so it is filtered
/// in memory before paging.
pub async fn list_batches(
    State(state): State<AppState>,
    Query(query): Query<ManageBatchQuery>,
) -> Result<Json<PaginatedResponse<BatchView>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<OverallStatus>().map_err(AppError::BadRequest))
        .transpose()?;
    let (from, to) = parse_created_range(
        query.from.as_deref(),
        query.to.as_deref(),
        &state.config.time_zone,
    )?;
    let window = PageWindow::from_params(query.page, query.per_page)
        .ok_or_else(|| AppError::BadRequest("`page` is out of range".into()))?;

    let filters = BatchListFilters {
        department_id: query.department_id,
        search: query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        from,
        to,
    };
    let today = time::today_local(&state.config.time_zone);
    let views = load_batch_views(&BatchRepository::new(), &state.pool, &filters, today).await?;
    let matching = filter_by_status(views, status);
    let total = matching.len() as i64;

    Ok(Json(PaginatedResponse::new(
        window.apply(matching),
        total,
        window,
    )))
}
