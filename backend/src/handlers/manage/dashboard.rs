use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::manage::parse_created_range,
    models::dashboard::{DashboardQuery, DashboardStats},
    repositories::{BatchListFilters, BatchRepository},
    services::{batch_query::load_batch_views, dashboard::compute_dashboard},
    state::AppState,
    utils::time,
};

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let (from, to) = parse_created_range(
        query.from.as_deref(),
        query.to.as_deref(),
        &state.config.time_zone,
    )?;
    let filters = BatchListFilters {
        from,
        to,
        ..Default::default()
    };
    let today = time::today_local(&state.config.time_zone);
    let views = load_batch_views(&BatchRepository::new(), &state.pool, &filters, today).await?;
    let stats = compute_dashboard(&views);
    tracing::debug!(
        batches = stats.total_batches,
        approval_rate = stats.approval_rate,
        "Dashboard computed"
    );
    Ok(Json(stats))
}
