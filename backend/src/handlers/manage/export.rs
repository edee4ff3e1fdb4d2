use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue,
    },
    response::Response,
};

use crate::{
    error::AppError,
    handlers::manage::parse_created_range,
    models::{batch::BatchView, dashboard::DashboardQuery},
    repositories::{BatchListFilters, BatchRepository},
    services::batch_query::load_batch_views,
    state::AppState,
    utils::{csv::append_csv_row, time},
};

const EXPORT_HEADER: [&str; 12] = [
    "Batch ID",
    "Event",
    "Department",
    "Requester",
    "Property",
    "Category",
    "Requested",
    "Approved",
    "Item Status",
    "Overall Status",
    "Needed From",
    "Return By",
];

/// One CSV row per line item.
pub async fn export_batches(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, AppError> {
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

    let csv = tokio::task::spawn_blocking(move || render_csv(&views))
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))?;

    let filename = format!(
        "property_requests_{}.csv",
        time::now_in_timezone(&state.config.time_zone).format("%Y%m%d_%H%M%S")
    );
    let mut response = Response::new(Body::from(csv));
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    response.headers_mut().insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    Ok(response)
}

fn render_csv(views: &[BatchView]) -> String {
    let mut csv = String::new();
    append_csv_row(&mut csv, &EXPORT_HEADER);
    for view in views {
        for item in &view.items {
            append_csv_row(
                &mut csv,
                &[
                    view.id.to_string(),
                    view.event_name.clone(),
                    view.department_name.clone(),
                    view.requester_name.clone(),
                    item.property_name.clone(),
                    item.category.as_str().to_string(),
                    item.requested_quantity.to_string(),
                    item.approved_quantity
                        .map(|q| q.to_string())
                        .unwrap_or_default(),
                    item.status.as_str().to_string(),
                    view.overall_status.as_str().to_string(),
                    view.needed_from.to_string(),
                    view.return_by.to_string(),
                ],
            );
        }
    }
    csv
}
