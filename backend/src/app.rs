//! Router composition: public, signed-in, approver and admin route groups.

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    handlers,
    middleware::{self as app_middleware, rate_limit::create_login_rate_limiter},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route_layer(create_login_rate_limiter(&state.config));

    let user_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/departments",
            get(handlers::departments::list_departments),
        )
        .route(
            "/api/properties",
            get(handlers::properties::list_properties),
        )
        .route("/api/batches", post(handlers::batches::create_batch))
        .route("/api/batches/me", get(handlers::batches::list_my_batches))
        .route(
            "/api/batches/{id}",
            get(handlers::batches::get_batch).delete(handlers::batches::withdraw_batch),
        )
        .route(
            "/api/batches/{id}/evaluation",
            post(handlers::batches::evaluate_batch),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth,
        ));

    let manager_routes = Router::new()
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/{id}/role", put(handlers::users::change_role))
        .route(
            "/api/manage/properties",
            post(handlers::properties::create_property),
        )
        .route(
            "/api/manage/properties/{id}",
            put(handlers::properties::update_property),
        )
        .route(
            "/api/manage/batches",
            get(handlers::manage::list_batches),
        )
        .route(
            "/api/manage/batches/{id}/approve",
            post(handlers::manage::approve_batch),
        )
        .route(
            "/api/manage/batches/{id}/reject",
            post(handlers::manage::reject_batch),
        )
        .route(
            "/api/manage/batches/{id}/items/{item_id}/approve",
            post(handlers::manage::approve_item),
        )
        .route(
            "/api/manage/batches/{id}/items/{item_id}/reject",
            post(handlers::manage::reject_item),
        )
        .route(
            "/api/manage/batches/{id}/items/{item_id}/return",
            post(handlers::manage::return_item),
        )
        .route(
            "/api/manage/dashboard",
            get(handlers::manage::get_dashboard),
        )
        .route("/api/manage/export", get(handlers::manage::export_batches))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth_manager,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/users", post(handlers::admin::create_user))
        .route(
            "/api/admin/departments",
            post(handlers::admin::create_department),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth_admin,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(manager_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(app_middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum_middleware::from_fn(app_middleware::log_error_responses)),
        )
        .with_state(state)
}

/// Allows any origin unless `CORS_ALLOW_ORIGINS` lists some.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
