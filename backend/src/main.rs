use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use property_desk_backend::{
    app::build_router,
    config::Config,
    db::connection::{create_pool, DbPool},
    state::AppState,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "property_desk_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        jwt_secret = %mask_secret(&config.jwt_secret),
        jwt_expiration_hours = config.jwt_expiration_hours,
        time_zone = %config.time_zone,
        bind_addr = %config.bind_addr,
        cors_allow_origins = ?config.cors_allow_origins,
        login_rate_limit_per_minute = config.login_rate_limit_per_minute,
        max_items_per_batch = config.max_items_per_batch,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let addr: SocketAddr = config.bind_addr.parse()?;
    let app = build_router(AppState::new(pool, config));

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
