use axum::{http::StatusCode, routing::post, Router};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;

use property_desk_backend::{config::Config, middleware::rate_limit::create_login_rate_limiter};

fn limited_config(login_rate_limit_per_minute: u32) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: "rate-limit-test-secret-32-characters".to_string(),
        jwt_expiration_hours: 1,
        time_zone: chrono_tz::UTC,
        bind_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: Vec::new(),
        login_rate_limit_per_minute,
        max_items_per_batch: 20,
    }
}

async fn spawn_login_stub(config: Config) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/api/auth/login", post(|| async { StatusCode::OK }))
        .route_layer(create_login_rate_limiter(&config));

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    let handle = tokio::spawn(async move {
        server.await.expect("server should run");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, handle)
}

#[tokio::test]
async fn login_attempts_beyond_the_burst_are_throttled() {
    let (addr, handle) = spawn_login_stub(limited_config(3)).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/auth/login", addr);

    for _ in 0..3 {
        let resp = client.post(&url).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client.post(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("x-ratelimit-after"));

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Too many login attempts"));
    assert!(body["retry_after"].as_u64().is_some());

    handle.abort();
}

#[tokio::test]
async fn zero_limit_still_admits_one_attempt() {
    let (addr, handle) = spawn_login_stub(limited_config(0)).await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/api/auth/login", addr);

    let resp = client.post(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = client.post(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    handle.abort();
}
