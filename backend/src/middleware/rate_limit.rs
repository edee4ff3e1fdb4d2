//! Per-IP throttling for the login endpoint.

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Response, StatusCode};
use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use crate::config::Config;

/// Allows `login_rate_limit_per_minute` attempts per client IP as a burst,
/// replenished evenly over one minute.
pub fn create_login_rate_limiter(
    config: &Config,
) -> GovernorLayer<PeerIpKeyExtractor, StateInformationMiddleware, Body> {
    let burst_size = config.login_rate_limit_per_minute.max(1);
    let replenish_ms = (60_000 / u64::from(burst_size)).max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(Duration::from_millis(replenish_ms))
            .burst_size(burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .use_headers()
            .finish()
            .expect("rate limiter config should be valid"),
    );

    GovernorLayer::new(governor_conf).error_handler(rate_limit_error_handler)
}

fn rate_limit_error_handler(error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::warn!(wait_time, "Login rate limit exceeded");
            let mut response = json_error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts. Please try again later.",
                Some(wait_time),
            );
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => json_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to determine client address.",
            None,
        ),
        GovernorError::Other { code, msg, headers } => {
            let mut response = json_error_response(
                code,
                &msg.unwrap_or_else(|| "Rate limit error".to_string()),
                None,
            );
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

/// Same `{ "error": ... }` shape as `AppError` responses.
fn json_error_response(
    status: StatusCode,
    message: &str,
    retry_after: Option<u64>,
) -> Response<Body> {
    let mut body = serde_json::json!({ "error": message });
    if let Some(retry_after) = retry_after {
        body["retry_after"] = retry_after.into();
    }

    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(retry_after) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert("retry-after", value);
        }
    }
    response
}
