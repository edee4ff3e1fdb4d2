use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
    Error as AxumError,
};
use std::time::Instant;

use crate::middleware::{auth::AuthenticatedUser, request_id::RequestId};

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Logs every 4xx/5xx response with its request id, the caller when known,
/// and a preview of the body. The body is buffered and forwarded unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency = start.elapsed();
    let context = ErrorContext {
        method,
        uri,
        request_id,
        user_id: response
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|user| user.0.to_string())
            .unwrap_or_default(),
    };
    let (mut parts, body) = response.into_parts();
    match buffer_body(body).await {
        Ok((bytes, truncated_preview)) => {
            log_error_event(
                &context,
                status.as_u16(),
                latency.as_millis() as u64,
                &truncated_preview,
                None,
            );

            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            log_error_event(
                &context,
                status.as_u16(),
                latency.as_millis() as u64,
                "",
                Some(err),
            );
            Response::from_parts(parts, Body::empty())
        }
    }
}

async fn buffer_body(body: Body) -> Result<(Bytes, String), AxumError> {
    let bytes = to_bytes(body, MAX_BUFFERED_BODY_BYTES).await?;
    let preview = if bytes.len() > MAX_LOGGED_BODY_BYTES {
        let slice = bytes.slice(0..MAX_LOGGED_BODY_BYTES);
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&slice),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(&bytes).to_string()
    };
    Ok((bytes, preview))
}

struct ErrorContext {
    method: String,
    uri: String,
    request_id: String,
    user_id: String,
}

fn log_error_event(
    context: &ErrorContext,
    status: u16,
    latency_ms: u64,
    body_preview: &str,
    body_error: Option<AxumError>,
) {
    let ErrorContext {
        method,
        uri,
        request_id,
        user_id,
    } = context;

    if let Some(err) = body_error {
        tracing::warn!(
            status,
            %method,
            %uri,
            %request_id,
            %user_id,
            latency_ms,
            error = ?err,
            "Failed to read error response body"
        );
        return;
    }

    if status >= 500 {
        tracing::error!(
            status,
            %method,
            %uri,
            %request_id,
            %user_id,
            latency_ms,
            body = body_preview,
            "Request failed"
        );
    } else {
        tracing::warn!(
            status,
            %method,
            %uri,
            %request_id,
            %user_id,
            latency_ms,
            body = body_preview,
            "Request rejected"
        );
    }
}
