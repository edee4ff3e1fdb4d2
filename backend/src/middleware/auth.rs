use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{
    models::user::User,
    repositories::user as user_repo,
    state::AppState,
    types::UserId,
    utils::jwt::verify_access_token,
};

/// Attached to responses of authenticated requests so outer layers can
/// tell who made the call.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

/// Any signed-in user.
pub async fn auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, request, next, |_| true).await
}

/// Finance, property and higher managers, plus admins.
pub async fn auth_manager(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, request, next, User::is_approver).await
}

pub async fn auth_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    authorize(&state, request, next, User::is_admin).await
}

async fn authorize(
    state: &AppState,
    mut request: Request,
    next: Next,
    allowed: fn(&User) -> bool,
) -> Result<Response, StatusCode> {
    let auth_header = extract_auth_header(request.headers());
    let user = authenticate_request(auth_header.as_deref(), state).await?;
    if !allowed(&user) {
        tracing::warn!(
            user_id = %user.id,
            role = user.role.as_str(),
            path = %request.uri().path(),
            "Access denied for role"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    let user_id = user.id;
    request.extensions_mut().insert(user);
    let mut response = next.run(request).await;
    response.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(response)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        let token = rest.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

/// Verifies the bearer token and reloads the user so role changes apply
/// immediately instead of waiting for the token to expire.
async fn authenticate_request(
    auth_header: Option<&str>,
    state: &AppState,
) -> Result<User, StatusCode> {
    let token = auth_header
        .and_then(parse_bearer_token)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = verify_access_token(token, &state.config.jwt_secret)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = user_repo::find_by_id(&state.pool, claims.sub)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Failed to load authenticated user");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    Ok(user)
}

fn extract_auth_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
}
