use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    error::AppError,
    models::user::{LoginRequest, LoginResponse, User, UserResponse},
    repositories::user as user_repo,
    state::AppState,
    utils::{
        jwt::create_access_token,
        password::{verify_against_dummy, verify_password},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = payload.username.trim();
    let Some(user) = user_repo::find_by_username(&state.pool, username).await? else {
        verify_against_dummy(&payload.password);
        tracing::warn!(username, "Login failed: unknown user");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let issued = create_access_token(
        user.id,
        user.username.clone(),
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User logged in");
    Ok(Json(LoginResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
        user: user.into(),
    }))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}
