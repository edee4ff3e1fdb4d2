//! HS256 access tokens for the local password login.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::types::UserId;

pub const TOKEN_ISSUER: &str = "property-desk";

/// The role is informational; authorization always reloads the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub username: String,
    pub role: UserRole,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn create_access_token(
    user_id: UserId,
    username: String,
    role: UserRole,
    secret: &str,
    expiration_hours: u64,
) -> anyhow::Result<IssuedToken> {
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::hours(i64::try_from(expiration_hours)?);
    let claims = Claims {
        sub: user_id,
        username,
        role,
        iss: TOKEN_ISSUER.to_string(),
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(IssuedToken { token, expires_at })
}

/// Accepts only HS256 tokens from this service that have not expired.
pub fn verify_access_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
