//! Argon2 password hashing for local accounts.

use std::sync::OnceLock;

use anyhow::anyhow;
use argon2::password_hash::{rand_core::OsRng, Error as HashError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("hashing password: {}", e))
}

/// `Ok(false)` on a mismatch. A stored hash that does not parse is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow!("stored password hash is malformed: {}", e))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(anyhow!("verifying password: {}", e)),
    }
}

/// Runs one verification against a throwaway hash so that logins for unknown
/// usernames cost the same as a wrong password.
pub fn verify_against_dummy(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    let dummy = DUMMY_HASH.get_or_init(|| hash_password("property-desk-dummy").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}
