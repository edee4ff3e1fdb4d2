//! Common validation rules shared across request payloads.

use chrono::NaiveDate;
use validator::ValidationError;

/// Validates username format.
///
/// Requirements:
/// - Only alphanumeric characters and underscores
/// - 1-50 characters in length
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || username.len() > 50 {
        return Err(ValidationError::new("username_invalid_length"));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::new("username_invalid_characters"));
    }

    Ok(())
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A usage window is valid when it starts on or before the day it ends.
pub fn validate_usage_window(
    needed_from: NaiveDate,
    return_by: NaiveDate,
) -> Result<(), ValidationError> {
    if needed_from > return_by {
        return Err(ValidationError::new("needed_from_after_return_by"));
    }
    Ok(())
}
