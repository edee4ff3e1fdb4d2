//! Approver-facing endpoints: listing, decisions, dashboard and export.

pub mod batches;
pub mod dashboard;
pub mod decisions;
pub mod export;

pub use batches::*;
pub use dashboard::*;
pub use decisions::*;
pub use export::*;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    error::AppError,
    utils::time::{parse_lower_bound, parse_upper_bound, UpperBound},
};

type CreatedRange = (Option<DateTime<Utc>>, Option<UpperBound>);

fn bound_error(field: &str) -> AppError {
    AppError::BadRequest(format!(
        "`{}` must be a date (YYYY-MM-DD) or RFC 3339 timestamp",
        field
    ))
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses optional `from`/`to` bounds on batch creation time; bare dates
/// are whole days in `tz`.
pub(crate) fn parse_created_range(
    from: Option<&str>,
    to: Option<&str>,
    tz: &Tz,
) -> Result<CreatedRange, AppError> {
    let from = non_blank(from)
        .map(|v| parse_lower_bound(v, tz).ok_or_else(|| bound_error("from")))
        .transpose()?;
    let to = non_blank(to)
        .map(|v| parse_upper_bound(v, tz).ok_or_else(|| bound_error("to")))
        .transpose()?;
    if let (Some(from), Some(to)) = (from, to) {
        if !to.admits(from) {
            return Err(AppError::BadRequest("`from` must not be after `to`".into()));
        }
    }
    Ok((from, to))
}
