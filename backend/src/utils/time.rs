//! Clock helpers bound to the configured business timezone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Current instant as UTC, for timestamps written to the database.
pub fn now_utc(tz: &Tz) -> DateTime<Utc> {
    now_in_timezone(tz).with_timezone(&Utc)
}

/// The calendar day in `tz`. Return dates and overdue checks use this.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Local wall-clock time on `date` as a UTC instant. Ambiguous times take
/// the earlier instant; times skipped by a DST jump move forward an hour.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Option<DateTime<Utc>> {
    let local = date.and_time(time);
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz.from_local_datetime(&(local + Duration::hours(1))).earliest(),
    };
    resolved.map(|dt| dt.with_timezone(&Utc))
}

/// Upper end of a created-at range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    /// An explicit instant, matched inclusively.
    Through(DateTime<Utc>),
    /// Start of the local day after a bare date, matched exclusively.
    Before(DateTime<Utc>),
}

impl UpperBound {
    pub fn admits(&self, ts: DateTime<Utc>) -> bool {
        match *self {
            UpperBound::Through(limit) => ts <= limit,
            UpperBound::Before(limit) => ts < limit,
        }
    }
}

enum Bound {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
}

/// RFC 3339 timestamps carry their own offset. Naive timestamps are read in
/// `tz`; bare `YYYY-MM-DD` dates stay whole days.
fn parse_bound(value: &str, tz: &Tz) -> Option<Bound> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Bound::Instant(dt.with_timezone(&Utc)));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return local_to_utc(dt.date(), dt.time(), tz).map(Bound::Instant);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().map(Bound::Day)
}

/// Parses a `from` bound; a bare date starts at local midnight.
pub fn parse_lower_bound(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    match parse_bound(value, tz)? {
        Bound::Instant(ts) => Some(ts),
        Bound::Day(date) => local_to_utc(date, NaiveTime::MIN, tz),
    }
}

/// Parses a `to` bound; a bare date runs up to the next local midnight.
pub fn parse_upper_bound(value: &str, tz: &Tz) -> Option<UpperBound> {
    match parse_bound(value, tz)? {
        Bound::Instant(ts) => Some(UpperBound::Through(ts)),
        Bound::Day(date) => {
            local_to_utc(date.succ_opt()?, NaiveTime::MIN, tz).map(UpperBound::Before)
        }
    }
}
