//! Local calendar keys.
//!
//! Streaks are counted in local calendar days, not elapsed time. Every
//! helper here works on the `YYYY-MM-DD` key of the caller's time zone and
//! on ISO-8601 week keys (`YYYY-Www`) used for weekly refill/earn buckets.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

/// Format the local calendar day of `at` as `YYYY-MM-DD`.
pub fn local_date_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format_date_key(at.date_naive())
}

/// Parse a `YYYY-MM-DD` key.
///
/// Returns `None` unless the key has exactly three all-digit components
/// that form a real calendar date.
pub fn parse_local_date_key(key: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = key.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Advance `key` by `days` calendar days (negative goes back).
pub fn add_local_days_key(key: &str, days: i64) -> Option<String> {
    let date = parse_local_date_key(key)?;
    let shifted = date.checked_add_signed(Duration::try_days(days)?)?;
    Some(format_date_key(shifted))
}

/// Signed number of calendar days from `from_key` to `to_key`.
pub fn diff_local_days(from_key: &str, to_key: &str) -> Option<i64> {
    let from = parse_local_date_key(from_key)?;
    let to = parse_local_date_key(to_key)?;
    Some(to.signed_duration_since(from).num_days())
}

/// ISO-8601 week key of the local day of `at`, e.g. `2026-W01`.
///
/// The year is the ISO week-year, which differs from the calendar year
/// around January 1st.
pub fn iso_week_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let week = at.date_naive().iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
