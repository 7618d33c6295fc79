//! Date-token parsing and range filtering for archive keys.
//!
//! Filenames embed either `YYYY-MM-DD` (daily archives) or `YYYY-MM`
//! (monthly archives). Granularity is auto-detected per key: a day token
//! anywhere in the key wins over a month token.

use anyhow::{bail, Result};
use chrono::NaiveDate;

fn all_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

/// Matches `DDDD-DD-DD` at the start of `b` and parses it as a date.
fn day_token(b: &[u8]) -> Option<NaiveDate> {
    if b.len() < 10 || !all_digits(&b[0..4]) || b[4] != b'-' || !all_digits(&b[5..7]) || b[7] != b'-' || !all_digits(&b[8..10]) {
        return None;
    }
    let s = std::str::from_utf8(&b[..10]).ok()?;
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Matches `DDDD-DD` at the start of `b` and parses it as the first of that month.
fn month_token(b: &[u8]) -> Option<NaiveDate> {
    if b.len() < 7 || !all_digits(&b[0..4]) || b[4] != b'-' || !all_digits(&b[5..7]) {
        return None;
    }
    let s = std::str::from_utf8(&b[..7]).ok()?;
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First embedded date token in `s`, day granularity preferred.
pub fn embedded_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    for i in 0..bytes.len() {
        if let Some(d) = day_token(&bytes[i..]) {
            return Some(d);
        }
    }
    for i in 0..bytes.len() {
        if let Some(d) = month_token(&bytes[i..]) {
            return Some(d);
        }
    }
    None
}

/// Parse a configured bound string (`YYYY-MM` or `YYYY-MM-DD`).
fn parse_bound(s: &str) -> Result<NaiveDate> {
    let bytes = s.as_bytes();
    if let Some(d) = day_token(bytes) {
        return Ok(d);
    }
    if let Some(d) = month_token(bytes) {
        return Ok(d);
    }
    bail!("invalid date bound {s:?}, expected YYYY-MM or YYYY-MM-DD")
}

/// Keep only keys whose embedded date lies in `[start, end]` inclusive.
///
/// With both bounds open the filter is a no-op. Keys without a parseable
/// date token are an error, not silently dropped.
pub fn time_filter(
    keys: Vec<String>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<String>> {
    if start.is_none() && end.is_none() {
        return Ok(keys);
    }
    let start = match start {
        Some(s) => parse_bound(s)?,
        None => NaiveDate::MIN,
    };
    let end = match end {
        Some(s) => parse_bound(s)?,
        None => NaiveDate::MAX,
    };

    let mut kept = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(date) = embedded_date(&key) else {
            bail!("no date token in key {key:?}");
        };
        if date >= start && date <= end {
            kept.push(key);
        }
    }
    Ok(kept)
}
