//! Calendar helpers shared by the forecast pipeline.
//!
//! Ranges are always inclusive `[start, end]` calendar dates. Month keys use
//! the `YYYY-MM` form the dashboard stores monthly targets under.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PacingError;
use crate::PacingResult;

/// The part of one calendar month that falls inside a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSpan {
    /// `YYYY-MM`
    pub key: String,
    /// First in-range day of the month
    pub first: NaiveDate,
    /// Last in-range day of the month
    pub last: NaiveDate,
    /// Number of in-range days (1..=31)
    pub days: u32,
}

/// Reject ranges whose end falls before their start.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> PacingResult<()> {
    if end < start {
        return Err(PacingError::InvalidRange { start, end });
    }
    Ok(())
}

/// Number of days in the inclusive range `[start, end]`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        0
    } else {
        ((end - start).num_days() + 1) as u32
    }
}

/// Every date in the inclusive range, in order.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take(days_inclusive(start, end) as usize)
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parse a `YYYY-MM` key into its first day.
pub fn parse_month_key(key: &str) -> PacingResult<NaiveDate> {
    let invalid = || PacingError::InvalidInput {
        field: "month".into(),
        reason: format!("'{key}' is not a YYYY-MM month key"),
    };

    let (year, month) = key.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    last_of_month(date).day()
}

/// Calendar quarter (1-4) of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// `Q{1-4} {year}`
pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{} {}", quarter_of(date), date.year())
}

/// Split an inclusive range into its calendar months, clipped to the range.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<MonthSpan> {
    let mut spans = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let last = last_of_month(cursor).min(end);
        spans.push(MonthSpan {
            key: month_key(cursor),
            first: cursor,
            last,
            days: days_inclusive(cursor, last),
        });
        match last.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    spans
}
