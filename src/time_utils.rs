// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar buckets.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use mongodb::bson;

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a chrono timestamp into a BSON date.
pub fn to_bson_datetime(date: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(date.timestamp_millis())
}

/// Current time as a BSON date.
pub fn bson_now() -> bson::DateTime {
    to_bson_datetime(Utc::now())
}

/// Parse a date query parameter.
///
/// Accepts RFC3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_param(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// An inclusive time range `[start, end]` with `end` at the last millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `"YYYY-MM"` key of the window start.
    pub fn month_key(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }

    /// `"Mon YYYY"` label of the window start.
    pub fn month_label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    /// `"YYYY-MM-DD"` key of the window start.
    pub fn day_key(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// Short weekday label (`"Mon"`, `"Tue"`, ...).
    pub fn day_label(&self) -> String {
        self.start.format("%a").to_string()
    }
}

fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Shift a (year, month) pair by `delta` months.
fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

/// The calendar month `months_back` months before the month containing `now`.
pub fn month_window(now: DateTime<Utc>, months_back: u32) -> TimeWindow {
    let (year, month) = shift_month(now.year(), now.month(), -(months_back as i32));
    let (next_year, next_month) = shift_month(year, month, 1);
    TimeWindow {
        start: first_of_month(year, month),
        end: first_of_month(next_year, next_month) - Duration::milliseconds(1),
    }
}

/// The calendar day `days_back` days before the day containing `now`.
pub fn day_window(now: DateTime<Utc>, days_back: u32) -> TimeWindow {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc()
        - Duration::days(i64::from(days_back));
    TimeWindow {
        start,
        end: start + Duration::days(1) - Duration::milliseconds(1),
    }
}

/// The trailing `count` calendar months including the current one, oldest first.
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<TimeWindow> {
    (0..count).rev().map(|back| month_window(now, back)).collect()
}

/// The trailing `count` calendar days including today, oldest first.
pub fn trailing_days(now: DateTime<Utc>, count: u32) -> Vec<TimeWindow> {
    (0..count).rev().map(|back| day_window(now, back)).collect()
}
