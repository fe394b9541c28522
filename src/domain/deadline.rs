//! Countdown to a task's deadline.
//!
//! Everything here is a pure function of its inputs; the local timezone is
//! passed in so that callers (and tests) control how calendar dates map to
//! instants.

use super::enums::ColorTier;
use super::task::{DeadlineSpec, Task, DAY_MS};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Display annotation for one task's deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadlineState {
    /// Whole days remaining, never below 1
    pub days_left: i64,
    pub color_tier: ColorTier,
    /// Fraction of the countdown ring to draw: `1 / days_left`
    pub progress_ratio: f64,
}

impl DeadlineState {
    fn from_days_left(days_left: i64) -> Self {
        let days_left = days_left.max(1);
        Self {
            days_left,
            color_tier: ColorTier::for_days_left(days_left),
            progress_ratio: 1.0 / days_left as f64,
        }
    }
}

/// Controls what a task without a deadline looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlinePolicy {
    /// Show tasks without a deadline as "1 day left" (the historical
    /// behavior) instead of as having no deadline
    pub legacy_no_deadline_fallback: bool,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            legacy_no_deadline_fallback: true,
        }
    }
}

/// A wall-clock time in `tz` as epoch milliseconds
pub fn local_millis<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> i64 {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        // Nonexistent local time (DST gap): fall back to the UTC reading
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// The calendar date of an instant in `tz`
pub fn local_date<Tz: TimeZone>(tz: &Tz, millis: i64) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(millis)
        .earliest()
        .map(|dt| dt.naive_local().date())
}

/// Last instant of `date` in `tz` (23:59:59), in epoch milliseconds
pub fn end_of_day_millis<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
    local_millis(tz, date.and_time(time))
}

/// Absolute due instant in epoch milliseconds
pub fn resolve_end_instant<Tz: TimeZone>(tz: &Tz, created_at: i64, spec: DeadlineSpec) -> i64 {
    match spec {
        DeadlineSpec::Date(date) => end_of_day_millis(tz, date),
        DeadlineSpec::Days(days) => created_at + i64::from(days.max(1)) * DAY_MS,
    }
}

/// Calendar day a deadline falls on, in `tz`
pub fn deadline_day<Tz: TimeZone>(tz: &Tz, created_at: i64, spec: DeadlineSpec) -> Option<NaiveDate> {
    match spec {
        DeadlineSpec::Date(date) => Some(date),
        DeadlineSpec::Days(days) => local_date(tz, created_at + i64::from(days) * DAY_MS),
    }
}

/// Days left, ring fraction and color for a deadline as seen at `now`.
///
/// Without a deadline the countdown reports the fixed 1-day sentinel.
pub fn compute_deadline_state<Tz: TimeZone>(
    tz: &Tz,
    created_at: i64,
    spec: Option<DeadlineSpec>,
    now: i64,
) -> DeadlineState {
    let Some(spec) = spec else {
        return DeadlineState::from_days_left(1);
    };

    let end = resolve_end_instant(tz, created_at, spec);
    let remaining = end - now;
    let days = if remaining > 0 {
        (remaining + DAY_MS - 1) / DAY_MS
    } else {
        0
    };
    DeadlineState::from_days_left(days)
}

/// Deadline annotation for a task under `policy`. `None` means the task
/// has no deadline and the policy does not substitute the sentinel.
pub fn annotate<Tz: TimeZone>(
    tz: &Tz,
    task: &Task,
    now: i64,
    policy: DeadlinePolicy,
) -> Option<DeadlineState> {
    let spec = task.deadline_spec();
    if spec.is_none() && !policy.legacy_no_deadline_fallback {
        return None;
    }
    Some(compute_deadline_state(tz, task.created_at, spec, now))
}
