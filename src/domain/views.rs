use super::deadline::{deadline_day, resolve_end_instant};
use super::enums::{Quadrant, SortKey, StatusFilter};
use super::task::Task;
use chrono::{Datelike, NaiveDate, TimeZone};
use std::cmp::Ordering;

/// Number of days shown in a calendar month grid (6 weeks)
pub const CALENDAR_DAYS: usize = 42;

/// One quadrant of the board, split into active and completed tasks
#[derive(Debug, Clone)]
pub struct QuadrantView<'a> {
    pub quadrant: Quadrant,
    pub active: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl QuadrantView<'_> {
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}

/// Group the store's buckets into the four board quadrants.
/// Deleted tasks never appear; bucket order is kept.
pub fn quadrant_views(buckets: &[Vec<Task>; 4]) -> [QuadrantView<'_>; 4] {
    Quadrant::ALL.map(|quadrant| {
        let (completed, active) = buckets[quadrant.index()]
            .iter()
            .filter(|t| !t.deleted)
            .partition(|t| t.completed);
        QuadrantView {
            quadrant,
            active,
            completed,
        }
    })
}

/// All non-deleted tasks as one filtered, sorted list. Sorting is stable,
/// so ties keep quadrant order.
pub fn flat_list<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    filter: StatusFilter,
    sort: SortKey,
    tz: &Tz,
) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = tasks
        .into_iter()
        .filter(|t| !t.deleted)
        .filter(|t| match filter {
            StatusFilter::All => true,
            StatusFilter::Pending => !t.completed,
            StatusFilter::Completed => t.completed,
        })
        .collect();

    match sort {
        SortKey::Deadline => {
            rows.sort_by_cached_key(|t| {
                let end = t
                    .deadline_spec()
                    .map(|spec| resolve_end_instant(tz, t.created_at, spec));
                // Tasks without a deadline go last
                (end.is_none(), end.unwrap_or(i64::MAX))
            });
        }
        SortKey::CreatedDesc => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Text => rows.sort_by(|a, b| compare_text(&a.text, &b.text)),
        SortKey::ProgressDesc => rows.sort_by(|a, b| b.progress.cmp(&a.progress)),
    }
    rows
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A single cell of the month grid
#[derive(Debug, Clone)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    /// False for the leading and trailing days of adjacent months
    pub in_month: bool,
    pub tasks: Vec<&'a Task>,
}

/// Six weeks of days covering one month, starting on a Sunday
#[derive(Debug, Clone)]
pub struct CalendarGrid<'a> {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> CalendarGrid<'a> {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay<'a>]> {
        self.days.chunks(7)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay<'a>> {
        let first = self.first_date()?;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.days.get(offset)
    }
}

/// Bucket tasks by the calendar day of their deadline. Tasks without a
/// deadline are left out. Returns `None` for an invalid month.
pub fn calendar_month<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    year: i32,
    month: u32,
    tz: &Tz,
) -> Option<CalendarGrid<'a>> {
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = first_of_month.weekday().num_days_from_sunday();
    let start = first_of_month - chrono::Duration::days(i64::from(lead));

    let mut days: Vec<CalendarDay> = start
        .iter_days()
        .take(CALENDAR_DAYS)
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == month && date.year() == year,
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks.into_iter().filter(|t| !t.deleted) {
        let Some(day) = task
            .deadline_spec()
            .and_then(|spec| deadline_day(tz, task.created_at, spec))
        else {
            continue;
        };
        let Ok(offset) = usize::try_from((day - start).num_days()) else {
            continue;
        };
        if let Some(cell) = days.get_mut(offset) {
            cell.tasks.push(task);
        }
    }

    Some(CalendarGrid { year, month, days })
}

/// Shift a (year, month) pair by `delta` months
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}
