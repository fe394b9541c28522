use crate::domain::deadline::local_date;
use crate::domain::{Quadrant, QuadrantLabels, Task, TaskId};
use chrono::{Datelike, Duration, NaiveDate, TimeZone};

const WEEKDAY_LETTERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// Period covered by the focus statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRange {
    Today,
    /// Sunday through Saturday of the current week
    ThisWeek,
}

impl StatsRange {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Today => Self::ThisWeek,
            Self::ThisWeek => Self::Today,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
        }
    }
}

/// Focus minutes one task collected
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFocus {
    pub id: TaskId,
    pub text: String,
    pub minutes: f64,
}

/// One column of the per-day chart
#[derive(Debug, Clone, PartialEq)]
pub struct DayFocus {
    pub date: NaiveDate,
    pub label: &'static str,
    /// Only tasks with time in the range, in task order
    pub tasks: Vec<TaskFocus>,
}

impl DayFocus {
    pub fn total_minutes(&self) -> f64 {
        self.tasks.iter().map(|t| t.minutes).sum()
    }
}

/// Tasks of one quadrant with their minutes in the range
#[derive(Debug, Clone, PartialEq)]
pub struct QuadrantFocus {
    pub quadrant: Quadrant,
    pub label: String,
    pub tasks: Vec<TaskFocus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusStats {
    pub range: StatsRange,
    pub start: NaiveDate,
    pub total_minutes: f64,
    pub days: Vec<DayFocus>,
    pub quadrants: Vec<QuadrantFocus>,
}

/// Aggregate closed time records over `range`. A record counts toward the
/// local day its session started on; running sessions are ignored.
pub fn calculate_focus_stats<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    labels: &QuadrantLabels,
    range: StatsRange,
    now: i64,
    tz: &Tz,
) -> FocusStats {
    let today = local_date(tz, now).unwrap_or_default();
    let (start, day_count) = match range {
        StatsRange::Today => (today, 1),
        StatsRange::ThisWeek => {
            let lead = today.weekday().num_days_from_sunday();
            (today - Duration::days(i64::from(lead)), 7)
        }
    };

    let tasks: Vec<&Task> = tasks.into_iter().filter(|t| !t.deleted).collect();

    // minutes[task][day]
    let minutes: Vec<Vec<f64>> = tasks
        .iter()
        .map(|task| {
            let mut per_day = vec![0.0; day_count];
            for record in &task.time_records {
                let Some(end) = record.end else { continue };
                if record.start > now {
                    continue;
                }
                let Some(day) = local_date(tz, record.start) else {
                    continue;
                };
                let Ok(offset) = usize::try_from((day - start).num_days()) else {
                    continue;
                };
                if let Some(slot) = per_day.get_mut(offset) {
                    *slot += (end - record.start).max(0) as f64 / 60_000.0;
                }
            }
            per_day
        })
        .collect();

    let days = (0..day_count)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            let label = match range {
                StatsRange::Today => "Today",
                StatsRange::ThisWeek => WEEKDAY_LETTERS[offset],
            };
            let tasks = tasks
                .iter()
                .zip(&minutes)
                .filter(|(_, per_day)| per_day.iter().any(|m| *m > 0.0))
                .map(|(task, per_day)| TaskFocus {
                    id: task.id,
                    text: task.text.clone(),
                    minutes: per_day[offset],
                })
                .collect();
            DayFocus { date, label, tasks }
        })
        .collect();

    let quadrants = Quadrant::ALL
        .into_iter()
        .map(|quadrant| QuadrantFocus {
            quadrant,
            label: labels.get(quadrant).to_string(),
            tasks: tasks
                .iter()
                .zip(&minutes)
                .filter(|(task, _)| task.quadrant == quadrant)
                .map(|(task, per_day)| TaskFocus {
                    id: task.id,
                    text: task.text.clone(),
                    minutes: per_day.iter().sum(),
                })
                .collect(),
        })
        .collect();

    let total_minutes = minutes.iter().flatten().sum();

    FocusStats {
        range,
        start,
        total_minutes,
        days,
        quadrants,
    }
}

/// "1.5h" from an hour up, whole minutes below
pub fn format_minutes(minutes: f64) -> String {
    if minutes >= 60.0 {
        format!("{:.1}h", minutes / 60.0)
    } else {
        format!("{}min", minutes.round() as i64)
    }
}
