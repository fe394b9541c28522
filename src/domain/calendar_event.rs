//! Conversion of tasks into calendar events, and their iCalendar form.

use super::deadline::{local_date, local_millis, resolve_end_instant};
use super::labels::QuadrantLabels;
use super::task::{Task, TaskId, DAY_MS};
use chrono::{NaiveTime, TimeZone, Utc};

const HOUR_MS: i64 = 3_600_000;

/// Length of the block placed before a deadline
pub const EVENT_SPAN_MS: i64 = 8 * HOUR_MS;

/// Reminders attached to every event, in minutes before the start
pub const REMINDER_MINUTES: [i64; 2] = [24 * 60, 60];

/// A task as a calendar provider sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: TaskId,
    pub summary: String,
    pub description: String,
    /// Epoch milliseconds
    pub start: i64,
    pub end: i64,
    pub color_tag: &'static str,
}

/// Build the event for `task`: an 8-hour block ending at the deadline, or
/// tomorrow 09:00-17:00 local time when the task has none.
pub fn task_to_calendar_event<Tz: TimeZone>(
    task: &Task,
    labels: &QuadrantLabels,
    tz: &Tz,
    now: i64,
) -> CalendarEvent {
    let (start, end) = match task.deadline_spec() {
        Some(spec) => {
            let end = resolve_end_instant(tz, task.created_at, spec);
            (end - EVENT_SPAN_MS, end)
        }
        None => default_slot(tz, now),
    };

    let status = if task.completed {
        "Completed"
    } else {
        "In progress"
    };
    let description = format!(
        "Quadrant: {}\nProgress: {}%\nStatus: {}",
        labels.get(task.quadrant),
        task.progress,
        status
    );

    CalendarEvent {
        uid: task.id,
        summary: task.text.clone(),
        description,
        start,
        end,
        color_tag: task.quadrant.color_tag(),
    }
}

fn default_slot<Tz: TimeZone>(tz: &Tz, now: i64) -> (i64, i64) {
    let (Some(today), Some(nine), Some(five)) = (
        local_date(tz, now),
        NaiveTime::from_hms_opt(9, 0, 0),
        NaiveTime::from_hms_opt(17, 0, 0),
    ) else {
        return (now + DAY_MS, now + DAY_MS + EVENT_SPAN_MS);
    };
    let tomorrow = today.succ_opt().unwrap_or(today);
    (
        local_millis(tz, tomorrow.and_time(nine)),
        local_millis(tz, tomorrow.and_time(five)),
    )
}

/// Render events as a VCALENDAR document. `stamp` becomes every DTSTAMP.
pub fn to_ical(events: &[CalendarEvent], stamp: i64) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//tickdone//Task Manager//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
    ];

    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}@tickdone", event.uid));
        lines.push(format!("DTSTAMP:{}", ical_time(stamp)));
        lines.push(format!("DTSTART:{}", ical_time(event.start)));
        lines.push(format!("DTEND:{}", ical_time(event.end)));
        lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
        lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
        lines.push(format!("X-TICKDONE-COLOR:{}", event.color_tag));
        for minutes in REMINDER_MINUTES {
            lines.push("BEGIN:VALARM".to_string());
            lines.push("ACTION:DISPLAY".to_string());
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.summary)));
            lines.push(format!("TRIGGER:-PT{}M", minutes));
            lines.push("END:VALARM".to_string());
        }
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    let mut out = String::new();
    for line in lines {
        out.push_str(&fold_line(&line));
        out.push_str("\r\n");
    }
    out
}

/// UTC "basic" format: 20250320T235959Z
fn ical_time(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y%m%dT%H%M%SZ").to_string())
        .unwrap_or_default()
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Split a content line at 75 octets, continuation lines start with a space
fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;
    let mut out = String::with_capacity(line.len() + 8);
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > LIMIT {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}
