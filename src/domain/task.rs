use super::enums::Quadrant;
use super::error::ValidationError;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

pub type TaskId = Uuid;

/// Current wall-clock time in milliseconds since the epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One focus session. `end` is absent while the session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub start: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl TimeRecord {
    pub fn open(start: i64) -> Self {
        Self { start, end: None }
    }

    pub fn closed(start: i64, end: i64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whole seconds of a closed record (0 while open)
    pub fn duration_secs(&self) -> i64 {
        match self.end {
            Some(end) => ((end - self.start) / 1000).max(0),
            None => 0,
        }
    }
}

/// The two mutually exclusive ways of expressing a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineSpec {
    /// Due at the end of this calendar day
    Date(NaiveDate),
    /// Due this many days after creation
    Days(u32),
}

impl DeadlineSpec {
    /// Parse a date deadline from "YYYY-MM-DD"
    pub fn parse_date(input: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|_| ValidationError::UnparsableDate(input.trim().to_string()))
    }

    /// Parse a relative deadline; zero and negative counts are rejected
    pub fn parse_days(input: &str) -> Result<Self, ValidationError> {
        let days: i64 = input
            .trim()
            .parse()
            .map_err(|_| ValidationError::UnparsableDays(input.trim().to_string()))?;
        Self::days(days)
    }

    pub fn days(days: i64) -> Result<Self, ValidationError> {
        if days <= 0 {
            return Err(ValidationError::NonPositiveDays(days));
        }
        u32::try_from(days)
            .map(Self::Days)
            .map_err(|_| ValidationError::UnparsableDays(days.to_string()))
    }
}

/// A task on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: String,
    pub quadrant: Quadrant,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub progress: u8,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_deadline: Option<u32>,
    #[serde(default)]
    pub time_records: Vec<TimeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadrant_tag: Option<String>,
}

impl Task {
    /// The deadline in its exclusive form. A stored row carrying both
    /// fields resolves to the date.
    pub fn deadline_spec(&self) -> Option<DeadlineSpec> {
        match (self.deadline_date, self.days_to_deadline) {
            (Some(date), _) => Some(DeadlineSpec::Date(date)),
            (None, Some(days)) => Some(DeadlineSpec::Days(days)),
            (None, None) => None,
        }
    }

    /// Shown in the active lists of the board
    pub fn is_active(&self) -> bool {
        !self.completed && !self.deleted
    }

    /// The running session, if any
    pub fn open_record(&self) -> Option<&TimeRecord> {
        self.time_records.last().filter(|r| r.is_open())
    }

    /// Seconds across all closed sessions
    pub fn focus_secs(&self) -> i64 {
        self.time_records.iter().map(TimeRecord::duration_secs).sum()
    }

    /// Merge a patch into this task. The patch is expected to be
    /// normalized; `id`, `owner_id` and `created_at` never change.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(quadrant) = patch.quadrant {
            self.quadrant = quadrant;
        }
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(deleted) = patch.deleted {
            self.deleted = deleted;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(date) = patch.deadline_date {
            self.deadline_date = date;
        }
        if let Some(days) = patch.days_to_deadline {
            self.days_to_deadline = days;
        }
        if let Some(records) = &patch.time_records {
            self.time_records = records.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(section) = &patch.section {
            self.section = section.clone();
        }
        if let Some(tag) = &patch.tag {
            self.tag = tag.clone();
        }
        if let Some(quadrant_tag) = &patch.quadrant_tag {
            self.quadrant_tag = quadrant_tag.clone();
        }
    }
}

/// Optional fields accepted when creating a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub deadline: Option<DeadlineSpec>,
    pub order: Option<i64>,
    pub section: Option<String>,
    pub tag: Option<String>,
    pub quadrant_tag: Option<String>,
}

impl TaskFields {
    /// Carry over everything a re-created task should keep
    pub fn from_task(task: &Task) -> Self {
        Self {
            deadline: task.deadline_spec(),
            order: task.order,
            section: task.section.clone(),
            tag: task.tag.clone(),
            quadrant_tag: task.quadrant_tag.clone(),
        }
    }
}

/// A task as submitted to the backend, before it has an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub quadrant: Quadrant,
    pub text: String,
    pub created_at: i64,
    pub fields: TaskFields,
}

impl NewTask {
    /// Materialize with the id the backend assigned
    pub fn into_task(self, id: TaskId, owner_id: &str) -> Task {
        let (deadline_date, days_to_deadline) = match self.fields.deadline {
            Some(DeadlineSpec::Date(date)) => (Some(date), None),
            Some(DeadlineSpec::Days(days)) => (None, Some(days)),
            None => (None, None),
        };

        Task {
            id,
            owner_id: owner_id.to_string(),
            quadrant: self.quadrant,
            text: self.text,
            completed: false,
            deleted: false,
            progress: 0,
            created_at: self.created_at,
            deadline_date,
            days_to_deadline,
            time_records: Vec::new(),
            order: self.fields.order,
            section: self.fields.section,
            tag: self.fields.tag,
            quadrant_tag: self.fields.quadrant_tag,
        }
    }
}

/// Partial update. `None` leaves a field alone; for nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub quadrant: Option<Quadrant>,
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub deleted: Option<bool>,
    pub progress: Option<u8>,
    pub deadline_date: Option<Option<NaiveDate>>,
    pub days_to_deadline: Option<Option<u32>>,
    pub time_records: Option<Vec<TimeRecord>>,
    pub order: Option<Option<i64>>,
    pub section: Option<Option<String>>,
    pub tag: Option<Option<String>>,
    pub quadrant_tag: Option<Option<String>>,
}

impl TaskPatch {
    pub fn quadrant(quadrant: Quadrant) -> Self {
        Self {
            quadrant: Some(quadrant),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn deleted(deleted: bool) -> Self {
        Self {
            deleted: Some(deleted),
            ..Self::default()
        }
    }

    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn time_records(records: Vec<TimeRecord>) -> Self {
        Self {
            time_records: Some(records),
            ..Self::default()
        }
    }

    pub fn order(order: Option<i64>) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    /// Set (or clear, with `None`) the deadline in either form
    pub fn deadline(spec: Option<DeadlineSpec>) -> Self {
        let (date, days) = match spec {
            Some(DeadlineSpec::Date(date)) => (Some(date), None),
            Some(DeadlineSpec::Days(days)) => (None, Some(days)),
            None => (None, None),
        };
        Self {
            deadline_date: Some(date),
            days_to_deadline: Some(days),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Enforce deadline exclusivity: setting one form clears the other.
    /// A patch setting both keeps the date.
    pub fn normalized(mut self) -> Self {
        if matches!(self.deadline_date, Some(Some(_))) {
            if matches!(self.days_to_deadline, Some(Some(_))) {
                log::debug!("patch set both deadline forms, keeping the date");
            }
            self.days_to_deadline = Some(None);
        } else if matches!(self.days_to_deadline, Some(Some(_))) {
            self.deadline_date = Some(None);
        }
        self
    }

    /// Check field values before they reach the backend
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(text) = &self.text {
            if text.trim().is_empty() {
                return Err(ValidationError::EmptyText);
            }
        }
        if let Some(progress) = self.progress {
            if progress > 100 {
                return Err(ValidationError::ProgressOutOfRange(progress));
            }
        }
        if let Some(Some(0)) = self.days_to_deadline {
            return Err(ValidationError::NonPositiveDays(0));
        }
        if let Some(records) = &self.time_records {
            if records.iter().rev().skip(1).any(TimeRecord::is_open) {
                return Err(ValidationError::MisplacedOpenRecord);
            }
        }
        Ok(())
    }
}
