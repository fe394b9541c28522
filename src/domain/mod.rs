pub mod calendar_event;
pub mod deadline;
pub mod enums;
pub mod error;
pub mod labels;
pub mod task;
pub mod timer;
pub mod views;

pub use calendar_event::{task_to_calendar_event, to_ical};
pub use deadline::{annotate, DeadlinePolicy, DeadlineState};
pub use enums::{
    ColorTier, DeleteMode, Quadrant, SortKey, StatusFilter, TimerState, UiMode, ViewMode,
};
pub use error::{TimerError, ValidationError};
pub use labels::QuadrantLabels;
pub use task::{
    now_millis, DeadlineSpec, NewTask, Task, TaskFields, TaskId, TaskPatch, TimeRecord, DAY_MS,
};
pub use timer::{format_clock, FocusTimer};
pub use views::{calendar_month, flat_list, quadrant_views, CalendarGrid, QuadrantView};
