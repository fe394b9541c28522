use super::enums::{Quadrant, TimerState};
use super::error::TimerError;
use super::task::{Task, TaskId, TimeRecord};
use crate::ticker::{Interval, FOCUS_TICK_MS};

/// Focus session for one task, alive while its timer modal is open.
///
/// Transitions operate on the task's `time_records` passed in by the
/// caller, who persists them; a failed transition leaves both the timer
/// and the records untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTimer {
    pub task_id: TaskId,
    pub quadrant: Quadrant,
    state: TimerState,
    started_at: Option<i64>,
    elapsed_secs: i64,
    interval: Option<Interval>,
}

impl FocusTimer {
    /// Open the timer for `task`, resuming a session left running
    pub fn open(task: &Task, now: i64) -> Self {
        match task.open_record() {
            Some(record) => Self {
                task_id: task.id,
                quadrant: task.quadrant,
                state: TimerState::Running,
                started_at: Some(record.start),
                elapsed_secs: ((now - record.start) / 1000).max(0),
                interval: Some(Interval::every(FOCUS_TICK_MS, now)),
            },
            None => Self {
                task_id: task.id,
                quadrant: task.quadrant,
                state: TimerState::Idle,
                started_at: None,
                elapsed_secs: 0,
                interval: None,
            },
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Seconds in the current session
    pub fn elapsed_secs(&self) -> i64 {
        self.elapsed_secs
    }

    /// Whether the 1-second refresh is active
    pub fn is_ticking(&self) -> bool {
        self.interval.is_some()
    }

    /// Begin a new session
    pub fn start(&mut self, records: &mut Vec<TimeRecord>, now: i64) -> Result<(), TimerError> {
        if self.state == TimerState::Running {
            return Err(self.invalid("start"));
        }
        if records.last().is_some_and(TimeRecord::is_open) {
            return Err(TimerError::OpenRecordExists);
        }

        records.push(TimeRecord::open(now));
        self.state = TimerState::Running;
        self.started_at = Some(now);
        self.elapsed_secs = 0;
        self.interval = Some(Interval::every(FOCUS_TICK_MS, now));
        Ok(())
    }

    /// Close the running session and stop ticking
    pub fn pause(&mut self, records: &mut [TimeRecord], now: i64) -> Result<(), TimerError> {
        if self.state != TimerState::Running {
            return Err(self.invalid("pause"));
        }

        close_open_record(records, now);
        self.elapsed_secs = self.live_secs(now);
        self.state = TimerState::Paused;
        self.started_at = None;
        self.interval = None;
        Ok(())
    }

    /// End the session for good
    pub fn stop(&mut self, records: &mut [TimeRecord], now: i64) -> Result<(), TimerError> {
        if self.state == TimerState::Idle {
            return Err(self.invalid("stop"));
        }

        close_open_record(records, now);
        self.state = TimerState::Idle;
        self.started_at = None;
        self.elapsed_secs = 0;
        self.interval = None;
        Ok(())
    }

    /// Drop the refresh without touching the session. A running session
    /// stays open in the records and resumes on the next `open`.
    pub fn close(&mut self) {
        self.interval = None;
    }

    /// Advance the live counter; true when the display should refresh
    pub fn tick(&mut self, now: i64) -> bool {
        let Some(interval) = self.interval.as_mut() else {
            return false;
        };
        if !interval.poll(now) {
            return false;
        }
        self.elapsed_secs = self.live_secs(now);
        true
    }

    /// Closed sessions plus the live one while running
    pub fn total_secs(&self, records: &[TimeRecord]) -> i64 {
        let closed: i64 = records.iter().map(TimeRecord::duration_secs).sum();
        if self.is_running() {
            closed + self.elapsed_secs
        } else {
            closed
        }
    }

    fn live_secs(&self, now: i64) -> i64 {
        self.started_at
            .map(|start| ((now - start) / 1000).max(0))
            .unwrap_or(self.elapsed_secs)
    }

    fn invalid(&self, action: &'static str) -> TimerError {
        let state = match self.state {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        };
        TimerError::InvalidTransition { action, state }
    }
}

/// Set `end` on a trailing open record; false when there was none
pub fn close_open_record(records: &mut [TimeRecord], now: i64) -> bool {
    match records.last_mut() {
        Some(last) if last.is_open() => {
            last.end = Some(now.max(last.start));
            true
        }
        _ => false,
    }
}

/// Format seconds as "MM:SS"; minutes keep counting past 99
pub fn format_clock(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, TaskFields};

    const T0: i64 = 1_700_000_000_000;

    fn task_with(records: Vec<TimeRecord>) -> Task {
        let mut task = NewTask {
            quadrant: Quadrant::Q1,
            text: "Focus".to_string(),
            created_at: T0,
            fields: TaskFields::default(),
        }
        .into_task(uuid::Uuid::new_v4(), "me");
        task.time_records = records;
        task
    }

    #[test]
    fn test_open_idle_task() {
        let task = task_with(vec![TimeRecord::closed(T0, T0 + 60_000)]);
        let timer = FocusTimer::open(&task, T0 + 120_000);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.elapsed_secs(), 0);
        assert!(!timer.is_ticking());
    }

    #[test]
    fn test_open_resumes_running_session() {
        let task = task_with(vec![TimeRecord::open(T0)]);
        let timer = FocusTimer::open(&task, T0 + 42_500);
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.elapsed_secs(), 42);
        assert!(timer.is_ticking());
    }

    #[test]
    fn test_sessions_add_up() {
        let task = task_with(Vec::new());
        let mut records = task.time_records.clone();
        let mut timer = FocusTimer::open(&task, T0);

        timer.start(&mut records, T0).unwrap();
        timer.pause(&mut records, T0 + 5_000).unwrap();
        assert_eq!(timer.state(), TimerState::Paused);

        timer.start(&mut records, T0 + 5_000).unwrap();
        timer.stop(&mut records, T0 + 8_000).unwrap();

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.is_open()));
        assert_eq!(timer.total_secs(&records), 8);
    }

    #[test]
    fn test_tick_updates_live_elapsed() {
        let task = task_with(Vec::new());
        let mut records = Vec::new();
        let mut timer = FocusTimer::open(&task, T0);
        timer.start(&mut records, T0).unwrap();

        assert!(!timer.tick(T0 + 500));
        assert!(timer.tick(T0 + 1_000));
        assert_eq!(timer.elapsed_secs(), 1);
        assert!(timer.tick(T0 + 3_200));
        assert_eq!(timer.elapsed_secs(), 3);
        assert_eq!(timer.total_secs(&records), 3);
    }

    #[test]
    fn test_invalid_transitions_leave_records_alone() {
        let task = task_with(Vec::new());
        let mut records = Vec::new();
        let mut timer = FocusTimer::open(&task, T0);

        assert!(matches!(
            timer.pause(&mut records, T0),
            Err(TimerError::InvalidTransition { action: "pause", .. })
        ));
        assert!(timer.stop(&mut records, T0).is_err());

        timer.start(&mut records, T0).unwrap();
        assert!(timer.start(&mut records, T0 + 1).is_err());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_start_refuses_second_open_record() {
        // Idle timer over records that picked up a session elsewhere
        let mut idle = FocusTimer::open(&task_with(Vec::new()), T0);
        let mut records = vec![TimeRecord::open(T0)];
        assert_eq!(
            idle.start(&mut records, T0 + 20_000),
            Err(TimerError::OpenRecordExists)
        );
        assert_eq!(idle.state(), TimerState::Idle);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_close_keeps_session_running() {
        let task = task_with(Vec::new());
        let mut records = Vec::new();
        let mut timer = FocusTimer::open(&task, T0);
        timer.start(&mut records, T0).unwrap();
        timer.close();

        assert!(timer.is_running());
        assert!(!timer.is_ticking());
        assert!(records[0].is_open());
        assert!(!timer.tick(T0 + 5_000));
    }

    #[test]
    fn test_stop_from_paused() {
        let task = task_with(Vec::new());
        let mut records = Vec::new();
        let mut timer = FocusTimer::open(&task, T0);
        timer.start(&mut records, T0).unwrap();
        timer.pause(&mut records, T0 + 2_000).unwrap();
        timer.stop(&mut records, T0 + 9_000).unwrap();
        assert_eq!(records, vec![TimeRecord::closed(T0, T0 + 2_000)]);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(6_000), "100:00");
    }
}
