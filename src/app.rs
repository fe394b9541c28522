use crate::domain::{
    annotate, flat_list, now_millis, quadrant_views, DeadlineSpec, DeadlineState, FocusTimer,
    Quadrant, SortKey, StatusFilter, Task, TaskFields, TaskId, TaskPatch, TimeRecord,
    TimerError, UiMode, ValidationError, ViewMode,
};
use crate::persistence::{save_settings, Settings, TaskBackend};
use crate::report::{calculate_focus_stats, FocusStats, StatsRange};
use crate::store::{StoreError, TaskStore, UndoHistory};
use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Store type driven by the terminal UI
pub type AppStore = TaskStore<Box<dyn TaskBackend>>;

/// Progress change per keypress
pub const PROGRESS_STEP: i16 = 10;

/// What an open input form edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// New task in the selected quadrant: text and optional deadline
    Add,
    EditText(TaskId),
    Deadline(TaskId),
    Label(Quadrant),
}

/// Input form state
#[derive(Debug, Clone, PartialEq)]
pub struct InputFormState {
    pub kind: FormKind,
    pub text: String,
    /// "YYYY-MM-DD", a day count, or empty for none
    pub deadline: String,
    pub editing_field: usize, // 0 = text, 1 = deadline (Add only)
    /// Last rejection; the input is kept so it can be fixed
    pub error: Option<String>,
}

impl InputFormState {
    fn new(kind: FormKind, text: String, deadline: String) -> Self {
        Self {
            kind,
            text,
            deadline,
            editing_field: 0,
            error: None,
        }
    }

    fn active_field_mut(&mut self) -> &mut String {
        match (self.kind, self.editing_field) {
            (FormKind::Add, 1) | (FormKind::Deadline(_), _) => &mut self.deadline,
            _ => &mut self.text,
        }
    }
}

/// Parse deadline input: empty clears, a date sets the date form, a number
/// sets the day count
pub fn parse_deadline_input(input: &str) -> Result<Option<DeadlineSpec>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if input.contains('-') && !input.starts_with('-') {
        DeadlineSpec::parse_date(input).map(Some)
    } else {
        DeadlineSpec::parse_days(input).map(Some)
    }
}

/// Message shown in a form the store refused
fn form_error(err: StoreError) -> String {
    if err.is_validation() {
        err.to_string()
    } else {
        format!("Not saved: {}", err)
    }
}

fn deadline_text(task: &Task) -> String {
    match task.deadline_spec() {
        Some(DeadlineSpec::Date(date)) => date.format("%Y-%m-%d").to_string(),
        Some(DeadlineSpec::Days(days)) => days.to_string(),
        None => String::new(),
    }
}

/// Main application state
pub struct AppState {
    pub store: AppStore,
    pub history: UndoHistory,
    pub settings: Settings,
    /// Where settings are saved; `None` keeps them in memory
    pub meta_path: Option<PathBuf>,
    pub view_mode: ViewMode,
    pub ui_mode: UiMode,
    pub selected_quadrant: Quadrant,
    pub selected_index: usize,
    pub list_selected: usize,
    pub list_sort: SortKey,
    pub list_filter: StatusFilter,
    pub calendar_month: (i32, u32),
    pub stats_range: StatsRange,
    pub timer: Option<FocusTimer>,
    pub input_form: Option<InputFormState>,
    pub status_message: Option<String>,
    clock: fn() -> i64,
}

impl AppState {
    pub fn new(store: AppStore, settings: Settings, meta_path: Option<PathBuf>) -> Self {
        let today = Local::now().date_naive();
        Self {
            store,
            history: UndoHistory::new(settings.undo_depth),
            settings,
            meta_path,
            view_mode: ViewMode::Board,
            ui_mode: UiMode::Normal,
            selected_quadrant: Quadrant::Q1,
            selected_index: 0,
            list_selected: 0,
            list_sort: SortKey::Deadline,
            list_filter: StatusFilter::All,
            calendar_month: (today.year(), today.month()),
            stats_range: StatsRange::ThisWeek,
            timer: None,
            input_form: None,
            status_message: None,
            clock: now_millis,
        }
    }

    pub fn now(&self) -> i64 {
        (self.clock)()
    }

    #[cfg(test)]
    pub(crate) fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    fn report_error(&mut self, context: &str, err: impl std::fmt::Display) {
        log::debug!("{}: {}", context, err);
        self.status_message = Some(format!("{}: {}", context, err));
    }

    // ---- views ----

    /// Board rows of a quadrant: active tasks, then completed ones
    pub fn board_rows(&self, quadrant: Quadrant) -> Vec<&Task> {
        let [q1, q2, q3, q4] = quadrant_views(self.store.buckets());
        let view = match quadrant {
            Quadrant::Q1 => q1,
            Quadrant::Q2 => q2,
            Quadrant::Q3 => q3,
            Quadrant::Q4 => q4,
        };
        view.active.into_iter().chain(view.completed).collect()
    }

    pub fn list_rows(&self) -> Vec<&Task> {
        flat_list(self.store.tasks(), self.list_filter, self.list_sort, &Local)
    }

    pub fn deadline_state(&self, task: &Task) -> Option<DeadlineState> {
        annotate(&Local, task, self.now(), self.settings.deadline_policy())
    }

    pub fn focus_stats(&self) -> FocusStats {
        calculate_focus_stats(
            self.store.tasks(),
            &self.settings.quadrant_labels,
            self.stats_range,
            self.now(),
            &Local,
        )
    }

    /// The task under the cursor in the board or list view
    pub fn selected_task(&self) -> Option<&Task> {
        match self.view_mode {
            ViewMode::Board => self
                .board_rows(self.selected_quadrant)
                .get(self.selected_index)
                .copied(),
            ViewMode::List => self.list_rows().get(self.list_selected).copied(),
            ViewMode::Calendar | ViewMode::Stats => None,
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id)
    }

    /// Put the cursor on a task if it is visible in the current view
    fn select_task(&mut self, id: TaskId) {
        match self.view_mode {
            ViewMode::Board => {
                if let Some((quadrant, _)) = self.store.locate(id) {
                    self.selected_quadrant = quadrant;
                    if let Some(index) = self.board_rows(quadrant).iter().position(|t| t.id == id)
                    {
                        self.selected_index = index;
                    }
                }
            }
            ViewMode::List => {
                if let Some(index) = self.list_rows().iter().position(|t| t.id == id) {
                    self.list_selected = index;
                }
            }
            ViewMode::Calendar | ViewMode::Stats => {}
        }
    }

    fn clamp_selection(&mut self) {
        let board_len = self.board_rows(self.selected_quadrant).len();
        self.selected_index = self.selected_index.min(board_len.saturating_sub(1));
        let list_len = self.list_rows().len();
        self.list_selected = self.list_selected.min(list_len.saturating_sub(1));
    }

    // ---- navigation ----

    pub fn cycle_view(&mut self) {
        self.view_mode = self.view_mode.next();
        self.clamp_selection();
    }

    pub fn select_quadrant(&mut self, quadrant: Quadrant) {
        self.selected_quadrant = quadrant;
        self.selected_index = 0;
    }

    pub fn next_quadrant(&mut self) {
        let next = (self.selected_quadrant.index() + 1) % Quadrant::ALL.len();
        self.select_quadrant(Quadrant::ALL[next]);
    }

    pub fn move_selection_up(&mut self) {
        match self.view_mode {
            ViewMode::Board => self.selected_index = self.selected_index.saturating_sub(1),
            ViewMode::List => self.list_selected = self.list_selected.saturating_sub(1),
            _ => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.view_mode {
            ViewMode::Board => {
                let len = self.board_rows(self.selected_quadrant).len();
                if self.selected_index + 1 < len {
                    self.selected_index += 1;
                }
            }
            ViewMode::List => {
                let len = self.list_rows().len();
                if self.list_selected + 1 < len {
                    self.list_selected += 1;
                }
            }
            _ => {}
        }
    }

    pub fn cycle_sort(&mut self) {
        self.list_sort = self.list_sort.next();
        self.list_selected = 0;
    }

    pub fn cycle_filter(&mut self) {
        self.list_filter = self.list_filter.next();
        self.list_selected = 0;
    }

    pub fn shift_calendar(&mut self, delta: i32) {
        let (year, month) = self.calendar_month;
        self.calendar_month = crate::domain::views::shift_month(year, month, delta);
    }

    pub fn toggle_stats_range(&mut self) {
        self.stats_range = self.stats_range.toggle();
    }

    // ---- task mutations ----

    /// Complete the selected task, or reopen it if already completed
    pub fn toggle_complete(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, completed) = (task.id, task.completed);
        let now = self.now();

        let result = if completed {
            self.store.set_completed(id, false)
        } else {
            self.history.complete_task(&mut self.store, id, now)
        };
        match result {
            Ok(task) => self.select_task(task.id),
            Err(e) => self.report_error("Could not update task", e),
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let now = self.now();
        if let Err(e) = self.history.delete_task(&mut self.store, id, now) {
            self.report_error("Could not delete task", e);
        }
        self.clamp_selection();
    }

    pub fn undo_delete(&mut self) {
        let now = self.now();
        match self.history.undo_delete(&mut self.store, now) {
            Ok(Some(task)) => {
                self.status_message = Some(format!("Restored \"{}\"", task.text));
                self.select_task(task.id);
            }
            Ok(None) => {}
            Err(e) => self.report_error("Could not undo delete", e),
        }
    }

    pub fn undo_complete(&mut self) {
        match self.history.undo_complete(&mut self.store) {
            Ok(Some(task)) => {
                self.status_message = Some(format!("Reopened \"{}\"", task.text));
                self.select_task(task.id);
            }
            Ok(None) => {}
            Err(e) => self.report_error("Could not undo completion", e),
        }
    }

    pub fn adjust_progress(&mut self, delta: i16) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let progress = (i16::from(task.progress) + delta).clamp(0, 100) as u8;
        if progress == task.progress {
            return;
        }
        if let Err(e) = self.store.update(id, TaskPatch::progress(progress)) {
            self.report_error("Could not update progress", e);
        }
    }

    pub fn start_move(&mut self) {
        if self.selected_task().is_some() {
            self.ui_mode = UiMode::MovingTask;
        }
    }

    pub fn cancel_move(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    /// Move the selected task to another quadrant and follow it there
    pub fn move_selected_to(&mut self, quadrant: Quadrant) {
        self.ui_mode = UiMode::Normal;
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.move_quadrant(id, quadrant) {
            Ok(task) => {
                self.status_message = Some(format!(
                    "Moved to {}",
                    self.settings.quadrant_labels.get(quadrant)
                ));
                self.select_task(task.id);
            }
            Err(e) => self.report_error("Could not move task", e),
        }
    }

    /// Swap the selected task with its neighbor of the same completion
    /// state in the quadrant's manual order
    pub fn reorder_selected(&mut self, up: bool) {
        if self.view_mode != ViewMode::Board {
            return;
        }
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, completed) = (task.id, task.completed);
        let quadrant = self.selected_quadrant;

        let mut ids: Vec<TaskId> = self.store.bucket(quadrant).iter().map(|t| t.id).collect();
        let Some(from) = ids.iter().position(|i| *i == id) else {
            return;
        };
        let bucket = self.store.bucket(quadrant);
        let neighbor = if up {
            (0..from).rev().find(|&i| bucket[i].completed == completed)
        } else {
            (from + 1..bucket.len()).find(|&i| bucket[i].completed == completed)
        };
        let Some(to) = neighbor else {
            return;
        };
        ids.swap(from, to);

        if let Err(e) = self.store.reorder(quadrant, &ids) {
            self.report_error("Could not reorder", e);
        }
        self.select_task(id);
    }

    // ---- input forms ----

    pub fn start_add_task(&mut self) {
        self.open_form(InputFormState::new(FormKind::Add, String::new(), String::new()));
    }

    pub fn start_edit_task(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let form = InputFormState::new(FormKind::EditText(task.id), task.text.clone(), String::new());
        self.open_form(form);
    }

    pub fn start_edit_deadline(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let form = InputFormState::new(FormKind::Deadline(task.id), String::new(), deadline_text(task));
        self.open_form(form);
    }

    pub fn start_edit_label(&mut self) {
        let quadrant = self.selected_quadrant;
        let label = self.settings.quadrant_labels.get(quadrant).to_string();
        self.open_form(InputFormState::new(FormKind::Label(quadrant), label, String::new()));
    }

    fn open_form(&mut self, form: InputFormState) {
        self.ui_mode = match form.kind {
            FormKind::Add => UiMode::AddingTask,
            FormKind::EditText(_) => UiMode::EditingTask,
            FormKind::Deadline(_) => UiMode::EditingDeadline,
            FormKind::Label(_) => UiMode::EditingLabel,
        };
        self.input_form = Some(form);
    }

    /// Toggle between text and deadline while adding
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            if form.kind == FormKind::Add {
                form.editing_field = (form.editing_field + 1) % 2;
            }
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            form.active_field_mut().push(c);
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.active_field_mut().pop();
        }
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Apply the form. On rejection the form stays open with its input and
    /// the error shown.
    pub fn submit_input_form(&mut self) {
        let Some(mut form) = self.input_form.take() else {
            return;
        };

        match self.apply_form(&form) {
            Ok(()) => {
                self.ui_mode = UiMode::Normal;
            }
            Err(message) => {
                form.error = Some(message);
                self.input_form = Some(form);
            }
        }
    }

    fn apply_form(&mut self, form: &InputFormState) -> Result<(), String> {
        let now = self.now();
        match form.kind {
            FormKind::Add => {
                let deadline = parse_deadline_input(&form.deadline).map_err(|e| e.to_string())?;
                let fields = TaskFields {
                    deadline,
                    ..TaskFields::default()
                };
                let task = self
                    .store
                    .add(self.selected_quadrant, &form.text, fields, now)
                    .map_err(form_error)?;
                self.select_task(task.id);
            }
            FormKind::EditText(id) => {
                self.store
                    .update(id, TaskPatch::text(form.text.clone()))
                    .map_err(form_error)?;
            }
            FormKind::Deadline(id) => {
                let deadline = parse_deadline_input(&form.deadline).map_err(|e| e.to_string())?;
                self.store
                    .update(id, TaskPatch::deadline(deadline))
                    .map_err(form_error)?;
            }
            FormKind::Label(quadrant) => {
                if !self.settings.quadrant_labels.set(quadrant, &form.text) {
                    return Err("label must not be empty".to_string());
                }
                if let Some(path) = &self.meta_path {
                    if let Err(e) = save_settings(path, &self.settings) {
                        log::warn!("saving settings failed: {:#}", e);
                        self.status_message = Some(format!("Label kept for this session: {}", e));
                    }
                }
            }
        }
        Ok(())
    }

    // ---- focus timer ----

    /// Open the timer for the selected task, replacing any open timer
    pub fn open_timer(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let timer = FocusTimer::open(task, self.now());
        self.close_timer();
        self.timer = Some(timer);
        self.ui_mode = UiMode::Timer;
    }

    pub fn timer_start(&mut self) {
        self.timer_transition(FocusTimer::start);
    }

    pub fn timer_pause(&mut self) {
        self.timer_transition(|timer, records, now| timer.pause(records, now));
    }

    /// Stop the session and close the timer
    pub fn timer_stop(&mut self) {
        if self.timer_transition(|timer, records, now| timer.stop(records, now)) {
            self.close_timer();
        }
    }

    /// Close the timer without ending a running session
    pub fn close_timer(&mut self) {
        if let Some(timer) = &mut self.timer {
            timer.close();
        }
        self.timer = None;
        if self.ui_mode == UiMode::Timer {
            self.ui_mode = UiMode::Normal;
        }
    }

    /// Run a transition on copies of the timer and the task's records;
    /// both are committed only once the records are saved
    fn timer_transition(
        &mut self,
        transition: impl FnOnce(&mut FocusTimer, &mut Vec<TimeRecord>, i64) -> Result<(), TimerError>,
    ) -> bool {
        let Some(timer) = &self.timer else {
            return false;
        };
        let Some(task) = self.store.get(timer.task_id) else {
            self.status_message = Some("Task no longer exists".to_string());
            self.close_timer();
            return false;
        };

        let mut next = timer.clone();
        let mut records = task.time_records.clone();
        let id = task.id;
        let now = self.now();
        if let Err(e) = transition(&mut next, &mut records, now) {
            self.report_error("Timer", e);
            return false;
        }

        match self.store.update(id, TaskPatch::time_records(records)) {
            Ok(_) => {
                self.timer = Some(next);
                true
            }
            Err(e) => {
                self.report_error("Could not save focus time", e);
                false
            }
        }
    }

    /// Task the open timer belongs to
    pub fn timer_task(&self) -> Option<&Task> {
        self.timer.as_ref().and_then(|t| self.store.get(t.task_id))
    }

    /// Advance the live timer display
    pub fn tick(&mut self) {
        let now = self.now();
        if let Some(timer) = &mut self.timer {
            timer.tick(now);
        }
    }

    /// Release timer resources before exit
    pub fn shutdown(&mut self) {
        self.close_timer();
    }

    /// Reload from the backend, keeping memory on failure
    pub fn reload(&mut self) {
        let owner = self.store.owner_id().to_string();
        match self.store.load(&owner) {
            Ok(()) => {
                self.clamp_selection();
                self.status_message = Some(format!("Reloaded {} tasks", self.store.len()));
            }
            Err(e) => self.report_error("Could not reload", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeleteMode, NewTask, TimerState};
    use crate::persistence::{JsonBackend, MemoryBackend};
    use pretty_assertions::assert_eq;

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    fn create_test_app() -> AppState {
        let backend: Box<dyn TaskBackend> = Box::new(MemoryBackend::new());
        let mut store = TaskStore::new(backend, "me", DeleteMode::Soft);
        for (quadrant, text) in [(Quadrant::Q1, "Task 1"), (Quadrant::Q1, "Task 2")] {
            store
                .add(quadrant, text, TaskFields::default(), fixed_clock())
                .unwrap();
        }
        AppState::new(store, Settings::default(), None).with_clock(fixed_clock)
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.input_form_add_char(c);
        }
    }

    fn board_texts(app: &AppState, quadrant: Quadrant) -> Vec<String> {
        app.board_rows(quadrant).iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.view_mode, ViewMode::Board);
        assert!(app.timer.is_none());
    }

    #[test]
    fn test_move_selection() {
        let mut app = create_test_app();

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = create_test_app();
        app.select_quadrant(Quadrant::Q2);
        app.start_add_task();
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        type_text(&mut app, "Write report");
        app.input_form_toggle_field();
        type_text(&mut app, "3");
        app.submit_input_form();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
        let task = app.selected_task().unwrap();
        assert_eq!(task.text, "Write report");
        assert_eq!(task.days_to_deadline, Some(3));
        assert_eq!(task.quadrant, Quadrant::Q2);
    }

    #[test]
    fn test_invalid_form_keeps_input() {
        let mut app = create_test_app();
        app.start_add_task();
        type_text(&mut app, "Pay rent");
        app.input_form_toggle_field();
        type_text(&mut app, "0");
        app.submit_input_form();

        let form = app.input_form.as_ref().unwrap();
        assert_eq!(form.text, "Pay rent");
        assert_eq!(form.deadline, "0");
        assert!(form.error.is_some());
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn test_complete_and_undo() {
        let mut app = create_test_app();
        app.toggle_complete();

        assert_eq!(board_texts(&app, Quadrant::Q1), vec!["Task 2", "Task 1"]);
        assert_eq!(app.history.complete_depth(), 1);

        app.undo_complete();
        assert!(app.store.tasks().all(|t| !t.completed));
        assert_eq!(app.history.complete_depth(), 0);
    }

    #[test]
    fn test_delete_and_undo() {
        let mut app = create_test_app();
        app.move_selection_down();
        app.delete_selected();
        assert_eq!(board_texts(&app, Quadrant::Q1), vec!["Task 1"]);
        assert_eq!(app.selected_index, 0);

        app.undo_delete();
        assert_eq!(board_texts(&app, Quadrant::Q1), vec!["Task 1", "Task 2"]);
        assert_eq!(app.selected_task().unwrap().text, "Task 2");
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut app = create_test_app();
        for _ in 0..12 {
            app.adjust_progress(PROGRESS_STEP);
        }
        assert_eq!(app.selected_task().unwrap().progress, 100);
        app.adjust_progress(-PROGRESS_STEP);
        assert_eq!(app.selected_task().unwrap().progress, 90);
    }

    #[test]
    fn test_move_follows_task() {
        let mut app = create_test_app();
        app.start_move();
        assert_eq!(app.ui_mode, UiMode::MovingTask);
        app.move_selected_to(Quadrant::Q4);

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.selected_quadrant, Quadrant::Q4);
        assert_eq!(app.selected_task().unwrap().text, "Task 1");
        assert_eq!(board_texts(&app, Quadrant::Q1), vec!["Task 2"]);
    }

    #[test]
    fn test_reorder_selected() {
        let mut app = create_test_app();
        app.move_selection_down();
        app.reorder_selected(true);

        assert_eq!(board_texts(&app, Quadrant::Q1), vec!["Task 2", "Task 1"]);
        assert_eq!(app.selected_index, 0);

        // Already first
        app.reorder_selected(true);
        assert_eq!(board_texts(&app, Quadrant::Q1), vec!["Task 2", "Task 1"]);
    }

    #[test]
    fn test_edit_deadline_and_clear() {
        let mut app = create_test_app();
        app.start_edit_deadline();
        type_text(&mut app, "2030-01-15");
        app.submit_input_form();
        let task = app.selected_task().unwrap();
        assert_eq!(deadline_text(task), "2030-01-15");

        app.start_edit_deadline();
        for _ in 0..10 {
            app.input_form_backspace();
        }
        app.submit_input_form();
        assert!(app.selected_task().unwrap().deadline_spec().is_none());
    }

    #[test]
    fn test_edit_label_in_memory() {
        let mut app = create_test_app();
        app.select_quadrant(Quadrant::Q3);
        app.start_edit_label();
        app.input_form.as_mut().unwrap().text.clear();
        type_text(&mut app, "Delegate");
        app.submit_input_form();
        assert_eq!(app.settings.quadrant_labels.get(Quadrant::Q3), "Delegate");
    }

    #[test]
    fn test_timer_lifecycle_persists_records() {
        let mut app = create_test_app();
        app.open_timer();
        assert_eq!(app.ui_mode, UiMode::Timer);

        app.timer_start();
        assert_eq!(app.timer.as_ref().unwrap().state(), TimerState::Running);
        assert!(app.timer_task().unwrap().open_record().is_some());

        // Second start is rejected and changes nothing
        app.timer_start();
        assert_eq!(app.timer_task().unwrap().time_records.len(), 1);
        assert!(app.status_message.is_some());

        app.timer_pause();
        assert_eq!(app.timer.as_ref().unwrap().state(), TimerState::Paused);
        assert!(app.timer_task().unwrap().open_record().is_none());

        app.timer_stop();
        assert!(app.timer.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_close_timer_keeps_session_open() {
        let mut app = create_test_app();
        app.open_timer();
        app.timer_start();
        app.close_timer();

        assert!(app.timer.is_none());
        let task = app.selected_task().unwrap();
        assert!(task.open_record().is_some());

        // Reopening resumes the running session
        app.open_timer();
        assert_eq!(app.timer.as_ref().unwrap().state(), TimerState::Running);
    }

    #[test]
    fn test_list_view_selection() {
        let mut app = create_test_app();
        app.cycle_view();
        assert_eq!(app.view_mode, ViewMode::List);
        app.list_sort = SortKey::Text;
        app.move_selection_down();
        assert_eq!(app.selected_task().unwrap().text, "Task 2");

        app.cycle_filter();
        assert_eq!(app.list_filter, StatusFilter::Pending);
        assert_eq!(app.list_selected, 0);
    }

    #[test]
    fn test_reload_picks_up_outside_changes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let backend: Box<dyn TaskBackend> = Box::new(JsonBackend::new(&path));
        let mut store = TaskStore::new(backend, "me", DeleteMode::Soft);
        store.load("me").unwrap();
        let mut app = AppState::new(store, Settings::default(), None).with_clock(fixed_clock);
        assert!(app.store.is_empty());

        let outside = NewTask {
            quadrant: Quadrant::Q3,
            text: "Added elsewhere".to_string(),
            created_at: fixed_clock(),
            fields: TaskFields::default(),
        };
        JsonBackend::new(&path).create_task("me", outside).unwrap();

        app.reload();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Reloaded 1 tasks"));

        std::fs::write(&path, "{ broken").unwrap();
        app.reload();
        assert_eq!(app.store.len(), 1);
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Could not reload"));
    }

    #[test]
    fn test_parse_deadline_input() {
        assert_eq!(parse_deadline_input(""), Ok(None));
        assert_eq!(parse_deadline_input("5"), Ok(Some(DeadlineSpec::Days(5))));
        assert!(matches!(
            parse_deadline_input("-3"),
            Err(ValidationError::NonPositiveDays(-3))
        ));
        assert!(matches!(
            parse_deadline_input("2025-13-01"),
            Err(ValidationError::UnparsableDate(_))
        ));
    }
}
