use crate::app::{AppState, PROGRESS_STEP};
use crate::domain::{Quadrant, UiMode, ViewMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Any key acknowledges the last status message
    app.status_message = None;

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask
        | UiMode::EditingTask
        | UiMode::EditingDeadline
        | UiMode::EditingLabel => handle_input_form_mode(app, key),
        UiMode::MovingTask => handle_move_mode(app, key),
        UiMode::Timer => handle_timer_mode(app, key),
    }
}

/// Digit keys 1-4 name quadrants
fn quadrant_key(c: char) -> Option<Quadrant> {
    let digit = c.to_digit(10)? as usize;
    Quadrant::from_index(digit.checked_sub(1)?)
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),

        // Switch view
        KeyCode::Char('v') | KeyCode::Char('V') => app.cycle_view(),

        // Undo
        KeyCode::Char('u') => app.undo_delete(),
        KeyCode::Char('U') => app.undo_complete(),

        KeyCode::Char('r') | KeyCode::Char('R') => app.reload(),

        _ => match app.view_mode {
            ViewMode::Board => handle_board_keys(app, key),
            ViewMode::List => handle_list_keys(app, key),
            ViewMode::Calendar => handle_calendar_keys(app, key),
            ViewMode::Stats => handle_stats_keys(app, key),
        },
    }
    Ok(false)
}

/// Keys acting on the selected task, shared by board and list
fn handle_task_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),

        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_complete(),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_task(),
        KeyCode::Char('d') | KeyCode::Char('D') => app.start_edit_deadline(),

        // Progress
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_progress(PROGRESS_STEP),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_progress(-PROGRESS_STEP),

        // Focus timer
        KeyCode::Char('t') | KeyCode::Char('T') => app.open_timer(),

        // Move to another quadrant
        KeyCode::Char('m') | KeyCode::Char('M') => app.start_move(),

        _ => {}
    }
}

fn handle_board_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        // Reorder within the quadrant
        KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => app.reorder_selected(true),
        KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.reorder_selected(false)
        }

        // Quadrant focus
        KeyCode::Tab => app.next_quadrant(),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(quadrant) = quadrant_key(c) {
                app.select_quadrant(quadrant);
            }
        }

        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('l') | KeyCode::Char('L') => app.start_edit_label(),

        _ => handle_task_keys(app, key),
    }
}

fn handle_list_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') => app.cycle_sort(),
        KeyCode::Char('f') | KeyCode::Char('F') => app.cycle_filter(),
        _ => handle_task_keys(app, key),
    }
}

fn handle_calendar_keys(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('<') | KeyCode::Char(',') => app.shift_calendar(-1),
        KeyCode::Right | KeyCode::Char('>') | KeyCode::Char('.') => app.shift_calendar(1),
        _ => {}
    }
}

fn handle_stats_keys(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('w') | KeyCode::Char('W') = key.code {
        app.toggle_stats_range();
    }
}

/// Handle keys while an input form is open
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => app.submit_input_form(),

        // Cancel form
        KeyCode::Esc => app.cancel_input_form(),

        // Switch between text and deadline
        KeyCode::Tab => app.input_form_toggle_field(),

        KeyCode::Backspace => app.input_form_backspace(),

        // Add character (without Ctrl so Ctrl+C still reaches the terminal)
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_form_add_char(c)
        }

        _ => {}
    }
    Ok(false)
}

/// Handle keys while choosing a target quadrant
fn handle_move_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(quadrant) = quadrant_key(c) {
                app.move_selected_to(quadrant);
            }
        }
        KeyCode::Esc => app.cancel_move(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the timer modal
fn handle_timer_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') => app.timer_start(),
        KeyCode::Char('p') | KeyCode::Char('P') => app.timer_pause(),
        KeyCode::Char('x') | KeyCode::Char('X') => app.timer_stop(),

        // Escape closes the modal; a running session keeps running
        KeyCode::Esc => app.close_timer(),

        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeleteMode, SortKey, StatusFilter, TaskFields, TimerState};
    use crate::persistence::{MemoryBackend, Settings, TaskBackend};
    use crate::store::TaskStore;
    use pretty_assertions::assert_eq;

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    fn create_test_app() -> AppState {
        let backend: Box<dyn TaskBackend> = Box::new(MemoryBackend::new());
        let mut store = TaskStore::new(backend, "me", DeleteMode::Soft);
        store
            .add(Quadrant::Q1, "Test task", TaskFields::default(), fixed_clock())
            .unwrap();
        AppState::new(store, Settings::default(), None).with_clock(fixed_clock)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn press(app: &mut AppState, codes: &[KeyCode]) {
        for code in codes {
            handle_key(app, key(*code)).unwrap();
        }
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_typing_q_in_form_does_not_quit() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Char('a')]);
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!should_quit);
        assert_eq!(app.input_form.as_ref().unwrap().text, "q");
    }

    #[test]
    fn test_handle_add_task() {
        let mut app = create_test_app();
        let initial_count = app.store.len();

        press(&mut app, &[KeyCode::Char('2'), KeyCode::Char('a')]);
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        press(
            &mut app,
            &[
                KeyCode::Char('N'),
                KeyCode::Char('e'),
                KeyCode::Char('w'),
                KeyCode::Enter,
            ],
        );
        assert_eq!(app.store.len(), initial_count + 1);
        assert_eq!(app.store.bucket(Quadrant::Q2)[0].text, "New");
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
    }

    #[test]
    fn test_handle_navigation() {
        let mut app = create_test_app();
        app.store
            .add(Quadrant::Q1, "Task 2", TaskFields::default(), fixed_clock())
            .unwrap();

        press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.selected_index, 1);
        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.selected_index, 0);

        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.selected_quadrant, Quadrant::Q2);
        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(app.selected_quadrant, Quadrant::Q4);
    }

    #[test]
    fn test_handle_delete_and_undo() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Delete]);
        assert_eq!(app.store.len(), 0);

        press(&mut app, &[KeyCode::Char('u')]);
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn test_handle_complete_and_undo() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.selected_task().unwrap().completed);

        press(&mut app, &[KeyCode::Char('U')]);
        assert!(!app.selected_task().unwrap().completed);
    }

    #[test]
    fn test_handle_move_with_digit() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Char('m')]);
        assert_eq!(app.ui_mode, UiMode::MovingTask);

        press(&mut app, &[KeyCode::Char('3')]);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.store.bucket(Quadrant::Q3).len(), 1);
        assert!(app.store.bucket(Quadrant::Q1).is_empty());
    }

    #[test]
    fn test_handle_progress_keys() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('+'), KeyCode::Char('-')]);
        assert_eq!(app.selected_task().unwrap().progress, 10);
    }

    #[test]
    fn test_handle_timer_modal() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Char('t')]);
        assert_eq!(app.ui_mode, UiMode::Timer);

        press(&mut app, &[KeyCode::Char('s')]);
        assert_eq!(app.timer.as_ref().unwrap().state(), TimerState::Running);

        // Escape leaves the session open
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.selected_task().unwrap().open_record().is_some());

        press(&mut app, &[KeyCode::Char('t'), KeyCode::Char('x')]);
        assert!(app.timer.is_none());
        assert!(app.selected_task().unwrap().open_record().is_none());
    }

    #[test]
    fn test_handle_list_keys() {
        let mut app = create_test_app();
        press(&mut app, &[KeyCode::Char('v')]);
        assert_eq!(app.view_mode, ViewMode::List);

        press(&mut app, &[KeyCode::Char('s'), KeyCode::Char('f')]);
        assert_eq!(app.list_sort, SortKey::CreatedDesc);
        assert_eq!(app.list_filter, StatusFilter::Pending);
    }

    #[test]
    fn test_handle_calendar_month_shift() {
        let mut app = create_test_app();
        app.view_mode = ViewMode::Calendar;
        app.calendar_month = (2025, 12);

        press(&mut app, &[KeyCode::Char('>')]);
        assert_eq!(app.calendar_month, (2026, 1));
        press(&mut app, &[KeyCode::Left, KeyCode::Left]);
        assert_eq!(app.calendar_month, (2025, 11));
    }

    #[test]
    fn test_handle_reload_key() {
        let mut app = create_test_app();
        app.view_mode = ViewMode::Stats;
        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.status_message.as_deref(), Some("Reloaded 1 tasks"));
        assert_eq!(app.store.len(), 1);
    }
}
