pub mod board_pane;
pub mod calendar_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod stats_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::{UiMode, ViewMode};
use board_pane::render_board_pane;
use calendar_pane::render_calendar_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_move_modal, render_timer_modal};
use ratatui::{text::Line, widgets::Paragraph, Frame};
use stats_pane::render_stats_pane;
use styles::error_style;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);

    match app.view_mode {
        ViewMode::Board => render_board_pane(f, app, layout.content_area),
        ViewMode::List => render_list_pane(f, app, layout.content_area),
        ViewMode::Calendar => render_calendar_pane(f, app, layout.content_area),
        ViewMode::Stats => render_stats_pane(f, app, layout.content_area),
    }

    if let Some(message) = &app.status_message {
        let status = Paragraph::new(Line::raw(format!(" {}", message))).style(error_style());
        f.render_widget(status, layout.status_area);
    }

    match app.ui_mode {
        UiMode::Timer => render_timer_modal(f, app, size),
        UiMode::MovingTask => render_move_modal(f, app, size),
        UiMode::AddingTask
        | UiMode::EditingTask
        | UiMode::EditingDeadline
        | UiMode::EditingLabel => render_input_form(f, app, size),
        UiMode::Normal => {}
    }
}
