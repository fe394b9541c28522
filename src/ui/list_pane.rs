use crate::app::AppState;
use crate::ui::board_pane::task_line;
use crate::ui::styles::{border_style, default_style, selected_style, title_style};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render every task in one list, filtered and sorted
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let rows = app.list_rows();

    let items: Vec<ListItem> = rows
        .iter()
        .map(|task| {
            let deadline = if task.completed {
                None
            } else {
                app.deadline_state(task)
            };
            ListItem::new(task_line(task, deadline, Some(task.quadrant))).style(default_style())
        })
        .collect();

    let title = format!(
        " All Tasks ({}) · sort: {} · filter: {} ",
        rows.len(),
        app.list_sort.name(),
        app.list_filter.name()
    );
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        )
        .highlight_style(selected_style());

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.list_selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
