use crate::app::AppState;
use crate::domain::{format_clock, quadrant_views, DeadlineState, Quadrant, QuadrantView, Task};
use crate::ui::layout::board_grid;
use crate::ui::styles::{
    border_style, default_style, done_style, focused_border_style, hint_style, quadrant_style,
    selected_style, tier_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

const PROGRESS_CELLS: usize = 5;

/// Five-cell progress bar, e.g. "▰▰▱▱▱"
fn progress_bar(progress: u8) -> String {
    let filled = (usize::from(progress.min(100)) * PROGRESS_CELLS + 50) / 100;
    "▰".repeat(filled) + &"▱".repeat(PROGRESS_CELLS - filled)
}

const RING_GLYPHS: [char; 5] = ['○', '◔', '◑', '◕', '●'];

/// Countdown ring filled to `ratio` in quarter steps
fn deadline_ring(ratio: f64) -> char {
    let quarters = (ratio.clamp(0.0, 1.0) * 4.0).round() as usize;
    RING_GLYPHS[quarters.min(RING_GLYPHS.len() - 1)]
}

/// One task row: checkbox, text, progress, countdown and focus time.
/// Format: [ ] Write proposal  ▰▰▱▱▱ 40%  ◔ 3d  ⏱ 25:00
pub fn task_line(task: &Task, deadline: Option<DeadlineState>, quadrant: Option<Quadrant>) -> Line<'static> {
    let mut spans = Vec::new();

    if let Some(quadrant) = quadrant {
        spans.push(Span::styled(
            format!("{} ", quadrant.to_tag().to_uppercase()),
            quadrant_style(quadrant),
        ));
    }

    if task.completed {
        spans.push(Span::raw("[x] "));
        spans.push(Span::styled(task.text.clone(), done_style()));
    } else {
        spans.push(Span::raw("[ ] "));
        spans.push(Span::raw(task.text.clone()));
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("{} {:>3}%", progress_bar(task.progress), task.progress),
        hint_style(),
    ));

    if let Some(state) = deadline {
        spans.push(Span::styled(
            format!("  {} {}d", deadline_ring(state.progress_ratio), state.days_left),
            tier_style(state.color_tier),
        ));
    }

    let focus = task.focus_secs();
    if focus > 0 || task.open_record().is_some() {
        let marker = if task.open_record().is_some() { " ●" } else { "" };
        spans.push(Span::raw(format!("  ⏱ {}{}", format_clock(focus), marker)));
    }

    Line::from(spans)
}

/// Render the four quadrants
pub fn render_board_pane(f: &mut Frame, app: &AppState, area: Rect) {
    for (view, rect) in quadrant_views(app.store.buckets()).into_iter().zip(board_grid(area)) {
        render_quadrant(f, app, view, rect);
    }
}

fn render_quadrant(f: &mut Frame, app: &AppState, view: QuadrantView, area: Rect) {
    let quadrant = view.quadrant;
    let focused = quadrant == app.selected_quadrant;
    let title = format!(
        " {} {} ({} open, {} done) ",
        quadrant.index() + 1,
        app.settings.quadrant_labels.get(quadrant),
        view.active_count(),
        view.completed_count()
    );

    // Active first, then completed, as in `AppState::board_rows`
    let items: Vec<ListItem> = view
        .active
        .iter()
        .map(|task| task_line(task, app.deadline_state(task), None))
        .chain(view.completed.iter().map(|task| task_line(task, None, None)))
        .map(|line| ListItem::new(line).style(default_style()))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            focused_border_style()
        } else {
            border_style()
        })
        .title(Span::styled(title, title_style().patch(quadrant_style(quadrant))));

    let is_empty = items.is_empty();
    let list = List::new(items).block(block).highlight_style(selected_style());

    let mut state = ListState::default();
    if focused && !is_empty {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}
