use crate::app::AppState;
use crate::domain::{calendar_month, CalendarGrid};
use crate::ui::styles::{
    border_style, default_style, dim_style, done_style, focused_border_style, quadrant_style,
    title_style,
};
use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

fn month_title(year: i32, month: u32) -> String {
    let name = MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    format!(" {} {} ", name, year)
}

/// Render the month grid with tasks on their deadline day
pub fn render_calendar_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let (year, month) = app.calendar_month;
    let grid = calendar_month(app.store.tasks(), year, month, &Local);
    let title = match &grid {
        Some(grid) => month_title(grid.year, grid.month),
        None => month_title(year, month),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(grid) = grid {
        render_grid(f, &grid, Local::now().date_naive(), inner);
    }
}

fn render_grid(f: &mut Frame, grid: &CalendarGrid, today: NaiveDate, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            std::iter::once(Constraint::Length(1))
                .chain(std::iter::repeat(Constraint::Ratio(1, 6)).take(6))
                .collect::<Vec<_>>(),
        )
        .split(area);

    let columns = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 7); 7])
            .split(row)
    };

    for (cell, name) in columns(rows[0]).iter().zip(WEEKDAYS) {
        f.render_widget(Paragraph::new(Line::styled(name, title_style())), *cell);
    }

    for (week, row) in grid.weeks().zip(rows.iter().skip(1)) {
        for (day, cell) in week.iter().zip(columns(*row).iter()) {
            let style = if day.in_month { default_style() } else { dim_style() };
            let border = if day.date == today {
                focused_border_style()
            } else {
                border_style()
            };

            let lines: Vec<Line> = day
                .tasks
                .iter()
                .map(|task| {
                    let text_style = if task.completed {
                        done_style()
                    } else {
                        quadrant_style(task.quadrant)
                    };
                    Line::styled(task.text.clone(), text_style)
                })
                .collect();

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(day.date.format("%d").to_string(), style));
            f.render_widget(Paragraph::new(lines).block(block), *cell);
        }
    }
}
