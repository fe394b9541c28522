use crate::app::AppState;
use crate::report::{format_minutes, FocusStats};
use crate::ui::styles::{border_style, default_style, hint_style, quadrant_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the focus time dashboard
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let stats = app.focus_stats();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_day_chart(f, &stats, chunks[0]);
    render_quadrant_breakdown(f, &stats, chunks[1]);
}

fn render_day_chart(f: &mut Frame, stats: &FocusStats, area: Rect) {
    let data: Vec<(&str, u64)> = stats
        .days
        .iter()
        .map(|day| (day.label, day.total_minutes().round() as u64))
        .collect();

    let title = format!(
        " Focus · {} from {} · {} ",
        stats.range.name(),
        stats.start,
        format_minutes(stats.total_minutes)
    );
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        )
        .data(&data)
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));

    f.render_widget(chart, area);
}

/// Minutes per task, grouped by quadrant
fn breakdown_lines(stats: &FocusStats) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for quadrant in &stats.quadrants {
        let total: f64 = quadrant.tasks.iter().map(|t| t.minutes).sum();
        lines.push(Line::from(vec![
            Span::styled(quadrant.label.clone(), quadrant_style(quadrant.quadrant)),
            Span::raw(format!("  {}", format_minutes(total))),
        ]));

        let focused: Vec<_> = quadrant.tasks.iter().filter(|t| t.minutes > 0.0).collect();
        if focused.is_empty() {
            lines.push(Line::styled("  no focus time", hint_style()));
        }
        for task in focused {
            lines.push(Line::styled(
                format!("  {}  {}", task.text, format_minutes(task.minutes)),
                default_style(),
            ));
        }
        lines.push(Line::raw(""));
    }
    lines
}

fn render_quadrant_breakdown(f: &mut Frame, stats: &FocusStats, area: Rect) {
    let paragraph = Paragraph::new(breakdown_lines(stats))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" By Quadrant ", title_style())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, Quadrant, QuadrantLabels, TaskFields, TimeRecord};
    use crate::report::{calculate_focus_stats, StatsRange};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_breakdown_lines() {
        let start = Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap().timestamp_millis();
        let mut task = NewTask {
            quadrant: Quadrant::Q2,
            text: "Study".to_string(),
            created_at: start,
            fields: TaskFields::default(),
        }
        .into_task(uuid::Uuid::new_v4(), "me");
        task.time_records = vec![TimeRecord::closed(start, start + 20 * 60_000)];

        let stats = calculate_focus_stats(
            &[task],
            &QuadrantLabels::default(),
            StatsRange::Today,
            start + 3_600_000,
            &Utc,
        );
        let text: Vec<String> = breakdown_lines(&stats)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(text[0], "Urgent & Important  0min");
        assert_eq!(text[1], "  no focus time");
        assert!(text.contains(&"  Study  20min".to_string()));
    }
}
