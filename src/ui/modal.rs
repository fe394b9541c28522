use crate::app::AppState;
use crate::domain::{format_clock, Quadrant, TimerState};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style, quadrant_style, timer_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn state_badge(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle => "READY",
        TimerState::Running => "RUNNING",
        TimerState::Paused => "PAUSED",
    }
}

/// Render the focus timer modal
pub fn render_timer_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let (Some(timer), Some(task)) = (&app.timer, app.timer_task()) else {
        return;
    };
    let modal_area = create_modal_area(area, 12);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let state = timer.state();
    let mut lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", task.text)),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("  {}  ", format_clock(timer.elapsed_secs())), modal_title_style()),
            Span::styled(state_badge(state), timer_style(state)),
            Span::raw(if timer.is_ticking() { " ●" } else { "" }),
        ]),
        Line::raw(format!(
            "  Total focus: {}",
            format_clock(timer.total_secs(&task.time_records))
        )),
        Line::raw(""),
    ];

    let mut options = Vec::new();
    if state != TimerState::Running {
        options.push(Span::styled("  [s]", modal_title_style()));
        options.push(Span::raw(" Start "));
    } else {
        options.push(Span::styled("  [p]", modal_title_style()));
        options.push(Span::raw(" Pause "));
    }
    if state != TimerState::Idle {
        options.push(Span::styled(" [x]", modal_title_style()));
        options.push(Span::raw(" Stop "));
    }
    options.push(Span::styled(" [Esc]", modal_title_style()));
    options.push(Span::raw(" Close"));
    lines.push(Line::from(options));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" ⏱ Focus · {} ", app.settings.quadrant_labels.get(timer.quadrant)),
                    modal_title_style(),
                ))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the quadrant picker for moving a task
pub fn render_move_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let modal_area = create_modal_area(area, 10);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let mut lines = vec![Line::raw(""), Line::raw("  Move to:"), Line::raw("")];
    for quadrant in Quadrant::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", quadrant.index() + 1), modal_title_style()),
            Span::styled(
                app.settings.quadrant_labels.get(quadrant).to_string(),
                quadrant_style(quadrant),
            ),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("  [Esc]", modal_title_style()),
        Span::raw(" Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Move Task ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
