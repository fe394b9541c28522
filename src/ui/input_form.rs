use crate::app::{AppState, FormKind, InputFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Label, value and whether the cursor is in it
fn form_fields(form: &InputFormState) -> Vec<(&'static str, &str, bool)> {
    const DEADLINE: &str = "Deadline (YYYY-MM-DD or days, empty for none):";
    match form.kind {
        FormKind::Add => vec![
            ("Task:", form.text.as_str(), form.editing_field == 0),
            (DEADLINE, form.deadline.as_str(), form.editing_field == 1),
        ],
        FormKind::EditText(_) => vec![("Task:", form.text.as_str(), true)],
        FormKind::Deadline(_) => vec![(DEADLINE, form.deadline.as_str(), true)],
        FormKind::Label(_) => vec![("Quadrant label:", form.text.as_str(), true)],
    }
}

/// Render the open input form
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };
    let modal_area = create_modal_area(area, 14);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title_text = match form.kind {
        FormKind::Add => format!(
            " Add Task · {} ",
            app.settings.quadrant_labels.get(app.selected_quadrant)
        ),
        FormKind::EditText(_) => " Edit Task ".to_string(),
        FormKind::Deadline(_) => " Set Deadline ".to_string(),
        FormKind::Label(quadrant) => format!(" Rename {} ", quadrant.to_tag().to_uppercase()),
    };

    let mut lines = vec![Line::raw("")];
    for (label, value, editing) in form_fields(form) {
        lines.push(Line::raw(label));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(value.to_string(), modal_title_style()),
            if editing {
                Span::styled("█", modal_title_style()) // Cursor
            } else {
                Span::raw("")
            },
        ]));
        lines.push(Line::raw(""));
    }

    if let Some(error) = &form.error {
        lines.push(Line::styled(error.clone(), error_style()));
        lines.push(Line::raw(""));
    }

    let instructions = if form.kind == FormKind::Add {
        "Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"
    } else {
        "Enter to submit  ·  Esc to cancel"
    };
    lines.push(Line::raw(instructions));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
