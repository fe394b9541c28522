use crate::domain::{ColorTier, Quadrant, TimerState};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Border of the quadrant that has focus
pub fn focused_border_style() -> Style {
    Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Days outside the shown month
pub fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Countdown color for a deadline tier
pub fn tier_style(tier: ColorTier) -> Style {
    let color = match tier {
        ColorTier::Urgent => Color::Red,
        ColorTier::Warning => Color::Yellow,
        ColorTier::Notice => Color::LightBlue,
        ColorTier::Safe => Color::Green,
    };
    Style::default().fg(color)
}

/// Accent color of a quadrant
pub fn quadrant_style(quadrant: Quadrant) -> Style {
    let color = match quadrant {
        Quadrant::Q1 => Color::Red,
        Quadrant::Q2 => Color::Yellow,
        Quadrant::Q3 => Color::Blue,
        Quadrant::Q4 => Color::Green,
    };
    Style::default().fg(color)
}

/// Timer status badge style
pub fn timer_style(state: TimerState) -> Style {
    match state {
        TimerState::Running => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        TimerState::Paused => Style::default().fg(Color::Yellow),
        TimerState::Idle => Style::default().fg(Color::Gray),
    }
}
