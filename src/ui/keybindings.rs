use crate::app::AppState;
use crate::domain::ViewMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

fn hints_for(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Board => {
            " 1-4/Tab quadrant  ↑/↓ select  Shift+↑/↓ reorder  a add  e edit  Space done  \
             x delete  u/U undo  +/- progress  d deadline  t timer  m move  l label  r reload  v view  q quit"
        }
        ViewMode::List => {
            " ↑/↓ select  Space done  x delete  u/U undo  +/- progress  d deadline  t timer  \
             s sort  f filter  r reload  v view  q quit"
        }
        ViewMode::Calendar => " ←/→ month  u/U undo  v view  q quit",
        ViewMode::Stats => " w today/week  v view  q quit",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let paragraph = Paragraph::new(Line::raw(hints_for(app.view_mode))).style(hint_style());
    f.render_widget(paragraph, area);
}
