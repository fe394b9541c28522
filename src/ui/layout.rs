use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: the active view
/// - Bottom bar: status message (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // View
            Constraint::Length(1), // Status line
        ])
        .split(area);

    MainLayout {
        keybindings_area: chunks[0],
        content_area: chunks[1],
        status_area: chunks[2],
    }
}

/// Split the board into a 2x2 grid: Q1 top-left, Q2 top-right, Q3
/// bottom-left, Q4 bottom-right
pub fn board_grid(area: Rect) -> [Rect; 4] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let split_row = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };
    let top = split_row(rows[0]);
    let bottom = split_row(rows[1]);

    [top[0], top[1], bottom[0], bottom[1]]
}

/// Create centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.content_area.height, 48);
    }

    #[test]
    fn test_board_grid_quadrants() {
        let area = Rect::new(0, 0, 100, 40);
        let [q1, q2, q3, q4] = board_grid(area);

        assert_eq!(q1.y, q2.y);
        assert_eq!(q3.y, q4.y);
        assert!(q3.y > q1.y);
        assert!(q2.x > q1.x);
        assert_eq!(q1.width + q2.width, 100);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 12);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }
}
