use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout
pub struct AppLayout {
    pub header: Rect,
    pub stats: Rect,
    pub progress: Rect,
    pub log: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(4), // Stat cards
                Constraint::Length(4), // Progress
                Constraint::Min(5),    // Log
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            stats: chunks[1],
            progress: chunks[2],
            log: chunks[3],
            footer: chunks[4],
        }
    }
}

/// Centered rectangle of at most `width` x `height` for dialogs
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
