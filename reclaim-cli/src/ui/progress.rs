use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};
use reclaim_core::format_count;

use crate::app::{AppMode, AppState};

use super::bar_chart::render_bar;
use super::theme::Theme;

/// Braille spinner characters
pub const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Gauge for the running scan or cleanup
pub struct ProgressView<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> ProgressView<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// (label, percentage) for the current mode
    fn gauge(&self) -> (String, f64) {
        match (self.state.mode, self.state.clean_progress) {
            (AppMode::Cleaning, Some((processed, total))) if total > 0 => (
                format!(
                    "Removing {} / {}",
                    format_count(processed as u64),
                    format_count(total as u64)
                ),
                processed as f64 * 100.0 / total as f64,
            ),
            (AppMode::Cleaning, _) => ("Removing...".to_string(), 0.0),
            (AppMode::Scanning, _) => (
                format!("Scanning {}%", self.state.progress),
                self.state.progress as f64,
            ),
            (AppMode::Scanned | AppMode::ConfirmCleanup, _) => ("Scan complete".to_string(), 100.0),
            _ => ("Waiting".to_string(), 0.0),
        }
    }
}

impl Widget for ProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Progress ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 20 {
            return;
        }

        let (label, percentage) = self.gauge();
        let active = matches!(self.state.mode, AppMode::Scanning | AppMode::Cleaning);

        let mut x = inner.x;
        if active {
            let spinner = SPINNER[self.state.spinner_frame % SPINNER.len()];
            let spinner_style = Style::default()
                .fg(self.theme.blue)
                .add_modifier(Modifier::BOLD);
            buf.set_string(x, inner.y, spinner.to_string(), spinner_style);
            x += 2;
        }
        buf.set_string(x, inner.y, &label, Style::default().fg(self.theme.fg));

        let color = if active { self.theme.blue } else { self.theme.green };
        let bar = render_bar(percentage, inner.width as usize);
        buf.set_string(inner.x, inner.y + 1, &bar, Style::default().fg(color));
    }
}
