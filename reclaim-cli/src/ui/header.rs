use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, AppState};

use super::progress::SPINNER;
use super::theme::Theme;

/// Header widget showing title, status and elevation badge
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn status(&self) -> String {
        let spinner = SPINNER[self.state.spinner_frame % SPINNER.len()];
        match self.state.mode {
            AppMode::Scanning => format!("{} Scanning {}%", spinner, self.state.progress),
            AppMode::Cleaning => format!("{} Cleaning", spinner),
            AppMode::Scanned | AppMode::ConfirmCleanup => "Scan complete".to_string(),
            AppMode::Idle | AppMode::Help if self.state.is_estimating() => {
                format!("{} Estimating", spinner)
            }
            AppMode::Idle | AppMode::Help => "Idle".to_string(),
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 1 {
            return;
        }

        // Title
        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, "RECLAIM", title_style);

        buf.set_string(
            area.x + 9,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        let status_style = match self.state.mode {
            AppMode::Scanning | AppMode::Cleaning => Style::default().fg(self.theme.yellow),
            _ => Style::default().fg(self.theme.fg_dim),
        };
        buf.set_string(area.x + 11, area.y, self.status(), status_style);

        // Elevation badge (right-aligned)
        let (badge, color) = if self.state.elevated {
            (" ADMIN ", self.theme.green)
        } else {
            (" LIMITED ", self.theme.yellow)
        };
        let badge_style = Style::default()
            .fg(self.theme.bg)
            .bg(color)
            .add_modifier(Modifier::BOLD);
        let badge_x = area.x + area.width - badge.len() as u16 - 1;
        buf.set_string(badge_x, area.y, badge, badge_style);
    }
}
