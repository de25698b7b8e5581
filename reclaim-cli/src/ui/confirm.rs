use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};
use reclaim_core::{CleanupRequest, format_count, format_size};

use super::layout::centered_rect;
use super::theme::Theme;

/// Cleanup confirmation dialog widget
pub struct ConfirmCleanupView<'a> {
    request: &'a CleanupRequest,
    theme: &'a Theme,
}

impl<'a> ConfirmCleanupView<'a> {
    pub fn new(request: &'a CleanupRequest, theme: &'a Theme) -> Self {
        Self { request, theme }
    }
}

impl Widget for ConfirmCleanupView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_rect(50, 10, area);

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(" Clean up? ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.red))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        if inner.height < 3 {
            return;
        }

        let text_style = Style::default().fg(self.theme.fg);
        let value_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(self.theme.green)
            .add_modifier(Modifier::BOLD);

        buf.set_string(inner.x, inner.y, "Permanently remove:", text_style);
        buf.set_string(
            inner.x,
            inner.y + 1,
            format!(
                "{} files, {}",
                format_count(self.request.count),
                format_size(self.request.bytes)
            ),
            value_style,
        );
        if inner.height > 4 {
            buf.set_stringn(
                inner.x,
                inner.y + 3,
                "Files in use are skipped",
                inner.width as usize,
                Style::default().fg(self.theme.fg_muted),
            );
        }

        let hints_y = inner.y + inner.height.saturating_sub(1);
        buf.set_string(inner.x, hints_y, "[y]", key_style);
        buf.set_string(inner.x + 4, hints_y, "Yes, clean", text_style);
        buf.set_string(inner.x + 18, hints_y, "[n]", key_style);
        buf.set_string(inner.x + 22, hints_y, "Cancel", text_style);
    }
}
