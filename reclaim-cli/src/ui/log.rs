use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};
use reclaim_core::LogLine;

use super::theme::Theme;

/// Widest tag label, used to align the text column
const TAG_WIDTH: usize = 13;

/// Scrolling pane of tagged log lines, newest at the bottom
pub struct LogView<'a> {
    lines: &'a VecDeque<LogLine>,
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> LogView<'a> {
    pub fn new(lines: &'a VecDeque<LogLine>, scroll: usize, theme: &'a Theme) -> Self {
        Self {
            lines,
            scroll,
            theme,
        }
    }
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.scroll > 0 {
            format!(" Log (-{}) ", self.scroll)
        } else {
            " Log ".to_string()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width <= TAG_WIDTH as u16 {
            return;
        }

        let height = inner.height as usize;
        let end = self.lines.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(height);
        let text_width = inner.width as usize - TAG_WIDTH;

        for (row, line) in self.lines.range(start..end).enumerate() {
            let y = inner.y + row as u16;
            let tag_style = Style::default()
                .fg(self.theme.tag_color(line.tag))
                .add_modifier(Modifier::BOLD);
            buf.set_string(
                inner.x,
                y,
                format!("[{}]", line.tag.label()),
                tag_style,
            );
            buf.set_stringn(
                inner.x + TAG_WIDTH as u16,
                y,
                &line.text,
                text_width,
                Style::default().fg(self.theme.fg),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_core::LogTag;

    /// Content columns of one row, between border and padding
    fn row_text(buf: &Buffer, y: u16) -> String {
        (2..buf.area.width - 2)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_widest_tag_keeps_a_gap() {
        let lines: VecDeque<LogLine> =
            [LogLine::new(LogTag::Background, "Estimating")].into_iter().collect();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);

        LogView::new(&lines, 0, &theme).render(area, &mut buf);

        let row = row_text(&buf, 1);
        assert_eq!(&row[..13], "[background] ");
        assert_eq!(&row[13..23], "Estimating");
    }

    #[test]
    fn test_tag_width_fits_every_label() {
        let tags = [
            LogTag::System,
            LogTag::Background,
            LogTag::Scan,
            LogTag::Found,
            LogTag::Warning,
            LogTag::Done,
            LogTag::Stats,
            LogTag::Service,
            LogTag::Cleaned,
            LogTag::Trash,
        ];
        for tag in tags {
            assert!(tag.label().len() + 2 < TAG_WIDTH, "{:?}", tag);
        }
    }
}
