use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use reclaim_core::{SessionSnapshot, format_size};

use crate::app::AppMode;

use super::theme::Theme;

/// Footer widget showing keyboard hints and freed space
pub struct Footer<'a> {
    mode: AppMode,
    snapshot: &'a SessionSnapshot,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(mode: AppMode, snapshot: &'a SessionSnapshot, theme: &'a Theme) -> Self {
        Self {
            mode,
            snapshot,
            theme,
        }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints: &[(&str, &str)] = match self.mode {
            AppMode::Idle => &[("s", "Scan"), ("↑↓", "Scroll log"), ("?", "Help"), ("q", "Quit")],
            AppMode::Scanning => &[("↑↓", "Scroll log"), ("?", "Help"), ("q", "Quit")],
            AppMode::Scanned => &[
                ("c", "Clean"),
                ("s", "Rescan"),
                ("↑↓", "Scroll log"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            AppMode::ConfirmCleanup => &[("y", "Yes"), ("n", "Cancel")],
            AppMode::Cleaning => &[("↑↓", "Scroll log")],
            AppMode::Help => &[("Esc", "Close help"), ("Ctrl+C", "Quit")],
        };

        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.len() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }

        // Freed space on the right side, once something was cleaned
        if let Some(result) = self.snapshot.last_cleanup
            && result.cleaned_count() > 0
        {
            let freed_text = format!("Freed: {}", format_size(result.cleaned_bytes()));
            let stats_style = Style::default()
                .fg(self.theme.green)
                .add_modifier(Modifier::BOLD);
            let stats_x = area.x + area.width - freed_text.len() as u16 - 1;
            if stats_x > x + 2 {
                buf.set_string(stats_x, area.y, &freed_text, stats_style);
            }
        }
    }
}
