use std::time::SystemTime;

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};
use reclaim_core::{DiskUsage, SessionSnapshot, SessionState, format_count, format_size};

use super::theme::Theme;

/// Row of cards: reclaimable space, file count, last cleanup, system drive
pub struct StatsCards<'a> {
    snapshot: &'a SessionSnapshot,
    theme: &'a Theme,
}

impl<'a> StatsCards<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, theme: &'a Theme) -> Self {
        Self { snapshot, theme }
    }

    fn card(&self, title: &str, value: &str, note: &str, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 4 {
            return;
        }

        let value_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        buf.set_stringn(inner.x, inner.y, value, inner.width as usize, value_style);

        if inner.height > 1 {
            buf.set_stringn(
                inner.x,
                inner.y + 1,
                note,
                inner.width as usize,
                Style::default().fg(self.theme.fg_muted),
            );
        }
    }
}

impl Widget for StatsCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ])
            .split(area);

        let totals = self.snapshot.display_totals();
        let authoritative =
            self.snapshot.estimate_superseded || self.snapshot.state == SessionState::Scanned;
        let source = match (authoritative, self.snapshot.advisory) {
            (true, _) => scan_note(self.snapshot.last_scan_at),
            (false, Some(_)) => "estimate".to_string(),
            (false, None) => "not scanned yet".to_string(),
        };

        self.card(
            "Reclaimable",
            &format_size(totals.bytes),
            &source,
            cards[0],
            buf,
        );
        self.card("Files", &format_count(totals.count), &source, cards[1], buf);

        let (cleaned, note) = match self.snapshot.last_cleanup {
            Some(result) => (
                format_size(result.cleaned_bytes()),
                format!(
                    "{} removed, {} failed",
                    format_count(result.cleaned_count()),
                    format_count(result.failed_count())
                ),
            ),
            None => ("-".to_string(), "no cleanup yet".to_string()),
        };
        self.card("Last cleanup", &cleaned, &note, cards[2], buf);

        let (free, note) = drive_card(self.snapshot.disk_now, self.snapshot.freed_since_start());
        self.card("System drive", &free, &note, cards[3], buf);
    }
}

fn scan_note(at: Option<SystemTime>) -> String {
    match at {
        Some(at) => format!("scanned {}", DateTime::<Local>::from(at).format("%H:%M:%S")),
        None => "from last scan".to_string(),
    }
}

/// Free space headline and a note with usage and change since start
fn drive_card(now: Option<DiskUsage>, freed: Option<i64>) -> (String, String) {
    let Some(now) = now else {
        return ("-".to_string(), "unavailable".to_string());
    };
    let free = format!("{} free", format_size(now.free));
    let change = match freed {
        Some(delta) if delta > 0 => format!(", +{} since start", format_size(delta as u64)),
        Some(delta) if delta < 0 => format!(", -{} since start", format_size(delta.unsigned_abs())),
        _ => String::new(),
    };
    let note = format!(
        "{:.0}% of {} used{}",
        now.percent_used(),
        format_size(now.total),
        change
    );
    (free, note)
}
