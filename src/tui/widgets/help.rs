//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 42;
const POPUP_HEIGHT: u16 = 18;

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, title: &str) {
        let header = Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )]);
        Paragraph::new(header)
            .alignment(Alignment::Left)
            .render(area, buf);
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let sep = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &sep, Style::default().fg(self.theme.muted()));
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" dropfeed v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1), // [0] Padding
            Constraint::Length(1), // [1] View header
            Constraint::Length(1), // [2] Separator
            Constraint::Length(1), // [3] d / w
            Constraint::Length(1), // [4] Tab
            Constraint::Length(1), // [5] Up/Down
            Constraint::Length(1), // [6] g / G
            Constraint::Length(1), // [7] Padding
            Constraint::Length(1), // [8] General header
            Constraint::Length(1), // [9] Separator
            Constraint::Length(1), // [10] r
            Constraint::Length(1), // [11] q/Esc
            Constraint::Length(1), // [12] ?
            Constraint::Length(1), // [13] Padding
            Constraint::Length(1), // [14] Close hint
            Constraint::Min(0),    // Remaining
        ])
        .split(inner);

        self.render_header(chunks[1], buf, "View");
        self.render_separator(chunks[2], buf);
        render_keybinding(chunks[3], buf, "d / w", "Group by Day/Week", self.theme);
        render_keybinding(chunks[4], buf, "Tab", "Toggle grouping", self.theme);
        render_keybinding(chunks[5], buf, "Up/Down or j/k", "Select item", self.theme);
        render_keybinding(chunks[6], buf, "g / G", "First / last item", self.theme);

        self.render_header(chunks[8], buf, "General");
        self.render_separator(chunks[9], buf);
        render_keybinding(chunks[10], buf, "r", "Reload feed", self.theme);
        render_keybinding(chunks[11], buf, "q / Esc", "Quit", self.theme);
        render_keybinding(chunks[12], buf, "?", "Toggle help", self.theme);

        let hint = Line::from(vec![Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )]);
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .render(chunks[14], buf);
    }
}

/// Render a single keybinding line
fn render_keybinding(area: Rect, buf: &mut Buffer, key: &str, desc: &str, theme: Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!("  {:<18}", key),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.text())),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Left)
        .render(area, buf);
}
