//! Day/Week toggle bar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;
use crate::types::GroupMode;

/// Shortcut key for each mode
pub fn mode_key(mode: GroupMode) -> char {
    match mode {
        GroupMode::Day => 'd',
        GroupMode::Week => 'w',
    }
}

/// Toggle bar showing both modes, the active one bracketed and bold
pub struct ModeBar {
    selected: GroupMode,
    theme: Theme,
}

impl ModeBar {
    pub fn new(selected: GroupMode, theme: Theme) -> Self {
        Self { selected, theme }
    }

    /// Display text for one mode, e.g. "[d:Day]" when active
    fn display(&self, mode: GroupMode) -> String {
        let text = format!("{}:{}", mode_key(mode), mode.label());
        if mode == self.selected {
            format!("[{}]", text)
        } else {
            text
        }
    }
}

impl Widget for ModeBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Total width of all modes plus spacing, for centering
        let total_width: u16 = GroupMode::all()
            .iter()
            .map(|mode| self.display(*mode).len() as u16 + 3)
            .sum::<u16>()
            .saturating_sub(3);

        let mut x = area.x + (area.width.saturating_sub(total_width)) / 2;

        for mode in GroupMode::all() {
            let display = self.display(*mode);
            let display_len = display.len() as u16;
            if x + display_len > area.x + area.width {
                break;
            }

            let style = if *mode == self.selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 3;
        }
    }
}
