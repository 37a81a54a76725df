//! Feed view widget - grouped new listings with a Day/Week toggle

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::mode_bar::ModeBar;
use crate::services::novelty::format_price;
use crate::services::report::truncate;
use crate::services::{Aggregator, LoadResult};
use crate::tui::theme::Theme;
use crate::types::{DateBasis, Group, GroupMode, Listing, ParseReport};

/// Maximum content width
const MAX_CONTENT_WIDTH: u16 = 110;

/// Width of the selection marker column ("▸ ")
const MARKER_WIDTH: usize = 2;

/// Groups for both modes, computed once per loaded feed.
/// Toggling the mode only switches which list is read.
#[derive(Debug)]
pub struct FeedData {
    /// Load generation this data came from
    pub version: u64,
    pub source: String,
    pub report: ParseReport,
    day_groups: Vec<Group>,
    week_groups: Vec<Group>,
}

/// One display line of the feed body
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRow<'a> {
    Label(String),
    Item { index: usize, listing: &'a Listing },
    Blank,
}

impl FeedData {
    pub fn from_load(result: LoadResult, basis: DateBasis, version: u64) -> Self {
        let day_groups = Aggregator::group(&result.listings, GroupMode::Day, basis);
        let week_groups = Aggregator::group(&result.listings, GroupMode::Week, basis);
        Self {
            version,
            source: result.source,
            report: result.report,
            day_groups,
            week_groups,
        }
    }

    /// Groups for the given mode, most recent first
    pub fn groups(&self, mode: GroupMode) -> &[Group] {
        match mode {
            GroupMode::Day => &self.day_groups,
            GroupMode::Week => &self.week_groups,
        }
    }

    /// Number of selectable items in the given mode
    pub fn item_count(&self, mode: GroupMode) -> usize {
        Aggregator::item_count(self.groups(mode))
    }

    /// The `index`-th item across all groups of `mode`
    pub fn item(&self, mode: GroupMode, index: usize) -> Option<&Listing> {
        self.groups(mode)
            .iter()
            .flat_map(|g| g.items.iter())
            .nth(index)
    }

    /// Flatten groups into display rows: label, items, blank separator
    pub fn rows(&self, mode: GroupMode) -> Vec<FeedRow<'_>> {
        let mut rows = Vec::new();
        let mut index = 0;
        for (i, group) in self.groups(mode).iter().enumerate() {
            if i > 0 {
                rows.push(FeedRow::Blank);
            }
            rows.push(FeedRow::Label(group.label()));
            for listing in &group.items {
                rows.push(FeedRow::Item { index, listing });
                index += 1;
            }
        }
        rows
    }
}

/// Row position of the `selected` item
pub fn selected_row(rows: &[FeedRow<'_>], selected: usize) -> Option<usize> {
    rows.iter()
        .position(|r| matches!(r, FeedRow::Item { index, .. } if *index == selected))
}

/// First visible row so that `row` stays on screen
pub fn scroll_offset(row: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    (row + 1).saturating_sub(height)
}

/// Feed view widget
pub struct FeedView<'a> {
    data: &'a FeedData,
    mode: GroupMode,
    selected: usize,
    theme: Theme,
    base_url: &'a str,
}

impl<'a> FeedView<'a> {
    pub fn new(data: &'a FeedData, mode: GroupMode, theme: Theme, base_url: &'a str) -> Self {
        Self {
            data,
            mode,
            selected: 0,
            theme,
            base_url,
        }
    }

    pub fn with_selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for FeedView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Apply max width constraint and center the content
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Mode toggle
            Constraint::Length(1), // Separator
            Constraint::Min(1),    // Groups
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Selected link
            Constraint::Length(1), // Summary
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        ModeBar::new(self.mode, self.theme).render(chunks[1], buf);
        self.render_separator(chunks[2], buf);
        self.render_body(chunks[3], buf);
        self.render_separator(chunks[4], buf);
        self.render_link(chunks[5], buf);
        self.render_summary(chunks[6], buf);
        self.render_keybindings(chunks[7], buf);
    }
}

impl FeedView<'_> {
    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &line, Style::default().fg(self.theme.muted()));
    }

    fn render_body(&self, area: Rect, buf: &mut Buffer) {
        let rows = self.data.rows(self.mode);
        if rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "No new listings.",
                Style::default().fg(self.theme.muted()),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let height = area.height as usize;
        let offset = selected_row(&rows, self.selected)
            .map(|row| scroll_offset(row, height))
            .unwrap_or(0);

        for (i, row) in rows.iter().skip(offset).take(height).enumerate() {
            let line_area = Rect {
                x: area.x,
                y: area.y + i as u16,
                width: area.width,
                height: 1,
            };
            match row {
                FeedRow::Label(label) => {
                    Paragraph::new(Line::from(Span::styled(
                        label.clone(),
                        Style::default()
                            .fg(self.theme.date())
                            .add_modifier(Modifier::BOLD),
                    )))
                    .alignment(Alignment::Center)
                    .render(line_area, buf);
                }
                FeedRow::Item { index, listing } => {
                    self.render_item(line_area, buf, listing, *index == self.selected);
                }
                FeedRow::Blank => {}
            }
        }
    }

    /// Title 70% / color 20% / price 10% of the row after the marker
    fn render_item(&self, area: Rect, buf: &mut Buffer, listing: &Listing, is_selected: bool) {
        let rest = (area.width as usize).saturating_sub(MARKER_WIDTH);
        let title_w = rest * 70 / 100;
        let color_w = rest * 20 / 100;
        let price_w = rest.saturating_sub(title_w + color_w);

        let modifier = if is_selected {
            Modifier::BOLD | Modifier::REVERSED
        } else {
            Modifier::empty()
        };
        let marker = if is_selected { "▸ " } else { "  " };

        let spans = vec![
            Span::styled(marker, Style::default().fg(self.theme.accent())),
            Span::styled(
                format!(
                    "{:<w$}",
                    truncate(&listing.title, title_w.saturating_sub(1)),
                    w = title_w
                ),
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(modifier),
            ),
            Span::styled(
                format!(
                    "{:<w$}",
                    truncate(&listing.color, color_w.saturating_sub(1)),
                    w = color_w
                ),
                Style::default()
                    .fg(self.theme.swatch())
                    .add_modifier(modifier),
            ),
            Span::styled(
                format!("{:>w$}", format_price(listing.price), w = price_w),
                Style::default()
                    .fg(self.theme.price())
                    .add_modifier(modifier),
            ),
        ];

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Left)
            .render(area, buf);
    }

    fn render_link(&self, area: Rect, buf: &mut Buffer) {
        let Some(listing) = self.data.item(self.mode, self.selected) else {
            return;
        };
        let link = format!("↗ {}", listing.product_url(self.base_url));
        let link = truncate(&link, area.width as usize);
        Paragraph::new(Line::from(Span::styled(
            link,
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_summary(&self, area: Rect, buf: &mut Buffer) {
        let groups = self.data.groups(self.mode).len();
        let unit = match (self.mode, groups) {
            (GroupMode::Day, 1) => "day",
            (GroupMode::Day, _) => "days",
            (GroupMode::Week, 1) => "week",
            (GroupMode::Week, _) => "weeks",
        };
        let mut spans = vec![Span::styled(
            format!(
                "{} new across {} {}",
                self.data.item_count(self.mode),
                groups,
                unit
            ),
            Style::default().fg(self.theme.muted()),
        )];

        let skipped = self.data.report.skipped();
        if skipped > 0 {
            spans.push(Span::styled(
                format!("  ·  {} rows skipped", skipped),
                Style::default().fg(self.theme.error()),
            ));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let bindings = [
            ("d/w", "Day/Week"),
            ("j/k", "Select"),
            ("r", "Reload"),
            ("?", "Help"),
            ("q", "Quit"),
        ];

        let mut spans = Vec::new();
        for (i, (key, desc)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                key.to_string(),
                Style::default().fg(self.theme.accent()),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(self.theme.muted()),
            ));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
