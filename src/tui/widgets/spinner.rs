//! Loading screen: feed source, pipeline stage and spinner

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::services::report::truncate;
use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const APP_NAME: &str = "dropfeed";

/// Loading stage for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    Fetching,
    Parsing,
    Grouping,
}

impl LoadingStage {
    pub const ALL: [LoadingStage; 3] = [Self::Fetching, Self::Parsing, Self::Grouping];

    pub fn message(self) -> &'static str {
        match self {
            Self::Fetching => "Fetching feed...",
            Self::Parsing => "Parsing listings...",
            Self::Grouping => "Grouping by day and week...",
        }
    }

    /// Short name for the progress line
    fn step_name(self) -> &'static str {
        match self {
            Self::Fetching => "fetch",
            Self::Parsing => "parse",
            Self::Grouping => "group",
        }
    }
}

/// Loading spinner widget
pub struct Spinner<'a> {
    frame: usize,
    stage: LoadingStage,
    theme: Theme,
    source: Option<&'a str>,
}

impl<'a> Spinner<'a> {
    pub fn new(frame: usize, stage: LoadingStage, theme: Theme) -> Self {
        Self {
            frame,
            stage,
            theme,
            source: None,
        }
    }

    /// Feed being loaded, shown under the stage message
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }

    /// "✓ fetch  ⠹ parse  · group"
    fn progress_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, stage) in LoadingStage::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let (mark, style) = match (*stage as usize).cmp(&(self.stage as usize)) {
                std::cmp::Ordering::Less => ('✓', Style::default().fg(self.theme.text())),
                std::cmp::Ordering::Equal => (
                    self.current_char(),
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                std::cmp::Ordering::Greater => ('·', Style::default().fg(self.theme.muted())),
            };
            spans.push(Span::styled(format!("{} {}", mark, stage.step_name()), style));
        }
        Line::from(spans)
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 6 || area.width < 30 {
            return;
        }

        let [_, name, _, progress, message, source, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        Paragraph::new(Span::styled(
            APP_NAME,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(name, buf);

        Paragraph::new(self.progress_line())
            .alignment(Alignment::Center)
            .render(progress, buf);

        Paragraph::new(Span::styled(
            self.stage.message(),
            Style::default().fg(self.theme.muted()),
        ))
        .alignment(Alignment::Center)
        .render(message, buf);

        if let Some(feed) = self.source {
            Paragraph::new(Span::styled(
                truncate(feed, source.width.saturating_sub(2) as usize),
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(source, buf);
        }
    }
}
