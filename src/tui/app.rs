//! Application state and event loop

use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
    DefaultTerminal, Frame,
};
use tracing::debug;

use crate::config::Config;
use crate::services::{DataLoaderService, FeedSource};
use crate::types::{DateBasis, GroupMode};

use super::theme::Theme;
use super::widgets::{
    feed::{FeedData, FeedView},
    help::HelpPopup,
    spinner::{LoadingStage, Spinner},
};

/// Application state
pub enum AppState {
    /// Loading data with spinner animation
    Loading {
        spinner_frame: usize,
        stage: LoadingStage,
    },
    /// Ready with loaded data
    Ready { data: Box<FeedData> },
    /// Error state
    Error { message: String },
}

/// Progress reported by the background loader
#[derive(Debug)]
pub enum LoadMessage {
    Stage(LoadingStage),
    Done(Result<Box<FeedData>, String>),
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    mode: GroupMode,
    day_selected: usize,
    week_selected: usize,
    show_help: bool,
    theme: Theme,
    config: Config,
    /// Incremented on every load request; older results are discarded
    generation: u64,
    reload_requested: bool,
}

impl App {
    /// Create a new app in loading state
    pub fn new(config: Config, theme: Theme) -> Self {
        Self {
            state: AppState::Loading {
                spinner_frame: 0,
                stage: LoadingStage::Fetching,
            },
            should_quit: false,
            mode: config.default_mode,
            day_selected: 0,
            week_selected: 0,
            show_help: false,
            theme,
            config,
            generation: 0,
            reload_requested: false,
        }
    }

    /// Selected item index for the current mode
    fn selected(&self) -> usize {
        match self.mode {
            GroupMode::Day => self.day_selected,
            GroupMode::Week => self.week_selected,
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.mode {
            GroupMode::Day => &mut self.day_selected,
            GroupMode::Week => &mut self.week_selected,
        }
    }

    /// Items available in the current mode (0 unless ready)
    fn item_count(&self) -> usize {
        match &self.state {
            AppState::Ready { data } => data.item_count(self.mode),
            _ => 0,
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.should_quit = true;
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Char('d') => self.mode = GroupMode::Day,
                    KeyCode::Char('w') => self.mode = GroupMode::Week,
                    KeyCode::Tab | KeyCode::BackTab => self.mode = self.mode.toggle(),
                    KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
                    KeyCode::Down | KeyCode::Char('j') => self.select_next(),
                    KeyCode::Home | KeyCode::Char('g') => *self.selected_mut() = 0,
                    KeyCode::End | KeyCode::Char('G') => {
                        *self.selected_mut() = self.item_count().saturating_sub(1);
                    }
                    KeyCode::Char('r') => self.request_reload(),
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }
        }
    }

    fn select_prev(&mut self) {
        let selected = self.selected_mut();
        *selected = selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        let max = self.item_count().saturating_sub(1);
        let selected = self.selected_mut();
        *selected = (*selected + 1).min(max);
    }

    /// Start a new load generation. A load already in flight keeps running
    /// but its result no longer matches and is dropped.
    fn request_reload(&mut self) {
        if matches!(self.state, AppState::Loading { .. }) && self.generation == 0 {
            return;
        }
        self.generation += 1;
        self.reload_requested = true;
        self.state = AppState::Loading {
            spinner_frame: 0,
            stage: LoadingStage::Fetching,
        };
    }

    /// Take a pending reload request, returning its generation
    pub fn take_reload(&mut self) -> Option<u64> {
        if self.reload_requested {
            self.reload_requested = false;
            Some(self.generation)
        } else {
            None
        }
    }

    /// Apply a message from the loader tagged with its generation
    pub fn apply_message(&mut self, generation: u64, message: LoadMessage) {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "dropping superseded load result"
            );
            return;
        }

        match message {
            LoadMessage::Stage(new_stage) => {
                if let AppState::Loading { stage, .. } = &mut self.state {
                    *stage = new_stage;
                }
            }
            LoadMessage::Done(Ok(data)) => {
                let day_max = data.item_count(GroupMode::Day).saturating_sub(1);
                let week_max = data.item_count(GroupMode::Week).saturating_sub(1);
                self.day_selected = self.day_selected.min(day_max);
                self.week_selected = self.week_selected.min(week_max);
                self.state = AppState::Ready { data };
            }
            LoadMessage::Done(Err(message)) => self.state = AppState::Error { message },
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame, .. } = &mut self.state {
            *spinner_frame = Spinner::next_frame(*spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading {
                spinner_frame,
                stage,
            } => {
                Spinner::new(*spinner_frame, *stage, self.theme)
                    .with_source(&self.config.feed)
                    .render(area, buf);
            }
            AppState::Ready { data } => {
                FeedView::new(data, self.mode, self.theme, &self.config.product_base_url)
                    .with_selected(self.selected())
                    .render(area, buf);
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.error()));

                let hint = "r: retry  q: quit";
                let x = area.x + (area.width.saturating_sub(hint.len() as u16)) / 2;
                if y + 2 < area.y + area.height {
                    buf.set_string(x, y + 2, hint, Style::default().fg(self.theme.muted()));
                }
            }
        }

        // Help overlays whichever state is showing
        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(config: Config) -> anyhow::Result<()> {
    // Detect before raw mode; the query needs a cooked terminal
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, config, theme);
    ratatui::restore();
    result
}

/// Fetch, parse and group one feed on a background thread
fn spawn_load(config: &Config, generation: u64, tx: Sender<(u64, LoadMessage)>) {
    let loader = DataLoaderService::new(FeedSource::parse(&config.feed));
    let basis = config.date_basis;
    thread::spawn(move || {
        let _ = tx.send((generation, load_feed(&loader, basis, generation, &tx)));
    });
}

fn load_feed(
    loader: &DataLoaderService,
    basis: DateBasis,
    generation: u64,
    tx: &Sender<(u64, LoadMessage)>,
) -> LoadMessage {
    let source = loader.source();
    let content = match source.fetch() {
        Ok(content) => content,
        Err(e) => return LoadMessage::Done(Err(e.to_string())),
    };

    let _ = tx.send((generation, LoadMessage::Stage(LoadingStage::Parsing)));
    let result = match DataLoaderService::load_from_str(&content, source.to_string()) {
        Ok(result) => result,
        Err(e) => return LoadMessage::Done(Err(e.to_string())),
    };

    let _ = tx.send((generation, LoadMessage::Stage(LoadingStage::Grouping)));
    let data = FeedData::from_load(result, basis, generation);
    LoadMessage::Done(Ok(Box::new(data)))
}

fn run_app(terminal: &mut DefaultTerminal, config: Config, theme: Theme) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<(u64, LoadMessage)>();
    spawn_load(&config, 0, tx.clone());
    let mut app = App::new(config, theme);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if let Some(generation) = app.take_reload() {
            spawn_load(&app.config, generation, tx.clone());
        }

        // Drain loader progress (non-blocking)
        while let Ok((generation, message)) = rx.try_recv() {
            app.apply_message(generation, message);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}
