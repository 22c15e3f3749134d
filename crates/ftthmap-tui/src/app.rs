//! Application core: event loop, screen management, action dispatch.
//!
//! The app owns the current [`FilterState`]. Key bindings turn into
//! [`FilterAction`]s, the app applies them, and the resulting state is
//! broadcast to every screen as [`Action::FilterChanged`] so each one
//! re-projects from scratch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ftthmap_config::{MapDefaults, ResolvedDataset};
use ftthmap_core::{DataStore, Dataset, FilterAction, FilterState, project};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Dataset load progress as seen by the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

pub struct App {
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Source to load; taken when the data bridge starts.
    pending_source: Option<ResolvedDataset>,
    origin: String,
    load_status: LoadStatus,
    throbber_state: ThrobberState,
    /// Shared with the data bridge, which loads into it and forwards
    /// every published dataset.
    store: Arc<DataStore>,
    dataset: Arc<Dataset>,
    filter: FilterState,
    /// Visible entity count under the current filter.
    visible: usize,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(resolved: ResolvedDataset, map: MapDefaults) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(map).into_iter().collect();
        let store = Arc::new(DataStore::new());

        Self {
            active_screen: ScreenId::default(),
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            origin: resolved.source.to_string(),
            pending_source: Some(resolved),
            load_status: LoadStatus::default(),
            throbber_state: ThrobberState::default(),
            dataset: store.snapshot(),
            store,
            filter: FilterState::default(),
            visible: 0,
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
            debug!(screen = screen.id(), "screen mounted");
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size()?;
        debug!(width, height, "terminal size");
        self.init_screens()?;

        let cancel = CancellationToken::new();
        if let Some(resolved) = self.pending_source.take() {
            tokio::spawn(data_bridge::spawn_data_bridge(
                resolved,
                Arc::clone(&self.store),
                self.action_tx.clone(),
                cancel.clone(),
            ));
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys first, then filter
    /// bindings, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        // Text entry on the active screen swallows everything else.
        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());
        if !capturing {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                KeyCode::Char(c @ '1'..='9') => {
                    let n = u8::try_from(c).map_or(0, |b| b - b'0');
                    if let Some(screen) = ScreenId::from_number(n) {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                KeyCode::Tab => return Ok(Some(Action::SwitchScreen(self.active_screen.next()))),
                KeyCode::BackTab => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                KeyCode::Esc => return Ok(Some(Action::GoBack)),
                _ => {}
            }

            if let Some(filter_action) =
                filter_action_for(key, &self.filter, &self.dataset.providers)
            {
                return Ok(Some(Action::Filter(filter_action)));
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Process a single action: update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.previous_screen = Some(self.active_screen);
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Tick => {
                if self.load_status == LoadStatus::Loading {
                    self.throbber_state.calc_next();
                }
            }

            Action::Render => {}

            Action::DatasetLoaded(dataset) => {
                info!(
                    entities = dataset.summary.total,
                    streets = dataset.streets.len(),
                    providers = dataset.providers.len(),
                    "dataset loaded"
                );
                self.dataset = Arc::clone(dataset);
                self.load_status = LoadStatus::Loaded;
                self.recount();
                self.broadcast(action)?;
            }

            Action::LoadFailed(reason) => {
                warn!(%reason, "showing empty map after failed load");
                self.load_status = LoadStatus::Failed(reason.clone());
                self.broadcast(action)?;
            }

            Action::Filter(filter_action) => {
                let next = self.filter.clone().apply(filter_action.clone());
                if next != self.filter {
                    debug!(filter = %next.describe(), "filter changed");
                    self.filter = next.clone();
                    self.action_tx.send(Action::FilterChanged(next))?;
                }
            }

            Action::FilterChanged(_) => {
                self.recount();
                self.broadcast(action)?;
            }

            // Viewport actions go to the active screen only.
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn recount(&mut self) {
        self.visible = project(&self.dataset.entities, &self.filter).visible_count();
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Load state, active filters and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        let mut text_area = area;

        match self.load_status {
            LoadStatus::Loading => {
                let label = format!("loading {}", self.origin);
                let width = u16::try_from(label.chars().count() + 3).unwrap_or(u16::MAX);
                let [throbber_area, rest] =
                    Layout::horizontal([Constraint::Length(width), Constraint::Min(0)]).areas(area);
                let throbber = Throbber::default()
                    .label(label)
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                frame.render_stateful_widget(
                    throbber,
                    throbber_area,
                    &mut self.throbber_state.clone(),
                );
                text_area = rest;
            }
            LoadStatus::Loaded => {
                spans.push(Span::styled(
                    format!("● {} of {} visible", self.visible, self.dataset.summary.total),
                    Style::default().fg(theme::SUCCESS_GREEN),
                ));
                if let Some(at) = self.dataset.loaded_at {
                    let local = at.with_timezone(&chrono::Local);
                    spans.push(Span::styled(
                        format!("  loaded {}", local.format("%H:%M:%S")),
                        theme::key_hint(),
                    ));
                }
            }
            LoadStatus::Failed(ref reason) => spans.push(Span::styled(
                format!("✗ {reason}"),
                Style::default().fg(theme::ERROR_RED),
            )),
        }

        let filter_style = if self.filter.is_default() {
            theme::key_hint()
        } else {
            Style::default().fg(theme::ELECTRIC_YELLOW)
        };
        spans.push(Span::styled(" │ ", theme::key_hint()));
        spans.push(Span::styled(self.filter.describe(), filter_style));
        spans.push(Span::styled(" │ ? help  r reset  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), text_area);
    }
}

/// Filter transition bound to `key`, if any.
///
/// `p` steps through providers in sorted order, wrapping back to the
/// first; with no providers loaded it does nothing.
pub fn filter_action_for(
    key: KeyEvent,
    filter: &FilterState,
    providers: &[String],
) -> Option<FilterAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('a') => FilterAction::ToggleAvailable,
        KeyCode::Char('u') => FilterAction::ToggleUnavailable,
        KeyCode::Char('m') => FilterAction::ToggleMultiProvider,
        KeyCode::Char('s') => FilterAction::ToggleSingleProvider,
        KeyCode::Char('c') => FilterAction::ClearStreet,
        KeyCode::Char('P') => FilterAction::ClearProvider,
        KeyCode::Char('r') => FilterAction::Reset,
        KeyCode::Char('p') => FilterAction::SelectProvider(
            next_provider(providers, filter.selected_provider.as_deref())?.to_owned(),
        ),
        _ => return None,
    };
    Some(action)
}

fn next_provider<'a>(providers: &'a [String], current: Option<&str>) -> Option<&'a str> {
    let next = match current.and_then(|c| providers.iter().position(|p| p == c)) {
        Some(i) => (i + 1) % providers.len(),
        None => 0,
    };
    providers.get(next).map(String::as_str)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 56u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(4));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(help_width) / 2,
        area.y + area.height.saturating_sub(help_height) / 2,
        help_width,
        help_height,
    );

    frame.render_widget(Clear, help_area);
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::NEON_CYAN)))
    };
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        section("Filters"),
        key("a / u", "Toggle available / unavailable"),
        key("m / s", "Toggle multi / single provider"),
        key("/", "Search streets, Enter to select"),
        key("c", "Clear street"),
        key("p / P", "Next provider / clear provider"),
        key("r", "Reset all filters"),
        Line::from(""),
        section("Map"),
        key("←→↑↓", "Pan"),
        key("+ / -", "Zoom in / out"),
        key("f", "Fit to visible markers"),
        Line::from(""),
        section("Global"),
        key("1-2 Tab", "Switch screen"),
        key("j/k Enter", "Move / details (Addresses)"),
        key("?", "This help"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("                 Esc or ? to close", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}
