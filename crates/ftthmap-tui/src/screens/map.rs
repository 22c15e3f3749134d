//! Map screen: canvas of address markers with a filter sidebar.
//!
//! Every dataset or filter change re-projects from scratch into the
//! [`MapLayer`] and refits the viewport to whatever is visible.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use strum::IntoEnumIterator;
use tui_input::{Input, InputRequest};

use ftthmap_config::MapDefaults;
use ftthmap_core::{Dataset, FilterAction, FilterState, LatLng, SummarySlot, index, present, project};

use crate::action::{Action, Pan};
use crate::component::Component;
use crate::map_layer::MapLayer;
use crate::theme;
use crate::viewport::Viewport;
use crate::widgets::{legend, toggles};

/// Live street search opened with `/`.
#[derive(Default)]
struct StreetSearch {
    input: Input,
    /// Highlighted row among the current matches.
    selected: usize,
}

pub struct MapScreen {
    focused: bool,
    dataset: Arc<Dataset>,
    filter: FilterState,
    layer: MapLayer,
    defaults: MapDefaults,
    viewport: Viewport,
    search: Option<StreetSearch>,
}

impl MapScreen {
    pub fn new(defaults: MapDefaults) -> Self {
        let viewport = home_view(&defaults);
        Self {
            focused: false,
            dataset: Arc::new(Dataset::default()),
            filter: FilterState::default(),
            layer: MapLayer::new(),
            defaults,
            viewport,
            search: None,
        }
    }

    /// Re-project and redraw the marker layer.
    fn refresh(&mut self) {
        let projection = project(&self.dataset.entities, &self.filter);
        let bounds = projection.bounds();
        present(&mut self.layer, &projection, &self.dataset.summary);
        if let Some(bounds) = bounds {
            self.viewport = Viewport::fit(bounds, self.defaults.fit_padding);
        }
    }

    fn fit(&mut self) {
        self.viewport = match self.layer.fit() {
            Some(bounds) if !self.layer.points().is_empty() => {
                Viewport::fit(bounds, self.defaults.fit_padding)
            }
            _ => home_view(&self.defaults),
        };
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        let search = self.search.as_mut()?;
        let matches = index::search(&self.dataset.streets, search.input.value());

        let request = match key.code {
            KeyCode::Esc => {
                self.search = None;
                return None;
            }
            KeyCode::Enter => {
                let picked = matches.get(search.selected).map(|s| (*s).to_owned());
                self.search = None;
                return picked.map(|street| Action::Filter(FilterAction::SelectStreet(street)));
            }
            KeyCode::Up => {
                search.selected = search.selected.saturating_sub(1);
                return None;
            }
            KeyCode::Down => {
                search.selected = (search.selected + 1).min(matches.len().saturating_sub(1));
                return None;
            }
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return None,
        };

        if search.input.handle(request).is_some_and(|changed| changed.value) {
            search.selected = 0;
        }
        None
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_canvas(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(5), // legend
            Constraint::Length(1), // hints
        ])
        .split(area);
        let canvas_area = layout[0];

        let ([west, east], [south, north]) =
            self.viewport.canvas_bounds(canvas_area.width, canvas_area.height);

        let points = self.layer.points();
        let canvas = Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([west, east])
            .y_bounds([south, north])
            .paint(|ctx: &mut Context<'_>| {
                for point in points {
                    ctx.print(
                        point.position.lng,
                        point.position.lat,
                        Span::styled(point.symbol(), Style::default().fg(theme::marker(point.color))),
                    );
                }
            });
        frame.render_widget(canvas, canvas_area);

        if points.is_empty() {
            let message = if self.dataset.is_loaded() {
                "No addresses match the current filters"
            } else {
                "No address data"
            };
            let y_offset = canvas_area.height.saturating_sub(1) / 2;
            let centered = Rect {
                y: canvas_area.y + y_offset,
                height: 1.min(canvas_area.height),
                ..canvas_area
            };
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .style(theme::key_hint()),
                centered,
            );
        }

        let mut legend_lines = legend::legend_lines();
        legend_lines.push(legend::radius_note());
        let legend_area = Rect {
            width: (legend::legend_width() + 1).min(layout[1].width),
            ..layout[1]
        };
        frame.render_widget(Paragraph::new(legend_lines), legend_area);

        let hints = Line::from(vec![
            Span::styled(" ←→↑↓ ", theme::key_hint_key()),
            Span::styled("pan  ", theme::key_hint()),
            Span::styled("+/- ", theme::key_hint_key()),
            Span::styled("zoom  ", theme::key_hint()),
            Span::styled("f ", theme::key_hint_key()),
            Span::styled("fit  ", theme::key_hint()),
            Span::styled(
                format!(
                    "{:.4}, {:.4}",
                    self.viewport.center.lat, self.viewport.center.lng
                ),
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let provider_rows = u16::try_from(self.dataset.providers.len()).unwrap_or(u16::MAX);
        let layout = Layout::vertical([
            Constraint::Length(8),  // filters
            Constraint::Length(8),  // counters
            Constraint::Min(5),     // streets
            Constraint::Length(provider_rows.saturating_add(2).clamp(3, 10)),
        ])
        .split(area);

        self.render_filters(frame, layout[0]);
        self.render_counters(frame, layout[1]);
        self.render_streets(frame, layout[2]);
        self.render_providers(frame, layout[3]);
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Filters ", false);
        let mut lines = toggles::filter_lines(&self.filter);
        lines.push(selection_line(
            "Street",
            self.filter.selected_street.as_deref(),
            "c",
        ));
        lines.push(selection_line(
            "Provider",
            self.filter.selected_provider.as_deref(),
            "P",
        ));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_counters(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Counts ", false);
        let lines: Vec<Line> = SummarySlot::iter()
            .map(|slot| {
                Line::from(vec![
                    Span::styled(format!(" {:<24}", slot.label()), theme::table_row()),
                    Span::styled(
                        format!("{:>6}", self.layer.counter(slot)),
                        theme::title_style(),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_streets(&self, frame: &mut Frame, area: Rect) {
        let query = self.search.as_ref().map_or("", |s| s.input.value());
        let matches = index::search(&self.dataset.streets, query);
        let title = format!(" Streets ({}/{}) ", matches.len(), self.dataset.streets.len());
        let block = panel(&title, self.search.is_some());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(inner);

        let prompt = match self.search {
            Some(ref search) => {
                let cursor = u16::try_from(search.input.visual_cursor()).unwrap_or(u16::MAX);
                let x = layout[0].x.saturating_add(2).saturating_add(cursor);
                frame.set_cursor_position((x.min(layout[0].right().saturating_sub(1)), layout[0].y));
                Line::from(vec![
                    Span::styled("/ ", theme::key_hint_key()),
                    Span::styled(search.input.value().to_owned(), theme::table_row()),
                ])
            }
            None => Line::from(vec![
                Span::styled("/ ", theme::key_hint_key()),
                Span::styled("search  ", theme::key_hint()),
                Span::styled("c ", theme::key_hint_key()),
                Span::styled("clear", theme::key_hint()),
            ]),
        };
        frame.render_widget(Paragraph::new(prompt), layout[0]);

        let selected = match self.search {
            Some(ref search) => Some(search.selected),
            None => self
                .filter
                .selected_street
                .as_deref()
                .and_then(|street| matches.iter().position(|m| *m == street)),
        };
        let items: Vec<ListItem> = matches
            .iter()
            .map(|street| ListItem::new(Span::styled((*street).to_owned(), theme::table_row())))
            .collect();
        let list = List::new(items).highlight_style(theme::table_selected());
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, layout[1], &mut state);
    }

    fn render_providers(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" Providers  p next  P clear ", false);
        let selected = self
            .filter
            .selected_provider
            .as_deref()
            .and_then(|p| self.dataset.providers.iter().position(|q| q == p));
        let items: Vec<ListItem> = self
            .dataset
            .providers
            .iter()
            .map(|p| ListItem::new(Span::styled(p.clone(), theme::table_row())))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(theme::table_selected());
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn home_view(defaults: &MapDefaults) -> Viewport {
    Viewport::at_zoom(LatLng::new(defaults.center_lat, defaults.center_lng), defaults.zoom)
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(title.to_owned())
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

fn selection_line(label: &'static str, value: Option<&str>, clear_key: &'static str) -> Line<'static> {
    let value = match value {
        Some(v) => Span::styled(v.to_owned(), theme::title_style()),
        None => Span::styled("all", theme::key_hint()),
    };
    Line::from(vec![
        Span::styled(format!(" {label}: "), theme::table_row()),
        value,
        Span::styled(format!("  {clear_key} "), theme::key_hint_key()),
        Span::styled("clear", theme::key_hint()),
    ])
}

impl Component for MapScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search.is_some() {
            return Ok(self.handle_search_key(key));
        }

        let action = match key.code {
            KeyCode::Left => Some(Action::Pan(Pan::West)),
            KeyCode::Right => Some(Action::Pan(Pan::East)),
            KeyCode::Up => Some(Action::Pan(Pan::North)),
            KeyCode::Down => Some(Action::Pan(Pan::South)),
            KeyCode::Char('+' | '=') => Some(Action::ZoomIn),
            KeyCode::Char('-') => Some(Action::ZoomOut),
            KeyCode::Char('f') => Some(Action::FitBounds),
            KeyCode::Char('/') => {
                self.search = Some(StreetSearch::default());
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DatasetLoaded(dataset) => {
                self.dataset = Arc::clone(dataset);
                self.refresh();
            }
            Action::FilterChanged(filter) => {
                self.filter = filter.clone();
                self.refresh();
            }
            Action::Pan(direction) => self.viewport.pan(*direction),
            Action::ZoomIn => self.viewport.zoom_in(),
            Action::ZoomOut => self.viewport.zoom_out(),
            Action::FitBounds => self.fit(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Map  ·  {} of {} addresses ",
            self.layer.counter(SummarySlot::Visible),
            self.layer.counter(SummarySlot::Total)
        );
        let block = panel(&title, self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::horizontal([Constraint::Min(20), Constraint::Length(38)]).split(inner);
        self.render_canvas(frame, layout[0]);
        self.render_sidebar(frame, layout[1]);
    }

    fn captures_input(&self) -> bool {
        self.search.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Map"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use ftthmap_core::RawRecord;

    use super::*;

    fn record(street: &str, lat: &str, provider: &str) -> RawRecord {
        RawRecord {
            street_name: street.into(),
            house: "1".into(),
            latitude: Some(lat.into()),
            longitude: Some("76.9".into()),
            is_available: 1,
            provider: provider.into(),
            ..RawRecord::default()
        }
    }

    fn loaded_screen() -> MapScreen {
        let dataset = Dataset::from_records(&[
            record("Abay Ave", "43.20", "telecom"),
            record("Satpayev St", "43.25", "beeline"),
            record("Dostyk St", "43.30", "telecom"),
        ]);
        let mut screen = MapScreen::new(MapDefaults::default());
        screen.update(&Action::DatasetLoaded(Arc::new(dataset))).unwrap();
        screen
    }

    fn press(screen: &mut MapScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn loading_fits_viewport_to_markers() {
        let screen = loaded_screen();
        assert_eq!(screen.layer.points().len(), 3);
        assert!((screen.viewport.center.lat - 43.25).abs() < 1e-9);
    }

    #[test]
    fn search_then_enter_selects_street() {
        let mut screen = loaded_screen();
        assert!(press(&mut screen, KeyCode::Char('/')).is_none());
        assert!(screen.captures_input());

        for c in "st".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Down);
        let action = press(&mut screen, KeyCode::Enter);

        assert!(!screen.captures_input());
        match action {
            Some(Action::Filter(FilterAction::SelectStreet(street))) => {
                assert_eq!(street, "Satpayev St");
            }
            other => panic!("expected SelectStreet, got {other:?}"),
        }
    }

    #[test]
    fn search_escape_selects_nothing() {
        let mut screen = loaded_screen();
        press(&mut screen, KeyCode::Char('/'));
        press(&mut screen, KeyCode::Char('x'));
        assert!(press(&mut screen, KeyCode::Esc).is_none());
        assert!(!screen.captures_input());
    }

    #[test]
    fn enter_with_no_matches_is_a_no_op() {
        let mut screen = loaded_screen();
        press(&mut screen, KeyCode::Char('/'));
        for c in "zzz".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        assert!(press(&mut screen, KeyCode::Enter).is_none());
    }

    #[test]
    fn filter_change_reprojects() {
        let mut screen = loaded_screen();
        let filter = FilterState::default().select_street("Abay Ave");
        screen.update(&Action::FilterChanged(filter)).unwrap();
        assert_eq!(screen.layer.points().len(), 1);
        assert_eq!(screen.layer.counter(SummarySlot::Visible), 1);
        assert_eq!(screen.layer.counter(SummarySlot::Total), 3);
    }

    #[test]
    fn fit_with_nothing_visible_returns_home() {
        let mut screen = loaded_screen();
        let none = FilterState::default().toggle_available().toggle_unavailable();
        screen.update(&Action::FilterChanged(none)).unwrap();
        screen.update(&Action::FitBounds).unwrap();
        assert_eq!(screen.viewport, home_view(&MapDefaults::default()));
    }

    #[test]
    fn arrows_emit_pan_actions() {
        let mut screen = loaded_screen();
        assert!(matches!(
            press(&mut screen, KeyCode::Left),
            Some(Action::Pan(Pan::West))
        ));
        assert!(matches!(press(&mut screen, KeyCode::Char('+')), Some(Action::ZoomIn)));
    }

    #[test]
    fn renders_sidebar_panels() {
        let screen = loaded_screen();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| screen.render(frame, frame.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("Streets (3/3)"));
        assert!(text.contains("Satpayev St"));
        assert!(text.contains("3 of 3 addresses"));
    }
}
