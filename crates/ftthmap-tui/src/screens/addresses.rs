//! Addresses screen: table of visible entities with a popup-style detail
//! pane.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use ftthmap_core::{Dataset, FilterState, MarkerColor, VisibleEntity, project};

use crate::action::Action;
use crate::component::Component;
use crate::map_layer::marker_symbol;
use crate::theme;

/// One table row, owned so it survives the projection.
#[derive(Debug, Clone, PartialEq)]
struct AddressRow {
    title: String,
    available: bool,
    providers: String,
    color: MarkerColor,
    symbol: &'static str,
    popup: Vec<String>,
}

impl From<&VisibleEntity<'_>> for AddressRow {
    fn from(v: &VisibleEntity<'_>) -> Self {
        Self {
            title: v.popup.title.clone(),
            available: v.available,
            providers: v.popup.providers.join(", "),
            color: v.style.color,
            symbol: marker_symbol(v.style.radius),
            popup: v.popup.lines(),
        }
    }
}

pub struct AddressesScreen {
    focused: bool,
    dataset: Arc<Dataset>,
    filter: FilterState,
    rows: Vec<AddressRow>,
    table_state: TableState,
    detail_open: bool,
}

impl AddressesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            dataset: Arc::new(Dataset::default()),
            filter: FilterState::default(),
            rows: Vec::new(),
            table_state: TableState::default(),
            detail_open: false,
        }
    }

    fn rebuild(&mut self) {
        let projection = project(&self.dataset.entities, &self.filter);
        self.rows = projection.iter().map(AddressRow::from).collect();

        let selected = match self.table_state.selected() {
            _ if self.rows.is_empty() => None,
            Some(i) => Some(i.min(self.rows.len() - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
        if selected.is_none() {
            self.detail_open = false;
        }
    }

    fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map_or(0, |i| (i + 1).min(self.rows.len() - 1));
        self.table_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if let Some(i) = self.table_state.selected() {
            self.table_state.select(Some(i.saturating_sub(1)));
        }
    }

    fn selected_row(&self) -> Option<&AddressRow> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("Address"),
            Cell::from("FTTH"),
            Cell::from("Providers"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|r| {
                let (ftth, ftth_style) = if r.available {
                    ("yes", Style::default().fg(theme::SUCCESS_GREEN))
                } else {
                    ("no", Style::default().fg(theme::ERROR_RED))
                };
                Row::new(vec![
                    Cell::from(Span::styled(r.symbol, Style::default().fg(theme::marker(r.color)))),
                    Cell::from(r.title.clone()),
                    Cell::from(Span::styled(ftth, ftth_style)),
                    Cell::from(r.providers.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Percentage(50),
                Constraint::Length(5),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Details ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let lines: Vec<Line> = match self.selected_row() {
            Some(row) => row
                .popup
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    if i == 0 {
                        Line::from(Span::styled(
                            text.clone(),
                            Style::default().fg(theme::marker(row.color)),
                        ))
                    } else {
                        Line::from(Span::styled(text.clone(), theme::table_row()))
                    }
                })
                .collect(),
            None => vec![Line::from(Span::styled("Nothing selected", theme::key_hint()))],
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for AddressesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => {
                if !self.rows.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Char('G') | KeyCode::End => {
                if let Some(last) = self.rows.len().checked_sub(1) {
                    self.table_state.select(Some(last));
                }
            }
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected_row().is_some();
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DatasetLoaded(dataset) => {
                self.dataset = Arc::clone(dataset);
                self.rebuild();
            }
            Action::FilterChanged(filter) => {
                self.filter = filter.clone();
                self.rebuild();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Addresses ({}/{}) ",
            self.rows.len(),
            self.dataset.summary.total
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (table_area, detail_area) = if self.detail_open {
            let chunks = Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(table_area);
        self.render_table(frame, layout[0]);

        let hints = Line::from(vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("g/G ", theme::key_hint_key()),
            Span::styled("top/bottom  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("details", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        if let Some(detail_area) = detail_area {
            self.render_detail(frame, detail_area);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Addresses"
    }
}
