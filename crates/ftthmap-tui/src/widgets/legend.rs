//! Marker legend: one line per marker color.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use strum::IntoEnumIterator;

use ftthmap_core::{MarkerColor, MarkerStyle};

use crate::map_layer::marker_symbol;
use crate::theme;

/// Legend lines, in the same order the web map lists them.
pub fn legend_lines() -> Vec<Line<'static>> {
    MarkerColor::iter()
        .map(|color| {
            let radius = match color {
                MarkerColor::MultiAvailable | MarkerColor::MultiUnavailable => {
                    MarkerStyle::MULTI_RADIUS
                }
                MarkerColor::SingleAvailable | MarkerColor::SingleUnavailable => {
                    MarkerStyle::SINGLE_RADIUS
                }
            };
            let symbol = marker_symbol(radius);
            Line::from(vec![
                Span::styled(format!(" {symbol} "), Style::default().fg(theme::marker(color))),
                Span::styled(color.label(), theme::table_row()),
            ])
        })
        .collect()
}

/// Width needed to show the legend without truncation.
pub fn legend_width() -> u16 {
    let widest = MarkerColor::iter().map(|c| c.label().chars().count()).max().unwrap_or(0);
    u16::try_from(widest + 3).unwrap_or(u16::MAX)
}

/// Radius note shown under the legend.
pub fn radius_note() -> Line<'static> {
    Line::from(Span::styled(
        format!(
            " radius {}px multi / {}px single",
            MarkerStyle::MULTI_RADIUS,
            MarkerStyle::SINGLE_RADIUS
        ),
        theme::key_hint(),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn one_line_per_marker_color() {
        let lines = legend_lines();
        assert_eq!(lines.len(), 4);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, format!(" ● {}", MarkerColor::MultiAvailable.label()));
    }

    #[test]
    fn width_fits_longest_label() {
        let longest = legend_lines()
            .iter()
            .map(ratatui::text::Line::width)
            .max()
            .unwrap_or(0);
        assert_eq!(usize::from(legend_width()), longest);
    }
}
