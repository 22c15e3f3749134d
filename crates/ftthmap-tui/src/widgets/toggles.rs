//! Filter toggle lines for the sidebar.

use ratatui::text::{Line, Span};

use ftthmap_core::FilterState;

use crate::theme;

/// `[x] a Available` style line. The key is highlighted.
pub fn toggle_line(key: char, label: &'static str, on: bool) -> Line<'static> {
    let (mark, style) = if on {
        ("[x]", theme::toggle_on())
    } else {
        ("[ ]", theme::toggle_off())
    };
    Line::from(vec![
        Span::styled(format!(" {mark} "), style),
        Span::styled(format!("{key} "), theme::key_hint_key()),
        Span::styled(label, style),
    ])
}

/// The four checkbox filters.
pub fn filter_lines(filter: &FilterState) -> Vec<Line<'static>> {
    vec![
        toggle_line('a', "Available", filter.show_available),
        toggle_line('u', "Unavailable", filter.show_unavailable),
        toggle_line('m', "Multiple providers", filter.show_multi_provider),
        toggle_line('s', "Single provider", filter.show_single_provider),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn lines_reflect_state() {
        let filter = FilterState::default().toggle_unavailable();
        let lines: Vec<String> = filter_lines(&filter).iter().map(text).collect();
        assert_eq!(
            lines,
            vec![
                " [x] a Available",
                " [ ] u Unavailable",
                " [x] m Multiple providers",
                " [x] s Single provider",
            ]
        );
    }
}
