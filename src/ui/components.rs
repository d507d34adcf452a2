//! Small shared widgets: progress bars and step dots.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// A fixed-width percent bar out of block characters.
pub fn progress_bar(percent: u8, width: usize, filled: Style, empty: Style) -> Line<'static> {
    let percent = percent.min(100) as usize;
    let filled_cells = (width * percent).div_ceil(100).min(width);
    Line::from(vec![
        Span::styled("█".repeat(filled_cells), filled),
        Span::styled("░".repeat(width - filled_cells), empty),
    ])
}

/// Step indicator dots, the active one stretched.
pub fn step_dots(current: usize, total: usize, active: Style, idle: Style) -> Line<'static> {
    let mut spans = Vec::with_capacity(total * 2);
    for i in 0..total {
        if i == current {
            spans.push(Span::styled("━━━━", active));
        } else {
            spans.push(Span::styled("━", idle));
        }
        if i + 1 < total {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally_and_clamps() {
        let line = progress_bar(50, 10, Style::default(), Style::default());
        assert_eq!(line.spans[0].content, "█████");
        assert_eq!(line.spans[1].content, "░░░░░");

        let full = progress_bar(200, 4, Style::default(), Style::default());
        assert_eq!(full.spans[0].content, "████");
        assert_eq!(full.spans[1].content, "");
    }

    #[test]
    fn any_progress_shows_at_least_one_cell() {
        let line = progress_bar(1, 10, Style::default(), Style::default());
        assert_eq!(line.spans[0].content, "█");
    }
}
