//! Bar chart of a buffer's slots
//!
//! One bar per slot, height proportional to the value. When the pane is
//! narrower than the buffer, adjacent slots are folded into one column that
//! shows the tallest value and the strongest live highlight among them.

use crate::ui::highlight::{Highlight, Highlights, Pane};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};
use std::time::Instant;

/// Data needed to render a bars pane
pub struct BarsRenderData<'a> {
    pub title: &'a str,
    pub slots: &'a [Option<u32>],
    pub pane: Pane,
    pub highlights: &'a Highlights,
    /// Tallest possible value, so every pane uses the same scale
    pub max_value: u32,
    /// Color every bar as sorted
    pub finished: bool,
    pub now: Instant,
}

/// A display column covering one or more slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub value: Option<u32>,
    pub highlight: Option<Highlight>,
}

/// Fold `slots` into at most `width` columns
pub fn fold_columns(
    slots: &[Option<u32>],
    width: usize,
    mut highlight_at: impl FnMut(usize) -> Option<Highlight>,
) -> Vec<Column> {
    if slots.is_empty() || width == 0 {
        return Vec::new();
    }
    let per_column = slots.len().div_ceil(width);

    slots
        .chunks(per_column)
        .enumerate()
        .map(|(c, chunk)| {
            let first = c * per_column;
            Column {
                value: chunk.iter().flatten().max().copied(),
                highlight: (first..first + chunk.len()).filter_map(&mut highlight_at).max(),
            }
        })
        .collect()
}

fn bar_style(column: &Column, finished: bool) -> Style {
    let color = match (column.value, column.highlight) {
        (None, _) => DEFAULT_THEME.bar_empty,
        (_, Some(Highlight::Change)) => DEFAULT_THEME.bar_change,
        (_, Some(Highlight::Compare)) => DEFAULT_THEME.bar_compare,
        (_, Some(Highlight::Access)) => DEFAULT_THEME.bar_access,
        (_, None) if finished => DEFAULT_THEME.bar_sorted,
        (_, None) => DEFAULT_THEME.bar,
    };
    Style::default().fg(color)
}

/// Render the bars pane
pub fn render_bars_pane(frame: &mut Frame, area: Rect, data: BarsRenderData) {
    let block = Block::default()
        .title(format!(" {} ({}) ", data.title, data.slots.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let inner_width = area.width.saturating_sub(2) as usize;
    let columns = fold_columns(data.slots, inner_width, |i| {
        data.highlights.get(data.pane, i, data.now)
    });

    // Widest bars that still fit, with a one-cell gap when there is room
    let n = columns.len().max(1);
    let gap = if n * 2 <= inner_width { 1 } else { 0 };
    let bar_width = ((inner_width + gap) / n).saturating_sub(gap).max(1);

    let bars: Vec<Bar> = columns
        .iter()
        .map(|column| {
            // Value 0 still gets a sliver
            let height = column.value.map_or(0, |v| u64::from(v) + 1);
            Bar::default()
                .value(height)
                .text_value(String::new())
                .style(bar_style(column, data.finished))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width as u16)
        .bar_gap(gap as u16)
        .max(u64::from(data.max_value) + 1)
        .value_style(Style::default().add_modifier(Modifier::HIDDEN));

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_keeps_one_column_per_slot_when_wide() {
        let slots = [Some(3), None, Some(1)];
        let columns = fold_columns(&slots, 10, |_| None);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1].value, None);
    }

    #[test]
    fn test_fold_takes_max_value_and_strongest_highlight() {
        let slots = [Some(1), Some(7), Some(4), Some(2)];
        let columns = fold_columns(&slots, 2, |i| match i {
            0 => Some(Highlight::Access),
            1 => Some(Highlight::Change),
            _ => None,
        });
        assert_eq!(
            columns,
            vec![
                Column { value: Some(7), highlight: Some(Highlight::Change) },
                Column { value: Some(4), highlight: None },
            ]
        );
    }
}
