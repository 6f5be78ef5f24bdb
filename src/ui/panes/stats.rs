//! Counters pane

use crate::buffer::Counters;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Data needed to render the stats pane
pub struct StatsRenderData<'a> {
    pub algorithm: &'a str,
    pub layout: &'a str,
    pub seed: u64,
    pub len: usize,
    pub steps: u64,
    pub primary: Counters,
    pub scratch: Option<Counters>,
    pub stack_depth: usize,
    pub max_stack_depth: usize,
    pub state: &'a str,
}

fn row<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

fn counter_rows(counts: &Counters) -> Vec<Line<'static>> {
    vec![
        row("accesses", counts.accesses.to_string()),
        row("reads", counts.reads.to_string()),
        row("writes", counts.writes.to_string()),
        row("compares", counts.compares.to_string()),
        row("swaps", counts.swaps.to_string()),
    ]
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Render the stats pane
pub fn render_stats_pane(frame: &mut Frame, area: Rect, data: StatsRenderData) {
    let block = Block::default()
        .title(" Stats ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let mut lines = vec![
        Line::from(Span::styled(
            data.algorithm,
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD),
        )),
        row("layout", data.layout.to_string()),
        row("seed", data.seed.to_string()),
        row("elements", data.len.to_string()),
        row("state", data.state.to_string()),
        row("steps", data.steps.to_string()),
        row(
            "stack",
            format!("{} (max {})", data.stack_depth, data.max_stack_depth),
        ),
        Line::default(),
    ];

    match data.scratch {
        Some(scratch) => {
            lines.push(heading("Total"));
            lines.extend(counter_rows(&(data.primary + scratch)));
            lines.push(Line::default());
            lines.push(heading("Main"));
            lines.extend(counter_rows(&data.primary));
            lines.push(Line::default());
            lines.push(heading("Scratch"));
            lines.extend(counter_rows(&scratch));
        }
        None => {
            lines.push(heading("Counters"));
            lines.extend(counter_rows(&data.primary));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
