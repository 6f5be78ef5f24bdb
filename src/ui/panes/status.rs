//! Status bar rendering with keybindings and run state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// Where the current run stands, for the right-hand indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunIndicator {
    Ready,
    Playing,
    Paused,
    Done,
    Cancelled,
    Failed,
}

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub steps: u64,
    pub interval: Duration,
    pub indicator: RunIndicator,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let failed = data.indicator == RunIndicator::Failed;

    // Left side: step count and message
    let left_spans = vec![
        Span::styled(
            format!(" Step {} ", data.steps),
            Style::default()
                .bg(if failed {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}ms ", data.interval.as_millis()),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if failed {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let binds: [(&str, &str); 8] = [
        (" → / 1-9 ", " step "),
        (" ⎵ ", " play "),
        (" ↵ ", " end "),
        (" +/- ", " speed "),
        (" tab ", " algo "),
        (" l ", " layout "),
        (" r/c ", " restart/cancel "),
        ("q", " quit "),
    ];

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in binds.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*desc, desc_style));
    }

    let (label, color) = match data.indicator {
        RunIndicator::Ready => (" READY ", DEFAULT_THEME.success),
        RunIndicator::Playing => (" ▶ PLAYING ", DEFAULT_THEME.secondary),
        RunIndicator::Paused => (" PAUSED ", DEFAULT_THEME.primary),
        RunIndicator::Done => (" SORTED ", DEFAULT_THEME.success),
        RunIndicator::Cancelled => (" CANCELLED ", DEFAULT_THEME.comment),
        RunIndicator::Failed => (" ERROR ", DEFAULT_THEME.error),
    };
    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(Span::styled(
        label,
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
