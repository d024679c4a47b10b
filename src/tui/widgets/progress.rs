use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};

use crate::models::ProgressSummary;
use crate::tui::theme;
use crate::utils::format::{format_percent, plural, progress_bar};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    summary: &ProgressSummary,
    duration_days: u32,
    day_completion: f64,
) {
    let block = Block::default()
        .title(Span::styled(" Progress ", theme::ember()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let ratio = day_completion.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(theme::completion(ratio).bg(theme::BG))
        .ratio(ratio)
        .label(format!("selected day {}", format_percent(ratio)));
    frame.render_widget(gauge, rows[0]);

    // Streak bar fills over the whole challenge length.
    let streak_ratio = summary.current_streak as f64 / duration_days.max(1) as f64;

    let lines = vec![
        Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(progress_bar(streak_ratio, 12), theme::green()),
            Span::styled(
                format!("  {} streak", plural(summary.current_streak, "day")),
                theme::green().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Best: {}  ·  Done: {}/{}",
                summary.longest_streak, summary.completed_days, duration_days
            ),
            theme::dim(),
        )),
        Line::from(Span::styled(
            format!(
                "  Photos: {}  ·  Hit rate: {}",
                summary.photos_taken,
                format_percent(summary.completion_ratio())
            ),
            theme::dim(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), rows[2]);
}
