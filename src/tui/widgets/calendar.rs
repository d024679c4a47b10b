use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::DayStatus;
use crate::tui::theme;

const PER_ROW: usize = 7;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    days: &[(NaiveDate, DayStatus)],
    selected: NaiveDate,
    today: NaiveDate,
) {
    let block = Block::default()
        .title(Span::styled(" Calendar ", theme::ember()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ● ", theme::status(DayStatus::Completed)),
            Span::styled("completed   ", theme::dim()),
            Span::styled("✗ ", theme::status(DayStatus::Missed)),
            Span::styled("missed   ", theme::dim()),
            Span::styled("· ", theme::status(DayStatus::Upcoming)),
            Span::styled("upcoming", theme::dim()),
        ]),
        Line::from(""),
    ];

    for (row, week) in days.chunks(PER_ROW).enumerate() {
        let mut spans = vec![Span::styled("  ", theme::dim())];
        for (col, (date, status)) in week.iter().enumerate() {
            let day_no = row * PER_ROW + col + 1;
            let icon = match status {
                DayStatus::Completed => "●",
                DayStatus::Missed => "✗",
                DayStatus::Upcoming => "·",
            };
            let mut style = theme::status(*status);
            if *date == selected {
                style = style.add_modifier(Modifier::REVERSED);
            } else if *date == today {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!("{:>3}{}", day_no, icon), style));
            spans.push(Span::styled("  ", theme::dim()));
        }
        if let Some((first, _)) = week.first() {
            spans.push(Span::styled(first.format(" %b %d").to_string(), theme::dim()));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
