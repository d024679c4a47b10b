use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::WindowState;
use crate::tracker::Tracker;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, tracker: &Tracker) {
    let window = tracker.window();
    let selected = tracker.selected();
    let nav = tracker.navigator();

    let left = if nav.can_go_to_previous_day(selected) { "◀ " } else { "  " };
    let right = if nav.can_go_to_next_day(selected) { " ▶" } else { "  " };

    let title_line = Line::from(vec![
        Span::styled(left, theme::dim()),
        Span::styled(
            format!("DAY {}", tracker.selected_day_number()),
            theme::ember().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" / {}", window.duration_days), theme::dim()),
        Span::styled(right, theme::dim()),
    ]);

    let state = window.state(tracker.today());
    let state_style = match state {
        WindowState::Active => theme::green(),
        WindowState::Upcoming => theme::steel(),
        WindowState::Ended => theme::amber(),
    };
    let mut date_spans = vec![
        Span::styled(selected.format("%A, %b %d, %Y").to_string(), theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(state.as_str(), state_style),
    ];
    if selected != tracker.today() {
        date_spans.push(Span::styled("  ·  [t] back to today", theme::dim()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::ember().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, Line::from(""), Line::from(date_spans)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
