use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::JournalEntry;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[JournalEntry],
    focused_idx: usize,
) {
    let block = Block::default()
        .title(Span::styled(format!(" Journal · {} ", title), theme::ember()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface());

    let mut lines = vec![Line::from("")];
    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Nothing written for this day. [n] new entry",
            theme::dim(),
        )));
    }

    for (i, entry) in entries.iter().enumerate() {
        let title_style = if i == focused_idx {
            theme::ember().add_modifier(Modifier::BOLD)
        } else {
            theme::bold()
        };
        let stamp = entry.created_at.as_deref().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", entry.title), title_style),
            Span::styled(format!("  {}", stamp), theme::dim()),
        ]));
        for body_line in entry.body.lines() {
            lines.push(Line::from(Span::styled(format!("    {}", body_line), theme::dim())));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
