use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], flash: Option<&str>) {
    let line = match flash {
        Some(msg) => Line::from(Span::styled(msg.to_string(), theme::amber())),
        None => {
            let mut spans = Vec::new();
            for (key, label) in hints {
                spans.push(Span::styled(key.to_string(), theme::ember()));
                spans.push(Span::styled(format!(" {}  ", label), theme::dim()));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
