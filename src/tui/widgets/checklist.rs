use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::{DayRecord, Habit, Scoring};
use crate::tui::theme;
use crate::utils::format::{format_amount, format_oz, pad_display, progress_bar};

fn detail(record: &DayRecord, habit: Habit, scoring: &Scoring) -> String {
    match habit {
        Habit::Workouts => format!("{}/2", record.workouts_completed),
        Habit::Water => format!(
            "{} {}",
            progress_bar(record.water_progress_percentage(scoring.goal_water_oz), 8),
            format_oz(record.water_oz)
        ),
        Habit::Sleep => record
            .sleep_hours
            .map(|h| format!("{}h", format_amount(h)))
            .unwrap_or_default(),
        Habit::Supplements => {
            let taken = scoring
                .supplements
                .iter()
                .filter(|s| record.supplements_taken.contains(*s))
                .count();
            if scoring.supplements.is_empty() {
                "none set".to_string()
            } else {
                format!("{}/{}", taken, scoring.supplements.len())
            }
        }
        Habit::Photo if record.photo_locked() => "🔒".to_string(),
        _ => String::new(),
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    record: &DayRecord,
    scoring: &Scoring,
    focused_idx: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(Span::styled(" Today's Tasks ", theme::ember()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let items: Vec<ListItem> = Habit::all()
        .iter()
        .enumerate()
        .map(|(i, habit)| {
            let done = record.is_habit_done(*habit, scoring);
            let partial = *habit == Habit::Workouts && record.workouts_completed == 1;
            let (icon, icon_style) = if done {
                ("●", theme::green())
            } else if partial {
                ("◑", theme::amber())
            } else {
                ("○", theme::dim())
            };

            let name_style = if focused && i == focused_idx {
                theme::ember().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            ListItem::new(Line::from(vec![
                Span::styled("  ", theme::dim()),
                Span::styled(icon, icon_style),
                Span::styled(format!("  {}", pad_display(habit.display_name(), 16)), name_style),
                Span::styled(detail(record, *habit, scoring), theme::dim()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
