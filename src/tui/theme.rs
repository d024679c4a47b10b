use ratatui::style::{Color, Modifier, Style};

use crate::models::DayStatus;

pub const BG: Color = Color::Rgb(14, 14, 16);
pub const SURFACE: Color = Color::Rgb(24, 23, 26);
pub const BORDER: Color = Color::Rgb(58, 54, 60);
pub const TEXT: Color = Color::Rgb(226, 222, 216);
pub const TEXT_DIM: Color = Color::Rgb(120, 114, 110);
pub const EMBER: Color = Color::Rgb(214, 72, 48);
pub const GREEN: Color = Color::Rgb(96, 170, 104);
pub const AMBER: Color = Color::Rgb(222, 160, 64);
pub const RED: Color = Color::Rgb(190, 60, 60);
pub const STEEL: Color = Color::Rgb(110, 140, 170);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn ember() -> Style {
    Style::default().fg(EMBER)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn steel() -> Style {
    Style::default().fg(STEEL)
}

pub fn border(focused: bool) -> Style {
    if focused {
        ember()
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn status(status: DayStatus) -> Style {
    match status {
        DayStatus::Completed => green().add_modifier(Modifier::BOLD),
        DayStatus::Missed => red(),
        DayStatus::Upcoming => dim(),
    }
}

/// Green at or above the completed threshold, amber for partial, dim for nothing.
pub fn completion(ratio: f64) -> Style {
    if ratio >= 0.8 {
        green()
    } else if ratio > 0.0 {
        amber()
    } else {
        dim()
    }
}
