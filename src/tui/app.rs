use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::time::{Duration, Instant};

use crate::db::repository::JournalRepo;
use crate::models::{Direction, Habit, JournalEntry};
use crate::tracker::Tracker;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{calendar, checklist, header, journal, progress, statusbar};
use crate::utils::format::format_amount;

const TICK_RATE: Duration = Duration::from_millis(100);
const QUICK_WATER_OZ: f64 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Calendar,
    Journal,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Water,
    JumpToDay,
    JournalEntry,
}

impl InputMode {
    fn title(&self) -> &'static str {
        match self {
            InputMode::Normal => "",
            InputMode::Water => " Add Water (oz) ",
            InputMode::JumpToDay => " Jump to Day ",
            InputMode::JournalEntry => " New Journal Entry ",
        }
    }
}

pub struct App {
    pub view: View,
    pub tracker: Tracker,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub flash: Option<String>,

    // Journal entries for the selected day, refreshed on navigation
    pub journal: Vec<JournalEntry>,
    pub journal_idx: usize,
}

impl App {
    pub fn new(tracker: Tracker) -> Self {
        App {
            view: View::Dashboard,
            tracker,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            flash: None,
            journal: Vec::new(),
            journal_idx: 0,
        }
    }

    pub fn load_journal(&mut self, conn: &Connection) {
        match JournalRepo::list_for_date(conn, self.tracker.selected()) {
            Ok(entries) => self.journal = entries,
            Err(e) => {
                log::warn!("loading journal failed: {}", e);
                self.flash = Some("Couldn't load journal entries".to_string());
            }
        }
        self.journal_idx = self.journal_idx.min(self.journal.len().saturating_sub(1));
    }

    pub fn tick(&mut self, conn: &Connection) {
        self.tracker.set_today(Local::now().date_naive());
        self.tracker.flush_due(conn, Instant::now());
    }

    pub fn shutdown(&mut self, conn: &Connection) {
        self.tracker.flush_all(conn);
        if self.tracker.has_pending_writes() {
            log::error!("exiting with unsaved changes");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.flash = None;
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key, conn),
            _ => self.handle_input_key(key, conn),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Keys shared by every view
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => return self.navigate(Direction::Previous, conn),
            KeyCode::Right | KeyCode::Char('l') => return self.navigate(Direction::Next, conn),
            KeyCode::Char('t') => {
                self.tracker.go_to_today();
                self.load_journal(conn);
                return;
            }
            KeyCode::Char('g') => return self.open_input(InputMode::JumpToDay),
            _ => {}
        }

        match self.view {
            View::Dashboard => self.handle_dashboard_key(key, conn),
            View::Calendar => match key.code {
                KeyCode::Esc | KeyCode::Char('c') | KeyCode::Enter => self.view = View::Dashboard,
                _ => {}
            },
            View::Journal => self.handle_journal_key(key, conn),
            View::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.view = View::Dashboard,
                _ => {}
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, _conn: &Connection) {
        let now = Instant::now();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Char('c') => self.view = View::Calendar,
            KeyCode::Char('j') => self.view = View::Journal,
            KeyCode::Up => self.focus_idx = self.focus_idx.saturating_sub(1),
            KeyCode::Down => {
                if self.focus_idx + 1 < Habit::all().len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let habit = Habit::all()[self.focus_idx];
                let changed = self
                    .tracker
                    .update_selected(now, |r, s| r.toggle_habit(habit, s));
                if !changed {
                    self.flash = Some(self.unchanged_reason(habit));
                }
            }
            KeyCode::Char('+') => {
                if !self.tracker.update_selected(now, |r, _| r.increment_workouts()) {
                    self.flash = Some("Already logged two workouts".to_string());
                }
            }
            KeyCode::Char('-') => {
                self.tracker.update_selected(now, |r, _| r.decrement_workouts());
            }
            KeyCode::Char('W') => {
                self.tracker
                    .update_selected(now, |r, _| r.add_water(QUICK_WATER_OZ));
            }
            KeyCode::Char('w') => self.open_input(InputMode::Water),
            _ => {}
        }
    }

    fn handle_journal_key(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('j') => self.view = View::Dashboard,
            KeyCode::Char('n') => self.open_input(InputMode::JournalEntry),
            KeyCode::Up => self.journal_idx = self.journal_idx.saturating_sub(1),
            KeyCode::Down => {
                if self.journal_idx + 1 < self.journal.len() {
                    self.journal_idx += 1;
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.journal.get(self.journal_idx).and_then(|e| e.id) {
                    if let Err(e) = JournalRepo::delete(conn, id) {
                        log::warn!("deleting journal entry {} failed: {}", id, e);
                        self.flash = Some("Couldn't delete entry".to_string());
                    }
                    self.load_journal(conn);
                }
            }
            _ => {}
        }
    }

    fn unchanged_reason(&self, habit: Habit) -> String {
        match habit {
            Habit::Photo => "Photo captured for this day is locked".to_string(),
            _ if self.tracker.selected() > self.tracker.today() => {
                "This day hasn't arrived yet".to_string()
            }
            _ => "Nothing to change".to_string(),
        }
    }

    fn navigate(&mut self, direction: Direction, conn: &Connection) {
        if self.tracker.go(direction) {
            self.load_journal(conn);
        }
    }

    fn open_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input_buffer.clear();
        self.input_error = None;
    }

    fn close_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.input_error = None;
    }

    fn handle_input_key(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => self.close_input(),
            KeyCode::Enter => self.submit_input(conn),
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) => {
                let accepted = match self.input_mode {
                    InputMode::Water => c.is_ascii_digit() || c == '.',
                    InputMode::JumpToDay => c.is_ascii_digit(),
                    _ => true,
                };
                if accepted {
                    self.input_buffer.push(c);
                    self.input_error = None;
                }
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, conn: &Connection) {
        let trimmed = self.input_buffer.trim().to_string();
        if trimmed.is_empty() {
            self.input_error = Some("Type something first".to_string());
            return;
        }

        match self.input_mode {
            InputMode::Water => match trimmed.parse::<f64>() {
                Ok(oz) if oz > 0.0 => {
                    self.tracker.update_selected(Instant::now(), |r, _| r.add_water(oz));
                    self.close_input();
                }
                _ => self.input_error = Some(format!("'{}' is not a positive amount", trimmed)),
            },
            InputMode::JumpToDay => {
                let ok = trimmed
                    .parse::<u32>()
                    .map(|n| self.tracker.jump_to_day(n))
                    .unwrap_or(false);
                if ok {
                    self.load_journal(conn);
                    self.close_input();
                } else {
                    self.input_error = Some(format!(
                        "Pick a day from 1 to {} that has already started",
                        self.tracker.window().duration_days
                    ));
                }
            }
            InputMode::JournalEntry => {
                let date = self.tracker.selected();
                if date > self.tracker.today() {
                    self.input_error = Some("This day hasn't arrived yet".to_string());
                    return;
                }
                let entry = JournalEntry::from_text(date, &trimmed);
                match JournalRepo::add(conn, &entry) {
                    Ok(_) => {
                        self.tracker
                            .update_selected(Instant::now(), |r, _| r.mark_journaled());
                        self.load_journal(conn);
                        self.close_input();
                    }
                    Err(e) => {
                        log::warn!("saving journal entry failed: {}", e);
                        self.input_error = Some("Couldn't save entry".to_string());
                    }
                }
            }
            InputMode::Normal => {}
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer[0], &self.tracker);

        match self.view {
            View::Dashboard | View::Help => self.draw_dashboard(frame, outer[1]),
            View::Calendar => calendar::render(
                frame,
                outer[1],
                &self.tracker.calendar(),
                self.tracker.selected(),
                self.tracker.today(),
            ),
            View::Journal => journal::render(
                frame,
                outer[1],
                &self.tracker.selected().format("%b %d").to_string(),
                &self.journal,
                self.journal_idx,
            ),
        }

        statusbar::render(frame, outer[2], self.hints(), self.flash.as_deref());

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if self.input_mode != InputMode::Normal {
            self.draw_input(frame);
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self.view {
            View::Dashboard | View::Help => &[
                ("[↵]", "toggle"),
                ("[+/-]", "workout"),
                ("[w]", "water"),
                ("[←→]", "day"),
                ("[c]", "calendar"),
                ("[j]", "journal"),
                ("[?]", "help"),
                ("[q]", "quit"),
            ],
            View::Calendar => &[("[←→]", "day"), ("[g]", "jump"), ("[t]", "today"), ("[Esc]", "back")],
            View::Journal => &[("[n]", "new"), ("[d]", "delete"), ("[←→]", "day"), ("[Esc]", "back")],
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, body: Rect) {
        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);

        let record = self.tracker.selected_record();
        let scoring = self.tracker.scoring();

        checklist::render(
            frame,
            columns[0],
            &record,
            &scoring,
            self.focus_idx,
            self.view == View::Dashboard,
        );

        let right = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(columns[1]);

        progress::render(
            frame,
            right[0],
            &self.tracker.summary(),
            self.tracker.window().duration_days,
            record.completion_percentage(&scoring),
        );

        let mut notes = Vec::new();
        if let Some(w) = record.weight {
            notes.push(Line::from(vec![
                Span::styled("  Weight  ", theme::dim()),
                Span::styled(format!("{} lbs", format_amount(w)), theme::bold()),
            ]));
        }
        if let Some(n) = &record.note {
            notes.push(Line::from(vec![
                Span::styled("  Note    ", theme::dim()),
                Span::styled(n.clone(), theme::bold()),
            ]));
        }
        if let Some(n) = &record.photo_note {
            notes.push(Line::from(vec![
                Span::styled("  Photo   ", theme::dim()),
                Span::styled(n.clone(), theme::dim()),
            ]));
        }
        if notes.is_empty() {
            notes.push(Line::from(Span::styled(
                "  hardline weight / note / photo to add details",
                theme::dim(),
            )));
        }
        let block = Block::default()
            .title(Span::styled(" Notes ", theme::ember()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(false))
            .style(theme::surface());
        frame.render_widget(Paragraph::new(notes).block(block), right[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).max(14),
        }
        .intersection(area);
        frame.render_widget(Clear, popup_area);

        let keys = [
            ("[↑ ↓]", "Move between tasks"),
            ("[Enter]", "Toggle the focused task"),
            ("[+] / [-]", "Log / undo a workout"),
            ("[w] / [W]", "Add water / quick +16 oz"),
            ("[← →]", "Previous / next day"),
            ("[t]", "Back to today"),
            ("[g]", "Jump to a day number"),
            ("[c]", "Calendar"),
            ("[j]", "Journal"),
            ("[q] / [Esc]", "Quit"),
        ];
        let mut lines = vec![
            Line::from(Span::styled("  Keybindings", theme::ember().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        for (k, label) in keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<13}", k), theme::ember()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::ember()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::ember())
            .style(theme::surface());
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }

    fn draw_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };
        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        }
        .intersection(area);
        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  > ", theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::ember().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  [Enter] save  ·  [Esc] cancel", theme::dim())),
        ];
        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border = if self.input_error.is_some() { theme::red() } else { theme::amber() };
        let block = Block::default()
            .title(Span::styled(self.input_mode.title(), theme::ember()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(theme::surface());
        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, tracker: Tracker) -> Result<()> {
    let mut app = App::new(tracker);
    app.load_journal(&conn);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(TICK_RATE);

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            Ok(Event::Tick) => app.tick(&conn),
            Err(e) => break Err(e.into()),
        }
    };

    app.shutdown(&conn);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::repository::DayRepo;
    use crate::models::ChallengeWindow;
    use crate::tracker::TrackerSettings;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (Connection, App) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let tracker = Tracker::load(
            &conn,
            ChallengeWindow::new(start, 75, 128.0),
            TrackerSettings::default(),
            today,
        )
        .unwrap();
        (conn, App::new(tracker))
    }

    #[test]
    fn enter_toggles_focused_task_and_shutdown_saves() {
        let (conn, mut app) = setup();
        app.handle_key(key(KeyCode::Enter), &conn);
        assert!(app.tracker.selected_record().has_read);

        app.handle_key(key(KeyCode::Down), &conn);
        app.handle_key(key(KeyCode::Char('+')), &conn);
        assert_eq!(app.tracker.selected_record().workouts_completed, 1);

        app.shutdown(&conn);
        let date = app.tracker.selected();
        assert!(DayRepo::find_range(&conn, date, date).unwrap()[0].has_read);
    }

    #[test]
    fn arrows_move_within_bounds() {
        let (conn, mut app) = setup();
        let today = app.tracker.today();
        app.handle_key(key(KeyCode::Right), &conn);
        assert_eq!(app.tracker.selected(), today);
        app.handle_key(key(KeyCode::Left), &conn);
        assert_eq!(app.tracker.selected_day_number(), 4);
        app.handle_key(key(KeyCode::Char('t')), &conn);
        assert_eq!(app.tracker.selected(), today);
    }

    #[test]
    fn jump_input_validates_day() {
        let (conn, mut app) = setup();
        app.handle_key(key(KeyCode::Char('g')), &conn);
        app.handle_key(key(KeyCode::Char('9')), &conn);
        app.handle_key(key(KeyCode::Char('9')), &conn);
        app.handle_key(key(KeyCode::Enter), &conn);
        assert!(app.input_error.is_some());
        assert_eq!(app.input_mode, InputMode::JumpToDay);

        app.handle_key(key(KeyCode::Backspace), &conn);
        app.handle_key(key(KeyCode::Backspace), &conn);
        app.handle_key(key(KeyCode::Char('2')), &conn);
        app.handle_key(key(KeyCode::Enter), &conn);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.tracker.selected_day_number(), 2);
    }

    #[test]
    fn journal_entry_marks_day_journaled() {
        let (conn, mut app) = setup();
        app.handle_key(key(KeyCode::Char('j')), &conn);
        app.handle_key(key(KeyCode::Char('n')), &conn);
        for c in "Held the line".chars() {
            app.handle_key(key(KeyCode::Char(c)), &conn);
        }
        app.handle_key(key(KeyCode::Enter), &conn);
        assert_eq!(app.journal.len(), 1);
        assert_eq!(app.journal[0].title, "Held the line");
        assert!(app.tracker.selected_record().has_journaled);
    }

    #[test]
    fn overlays_fit_short_terminals() {
        use ratatui::{backend::TestBackend, Terminal};

        let (_conn, mut app) = setup();
        let mut term = Terminal::new(TestBackend::new(80, 16)).unwrap();
        app.view = View::Help;
        term.draw(|frame| app.draw(frame)).unwrap();

        let mut tiny = Terminal::new(TestBackend::new(40, 4)).unwrap();
        app.input_mode = InputMode::Water;
        app.input_error = Some("bad".to_string());
        tiny.draw(|frame| app.draw(frame)).unwrap();
    }

    #[test]
    fn weight_uses_the_cli_formatting() {
        use ratatui::{backend::TestBackend, Terminal};

        let (_conn, mut app) = setup();
        app.tracker
            .update_selected(Instant::now(), |r, _| r.set_weight(Some(181.4)));
        let mut term = Terminal::new(TestBackend::new(100, 30)).unwrap();
        term.draw(|frame| app.draw(frame)).unwrap();

        let rendered: String = term
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains(&format!("{} lbs", format_amount(181.4))));
    }
}
