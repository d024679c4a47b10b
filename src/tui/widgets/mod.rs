pub mod calendar;
pub mod checklist;
pub mod header;
pub mod journal;
pub mod progress;
pub mod statusbar;
