use anyhow::Result;
use std::io::Write;

use crate::models::Reminder;

pub trait ReminderScheduler {
    /// Replaces whatever was scheduled before with `reminders`.
    fn schedule(&mut self, reminders: &[Reminder]) -> Result<()>;
    fn cancel_all(&mut self) -> Result<()>;
}

/// Writes the schedule to a terminal instead of an OS notification centre.
pub struct ConsoleScheduler<W: Write> {
    out: W,
}

impl<W: Write> ConsoleScheduler<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ReminderScheduler for ConsoleScheduler<W> {
    fn schedule(&mut self, reminders: &[Reminder]) -> Result<()> {
        if reminders.is_empty() {
            writeln!(self.out, "  No reminders scheduled")?;
            return Ok(());
        }
        for r in reminders {
            let repeat = if r.recurring { "daily" } else { "once" };
            writeln!(
                self.out,
                "  {}  {:<6} {}",
                r.time.format("%H:%M"),
                repeat,
                r.message
            )?;
        }
        log::debug!("scheduled {} reminders", reminders.len());
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<()> {
        writeln!(self.out, "  All reminders cancelled")?;
        Ok(())
    }
}
