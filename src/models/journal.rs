use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MAX_TITLE_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub title: String,
    pub body: String,
    pub created_at: Option<String>,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            date,
            title: title.into(),
            body: body.into(),
            created_at: None,
        }
    }

    /// Builds an entry from free text; the first line becomes the title.
    /// A first line too long for a title is cut at a word boundary and the
    /// remainder opens the body.
    pub fn from_text(date: NaiveDate, text: &str) -> Self {
        let text = text.trim();
        let (first, rest) = match text.split_once('\n') {
            Some((first, rest)) => (first.trim(), rest.trim()),
            None => (text, ""),
        };
        let Some((cut, _)) = first.char_indices().nth(MAX_TITLE_CHARS) else {
            return Self::new(date, first, rest);
        };
        let split = first[..cut]
            .rfind(char::is_whitespace)
            .filter(|&i| i > 0)
            .unwrap_or(cut);
        let (title, overflow) = (first[..split].trim(), first[split..].trim());
        let body = if rest.is_empty() {
            overflow.to_string()
        } else {
            format!("{}\n{}", overflow, rest)
        };
        Self::new(date, title, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_becomes_title() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        let e = JournalEntry::from_text(date, "Day 12\nTough second workout in the rain.\n");
        assert_eq!(e.title, "Day 12");
        assert_eq!(e.body, "Tough second workout in the rain.");

        let single = JournalEntry::from_text(date, "  short one  ");
        assert_eq!(single.title, "short one");
        assert_eq!(single.body, "");
    }

    #[test]
    fn long_single_line_keeps_every_word() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        let text = "Today was brutal but I finished both workouts and read twenty pages before bed again";
        let e = JournalEntry::from_text(date, text);
        assert!(e.title.chars().count() <= 60);
        assert_eq!(e.title, "Today was brutal but I finished both workouts and read");
        assert_eq!(format!("{} {}", e.title, e.body), text);

        let multi = JournalEntry::from_text(date, &format!("{}\nSecond line", text));
        assert!(multi.body.ends_with("before bed again\nSecond line"));
    }
}
