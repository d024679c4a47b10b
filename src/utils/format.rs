use unicode_width::UnicodeWidthStr;

/// Format a 0..=1 ratio as a whole percentage, e.g. "86%"
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", (ratio.clamp(0.0, 1.0) * 100.0).round() as i64)
}

/// Format an amount, trimming a trailing ".0"
pub fn format_amount(value: f64) -> String {
    if value == value.floor() {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

pub fn format_oz(oz: f64) -> String {
    format!("{} oz", format_amount(oz))
}

/// Create a simple ASCII progress bar for a 0..=1 ratio
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Right-pad to a display width; wide glyphs count as two columns.
pub fn pad_display(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

pub fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_and_amounts() {
        assert_eq!(format_percent(6.0 / 7.0), "86%");
        assert_eq!(format_percent(1.4), "100%");
        assert_eq!(format_oz(64.0), "64 oz");
        assert_eq!(format_oz(12.5), "12.5 oz");
    }

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(2.0, 3), "███");
        assert_eq!(progress_bar(f64::NAN, 2), "░░");
    }

    #[test]
    fn padding_counts_display_columns() {
        assert_eq!(pad_display("ab", 4), "ab  ");
        assert_eq!(pad_display("✓", 3).chars().count(), 3);
        assert_eq!(plural(1, "day"), "1 day");
        assert_eq!(plural(3, "day"), "3 days");
    }
}
