//! Date formatting for the `Date` attribute
//!
//! The logger treats date patterns as opaque: it hands the pattern and the
//! call time to a [`DateFormatter`]. Two implementations ship with the crate:
//! [`LdmlDateFormatter`] (the default) understands Unicode-style patterns such
//! as `HH:mm:ss` or `yyyy-MM-dd'T'HH:mm:ss.SSSZ`, and [`StrftimeDateFormatter`]
//! passes chrono strftime patterns such as `%H:%M:%S` straight through.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Local, Timelike};
use std::sync::Arc;

/// Renders a timestamp according to a caller-supplied pattern.
pub trait DateFormatter: Send + Sync {
    fn format(&self, pattern: &str, date: &DateTime<Local>) -> String;
}

impl<F> DateFormatter for F
where
    F: Fn(&str, &DateTime<Local>) -> String + Send + Sync,
{
    fn format(&self, pattern: &str, date: &DateTime<Local>) -> String {
        self(pattern, date)
    }
}

/// Shared handle used by loggers.
pub type SharedDateFormatter = Arc<dyn DateFormatter>;

/// Unicode (LDML) date patterns.
///
/// Letters are pattern fields, repeated to choose width (`d` vs `dd`); text in
/// single quotes is literal and `''` is a quote. Letters without a mapping are
/// copied through unchanged.
///
/// # Examples
///
/// ```
/// use timber_log::core::{DateFormatter, LdmlDateFormatter};
/// use chrono::{Local, TimeZone};
///
/// let date = Local.with_ymd_and_hms(2025, 1, 8, 9, 5, 3).single().unwrap();
/// let text = LdmlDateFormatter.format("yyyy-MM-dd HH:mm:ss", &date);
/// assert_eq!(text, "2025-01-08 09:05:03");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LdmlDateFormatter;

impl DateFormatter for LdmlDateFormatter {
    fn format(&self, pattern: &str, date: &DateTime<Local>) -> String {
        let mut out = String::with_capacity(pattern.len() + 8);
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push('\'');
                    continue;
                }
                while let Some(ch) = chars.next() {
                    if ch != '\'' {
                        out.push(ch);
                    } else if chars.peek() == Some(&'\'') {
                        chars.next();
                        out.push('\'');
                    } else {
                        break;
                    }
                }
            } else if c.is_ascii_alphabetic() {
                let mut count = 1;
                while chars.peek() == Some(&c) {
                    chars.next();
                    count += 1;
                }
                render_field(&mut out, c, count, date);
            } else {
                out.push(c);
            }
        }

        out
    }
}

fn pad(out: &mut String, value: i64, width: usize) {
    out.push_str(&format!("{:0width$}", value, width = width));
}

fn render_field(out: &mut String, letter: char, count: usize, date: &DateTime<Local>) {
    match letter {
        'y' if count == 2 => pad(out, i64::from(date.year().rem_euclid(100)), 2),
        'y' => pad(out, i64::from(date.year()), count),
        'M' if count >= 4 => out.push_str(&date.format("%B").to_string()),
        'M' if count == 3 => out.push_str(&date.format("%b").to_string()),
        'M' => pad(out, i64::from(date.month()), count),
        'd' => pad(out, i64::from(date.day()), count),
        'D' => pad(out, i64::from(date.ordinal()), count),
        'E' if count >= 4 => out.push_str(&date.format("%A").to_string()),
        'E' => out.push_str(&date.format("%a").to_string()),
        'a' => out.push_str(&date.format("%p").to_string()),
        'H' => pad(out, i64::from(date.hour()), count),
        'h' => pad(out, i64::from(date.hour12().1), count),
        'k' => pad(out, i64::from(if date.hour() == 0 { 24 } else { date.hour() }), count),
        'K' => pad(out, i64::from(date.hour() % 12), count),
        'm' => pad(out, i64::from(date.minute()), count),
        's' => pad(out, i64::from(date.second()), count),
        'S' => {
            // Leap seconds report nanoseconds past 1e9
            let digits = format!("{:09}", date.nanosecond() % 1_000_000_000);
            if count <= 9 {
                out.push_str(&digits[..count]);
            } else {
                out.push_str(&digits);
                out.extend(std::iter::repeat('0').take(count - 9));
            }
        }
        'Z' if count == 4 => out.push_str(&date.format("GMT%:z").to_string()),
        'Z' if count >= 5 => out.push_str(&date.format("%:z").to_string()),
        'Z' => out.push_str(&date.format("%z").to_string()),
        'z' => out.push_str(&date.format("%Z").to_string()),
        other => out.extend(std::iter::repeat(other).take(count)),
    }
}

/// chrono strftime patterns (`%Y-%m-%d %H:%M:%S`).
///
/// A pattern chrono cannot parse is returned verbatim instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrftimeDateFormatter;

impl DateFormatter for StrftimeDateFormatter {
    fn format(&self, pattern: &str, date: &DateTime<Local>) -> String {
        let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return pattern.to_string();
        }
        date.format_with_items(items.iter()).to_string()
    }
}
