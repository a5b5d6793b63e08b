//! Renders a single log line from a [`LogFormat`]

use super::log_format::{Attribute, LogFormat};
use super::log_level::LogLevel;
use super::log_record::{last_path_component, strip_extension, CallSite, LogRecord};
use super::timestamp::{DateFormatter, LdmlDateFormatter};
use chrono::{DateTime, Local};

/// Produces the final text for one log call.
///
/// The timestamp is taken when the formatter is created, so every `Date`
/// attribute in one line shows the same instant.
///
/// # Example
///
/// ```
/// use timber_log::{Attribute, CallSite, LogFormat, LogFormatter, LogLevel};
///
/// let format = LogFormat::with_attributes("%s %s:%s %s", vec![
///     Attribute::Level,
///     Attribute::file_name(false, false),
///     Attribute::Line,
///     Attribute::Message,
/// ]);
/// let site = CallSite::new("src/net/client.rs", 42, 9, "net::client::connect");
/// let line = LogFormatter::new(&format, LogLevel::Warn, &site, "retrying", "\n")
///     .formatted_log_message();
/// assert_eq!(line, "WARN client:42 retrying\n");
/// ```
pub struct LogFormatter<'a> {
    format: &'a LogFormat,
    level: LogLevel,
    call_site: &'a CallSite,
    message: &'a str,
    terminator: &'a str,
    date: DateTime<Local>,
    date_formatter: &'a dyn DateFormatter,
}

impl<'a> LogFormatter<'a> {
    pub fn new(
        format: &'a LogFormat,
        level: LogLevel,
        call_site: &'a CallSite,
        message: &'a str,
        terminator: &'a str,
    ) -> Self {
        Self {
            format,
            level,
            call_site,
            message,
            terminator,
            date: Local::now(),
            date_formatter: &LdmlDateFormatter,
        }
    }

    /// Formatter for a queued record, stamped with the record's call time.
    pub fn for_record(record: &'a LogRecord) -> Self {
        Self::new(
            &record.format,
            record.level,
            &record.call_site,
            &record.message,
            &record.terminator,
        )
        .with_date(record.timestamp)
    }

    #[must_use]
    pub fn with_date(mut self, date: DateTime<Local>) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub fn with_date_formatter(mut self, date_formatter: &'a dyn DateFormatter) -> Self {
        self.date_formatter = date_formatter;
        self
    }

    pub fn date(&self) -> DateTime<Local> {
        self.date
    }

    /// Render the line.
    ///
    /// Without attributes this is the bare message: no template and no
    /// terminator. Otherwise each placeholder takes the next rendered
    /// attribute and the terminator is appended. Placeholder and attribute
    /// counts are not checked against each other; extra attributes are
    /// ignored and unfilled placeholders are emitted as written.
    pub fn formatted_log_message(&self) -> String {
        let attributes = match self.format.attributes() {
            Some(attributes) if !attributes.is_empty() => attributes,
            _ => return self.message.to_string(),
        };

        let values: Vec<String> = attributes
            .iter()
            .map(|attribute| self.render_attribute(attribute))
            .collect();

        let mut line = substitute(self.format.template(), &values);
        line.push_str(self.terminator);
        line
    }

    fn render_attribute(&self, attribute: &Attribute) -> String {
        match attribute {
            Attribute::Level => self.readable_level(),
            Attribute::FileName {
                full_path,
                include_extension,
            } => readable_file_name(self.call_site.file, *full_path, *include_extension).to_string(),
            Attribute::Line => self.call_site.line.to_string(),
            Attribute::Column => self.call_site.column.to_string(),
            Attribute::Function => self.call_site.function.to_string(),
            Attribute::Message => self.message.to_string(),
            Attribute::Date { pattern } => self.date_formatter.format(pattern, &self.date),
        }
    }

    pub fn readable_level(&self) -> String {
        self.level.to_str().to_string()
    }
}

/// Reduce a file path as the `FileName` attribute does.
pub fn readable_file_name(path: &str, full_path: bool, include_extension: bool) -> &str {
    let name = if full_path {
        path
    } else {
        last_path_component(path)
    };
    if include_extension {
        name
    } else {
        strip_extension(name)
    }
}

/// printf-style substitution supporting `%s`, `%@`, `%N$s`, `%N$@` and `%%`.
fn substitute(template: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(String::len).sum::<usize>());
    let mut next = 0usize;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = &rest[pos + 1..];

        if let Some(after) = spec.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }
        if let Some(after) = spec.strip_prefix(['s', '@']) {
            match values.get(next) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[pos..pos + 2]),
            }
            next += 1;
            rest = after;
            continue;
        }

        let digits = spec.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            let tail = &spec[digits..];
            if let Some(after) = tail.strip_prefix("$s").or_else(|| tail.strip_prefix("$@")) {
                let index = spec[..digits].parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                match index.and_then(|idx| values.get(idx)) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[pos..pos + 1 + digits + 2]),
                }
                rest = after;
                continue;
            }
        }

        out.push('%');
        rest = spec;
    }

    out.push_str(rest);
    out
}
