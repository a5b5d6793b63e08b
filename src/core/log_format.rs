//! Log format templates and their attributes
//!
//! A [`LogFormat`] pairs a printf-style template with an ordered list of
//! [`Attribute`]s. Each `%s` (or `%@`) placeholder in the template receives the
//! rendered value of the next attribute; `%N$s` picks the N-th attribute.

use serde::{Deserialize, Serialize};

/// One placeholder value in a log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Uppercase level name, e.g. `WARN`
    Level,
    /// Caller file, optionally reduced to its last segment and/or without extension
    FileName {
        full_path: bool,
        include_extension: bool,
    },
    /// Caller line
    Line,
    /// Caller column
    Column,
    /// Caller function path
    Function,
    /// The joined message body
    Message,
    /// Call time rendered with the logger's date formatter
    Date { pattern: String },
}

impl Attribute {
    pub fn file_name(full_path: bool, include_extension: bool) -> Self {
        Attribute::FileName {
            full_path,
            include_extension,
        }
    }

    pub fn date(pattern: impl Into<String>) -> Self {
        Attribute::Date {
            pattern: pattern.into(),
        }
    }
}

/// Template used by [`LogFormat::default`].
pub const DEFAULT_TEMPLATE: &str = "[%s %s %s:%s] %s";

/// A template paired with the attributes that fill it.
///
/// When `attributes` is `None` or empty the formatter ignores the template and
/// emits only the message.
///
/// Equality needs matching templates and *present* attribute lists on both
/// sides, so two formats without attributes never compare equal. For that
/// reason the type is `PartialEq` only.
///
/// # Example
///
/// ```
/// use timber_log::{Attribute, LogFormat};
///
/// let format = LogFormat::with_attributes("%s | %s", vec![Attribute::Level, Attribute::Message]);
/// assert_eq!(format.template(), "%s | %s");
/// assert_eq!(format.attributes().map(|a| a.len()), Some(2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFormat {
    template: String,
    #[serde(default)]
    attributes: Option<Vec<Attribute>>,
}

impl LogFormat {
    pub fn new(template: impl Into<String>, attributes: Option<Vec<Attribute>>) -> Self {
        Self {
            template: template.into(),
            attributes,
        }
    }

    pub fn with_attributes(template: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self::new(template, Some(attributes))
    }

    /// A format that prints the bare message.
    pub fn message_only() -> Self {
        Self::new("", None)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn attributes(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref()
    }

    /// True when rendering falls back to the bare message.
    pub fn is_passthrough(&self) -> bool {
        self.attributes.as_ref().map_or(true, Vec::is_empty)
    }
}

/// `[FATAL 16:12:24 ViewController.swift:21] some message`
impl Default for LogFormat {
    fn default() -> Self {
        Self::with_attributes(
            DEFAULT_TEMPLATE,
            vec![
                Attribute::Level,
                Attribute::date("HH:mm:ss"),
                Attribute::file_name(false, true),
                Attribute::Line,
                Attribute::Message,
            ],
        )
    }
}

impl PartialEq for LogFormat {
    fn eq(&self, other: &Self) -> bool {
        if self.template != other.template {
            return false;
        }
        match (&self.attributes, &other.attributes) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}
