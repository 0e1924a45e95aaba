//! A [`Formatter`] that renders records as JSON documents.
//!
//! See [`JsonFormatter`] for more details.

use crate::formatter::{
    ensure_minimal_fields, structured_entries, to_string_indented, FormatError, Formatter,
};
use crate::record::{LogEvent, LogRecord};
use serde_json::{Map, Value};
use std::fmt::Write;

/// Format records as JSON documents.
///
/// Structured payloads pass through whole: every caller field survives
/// with its value and order intact, after the guaranteed `timestamp`,
/// `level`, and `message` fields are filled in. Platform events are
/// reshaped into a canonical document of `timestamp`, `level`, `name`,
/// and `message`, plus `exception` and `stack_info` when captured and
/// the event's extra fields.
///
/// # Examples
///
/// ```json
/// {"timestamp":"2024-01-15T10:30:00.123456Z","level":"INFO","message":"ok","service":"web-api"}
/// ```
///
/// With an indentation width set:
///
/// ```json
/// {
///   "timestamp": "2024-01-15T10:30:00.123456Z",
///   "level": "INFO",
///   "message": "ok",
///   "service": "web-api"
/// }
/// ```
pub struct JsonFormatter {
    /// Indentation width, or `None` for single-line output.
    indent: Option<usize>,
    /// Whether non-ASCII characters are escaped to `\uXXXX` sequences.
    escape_non_ascii: bool,
    #[doc(hidden)]
    _priv: (),
}

impl JsonFormatter {
    /// Construct a new [`JsonFormatter`]: single-line output with
    /// non-ASCII characters passed through.
    pub const fn new() -> Self {
        JsonFormatter {
            indent: None,
            escape_non_ascii: false,
            _priv: (),
        }
    }

    /// Pretty-print documents with the given indentation width.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Escape non-ASCII characters to `\uXXXX` sequences, for sinks
    /// that cannot be trusted with raw UTF-8.
    pub fn escape_non_ascii(mut self, escape: bool) -> Self {
        self.escape_non_ascii = escape;
        self
    }

    fn event_entry(&self, event: &LogEvent) -> Map<String, Value> {
        let mut entry = Map::new();
        entry.insert(
            "timestamp".to_owned(),
            Value::String(self.format_time(event, None)),
        );
        entry.insert(
            "level".to_owned(),
            Value::String(event.level().to_string()),
        );
        entry.insert("name".to_owned(), Value::String(event.name().to_owned()));
        entry.insert(
            "message".to_owned(),
            Value::String(event.message().to_owned()),
        );

        let exception = self.format_exception(event.exception());
        if !exception.is_empty() {
            entry.insert("exception".to_owned(), Value::String(exception));
        }

        let stack = self.format_stack(event.stack());
        if !stack.is_empty() {
            entry.insert("stack_info".to_owned(), Value::String(stack));
        }

        // Extras land last and overwrite the canonical fields on collision.
        for (field, value) in event.extras() {
            entry.insert(field.clone(), value.clone());
        }

        entry
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        JsonFormatter::new()
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        let entry = match record {
            LogRecord::Structured(value) => ensure_minimal_fields(structured_entries(value)?),
            LogRecord::Event(event) => self.event_entry(event),
        };

        let rendered = match self.indent {
            Some(width) => to_string_indented(&Value::Object(entry), width)?,
            None => serde_json::to_string(&entry)?,
        };

        Ok(if self.escape_non_ascii {
            escape_to_ascii(&rendered)
        } else {
            rendered
        })
    }
}

/// Rewrites every non-ASCII character as `\uXXXX` escapes, with
/// characters beyond the basic multilingual plane becoming surrogate
/// pairs. Non-ASCII characters only occur inside string literals, so
/// escaping the serialized text cannot touch JSON syntax.
fn escape_to_ascii(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    for c in rendered.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}
