//! Trait for formatting log records.
//!
//! See [`Formatter`] for more details.

use crate::record::{ExceptionInfo, LogEvent, LogRecord};
use chrono::format::{Item, StrftimeItems};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;

mod json;
mod multiline;
mod text;

pub use self::json::JsonFormatter;
pub use self::multiline::{normalize_query, MultilineFormatter};
pub use self::text::{display_value, TextFormatter};

/// A strategy for turning a [`LogRecord`] into its final textual form.
///
/// Implementations are stateless apart from their own configuration and
/// never mutate the records they receive, so one formatter can serve
/// many producers at once. The provided methods cover the pieces every
/// strategy shares: shape validation, exception and stack rendering,
/// and timestamp formatting.
pub trait Formatter {
    /// Formats a record into its final textual form.
    ///
    /// Returns [`FormatError::UnsupportedRecord`] when handed a
    /// structured payload that is not a mapping.
    fn format(&self, record: &LogRecord) -> Result<String, FormatError>;

    /// Confirms the record is a shape formatters accept.
    fn validate(&self, record: &LogRecord) -> Result<(), FormatError> {
        match record {
            LogRecord::Structured(value) => structured_entries(value).map(|_| ()),
            LogRecord::Event(_) => Ok(()),
        }
    }

    /// Renders a captured exception, or an empty string if there is none.
    fn format_exception(&self, exception: Option<&ExceptionInfo>) -> String {
        match exception {
            Some(exception) => exception.to_string(),
            None => String::new(),
        }
    }

    /// Renders captured stack information, or an empty string if there
    /// is none.
    fn format_stack(&self, stack: Option<&str>) -> String {
        stack.unwrap_or_default().to_owned()
    }

    /// Renders an event's timestamp, RFC 3339 unless a strftime pattern
    /// is given. A pattern chrono cannot parse falls back to RFC 3339
    /// rather than failing the record.
    fn format_time(&self, event: &LogEvent, datefmt: Option<&str>) -> String {
        if let Some(datefmt) = datefmt {
            let items: Vec<Item<'_>> = StrftimeItems::new(datefmt).collect();
            if !items.iter().any(|item| matches!(item, Item::Error)) {
                return event
                    .timestamp()
                    .format_with_items(items.into_iter())
                    .to_string();
            }
        }
        event.timestamp().to_rfc3339()
    }

    /// Whether this strategy includes timestamps in its output.
    fn uses_time(&self) -> bool {
        true
    }
}

/// Error type for formatting failures.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The structured payload was not a mapping.
    #[error("unsupported record type: expected a mapping, found {found}")]
    UnsupportedRecord {
        /// The payload type that was found instead.
        found: &'static str,
    },

    /// The serializer rejected the record.
    #[error("failed to serialize record")]
    Serialize(#[from] serde_json::Error),
}

/// Borrows the entries of a structured payload, or reports the shape
/// that was found instead.
pub(crate) fn structured_entries(value: &Value) -> Result<&Map<String, Value>, FormatError> {
    value.as_object().ok_or(FormatError::UnsupportedRecord {
        found: payload_type_name(value),
    })
}

fn payload_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

/// Returns a copy of `entries` guaranteed to carry `timestamp`, `level`,
/// and `message`.
///
/// Missing fields are filled with their defaults (`null`, `"INFO"`, and
/// `""`); fields the caller already set keep their values. The
/// guaranteed fields always lead, and the remaining fields follow in
/// caller order.
pub fn ensure_minimal_fields(entries: &Map<String, Value>) -> Map<String, Value> {
    let mut normalized = Map::new();
    normalized.insert("timestamp".to_owned(), Value::Null);
    normalized.insert("level".to_owned(), Value::String("INFO".to_owned()));
    normalized.insert("message".to_owned(), Value::String(String::new()));

    for (field, value) in entries {
        normalized.insert(field.clone(), value.clone());
    }

    normalized
}

/// Serializes a value as JSON with the given indentation width.
pub(crate) fn to_string_indented(value: &Value, width: usize) -> Result<String, FormatError> {
    let indent = " ".repeat(width);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf).expect("serde_json emits valid UTF-8"))
}
