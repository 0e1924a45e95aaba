//! A [`Formatter`] that fences records between sentinel lines.
//!
//! See [`MultilineFormatter`] for more details.

use crate::formatter::{structured_entries, to_string_indented, FormatError, Formatter};
use crate::record::LogRecord;
use serde_json::Value;

/// Opens every formatted record; the downstream multiline rule keys on it.
pub const BEGIN_SENTINEL: &str = "BEGIN_LOG";

/// Closes every formatted record.
pub const END_SENTINEL: &str = "END_LOG";

/// Format records as indented JSON fenced between `BEGIN_LOG` and
/// `END_LOG` lines.
///
/// The sentinels let a line-oriented collector reassemble the indented
/// body into one logical record, so multi-line field values survive the
/// trip through the pipeline. A `query` field is normalized first,
/// dropping blank lines and per-line indentation, which keeps the
/// collector's continuation rule from tripping over stray whitespace.
///
/// The sentinels are not escaped if a field value happens to contain
/// them; feeding such a value through this strategy leaves the output
/// ambiguous to the collector.
///
/// # Examples
///
/// ```log
/// BEGIN_LOG
/// {
///   "service": "graphql-api",
///   "operation_name": "GetUserProfile",
///   "query": "query GetUserProfile {\nuser(id: \"123\") {\nid\n}\n}"
/// }
/// END_LOG
/// ```
pub struct MultilineFormatter {
    /// Indentation width for the JSON body.
    indent: usize,
    #[doc(hidden)]
    _priv: (),
}

impl MultilineFormatter {
    /// Construct a new [`MultilineFormatter`] with two-space indentation.
    pub const fn new() -> Self {
        MultilineFormatter {
            indent: 2,
            _priv: (),
        }
    }

    /// Overrides the indentation width of the JSON body.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }
}

impl Default for MultilineFormatter {
    fn default() -> Self {
        MultilineFormatter::new()
    }
}

impl Formatter for MultilineFormatter {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        match record {
            LogRecord::Structured(value) => {
                let mut entry = structured_entries(value)?.clone();

                let normalized = entry
                    .get("query")
                    .and_then(Value::as_str)
                    .map(normalize_query);
                if let Some(normalized) = normalized {
                    entry.insert("query".to_owned(), Value::String(normalized));
                }

                let body = to_string_indented(&Value::Object(entry), self.indent)?;
                Ok(format!("{}\n{}\n{}", BEGIN_SENTINEL, body, END_SENTINEL))
            }
            // Events have no mapping to fence; fall back to a plain
            // rendering of the whole object.
            LogRecord::Event(event) => Ok(format!("{:?}", event)),
        }
    }
}

/// Normalizes a query string for line-based collection: blank lines are
/// dropped and each remaining line is trimmed, then the lines are
/// rejoined with `\n`.
///
/// Normalization is idempotent.
pub fn normalize_query(query: &str) -> String {
    query
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
