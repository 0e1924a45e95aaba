//! A [`Formatter`] that renders records as human-readable text.
//!
//! See [`TextFormatter`] for more details.

use crate::formatter::{ensure_minimal_fields, structured_entries, FormatError, Formatter};
use crate::record::{LogEvent, LogRecord};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Rendered segments, kept on the stack for typical records.
type Segments = SmallVec<[String; 8]>;

/// Format records as single-line, pipe-delimited text.
///
/// Each recognized field group becomes one segment, and the segments
/// that fit on one line are joined with `" | "`. Multi-line content
/// (stack traces, query bodies) is withheld from that summary line and
/// re-attached below it, so the first line always scans at a glance.
///
/// # Examples
///
/// ```log
/// [2024-01-15T10:30:00.123456Z] | INFO | Service: web-api | Request: GET /api/users | Status: 200 Time: 42.1ms
/// ```
///
/// A record carrying an error and a stack trace:
///
/// ```log
/// [2024-01-15T10:30:00.123456Z] | CRITICAL | Service: web-api | Error: DatabaseConnectionError - Failed to connect to database
///
/// Stack trace:
///    0: web_api::database::connection::handle_request
///          at src/database/connection.rs:211
/// ```
pub struct TextFormatter {
    #[doc(hidden)]
    _priv: (),
}

impl TextFormatter {
    /// Construct a new [`TextFormatter`].
    pub const fn new() -> Self {
        TextFormatter { _priv: () }
    }

    fn format_event(&self, event: &LogEvent) -> String {
        let mut output = format!(
            "[{}] {}: {}",
            self.format_time(event, None),
            event.level(),
            event.message()
        );

        let exception = self.format_exception(event.exception());
        if !exception.is_empty() {
            output.push_str("\nException: ");
            output.push_str(&exception);
        }

        let stack = self.format_stack(event.stack());
        if !stack.is_empty() {
            output.push_str("\nStack trace: ");
            output.push_str(&stack);
        }

        output
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        TextFormatter::new()
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<String, FormatError> {
        match record {
            LogRecord::Structured(value) => {
                let entry = ensure_minimal_fields(structured_entries(value)?);
                Ok(format_entry(&entry))
            }
            LogRecord::Event(event) => Ok(self.format_event(event)),
        }
    }
}

fn format_entry(entry: &Map<String, Value>) -> String {
    let mut segments = Segments::new();

    if let Some(timestamp) = entry.get("timestamp") {
        segments.push(format!("[{}]", field_text(timestamp)));
    }

    if let Some(level) = entry.get("level") {
        segments.push(field_text(level));
    }

    if let Some(service) = entry.get("service") {
        segments.push(format!("Service: {}", field_text(service)));
    }

    request_segments(entry, &mut segments);
    error_segments(entry, &mut segments);
    metrics_segments(entry, &mut segments);
    graphql_segments(entry, &mut segments);

    assemble(&segments)
}

fn request_segments(entry: &Map<String, Value>, segments: &mut Segments) {
    let request = match entry.get("request") {
        Some(request) => request,
        None => return,
    };

    segments.push(format!(
        "Request: {} {}",
        child_text(request, "method", "UNKNOWN"),
        child_text(request, "path", "")
    ));

    if let Some(response) = entry.get("response") {
        segments.push(format!(
            "Status: {} Time: {}ms",
            child_text(response, "status_code", "?"),
            child_text(response, "response_time_ms", "?")
        ));
    }
}

fn error_segments(entry: &Map<String, Value>, segments: &mut Segments) {
    let error = match entry.get("error") {
        Some(error) => error,
        None => return,
    };

    segments.push(format!(
        "Error: {} - {}",
        child_text(error, "type", "Unknown"),
        child_text(error, "message", "")
    ));

    // The trace rides along with the error, never on its own.
    if let Some(stack) = entry.get("stack_trace") {
        segments.push(format!("\nStack trace:\n{}", field_text(stack)));
    }
}

fn metrics_segments(entry: &Map<String, Value>, segments: &mut Segments) {
    let metrics = match entry.get("metrics") {
        Some(metrics) => metrics,
        None => return,
    };

    let host = match entry.get("host") {
        Some(host) => field_text(host),
        None => "unknown".to_owned(),
    };
    segments.push(format!("Host: {}", host));

    let mut parts = Vec::new();
    if let Some(entries) = metrics.as_object() {
        for (name, data) in entries {
            if data.is_object() {
                let mut part = format!(
                    "{}: {}{}",
                    name,
                    child_text(data, "value", "?"),
                    child_text(data, "unit", "")
                );
                if data
                    .get("threshold_exceeded")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
                {
                    part.push_str(&format!(
                        " (Exceeded threshold: {})",
                        child_text(data, "threshold", "?")
                    ));
                }
                parts.push(part);
            } else {
                parts.push(format!("{}: {}", name, field_text(data)));
            }
        }
    }
    segments.push(format!("Metrics: {}", parts.join(", ")));

    if let Some(summary) = entry.get("summary").and_then(Value::as_object) {
        let parts: Vec<String> = summary
            .iter()
            .map(|(name, value)| format!("{}: {}", name, field_text(value)))
            .collect();
        segments.push(format!("Summary: {}", parts.join(", ")));
    }
}

fn graphql_segments(entry: &Map<String, Value>, segments: &mut Segments) {
    let operation_type = match entry.get("operation_type") {
        Some(operation_type) => operation_type,
        None => return,
    };

    let name = match entry.get("operation_name") {
        Some(name) => field_text(name),
        None => "unnamed".to_owned(),
    };
    segments.push(format!("GraphQL {}: {}", field_text(operation_type), name));

    if let Some(time) = entry.get("execution_time_ms") {
        segments.push(format!("Execution time: {}ms", field_text(time)));
    }

    if let Some(status) = entry.get("status") {
        segments.push(format!("Status: {}", field_text(status)));
    }

    if let Some(error) = entry.get("error") {
        segments.push(format!(
            "Error: {}",
            child_text(error, "message", "Unknown error")
        ));
    }

    if let Some(query) = entry.get("query") {
        segments.push(format!("\nQuery:\n{}", field_text(query)));
    }
}

/// Joins the single-line segments with `" | "`, then re-attaches the
/// multi-line segments below in their original order.
fn assemble(segments: &Segments) -> String {
    let base: Vec<&str> = segments
        .iter()
        .filter(|segment| !segment.contains('\n'))
        .map(String::as_str)
        .collect();
    let multiline: Vec<&str> = segments
        .iter()
        .filter(|segment| segment.contains('\n'))
        .map(String::as_str)
        .collect();

    let output = base.join(" | ");
    if multiline.is_empty() {
        output
    } else {
        format!("{}\n{}", output, multiline.join("\n"))
    }
}

/// A value's bare text: strings drop their quotes, everything else
/// renders as JSON.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Looks up `field` in a nested mapping, falling back to `default` when
/// the field is missing or the parent is not a mapping.
fn child_text(parent: &Value, field: &str, default: &str) -> String {
    match parent.get(field) {
        Some(value) => field_text(value),
        None => default.to_owned(),
    }
}

/// Renders a value for human display.
///
/// Numbers are grouped with thousands separators and strings appear
/// without quotes. Everything else renders as inline JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Number(number) => group_thousands(&number.to_string()),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn group_thousands(rendered: &str) -> String {
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rendered),
    };
    let (integral, fraction) = match digits.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (digits, None),
    };

    // Exponent forms pass through untouched.
    if !integral.bytes().all(|b| b.is_ascii_digit()) {
        return rendered.to_owned();
    }

    let mut grouped = String::with_capacity(integral.len() + integral.len() / 3);
    for (i, digit) in integral.chars().enumerate() {
        if i > 0 && (integral.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}
