//! The records that formatters consume.
//!
//! See [`LogRecord`] for more details.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;
use tracing::Level;

/// A single log record.
///
/// Records come in two shapes: free-form structured mappings, which the
/// generators in [`generate`] produce, and platform events carrying the
/// fixed fields a logging framework records at a call site. Formatters
/// dispatch on the variant, so a record's shape alone decides how it is
/// rendered and neither shape can be mistaken for the other.
///
/// [`generate`]: crate::generate
#[derive(Clone, Debug)]
pub enum LogRecord {
    /// An ordered field-to-value mapping with no fixed schema.
    Structured(Value),

    /// A platform log event.
    Event(LogEvent),
}

impl LogRecord {
    /// Returns the structured payload, if this record is one.
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            LogRecord::Structured(value) => Some(value),
            LogRecord::Event(_) => None,
        }
    }

    /// Returns the platform event, if this record is one.
    pub fn as_event(&self) -> Option<&LogEvent> {
        match self {
            LogRecord::Structured(_) => None,
            LogRecord::Event(event) => Some(event),
        }
    }
}

impl From<Value> for LogRecord {
    fn from(value: Value) -> Self {
        LogRecord::Structured(value)
    }
}

impl From<LogEvent> for LogRecord {
    fn from(event: LogEvent) -> Self {
        LogRecord::Event(event)
    }
}

/// A platform log event.
///
/// Events carry the fields a logging framework records at a call site:
/// when it happened, how severe it was, which logger saw it, and the
/// message, along with optional exception and stack captures and any
/// extra fields attached by the caller.
#[derive(Clone, Debug)]
pub struct LogEvent {
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) level: Level,
    pub(crate) name: String,
    pub(crate) message: String,
    pub(crate) exception: Option<ExceptionInfo>,
    pub(crate) stack: Option<String>,
    pub(crate) extras: Map<String, Value>,
}

impl LogEvent {
    /// Creates an event stamped with the current time.
    pub fn new(level: Level, name: impl Into<String>, message: impl Into<String>) -> Self {
        LogEvent {
            timestamp: Utc::now(),
            level,
            name: name.into(),
            message: message.into(),
            exception: None,
            stack: None,
            extras: Map::new(),
        }
    }

    /// Overrides the capture timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attaches a captured exception.
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Attaches captured stack information.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attaches an extra field recorded by the caller.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    /// Returns when the event was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the event's severity.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the name of the logger that recorded the event.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the event's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the captured exception, if one was attached.
    pub fn exception(&self) -> Option<&ExceptionInfo> {
        self.exception.as_ref()
    }

    /// Returns the captured stack information, if any.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Returns the extra fields recorded by the caller.
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }
}

/// A captured exception: its type name, message, and optional traceback.
#[derive(Clone, Debug)]
pub struct ExceptionInfo {
    pub(crate) exc_type: String,
    pub(crate) message: String,
    pub(crate) traceback: Option<String>,
}

impl ExceptionInfo {
    /// Creates exception info from a type name and message.
    pub fn new(exc_type: impl Into<String>, message: impl Into<String>) -> Self {
        ExceptionInfo {
            exc_type: exc_type.into(),
            message: message.into(),
            traceback: None,
        }
    }

    /// Attaches the traceback captured with the exception.
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// Returns the exception's type name.
    pub fn exc_type(&self) -> &str {
        &self.exc_type
    }

    /// Returns the exception's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the captured traceback, if any.
    pub fn traceback(&self) -> Option<&str> {
        self.traceback.as_deref()
    }
}

/// Renders the way tracebacks conventionally print: the captured frames
/// first, then a final `Type: message` line.
impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(traceback) = &self.traceback {
            writeln!(f, "{}", traceback.trim_end_matches('\n'))?;
        }
        write!(f, "{}: {}", self.exc_type, self.message)
    }
}
