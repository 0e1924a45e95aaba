//! Synthetic log generation with pluggable output formatting.
//!
//! `logsynth` produces realistic-looking application, error, metrics,
//! and GraphQL logs and renders them through one of three formatting
//! strategies, so log pipelines can be exercised end to end without a
//! real workload behind them.
//!
//! # Records
//!
//! Everything flows through [`LogRecord`], which has two shapes: a
//! free-form structured mapping, which is what the built-in generators
//! produce, and a platform [`LogEvent`] carrying the fixed fields a
//! logging framework records at a call site. Formatters dispatch on
//! the shape, and structured records are normalized so `timestamp`,
//! `level`, and `message` are always present in rendered output.
//!
//! # Formatting strategies
//!
//! * [`JsonFormatter`] renders one JSON document per record, optionally
//!   indented, optionally with non-ASCII escaped.
//! * [`TextFormatter`] renders a pipe-delimited summary line and moves
//!   multi-line content (stack traces, query bodies) below it.
//! * [`MultilineFormatter`] fences indented JSON between `BEGIN_LOG`
//!   and `END_LOG` lines for line-oriented collectors that reassemble
//!   multi-line records.
//!
//! All three implement [`Formatter`] and can be driven by anything that
//! yields records, not just the bundled generators.
//!
//! # Examples
//!
//! Formatting a structured record as JSON:
//!
//! ```
//! use logsynth::formatter::{Formatter, JsonFormatter};
//! use logsynth::record::LogRecord;
//! use serde_json::json;
//!
//! let formatter = JsonFormatter::new();
//! let record = LogRecord::Structured(json!({ "service": "web-api" }));
//!
//! let line = formatter.format(&record)?;
//! assert_eq!(
//!     line,
//!     r#"{"timestamp":null,"level":"INFO","message":"","service":"web-api"}"#,
//! );
//! # Ok::<(), logsynth::formatter::FormatError>(())
//! ```
//!
//! Generating records and writing them through a rotating file sink:
//!
//! ```no_run
//! use logsynth::formatter::{Formatter, TextFormatter};
//! use logsynth::generate::{ApplicationGenerator, Generator};
//! use logsynth::sink::{FileSink, Sink};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let formatter = TextFormatter::new();
//! let mut generator = ApplicationGenerator::new();
//! let mut sink = FileSink::create(Path::new("./logs"), generator.log_type())?;
//!
//! for _ in 0..16 {
//!     let record = generator.generate();
//!     sink.write(&formatter.format(&record)?)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # The `logsynth` binary
//!
//! The bundled binary wires a generator, a strategy, and a rotating
//! file sink together behind command-line flags:
//!
//! ```text
//! logsynth --format multiline --type graphql --interval 0.5 --count 100
//! ```

pub mod cli;
pub mod formatter;
pub mod generate;
pub mod record;
pub mod sink;

pub use crate::formatter::{
    FormatError, Formatter, JsonFormatter, MultilineFormatter, TextFormatter,
};
pub use crate::generate::Generator;
pub use crate::record::{ExceptionInfo, LogEvent, LogRecord};
pub use crate::sink::Sink;
