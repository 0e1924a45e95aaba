//! Command-line front end: argument parsing and the generation loop.

use crate::formatter::{Formatter, JsonFormatter, MultilineFormatter, TextFormatter};
use crate::generate::{
    ApplicationGenerator, ErrorGenerator, Generator, GraphqlGenerator, MetricsGenerator,
};
use crate::sink::{ConsoleSink, FileSink, Sink, Tee, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Generate synthetic logs for exercising log pipelines.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output encoding for generated records
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// The kind of records to generate
    #[arg(long = "type", value_enum, default_value_t = Kind::Application)]
    pub kind: Kind,

    /// Seconds to wait between records
    #[arg(long, default_value_t = 1.0)]
    pub interval: f64,

    /// Number of records to generate, 0 to run until interrupted
    #[arg(long, default_value_t = 0)]
    pub count: u64,

    /// Directory the log files are written to
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Rotate the log file before it would pass this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,

    /// Rotated files to keep
    #[arg(long, default_value_t = DEFAULT_BACKUPS)]
    pub backups: usize,
}

/// The formatting strategies the command line can select.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One JSON document per record
    Json,
    /// Pipe-delimited human-readable text
    Text,
    /// Indented JSON fenced between sentinel lines
    Multiline,
}

/// The record generators the command line can select.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Web API request/response records
    Application,
    /// Service error reports with stack traces
    Error,
    /// Host metric snapshots
    Metrics,
    /// GraphQL execution logs
    Graphql,
}

impl Cli {
    /// Runs the generation loop: build a record, format it, hand it to
    /// the sinks, sleep, repeat until `count` is reached.
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        let formatter: Box<dyn Formatter> = match self.format {
            Format::Json => Box::new(JsonFormatter::new()),
            Format::Text => Box::new(TextFormatter::new()),
            Format::Multiline => Box::new(MultilineFormatter::new()),
        };

        let mut generator: Box<dyn Generator> = match self.kind {
            Kind::Application => Box::new(ApplicationGenerator::new()),
            Kind::Error => Box::new(ErrorGenerator::new()),
            Kind::Metrics => Box::new(MetricsGenerator::new()),
            Kind::Graphql => Box::new(GraphqlGenerator::new()),
        };

        let file = FileSink::with_limits(
            &self.log_dir,
            generator.log_type(),
            self.max_bytes,
            self.backups,
        )?;
        info!(
            kind = ?self.kind,
            format = ?self.format,
            path = %file.path().display(),
            "generating logs",
        );

        let mut sink = Tee::new(file, ConsoleSink::new());
        // Negative or non-finite intervals fall back to no delay at all.
        let interval = Duration::try_from_secs_f64(self.interval).unwrap_or(Duration::ZERO);

        let mut produced = 0u64;
        loop {
            let record = generator.generate();
            let formatted = formatter.format(&record)?;
            sink.write(&formatted)?;

            produced += 1;
            if self.count > 0 && produced >= self.count {
                break;
            }

            thread::sleep(interval);
        }

        info!(produced, "log generation finished");
        Ok(())
    }
}
