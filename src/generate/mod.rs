//! Synthetic record generators.
//!
//! See [`Generator`] for more details.

use crate::record::LogRecord;
use chrono::{SecondsFormat, Utc};
use rand::Rng;

mod application;
mod error;
mod graphql;
mod metrics;

pub use self::application::ApplicationGenerator;
pub use self::error::ErrorGenerator;
pub use self::graphql::GraphqlGenerator;
pub use self::metrics::MetricsGenerator;

/// A source of synthetic log records.
///
/// Each call to [`generate`] yields one record; what the record looks
/// like on the wire is decided entirely by the [`Formatter`] it is
/// handed to afterwards. Generators own their state, so independent
/// instances never influence each other.
///
/// [`generate`]: Generator::generate
/// [`Formatter`]: crate::formatter::Formatter
pub trait Generator {
    /// The kind of record produced; also names the output file.
    fn log_type(&self) -> &'static str;

    /// Builds the next record.
    fn generate(&mut self) -> LogRecord;
}

/// A payload timestamp for the current instant, microsecond precision.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Uniformly picks an element of a non-empty catalog.
pub(crate) fn pick<'a, T>(rng: &mut impl Rng, catalog: &'a [T]) -> &'a T {
    &catalog[rng.gen_range(0..catalog.len())]
}

/// Rounds to two decimal places, the precision payload floats carry.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
