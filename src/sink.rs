//! Destinations for formatted records.
//!
//! See [`Sink`] for more details.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rotate log files once they would pass this size.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated files kept around before the oldest is dropped.
pub const DEFAULT_BACKUPS: usize = 5;

/// A destination for formatted records.
///
/// Sinks receive exactly the text a [`Formatter`] produced and append a
/// single trailing newline; they never inspect or rewrite the content.
///
/// [`Formatter`]: crate::formatter::Formatter
pub trait Sink {
    /// Writes one formatted record.
    fn write(&mut self, formatted: &str) -> io::Result<()>;
}

/// Appends records to `<dir>/<log_type>.log`, rotating the file before
/// a write would push it past `max_bytes`.
///
/// Rotation renames the live file to `.1` after shifting existing
/// backups up one slot, so `.1` is always the most recent backup and
/// the oldest is dropped once `backups` files exist.
pub struct FileSink {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    backups: usize,
}

impl FileSink {
    /// Opens a sink for `log_type` under `dir` with the default
    /// rotation limits, creating the directory if needed.
    pub fn create(dir: &Path, log_type: &str) -> io::Result<Self> {
        FileSink::with_limits(dir, log_type, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    /// Opens a sink with explicit rotation limits. A `max_bytes` of
    /// zero disables rotation.
    pub fn with_limits(
        dir: &Path,
        log_type: &str,
        max_bytes: u64,
        backups: usize,
    ) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{}.log", log_type));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(FileSink {
            path,
            file,
            written,
            max_bytes,
            backups,
        })
    }

    /// Returns the path of the live log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        debug!(path = %self.path.display(), "rotating log file");

        for slot in (1..self.backups).rev() {
            let from = backup_path(&self.path, slot);
            if from.exists() {
                fs::rename(&from, backup_path(&self.path, slot + 1))?;
            }
        }

        if self.backups > 0 {
            fs::rename(&self.path, backup_path(&self.path, 1))?;
        } else {
            fs::remove_file(&self.path)?;
        }

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Sink for FileSink {
    fn write(&mut self, formatted: &str) -> io::Result<()> {
        let incoming = formatted.len() as u64 + 1;

        // A non-empty file rotates rather than grow past the limit; an
        // oversized first record is written anyway.
        if self.max_bytes > 0 && self.written > 0 && self.written + incoming > self.max_bytes {
            self.rotate()?;
        }

        self.file.write_all(formatted.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += incoming;
        Ok(())
    }
}

fn backup_path(path: &Path, slot: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", slot));
    PathBuf::from(name)
}

/// Writes records to standard output.
pub struct ConsoleSink {
    stdout: io::Stdout,
}

impl ConsoleSink {
    /// Construct a new [`ConsoleSink`].
    pub fn new() -> Self {
        ConsoleSink {
            stdout: io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        ConsoleSink::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, formatted: &str) -> io::Result<()> {
        let mut handle = self.stdout.lock();
        handle.write_all(formatted.as_bytes())?;
        handle.write_all(b"\n")
    }
}

/// Fans each record out to two sinks in order, typically a log file and
/// the console.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A, B> Tee<A, B> {
    /// Construct a new [`Tee`] over two sinks.
    pub fn new(first: A, second: B) -> Self {
        Tee { first, second }
    }
}

impl<A: Sink, B: Sink> Sink for Tee<A, B> {
    fn write(&mut self, formatted: &str) -> io::Result<()> {
        self.first.write(formatted)?;
        self.second.write(formatted)
    }
}
