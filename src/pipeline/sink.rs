//! Append-only result sinks.

use crate::csv;
use crate::skupszop::ResultRow;
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Column names written once at the top of the results file.
pub const HEADER: [&str; 5] = ["Title", "Author", "Price", "Condition", "Link"];

/// Destination for result rows. Any error is fatal to the run.
pub trait ResultSink: Send + Sync {
    fn append(&self, row: &ResultRow) -> Result<()>;
}

/// CSV results file. Each row is written whole and flushed before the next
/// writer gets the lock, so readers only ever see complete rows.
pub struct CsvSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl CsvSink {
    /// Creates (or truncates) the file and writes the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create results file: {}", path.display()))?;
        csv::write_row(&mut file, &HEADER)
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to write header to {}", path.display()))?;

        debug!("Created results file {}", path.display());
        Ok(Self { path, file: Mutex::new(file) })
    }

    /// Path of the results file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvSink {
    fn append(&self, row: &ResultRow) -> Result<()> {
        let line = csv::format_row(&row.to_record());

        let mut file = self.file.lock().map_err(|_| anyhow!("Results file lock poisoned"))?;
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to append to {}", self.path.display()))
    }
}
