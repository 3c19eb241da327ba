//! Append-only writers for per-turn statistics.

use eco_core::{Result, TurnStats, STATS_HEADER};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives the header once per run, then one row per turn
pub trait StatsSink {
    fn write_header(&mut self) -> Result<()>;
    fn append(&mut self, stats: &TurnStats) -> Result<()>;
}

/// Statistics file on disk.
///
/// The header truncates any earlier content. Each row is written on its own
/// line with no trailing delimiter, so the file never ends in a newline.
pub struct CsvStatsSink {
    path: PathBuf,
}

impl CsvStatsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsSink for CsvStatsSink {
    fn write_header(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&self.path)?;
        file.write_all(STATS_HEADER.as_bytes())?;
        debug!(path = ?self.path, "Statistics file created");
        Ok(())
    }

    fn append(&mut self, stats: &TurnStats) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        write!(file, "\n{}", stats.to_row())?;
        Ok(())
    }
}

/// Keeps the statistics lines in memory
#[derive(Debug, Default)]
pub struct MemoryStatsSink {
    lines: Vec<String>,
}

impl MemoryStatsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The lines joined exactly as [`CsvStatsSink`] would write them
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

impl StatsSink for MemoryStatsSink {
    fn write_header(&mut self) -> Result<()> {
        self.lines.clear();
        self.lines.push(STATS_HEADER.to_string());
        Ok(())
    }

    fn append(&mut self, stats: &TurnStats) -> Result<()> {
        self.lines.push(stats.to_row());
        Ok(())
    }
}
