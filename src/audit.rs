//! JSONL harvest log — append-only record of every processed combination.
//!
//! One line per combination, whatever the outcome, so a run's dataset and its
//! provenance travel together in the output directory.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Log file name inside the output directory.
pub const LOG_FILE_NAME: &str = "harvest.jsonl";

/// Outcome of one processed combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Records were normalized and written to a CSV file.
    Saved,
    /// The fetch succeeded but produced zero records; no file written.
    Empty,
    /// The fetch or the file write failed; the combination was skipped.
    Failed,
}

/// A single harvest event.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestEvent {
    pub timestamp: String,
    pub combination: String,
    pub url: String,
    pub outcome: Outcome,
    pub records: usize,
    pub file: Option<String>,
    pub duration_ms: u64,
}

/// Append-only JSONL logger.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create the harvest log in the output directory.
    pub fn open(output_dir: &Path) -> Result<Self> {
        let path = output_dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open harvest log {}", path.display()))?;
        Ok(Self { file })
    }

    /// Append one event. Write failures degrade to a warning; the harvest
    /// itself never stops over its log.
    pub fn log(&mut self, event: &HarvestEvent) {
        match serde_json::to_string(event) {
            Ok(line) => {
                if let Err(e) = writeln!(self.file, "{line}") {
                    warn!("harvest log write failed: {e}");
                }
            }
            Err(e) => warn!("harvest log serialize failed: {e}"),
        }
    }
}
