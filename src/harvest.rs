//! Harvest orchestration: enumerate combinations, fetch, normalize, export.
//!
//! Combinations are processed strictly sequentially and in isolation — one
//! combination's failure never aborts the run.

use crate::audit::{AuditLogger, HarvestEvent, Outcome};
use crate::export::CsvExporter;
use crate::fetch::RatesClient;
use crate::normalize;
use crate::params::Combination;
use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Counters for one harvest run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub saved: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Drives fetch → normalize → export for each combination.
pub struct Harvester {
    client: RatesClient,
    exporter: CsvExporter,
    audit: AuditLogger,
}

impl Harvester {
    pub fn new(client: RatesClient, output_dir: &Path) -> Result<Self> {
        let exporter = CsvExporter::new(output_dir)?;
        let audit = AuditLogger::open(output_dir)?;
        Ok(Self {
            client,
            exporter,
            audit,
        })
    }

    /// Process every combination, optionally capped to the first `limit`.
    pub async fn run_all(&mut self, limit: Option<usize>) -> RunSummary {
        let mut combinations = Combination::enumerate_all();
        let total = combinations.len();
        if let Some(limit) = limit {
            combinations.truncate(limit);
            info!(
                "limited to the first {} of {total} combinations",
                combinations.len()
            );
        }

        let count = combinations.len();
        info!("starting harvest of {count} combinations");

        let mut summary = RunSummary::default();
        for (i, combination) in combinations.iter().enumerate() {
            info!("processing combination {}/{count}: {combination}", i + 1);
            self.process(combination, &mut summary).await;
        }

        info!(
            "harvest completed: saved {}, empty {}, failed {}",
            summary.saved, summary.empty, summary.failed
        );
        summary
    }

    /// Process exactly one explicit combination.
    pub async fn run_single(&mut self, combination: &Combination) -> RunSummary {
        let mut summary = RunSummary::default();
        self.process(combination, &mut summary).await;
        summary
    }

    async fn process(&mut self, combination: &Combination, summary: &mut RunSummary) {
        summary.attempted += 1;
        let url = self.client.build_url(combination).to_string();
        let started = Instant::now();

        let (outcome, records_written, file) = match self.client.fetch(combination).await {
            Err(e) => {
                error!("{combination}: {e}");
                summary.failed += 1;
                (Outcome::Failed, 0, None)
            }
            Ok(payload) => {
                let records = normalize::normalize(&payload, combination);
                if records.is_empty() {
                    warn!("{combination}: no records produced, skipping file");
                    summary.empty += 1;
                    (Outcome::Empty, 0, None)
                } else {
                    match self.exporter.write(&records, &combination.file_name()) {
                        Ok(path) => {
                            info!("saved {} records to {}", records.len(), path.display());
                            summary.saved += 1;
                            (
                                Outcome::Saved,
                                records.len(),
                                Some(path.display().to_string()),
                            )
                        }
                        Err(e) => {
                            error!("{combination}: {e:#}");
                            summary.failed += 1;
                            (Outcome::Failed, 0, None)
                        }
                    }
                }
            }
        };

        self.audit.log(&HarvestEvent {
            timestamp: Utc::now().to_rfc3339(),
            combination: combination.to_string(),
            url,
            outcome,
            records: records_written,
            file,
            duration_ms: started.elapsed().as_millis() as u64,
        });
    }
}
