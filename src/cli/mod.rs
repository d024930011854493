//! CLI subcommand implementations for the herorates binary.

pub mod scrape_cmd;
pub mod single_cmd;

use crate::fetch::RatesClient;
use crate::harvest::Harvester;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Options shared by the scrape and single subcommands.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub output_dir: PathBuf,
    pub base_url: String,
    pub delay_secs: f64,
    pub max_attempts: u32,
}

impl HarvestOptions {
    /// Construct the harvester these options describe.
    pub fn build_harvester(&self) -> Result<Harvester> {
        let delay = Duration::try_from_secs_f64(self.delay_secs)
            .context("--delay must be a non-negative number of seconds")?;
        let client =
            RatesClient::new(&self.base_url, delay)?.with_max_attempts(self.max_attempts);
        Harvester::new(client, &self.output_dir)
    }
}
