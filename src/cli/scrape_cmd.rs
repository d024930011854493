//! `herorates scrape` — harvest every parameter combination.

use super::HarvestOptions;
use anyhow::Result;

/// Run the scrape command.
pub async fn run(options: &HarvestOptions, limit: Option<usize>) -> Result<()> {
    let mut harvester = options.build_harvester()?;
    let summary = harvester.run_all(limit).await;
    println!(
        "harvest finished: {} saved, {} empty, {} failed out of {} attempted",
        summary.saved, summary.empty, summary.failed, summary.attempted
    );
    Ok(())
}
