//! `herorates single` — harvest one explicit combination.

use super::HarvestOptions;
use crate::params::{Combination, InputMethod, Region, Role, Tier};
use anyhow::Result;

/// Run the single command.
///
/// All of input, region, role, rq, and tier must be supplied (map has a
/// default); otherwise this fails before any network activity, listing every
/// missing flag at once.
pub async fn run(
    options: &HarvestOptions,
    input: Option<InputMethod>,
    map: String,
    region: Option<Region>,
    role: Option<Role>,
    rq: Option<u8>,
    tier: Option<Tier>,
) -> Result<()> {
    let missing: Vec<&str> = [
        input.is_none().then_some("--input"),
        region.is_none().then_some("--region"),
        role.is_none().then_some("--role"),
        rq.is_none().then_some("--rq"),
        tier.is_none().then_some("--tier"),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (Some(input), Some(region), Some(role), Some(rq), Some(tier)) =
        (input, region, role, rq, tier)
    else {
        anyhow::bail!(
            "missing required parameters for a single harvest: {}",
            missing.join(", ")
        );
    };

    let combination = Combination {
        input,
        map,
        region,
        role,
        rq,
        tier,
    };

    let mut harvester = options.build_harvester()?;
    let summary = harvester.run_single(&combination).await;
    if summary.saved == 1 {
        println!("single harvest completed: {}", combination.file_name());
    } else {
        println!("single harvest produced no file (see log for details)");
    }
    Ok(())
}
