use anyhow::Result;

use tally_core::service::TrackerService;
use tally_core::units::lbs_to_kg;

use super::helpers::{print_json, weight_to_lbs};

pub(crate) fn cmd_weight(svc: &TrackerService, value: f64, unit: &str, json: bool) -> Result<()> {
    let lbs = weight_to_lbs(value, unit)?;
    let summary = svc.update_weight(lbs)?;

    if json {
        print_json(&summary)
    } else {
        println!(
            "Weight updated to {lbs:.1} lbs ({:.1} kg) for {}",
            lbs_to_kg(lbs),
            summary.date
        );
        Ok(())
    }
}
