use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use tally_core::service::TrackerService;

pub(crate) fn cmd_export(svc: &TrackerService, path: Option<&Path>, json: bool) -> Result<()> {
    let Some(path) = path else {
        let stdout = io::stdout();
        svc.export_csv(stdout.lock())?;
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let rows = svc.export_csv(BufWriter::new(file))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "exported": rows, "path": path.display().to_string() })
        );
    } else {
        println!("Exported {rows} days to {}", path.display());
    }
    Ok(())
}
