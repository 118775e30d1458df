use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::DailySummary;

#[derive(Serialize)]
struct SummaryRow<'a> {
    date: &'a str,
    calories_consumed: i64,
    calories_burned: i64,
    weight: Option<f64>,
}

/// Write summaries as CSV with a `date,calories_consumed,calories_burned,weight`
/// header. Rows are written in the order given; a missing weight is an empty
/// field. Returns the number of rows written.
pub fn write_summaries_csv<W: Write>(writer: W, summaries: &[DailySummary]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written explicitly so an empty export still carries the header.
    wtr.write_record(["date", "calories_consumed", "calories_burned", "weight"])
        .context("Failed to write CSV header")?;
    for s in summaries {
        wtr.serialize(SummaryRow {
            date: &s.date,
            calories_consumed: s.calories_consumed,
            calories_burned: s.calories_burned,
            weight: s.weight,
        })
        .with_context(|| format!("Failed to write CSV row for {}", s.date))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(summaries.len())
}
