use anyhow::{Context, Result, bail};
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::fooddata::FoodCandidate;
use tally_core::units::{feet_inches_to_cm, kg_to_lbs};

/// Resolve a log date: `today`, `yesterday`, `tomorrow` or `YYYY-MM-DD`.
/// No date means today.
pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    let Some(raw) = date_str else {
        return Ok(today);
    };
    match raw.trim().to_lowercase().as_str() {
        "" | "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        "tomorrow" => Ok(today + Duration::days(1)),
        s => NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
            format!("Invalid date '{raw}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
        }),
    }
}

/// Convert a weight in `unit` (`lbs` or `kg`) to pounds.
pub(crate) fn weight_to_lbs(value: f64, unit: &str) -> Result<f64> {
    match unit.to_lowercase().as_str() {
        "lbs" | "lb" => Ok(value),
        "kg" => {
            let lbs = no_neg_zero(kg_to_lbs(value));
            eprintln!("Converting {value:.1} kg → {lbs:.1} lbs");
            Ok(lbs)
        }
        _ => bail!("Invalid unit '{unit}'. Use 'lbs' or 'kg'"),
    }
}

/// Height from either centimeters or feet plus inches.
pub(crate) fn height_cm(cm: Option<f64>, feet: Option<f64>, inches: Option<f64>) -> Option<f64> {
    match (cm, feet, inches) {
        (Some(cm), _, _) => Some(cm),
        (None, None, None) => None,
        (None, feet, inches) => Some(feet_inches_to_cm(
            feet.unwrap_or(0.0),
            inches.unwrap_or(0.0),
        )),
    }
}

fn read_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = stdin.lock().lines().next().context("No input")??;
    Ok(line.trim().to_string())
}

pub(crate) fn prompt_choice(count: usize) -> Result<usize> {
    let line = read_line(&format!("\nSelect a food (1-{count}): "))?;
    let n: usize = line.parse().context("Invalid number")?;
    if n < 1 || n > count {
        bail!("Selection out of range");
    }
    Ok(n - 1)
}

/// Prompt for a non-negative number. An empty answer yields `default`.
pub(crate) fn prompt_number(label: &str, default: f64) -> Result<f64> {
    let line = read_line(&format!("{label} [{default}]: "))?;
    if line.is_empty() {
        return Ok(default);
    }
    let value: f64 = line
        .parse()
        .with_context(|| format!("Invalid number for {label}: '{line}'"))?;
    if !value.is_finite() || value < 0.0 {
        bail!("{label} must not be negative");
    }
    Ok(value)
}

pub(crate) fn print_candidate_table(foods: &[FoodCandidate]) {
    #[derive(Tabled)]
    struct CandidateRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "FDC ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Brand")]
        brand: String,
    }

    let rows: Vec<CandidateRow> = foods
        .iter()
        .enumerate()
        .map(|(i, f)| CandidateRow {
            idx: i + 1,
            id: f.reference_id,
            name: truncate(&f.name, 45),
            brand: truncate(&f.brand, 25),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..2)).with(Alignment::right()))
        .to_string();
    eprintln!("{table}");
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn json_error(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Keeps `-0` out of printed kcal values.
pub(crate) fn no_neg_zero(v: f64) -> f64 {
    v + 0.0
}

pub(crate) fn format_weight(lbs: Option<f64>) -> String {
    lbs.map_or_else(|| "-".to_string(), |w| format!("{w:.1}"))
}

/// Shorten a food name for a table cell, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
