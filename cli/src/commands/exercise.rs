use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::models::{EXERCISE_CATALOG, NewExerciseEntry};
use tally_core::service::TrackerService;

use super::helpers::{parse_date, print_json};

pub(crate) fn cmd_exercise_log(
    svc: &TrackerService,
    kind: &str,
    minutes: i64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let entry = svc.log_exercise(&NewExerciseEntry {
        date: parse_date(date)?,
        kind: kind.to_string(),
        duration_minutes: minutes,
    })?;

    if json {
        print_json(&entry)
    } else {
        let id = entry.id;
        let kind = &entry.kind;
        let date = &entry.date;
        let burned = entry.calories_burned;
        println!("Logged: [{id}] {kind} {minutes} min on {date} — {burned} kcal burned");
        Ok(())
    }
}

pub(crate) fn cmd_exercise_delete(svc: &TrackerService, id: i64, json: bool) -> Result<()> {
    let entry = svc.delete_exercise(id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": entry.id }));
    } else {
        let kind = &entry.kind;
        let date = &entry.date;
        println!("Deleted exercise {id} ({kind} on {date})");
    }
    Ok(())
}

pub(crate) fn cmd_exercise_kinds(json: bool) -> Result<()> {
    if json {
        return print_json(&EXERCISE_CATALOG);
    }

    #[derive(Tabled)]
    struct KindRow {
        #[tabled(rename = "Exercise")]
        name: &'static str,
        #[tabled(rename = "kcal/min")]
        rate: String,
        #[tabled(rename = "kcal/30min")]
        half_hour: i64,
    }

    let rows: Vec<KindRow> = EXERCISE_CATALOG
        .iter()
        .map(|k| KindRow {
            name: k.name,
            rate: format!("{:.1}", k.kcal_per_minute),
            half_hour: k.calories_for(30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}
