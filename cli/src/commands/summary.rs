use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::error::TrackerError;
use tally_core::models::DayDetail;
use tally_core::service::TrackerService;

use super::helpers::{format_weight, no_neg_zero, parse_date, print_json, truncate};

pub(crate) fn cmd_today(svc: &TrackerService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let detail = svc.day_detail(date)?;

    if json {
        return print_json(&detail);
    }
    print_day(&detail);
    Ok(())
}

fn print_day(detail: &DayDetail) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Meal")]
        name: String,
        #[tabled(rename = "Calories")]
        calories: i64,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Protein")]
        protein: String,
    }

    #[derive(Tabled)]
    struct ExerciseRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Exercise")]
        kind: String,
        #[tabled(rename = "Minutes")]
        minutes: i64,
        #[tabled(rename = "Burned")]
        burned: i64,
    }

    let s = &detail.summary;
    println!("=== {} ===\n", s.date);

    if detail.meals.is_empty() {
        println!("  No meals logged.\n");
    } else {
        let rows: Vec<MealRow> = detail
            .meals
            .iter()
            .map(|m| MealRow {
                id: m.id,
                name: truncate(&m.name, 35),
                calories: m.calories,
                fat: format!("{:.1}g", m.fat),
                carbs: format!("{:.1}g", m.carbs),
                protein: format!("{:.1}g", m.protein),
            })
            .collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        println!("{table}\n");
    }

    if !detail.exercises.is_empty() {
        let rows: Vec<ExerciseRow> = detail
            .exercises
            .iter()
            .map(|e| ExerciseRow {
                id: e.id,
                kind: e.kind.clone(),
                minutes: e.duration_minutes,
                burned: e.calories_burned,
            })
            .collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        println!("{table}\n");
    }

    println!("  CONSUMED: {} kcal", s.calories_consumed);
    println!("  BURNED:   {} kcal", s.calories_burned);
    println!("  NET:      {} kcal", s.net_calories());
    if let Some(w) = s.weight {
        println!("  WEIGHT:   {w:.1} lbs");
    }
    match (detail.budget, detail.remaining) {
        (Some(budget), Some(remaining)) => {
            let remaining = no_neg_zero(remaining);
            println!("  BUDGET:   {budget:.0} kcal");
            println!("  REMAINING: {remaining:.0} kcal");
        }
        _ => println!("\n  {}", TrackerError::NoProfile),
    }
}

pub(crate) fn cmd_history(svc: &TrackerService, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Consumed")]
        consumed: i64,
        #[tabled(rename = "Burned")]
        burned: i64,
        #[tabled(rename = "Net")]
        net: i64,
        #[tabled(rename = "Weight (lbs)")]
        weight: String,
    }

    let summaries = svc.history()?;

    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        eprintln!("No entries yet. Use `tally meal log` to record a meal.");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = summaries
        .iter()
        .map(|s| HistoryRow {
            date: s.date.clone(),
            consumed: s.calories_consumed,
            burned: s.calories_burned,
            net: s.net_calories(),
            weight: format_weight(s.weight),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

pub(crate) fn cmd_plan(svc: &TrackerService, json: bool) -> Result<()> {
    let Some(plan) = svc.plan()? else {
        return Err(TrackerError::NoProfile.into());
    };

    if json {
        return print_json(&plan);
    }

    let adjustment = no_neg_zero(plan.adjustment);
    println!("  Age:             {}", plan.age);
    println!("  Weight:          {:.1} kg", plan.weight_kg);
    println!("  BMR:             {:.0} kcal", plan.bmr);
    println!("  Maintenance:     {:.0} kcal", plan.tdee);
    println!("  Goal adjustment: {adjustment:+.0} kcal");
    println!("  Daily budget:    {:.0} kcal", plan.budget);
    println!();
    let to_goal = plan.lbs_to_goal;
    if to_goal.abs() < 0.05 {
        println!("  At goal weight ({:.1} lbs).", plan.goal_weight);
    } else {
        let verb = if to_goal > 0.0 { "lose" } else { "gain" };
        println!(
            "  {:.1} lbs to {verb} to reach {:.1} lbs.",
            to_goal.abs(),
            plan.goal_weight
        );
        match plan.weeks_to_goal {
            Some(weeks) => println!("  About {weeks:.0} weeks at the current weekly goal."),
            None => println!("  The current weekly goal does not move toward the goal weight."),
        }
    }
    Ok(())
}
