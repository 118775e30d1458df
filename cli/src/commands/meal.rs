use anyhow::{Result, bail};
use chrono::NaiveDate;

use tally_core::fooddata::FoodNutrients;
use tally_core::models::{MealEntry, NewMealEntry, UpdateMealEntry};
use tally_core::service::{FoodLookupProvider, TrackerService};

use super::helpers::{
    parse_date, print_candidate_table, print_json, prompt_choice, prompt_number,
};

fn print_logged(verb: &str, entry: &MealEntry) {
    let MealEntry {
        id,
        date,
        name,
        calories,
        fat,
        carbs,
        protein,
        ..
    } = entry;
    println!(
        "{verb} [{id}] {name} on {date} — {calories} kcal | P:{protein:.0}g C:{carbs:.0}g F:{fat:.0}g"
    );
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_meal_log(
    svc: &TrackerService,
    name: &str,
    calories: i64,
    fat: f64,
    carbs: f64,
    protein: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let entry = svc.log_meal(&NewMealEntry {
        date: parse_date(date)?,
        name: name.to_string(),
        calories,
        fat,
        carbs,
        protein,
    })?;

    if json {
        print_json(&entry)
    } else {
        print_logged("Logged:", &entry);
        Ok(())
    }
}

/// Search, pick a candidate, fetch its nutrients. `Ok(None)` when nothing
/// usable was found.
fn choose_food(
    svc: &TrackerService,
    provider: &dyn FoodLookupProvider,
    query: &str,
) -> Result<Option<FoodNutrients>> {
    let candidates = svc.search_foods(provider, query)?;
    let chosen = match candidates.len() {
        0 => return Ok(None),
        1 => &candidates[0],
        n => {
            print_candidate_table(&candidates);
            &candidates[prompt_choice(n)?]
        }
    };
    svc.food_nutrients(provider, chosen.reference_id)
}

fn prompt_manual_meal(name: &str, date: NaiveDate) -> Result<NewMealEntry> {
    eprintln!("Enter nutrition for '{name}' manually.");
    let calories = prompt_number("Calories", 0.0)?;
    let fat = prompt_number("Fat (g)", 0.0)?;
    let carbs = prompt_number("Carbs (g)", 0.0)?;
    let protein = prompt_number("Protein (g)", 0.0)?;
    Ok(NewMealEntry {
        date,
        name: name.to_string(),
        calories: calories.round() as i64,
        fat,
        carbs,
        protein,
    })
}

pub(crate) fn cmd_meal_lookup(
    svc: &TrackerService,
    provider: &dyn FoodLookupProvider,
    query: &str,
    quantity: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        bail!("Quantity must be greater than 0");
    }
    let date = parse_date(date)?;

    let food = match choose_food(svc, provider, query) {
        Ok(Some(food)) => Some(food),
        Ok(None) => {
            eprintln!("No nutrition data found for '{query}'.");
            None
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "food lookup failed");
            eprintln!("Food lookup failed: {e:#}");
            None
        }
    };

    let entry = match food {
        Some(food) => {
            if !json {
                let portion = food.reference_portion_g;
                eprintln!(
                    "{} ({}) — {quantity} × {portion:.0}g portion",
                    food.name, food.brand
                );
            }
            svc.log_food(&food, date, quantity)?
        }
        None => svc.log_meal(&prompt_manual_meal(query, date)?)?,
    };

    if json {
        print_json(&entry)
    } else {
        print_logged("Logged:", &entry);
        Ok(())
    }
}

pub(crate) fn cmd_meal_edit(
    svc: &TrackerService,
    id: i64,
    update: &UpdateMealEntry,
    json: bool,
) -> Result<()> {
    if update.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --name, --calories, --fat, --carbs, --protein, or --date"
        );
    }
    let entry = svc.edit_meal(id, update)?;
    if json {
        print_json(&entry)
    } else {
        print_logged("Updated:", &entry);
        Ok(())
    }
}

pub(crate) fn cmd_meal_delete(svc: &TrackerService, id: i64, json: bool) -> Result<()> {
    let entry = svc.delete_meal(id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": entry.id }));
    } else {
        let name = &entry.name;
        let date = &entry.date;
        println!("Deleted meal {id} ({name} on {date})");
    }
    Ok(())
}
