//! Keeps the `daily_log` rollup in step with the meal and exercise logs.
//!
//! Consumed calories are recomputed from the meal log on every call. Burned
//! calories are maintained incrementally by the exercise workflow and are
//! never touched by [`recompute_summary`].

use anyhow::Result;
use chrono::NaiveDate;

use crate::db::Database;
use crate::models::DailySummary;

fn read_back(db: &Database, date: NaiveDate) -> Result<DailySummary> {
    Ok(db
        .get_daily_summary(date)?
        .unwrap_or_else(|| DailySummary::empty(date)))
}

/// Recompute consumed calories and the weight snapshot for `date`.
///
/// An existing row keeps its burned calories. With no profile the weight is
/// recorded as unknown.
pub fn recompute_summary(db: &Database, date: NaiveDate) -> Result<DailySummary> {
    db.atomically(|| {
        let consumed = db.sum_meal_calories(date)?;
        let weight = db.current_weight()?;
        db.upsert_consumed(date, consumed, weight)?;
        tracing::debug!(%date, consumed, ?weight, "daily summary recomputed");
        read_back(db, date)
    })
}

/// Fold a new exercise entry's burn into the row for `date`.
///
/// A missing row is created from the current meal total and profile weight.
pub fn record_exercise(db: &Database, date: NaiveDate, calories_burned: i64) -> Result<DailySummary> {
    db.atomically(|| {
        let consumed = db.sum_meal_calories(date)?;
        let weight = db.current_weight()?;
        db.add_burned(date, calories_burned, consumed, weight)?;
        tracing::debug!(%date, calories_burned, "exercise burn added to daily summary");
        read_back(db, date)
    })
}

/// Take a deleted exercise entry's burn back out of the row for `date`.
pub fn retract_exercise(db: &Database, date: NaiveDate, calories_burned: i64) -> Result<DailySummary> {
    db.atomically(|| {
        db.subtract_burned(date, calories_burned)?;
        tracing::debug!(%date, calories_burned, "exercise burn removed from daily summary");
        read_back(db, date)
    })
}
