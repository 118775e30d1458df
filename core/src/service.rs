use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::aggregate;
use crate::budget::{self, BudgetPlan};
use crate::db::Database;
use crate::error::TrackerError;
use crate::export;
use crate::fooddata::{FoodCandidate, FoodNutrients};
use crate::models::{
    DailySummary, DayDetail, ExerciseEntry, MealEntry, NewExerciseEntry, NewMealEntry, NewProfile,
    Profile, UpdateMealEntry, find_exercise_kind, validate_duration, validate_meal_update,
    validate_new_meal, validate_profile, validate_weight,
};

/// External food database.
///
/// The CLI implements this with reqwest against USDA `FoodData Central`.
/// Calls are synchronous; nutrients are per [`crate::fooddata::REFERENCE_GRAMS`].
pub trait FoodLookupProvider: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<FoodCandidate>>;
    fn nutrients(&self, reference_id: i64) -> Result<Option<FoodNutrients>>;
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct TrackerService {
    db: Database,
}

impl TrackerService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    // --- Profile ---

    pub fn get_profile(&self) -> Result<Option<Profile>> {
        self.db.get_profile()
    }

    pub fn require_profile(&self) -> Result<Profile> {
        self.db.get_profile()?.ok_or_else(|| TrackerError::NoProfile.into())
    }

    /// Replace the profile wholesale. A new weight is carried into today's
    /// summary.
    pub fn set_profile(&self, profile: &NewProfile) -> Result<Profile> {
        self.set_profile_on(profile, today())
    }

    pub fn set_profile_on(&self, profile: &NewProfile, today: NaiveDate) -> Result<Profile> {
        validate_profile(profile, today)?;
        let saved = self.db.atomically(|| {
            let previous_weight = self.db.current_weight()?;
            let saved = self.db.replace_profile(profile)?;
            if previous_weight.is_none_or(|w| (w - saved.weight).abs() > f64::EPSILON) {
                aggregate::recompute_summary(&self.db, today)?;
            }
            Ok(saved)
        })?;
        tracing::info!(
            weight = saved.weight,
            goal_weight = saved.goal_weight,
            activity = %saved.activity_level,
            "profile saved"
        );
        Ok(saved)
    }

    /// Change the profile weight and refresh today's summary with it.
    pub fn update_weight(&self, weight: f64) -> Result<DailySummary> {
        self.update_weight_on(weight, today())
    }

    pub fn update_weight_on(&self, weight: f64, today: NaiveDate) -> Result<DailySummary> {
        validate_weight(weight)?;
        self.db.atomically(|| {
            if !self.db.set_profile_weight(weight)? {
                return Err(TrackerError::NoProfile.into());
            }
            aggregate::recompute_summary(&self.db, today)
        })
    }

    // --- Budget ---

    /// `None` until a profile exists.
    pub fn daily_budget(&self) -> Result<Option<f64>> {
        self.daily_budget_on(today())
    }

    pub fn daily_budget_on(&self, today: NaiveDate) -> Result<Option<f64>> {
        let profile = self.db.get_profile()?;
        Ok(budget::compute_daily_budget(profile.as_ref(), today))
    }

    pub fn plan(&self) -> Result<Option<BudgetPlan>> {
        self.plan_on(today())
    }

    pub fn plan_on(&self, today: NaiveDate) -> Result<Option<BudgetPlan>> {
        Ok(self
            .db
            .get_profile()?
            .map(|p| budget::plan_for(&p, today)))
    }

    // --- Meals ---

    pub fn log_meal(&self, meal: &NewMealEntry) -> Result<MealEntry> {
        validate_new_meal(meal)?;
        self.db.atomically(|| {
            let entry = self.db.insert_meal_entry(meal)?;
            aggregate::recompute_summary(&self.db, meal.date)?;
            Ok(entry)
        })
    }

    /// Log `quantity` portions of a looked-up food.
    pub fn log_food(
        &self,
        food: &FoodNutrients,
        date: NaiveDate,
        quantity: f64,
    ) -> Result<MealEntry> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(TrackerError::Validation("Quantity must be greater than 0".into()).into());
        }
        self.log_meal(&food.to_meal(date, quantity))
    }

    pub fn get_meal(&self, id: i64) -> Result<MealEntry> {
        self.db.get_meal_entry(id)
    }

    /// Apply a partial edit. The summary is always recomputed, for both dates
    /// when the entry moves.
    pub fn edit_meal(&self, id: i64, update: &UpdateMealEntry) -> Result<MealEntry> {
        validate_meal_update(update)?;
        self.db.atomically(|| {
            let before = self.db.get_meal_entry(id)?;
            let after = self.db.update_meal_entry(id, update)?;
            let new_date = parse_stored_date(&after.date)?;
            aggregate::recompute_summary(&self.db, new_date)?;
            if before.date != after.date {
                aggregate::recompute_summary(&self.db, parse_stored_date(&before.date)?)?;
            }
            Ok(after)
        })
    }

    pub fn delete_meal(&self, id: i64) -> Result<MealEntry> {
        self.db.atomically(|| {
            let entry = self.db.get_meal_entry(id)?;
            if !self.db.delete_meal_entry(id)? {
                return Err(TrackerError::meal_not_found(id).into());
            }
            aggregate::recompute_summary(&self.db, parse_stored_date(&entry.date)?)?;
            Ok(entry)
        })
    }

    // --- Exercise ---

    pub fn log_exercise(&self, exercise: &NewExerciseEntry) -> Result<ExerciseEntry> {
        validate_duration(exercise.duration_minutes)?;
        let kind = find_exercise_kind(&exercise.kind)?;
        let burned = kind.calories_for(exercise.duration_minutes);
        self.db.atomically(|| {
            let entry = self.db.insert_exercise_entry(
                exercise.date,
                kind.name,
                exercise.duration_minutes,
                burned,
            )?;
            aggregate::record_exercise(&self.db, exercise.date, burned)?;
            Ok(entry)
        })
    }

    pub fn delete_exercise(&self, id: i64) -> Result<ExerciseEntry> {
        self.db.atomically(|| {
            let entry = self.db.get_exercise_entry(id)?;
            if !self.db.delete_exercise_entry(id)? {
                return Err(TrackerError::exercise_not_found(id).into());
            }
            aggregate::retract_exercise(
                &self.db,
                parse_stored_date(&entry.date)?,
                entry.calories_burned,
            )?;
            Ok(entry)
        })
    }

    // --- Daily log ---

    pub fn recompute_summary(&self, date: NaiveDate) -> Result<DailySummary> {
        aggregate::recompute_summary(&self.db, date)
    }

    pub fn get_daily_summary(&self, date: NaiveDate) -> Result<Option<DailySummary>> {
        self.db.get_daily_summary(date)
    }

    /// Summary, entries and remaining budget for one date. Dates with nothing
    /// logged get an empty summary.
    pub fn day_detail(&self, date: NaiveDate) -> Result<DayDetail> {
        let summary = self
            .db
            .get_daily_summary(date)?
            .unwrap_or_else(|| DailySummary::empty(date));
        let meals = self.db.get_meals_for_date(date)?;
        let exercises = self.db.get_exercises_for_date(date)?;
        let budget = self.daily_budget_on(date)?;
        #[allow(clippy::cast_precision_loss)]
        let remaining = budget.map(|b| {
            let left = b - summary.calories_consumed as f64 + summary.calories_burned as f64;
            (left * 100.0).round() / 100.0
        });
        Ok(DayDetail {
            summary,
            meals,
            exercises,
            budget,
            remaining,
        })
    }

    /// Every summary row, oldest first.
    pub fn history(&self) -> Result<Vec<DailySummary>> {
        self.db.get_all_daily_summaries()
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let rows = self.db.get_all_daily_summaries()?;
        export::write_summaries_csv(writer, &rows)
    }

    // --- Food lookup ---

    pub fn search_foods(
        &self,
        provider: &dyn FoodLookupProvider,
        query: &str,
    ) -> Result<Vec<FoodCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TrackerError::Validation("Search query must not be empty".into()).into());
        }
        provider
            .search(query)
            .with_context(|| format!("Food search for '{query}' failed"))
    }

    pub fn food_nutrients(
        &self,
        provider: &dyn FoodLookupProvider,
        reference_id: i64,
    ) -> Result<Option<FoodNutrients>> {
        provider
            .nutrients(reference_id)
            .with_context(|| format!("Nutrient lookup for food {reference_id} failed"))
    }
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid stored date '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::is_not_found;
    use crate::fooddata::{Amount, NutrientProfile, UNKNOWN_BRAND};
    use crate::models::{ActivityLevel, Gender};

    struct MockProvider {
        foods: Vec<FoodNutrients>,
    }

    impl FoodLookupProvider for MockProvider {
        fn search(&self, query: &str) -> Result<Vec<FoodCandidate>> {
            let query = query.to_lowercase();
            Ok(self
                .foods
                .iter()
                .enumerate()
                .filter(|(_, f)| f.name.to_lowercase().contains(&query))
                .map(|(i, f)| FoodCandidate {
                    reference_id: i as i64,
                    name: f.name.clone(),
                    brand: f.brand.clone(),
                })
                .collect())
        }

        fn nutrients(&self, reference_id: i64) -> Result<Option<FoodNutrients>> {
            Ok(usize::try_from(reference_id)
                .ok()
                .and_then(|i| self.foods.get(i))
                .cloned())
        }
    }

    struct FailingProvider;

    impl FoodLookupProvider for FailingProvider {
        fn search(&self, _query: &str) -> Result<Vec<FoodCandidate>> {
            anyhow::bail!("connection refused")
        }

        fn nutrients(&self, _reference_id: i64) -> Result<Option<FoodNutrients>> {
            anyhow::bail!("connection refused")
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn sample_profile() -> NewProfile {
        NewProfile {
            goal_weight: 165.0,
            weekly_weight_change: 1.0,
            activity_level: ActivityLevel::HighlyActive,
            gender: Gender::Male,
            birthdate: NaiveDate::from_ymd_opt(1994, 1, 1).unwrap(),
            weight: 180.0,
            height_cm: 175.0,
        }
    }

    fn meal(calories: i64) -> NewMealEntry {
        NewMealEntry {
            date: day(),
            name: "Burrito".to_string(),
            calories,
            fat: 20.0,
            carbs: 60.0,
            protein: 25.0,
        }
    }

    fn run(minutes: i64) -> NewExerciseEntry {
        NewExerciseEntry {
            date: day(),
            kind: "running".to_string(),
            duration_minutes: minutes,
        }
    }

    fn summary(svc: &TrackerService) -> DailySummary {
        svc.get_daily_summary(day()).unwrap().unwrap()
    }

    #[test]
    fn test_meal_then_exercise() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.log_meal(&meal(500)).unwrap();
        let walk = NewExerciseEntry {
            date: day(),
            kind: "walking".to_string(),
            duration_minutes: 75,
        };
        let entry = svc.log_exercise(&walk).unwrap();
        assert_eq!(entry.calories_burned, 300);

        let s = summary(&svc);
        assert_eq!(s.calories_consumed, 500);
        assert_eq!(s.calories_burned, 300);
    }

    #[test]
    fn test_edit_meal_calories_replaces() {
        let svc = TrackerService::new_in_memory().unwrap();
        let entry = svc.log_meal(&meal(500)).unwrap();
        svc.edit_meal(
            entry.id,
            &UpdateMealEntry {
                calories: Some(700),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(summary(&svc).calories_consumed, 700);
    }

    #[test]
    fn test_edit_meal_name_only_keeps_other_fields() {
        let svc = TrackerService::new_in_memory().unwrap();
        let entry = svc.log_meal(&meal(500)).unwrap();
        let edited = svc
            .edit_meal(
                entry.id,
                &UpdateMealEntry {
                    name: Some("Big burrito".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.name, "Big burrito");
        assert_eq!(edited.calories, 500);
        assert!((edited.protein - 25.0).abs() < f64::EPSILON);
        assert_eq!(summary(&svc).calories_consumed, 500);
    }

    #[test]
    fn test_edit_meal_date_moves_calories() {
        let svc = TrackerService::new_in_memory().unwrap();
        let entry = svc.log_meal(&meal(500)).unwrap();
        let next_day = day().succ_opt().unwrap();
        svc.edit_meal(
            entry.id,
            &UpdateMealEntry {
                date: Some(next_day),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(summary(&svc).calories_consumed, 0);
        assert_eq!(
            svc.get_daily_summary(next_day)
                .unwrap()
                .unwrap()
                .calories_consumed,
            500
        );
    }

    #[test]
    fn test_edit_missing_meal_not_found() {
        let svc = TrackerService::new_in_memory().unwrap();
        let err = svc
            .edit_meal(
                42,
                &UpdateMealEntry {
                    calories: Some(100),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_delete_only_meal_keeps_burned() {
        let svc = TrackerService::new_in_memory().unwrap();
        let entry = svc.log_meal(&meal(500)).unwrap();
        svc.log_exercise(&run(30)).unwrap();

        let deleted = svc.delete_meal(entry.id).unwrap();
        assert_eq!(deleted.id, entry.id);

        let s = summary(&svc);
        assert_eq!(s.calories_consumed, 0);
        assert_eq!(s.calories_burned, 330);
    }

    #[test]
    fn test_delete_missing_meal_not_found() {
        let svc = TrackerService::new_in_memory().unwrap();
        let err = svc.delete_meal(7).unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_exercise_additivity() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.log_exercise(&run(10)).unwrap();
        svc.log_exercise(&NewExerciseEntry {
            date: day(),
            kind: "Yoga".to_string(),
            duration_minutes: 20,
        })
        .unwrap();
        let s = summary(&svc);
        assert_eq!(s.calories_burned, 110 + 60);
        assert_eq!(s.calories_consumed, 0);
        assert!(s.weight.is_none());
    }

    #[test]
    fn test_delete_exercise_subtracts_burn() {
        let svc = TrackerService::new_in_memory().unwrap();
        let first = svc.log_exercise(&run(10)).unwrap();
        svc.log_exercise(&run(20)).unwrap();
        svc.delete_exercise(first.id).unwrap();
        assert_eq!(summary(&svc).calories_burned, 220);

        let err = svc.delete_exercise(first.id).unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_exercise_validation_leaves_store_unchanged() {
        let svc = TrackerService::new_in_memory().unwrap();
        let err = svc.log_exercise(&run(0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::Validation(_))
        ));
        let err = svc
            .log_exercise(&NewExerciseEntry {
                date: day(),
                kind: "underwater basket weaving".to_string(),
                duration_minutes: 30,
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::Validation(_))
        ));
        assert!(svc.get_daily_summary(day()).unwrap().is_none());
        assert!(svc.day_detail(day()).unwrap().exercises.is_empty());
    }

    #[test]
    fn test_negative_calories_rejected() {
        let svc = TrackerService::new_in_memory().unwrap();
        assert!(svc.log_meal(&meal(-5)).is_err());
        assert!(svc.get_daily_summary(day()).unwrap().is_none());

        let entry = svc.log_meal(&meal(500)).unwrap();
        let err = svc
            .edit_meal(
                entry.id,
                &UpdateMealEntry {
                    calories: Some(-1),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.downcast_ref::<TrackerError>().is_some());
        assert_eq!(svc.get_meal(entry.id).unwrap().calories, 500);
    }

    #[test]
    fn test_logging_without_profile_records_unknown_weight() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.log_meal(&meal(400)).unwrap();
        let s = summary(&svc);
        assert_eq!(s.calories_consumed, 400);
        assert!(s.weight.is_none());
        assert!(svc.daily_budget_on(day()).unwrap().is_none());
        assert!(svc.plan_on(day()).unwrap().is_none());
    }

    #[test]
    fn test_update_weight_preserves_burned() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.set_profile_on(&sample_profile(), day()).unwrap();
        svc.log_exercise(&run(30)).unwrap();

        let s = svc.update_weight_on(178.5, day()).unwrap();
        assert_eq!(s.calories_burned, 330);
        assert_eq!(s.weight, Some(178.5));
        assert!((svc.get_profile().unwrap().unwrap().weight - 178.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_weight_without_profile() {
        let svc = TrackerService::new_in_memory().unwrap();
        let err = svc.update_weight_on(170.0, day()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::NoProfile)
        ));
        assert!(svc.get_daily_summary(day()).unwrap().is_none());
        assert!(matches!(
            svc.require_profile().unwrap_err().downcast_ref::<TrackerError>(),
            Some(TrackerError::NoProfile)
        ));
    }

    #[test]
    fn test_set_profile_replaces() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.set_profile_on(&sample_profile(), day()).unwrap();
        let mut changed = NewProfile::from(&svc.require_profile().unwrap());
        changed.activity_level = ActivityLevel::NotActive;
        changed.goal_weight = 170.0;
        let saved = svc.set_profile_on(&changed, day()).unwrap();
        assert_eq!(saved.activity_level, ActivityLevel::NotActive);
        assert!((saved.goal_weight - 170.0).abs() < f64::EPSILON);
        assert!((saved.weight - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_profile_weight_change_refreshes_summary() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.set_profile_on(&sample_profile(), day()).unwrap();
        svc.log_meal(&meal(500)).unwrap();
        svc.log_exercise(&run(30)).unwrap();
        assert_eq!(summary(&svc).weight, Some(180.0));

        let lighter = NewProfile {
            weight: 170.0,
            ..sample_profile()
        };
        svc.set_profile_on(&lighter, day()).unwrap();

        let s = summary(&svc);
        assert_eq!(s.weight, Some(170.0));
        assert_eq!(s.calories_consumed, 500);
        assert_eq!(s.calories_burned, 330);
    }

    #[test]
    fn test_set_profile_first_time_snapshots_weight() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.log_meal(&meal(250)).unwrap();
        assert!(summary(&svc).weight.is_none());

        svc.set_profile_on(&sample_profile(), day()).unwrap();
        let s = summary(&svc);
        assert_eq!(s.weight, Some(180.0));
        assert_eq!(s.calories_consumed, 250);
    }

    #[test]
    fn test_exercise_without_profile_records_unknown_weight() {
        let svc = TrackerService::new_in_memory().unwrap();
        let entry = svc.log_exercise(&run(20)).unwrap();
        assert_eq!(entry.calories_burned, 220);

        let s = summary(&svc);
        assert_eq!(s.calories_burned, 220);
        assert_eq!(s.calories_consumed, 0);
        assert!(s.weight.is_none());
    }

    #[test]
    fn test_set_profile_rejects_future_birthdate() {
        let svc = TrackerService::new_in_memory().unwrap();
        let mut p = sample_profile();
        p.birthdate = day().succ_opt().unwrap();
        assert!(svc.set_profile_on(&p, day()).is_err());
        assert!(svc.get_profile().unwrap().is_none());
    }

    #[test]
    fn test_daily_budget_reference_profile() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.set_profile_on(&sample_profile(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .unwrap();
        let budget = svc
            .daily_budget_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .unwrap()
            .unwrap();
        assert!((budget - 2188.87).abs() < 1e-9);
    }

    #[test]
    fn test_day_detail_remaining() {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.set_profile_on(&sample_profile(), day()).unwrap();
        svc.log_meal(&meal(500)).unwrap();
        svc.log_exercise(&run(30)).unwrap();

        let detail = svc.day_detail(day()).unwrap();
        assert_eq!(detail.meals.len(), 1);
        assert_eq!(detail.exercises.len(), 1);
        let budget = detail.budget.unwrap();
        let remaining = detail.remaining.unwrap();
        assert!((remaining - (budget - 500.0 + 330.0)).abs() < 1e-6);
    }

    #[test]
    fn test_day_detail_empty_day() {
        let svc = TrackerService::new_in_memory().unwrap();
        let detail = svc.day_detail(day()).unwrap();
        assert_eq!(detail.summary, DailySummary::empty(day()));
        assert!(detail.budget.is_none());
        assert!(detail.remaining.is_none());
    }

    #[test]
    fn test_history_and_export_ordered() {
        let svc = TrackerService::new_in_memory().unwrap();
        let later = NewMealEntry {
            date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            ..meal(300)
        };
        svc.log_meal(&later).unwrap();
        svc.log_meal(&meal(500)).unwrap();

        let history = svc.history().unwrap();
        let dates: Vec<&str> = history.iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, ["2024-06-15", "2024-06-20"]);

        let mut out = Vec::new();
        assert_eq!(svc.export_csv(&mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,calories_consumed,calories_burned,weight");
        assert_eq!(lines[1], "2024-06-15,500,0,");
        assert_eq!(lines[2], "2024-06-20,300,0,");
    }

    #[test]
    fn test_lookup_and_log_food() {
        let svc = TrackerService::new_in_memory().unwrap();
        let provider = MockProvider {
            foods: vec![FoodNutrients {
                name: "Chicken burrito".to_string(),
                brand: UNKNOWN_BRAND.to_string(),
                nutrients: NutrientProfile::from_pairs([
                    ("calories", "200 kcal"),
                    ("protein", "12 g"),
                    ("fat", "garbage"),
                ]),
                reference_portion_g: 250.0,
            }],
        };

        let results = svc.search_foods(&provider, "burrito").unwrap();
        assert_eq!(results.len(), 1);
        let food = svc
            .food_nutrients(&provider, results[0].reference_id)
            .unwrap()
            .unwrap();
        assert!(food.nutrients.fat.is_none());
        assert_eq!(food.nutrients.calories, Some(Amount::new(200.0, "kcal")));

        let entry = svc.log_food(&food, day(), 1.0).unwrap();
        assert_eq!(entry.calories, 500);
        assert!((entry.protein - 30.0).abs() < 1e-9);
        assert!(entry.fat.abs() < f64::EPSILON);
        assert_eq!(summary(&svc).calories_consumed, 500);

        assert!(svc.food_nutrients(&provider, 99).unwrap().is_none());
        assert!(svc.log_food(&food, day(), 0.0).is_err());
    }

    #[test]
    fn test_lookup_failure_and_empty_query() {
        let svc = TrackerService::new_in_memory().unwrap();
        let err = svc.search_foods(&FailingProvider, "apple").unwrap_err();
        assert!(format!("{err:#}").contains("connection refused"));
        assert!(svc.food_nutrients(&FailingProvider, 1).is_err());
        assert!(svc.search_foods(&FailingProvider, "   ").is_err());
    }
}
