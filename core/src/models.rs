use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

// --- Profile ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    NotActive,
    SomewhatActive,
    HighlyActive,
    ExtremelyActive,
}

pub const ACTIVITY_LEVELS: &[&str] = &[
    "not_active",
    "somewhat_active",
    "highly_active",
    "extremely_active",
];

impl ActivityLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotActive => "not_active",
            Self::SomewhatActive => "somewhat_active",
            Self::HighlyActive => "highly_active",
            Self::ExtremelyActive => "extremely_active",
        }
    }

    /// TDEE multiplier applied to BMR.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::NotActive => 1.2,
            Self::SomewhatActive => 1.375,
            Self::HighlyActive => 1.55,
            Self::ExtremelyActive => 1.725,
        }
    }

    /// Strict parse for user input. Accepts the canonical names plus the
    /// common "sedentary / lightly / moderately / very active" wording.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| {
            TrackerError::Validation(format!(
                "Invalid activity level '{s}'. Must be one of: {}",
                ACTIVITY_LEVELS.join(", ")
            ))
            .into()
        })
    }

    /// Lenient parse for stored values: anything unrecognized falls back to
    /// `NotActive` so the budget still computes with the 1.2 multiplier.
    #[must_use]
    pub fn from_db(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            tracing::warn!(value = s, "unrecognized activity level, using not_active");
            Self::NotActive
        })
    }

    fn from_name(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "not_active" | "sedentary" => Some(Self::NotActive),
            "somewhat_active" | "lightly_active" => Some(Self::SomewhatActive),
            "highly_active" | "moderately_active" => Some(Self::HighlyActive),
            "extremely_active" | "very_active" | "extra_active" => Some(Self::ExtremelyActive),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(TrackerError::Validation(format!(
                "Invalid gender '{s}'. Must be one of: male, female"
            ))
            .into()),
        }
    }

    /// Stored values other than "male" take the female BMR branch.
    #[must_use]
    pub fn from_db(s: &str) -> Self {
        if s.eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Female
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single user's body metrics and goal.
///
/// Weights are in pounds, height in centimeters. `weekly_weight_change` is
/// signed: positive means losing, negative means gaining, zero maintains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub goal_weight: f64,
    pub weekly_weight_change: f64,
    pub activity_level: ActivityLevel,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub weight: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub goal_weight: f64,
    pub weekly_weight_change: f64,
    pub activity_level: ActivityLevel,
    pub gender: Gender,
    pub birthdate: NaiveDate,
    pub weight: f64,
    pub height_cm: f64,
}

impl From<&Profile> for NewProfile {
    fn from(p: &Profile) -> Self {
        Self {
            goal_weight: p.goal_weight,
            weekly_weight_change: p.weekly_weight_change,
            activity_level: p.activity_level,
            gender: p.gender,
            birthdate: p.birthdate,
            weight: p.weight,
            height_cm: p.height_cm,
        }
    }
}

pub fn validate_weight(lbs: f64) -> Result<()> {
    if !lbs.is_finite() || lbs <= 0.0 {
        return Err(TrackerError::Validation("Weight must be greater than 0".into()).into());
    }
    Ok(())
}

pub fn validate_profile(profile: &NewProfile, today: NaiveDate) -> Result<()> {
    validate_weight(profile.weight)?;
    if !profile.goal_weight.is_finite() || profile.goal_weight <= 0.0 {
        return Err(TrackerError::Validation("Goal weight must be greater than 0".into()).into());
    }
    if !profile.height_cm.is_finite() || profile.height_cm <= 0.0 {
        return Err(TrackerError::Validation("Height must be greater than 0".into()).into());
    }
    if !profile.weekly_weight_change.is_finite() {
        return Err(TrackerError::Validation("Weekly weight change must be a number".into()).into());
    }
    if profile.birthdate > today {
        return Err(TrackerError::Validation(format!(
            "Birthdate {} is in the future",
            profile.birthdate
        ))
        .into());
    }
    Ok(())
}

// --- Meals ---

#[derive(Debug, Clone, Serialize)]
pub struct MealEntry {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub calories: i64,
    pub fat: f64,
    pub carbs: f64,
    pub protein: f64,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewMealEntry {
    pub date: NaiveDate,
    pub name: String,
    pub calories: i64,
    pub fat: f64,
    pub carbs: f64,
    pub protein: f64,
}

/// Partial edit: `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateMealEntry {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub calories: Option<i64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
}

impl UpdateMealEntry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.calories.is_none()
            && self.fat.is_none()
            && self.carbs.is_none()
            && self.protein.is_none()
    }
}

fn validate_grams(label: &str, grams: f64) -> Result<()> {
    if !grams.is_finite() || grams < 0.0 {
        return Err(TrackerError::Validation(format!("{label} must be 0 or more grams")).into());
    }
    Ok(())
}

fn validate_calories(calories: i64) -> Result<()> {
    if calories < 0 {
        return Err(TrackerError::Validation("Calories must be 0 or more".into()).into());
    }
    Ok(())
}

pub fn validate_new_meal(meal: &NewMealEntry) -> Result<()> {
    if meal.name.trim().is_empty() {
        return Err(TrackerError::Validation("Meal name must not be empty".into()).into());
    }
    validate_calories(meal.calories)?;
    validate_grams("Fat", meal.fat)?;
    validate_grams("Carbs", meal.carbs)?;
    validate_grams("Protein", meal.protein)?;
    Ok(())
}

pub fn validate_meal_update(update: &UpdateMealEntry) -> Result<()> {
    if update.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
        return Err(TrackerError::Validation("Meal name must not be empty".into()).into());
    }
    if let Some(c) = update.calories {
        validate_calories(c)?;
    }
    if let Some(g) = update.fat {
        validate_grams("Fat", g)?;
    }
    if let Some(g) = update.carbs {
        validate_grams("Carbs", g)?;
    }
    if let Some(g) = update.protein {
        validate_grams("Protein", g)?;
    }
    Ok(())
}

// --- Exercise ---

/// A catalog entry: exercise kind and its burn rate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExerciseKind {
    pub name: &'static str,
    pub kcal_per_minute: f64,
}

pub const EXERCISE_CATALOG: &[ExerciseKind] = &[
    ExerciseKind { name: "walking", kcal_per_minute: 4.0 },
    ExerciseKind { name: "running", kcal_per_minute: 11.0 },
    ExerciseKind { name: "cycling", kcal_per_minute: 8.0 },
    ExerciseKind { name: "swimming", kcal_per_minute: 9.0 },
    ExerciseKind { name: "weightlifting", kcal_per_minute: 6.0 },
    ExerciseKind { name: "yoga", kcal_per_minute: 3.0 },
    ExerciseKind { name: "hiking", kcal_per_minute: 6.5 },
    ExerciseKind { name: "rowing", kcal_per_minute: 7.0 },
    ExerciseKind { name: "dancing", kcal_per_minute: 5.5 },
    ExerciseKind { name: "jump_rope", kcal_per_minute: 12.0 },
];

pub fn find_exercise_kind(name: &str) -> Result<&'static ExerciseKind> {
    let normalized = name.trim().to_lowercase().replace(['-', ' '], "_");
    EXERCISE_CATALOG
        .iter()
        .find(|k| k.name == normalized)
        .ok_or_else(|| {
            let names: Vec<&str> = EXERCISE_CATALOG.iter().map(|k| k.name).collect();
            TrackerError::Validation(format!(
                "Unknown exercise '{name}'. Must be one of: {}",
                names.join(", ")
            ))
            .into()
        })
}

impl ExerciseKind {
    /// `round(duration × rate)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn calories_for(&self, duration_minutes: i64) -> i64 {
        (duration_minutes as f64 * self.kcal_per_minute).round() as i64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseEntry {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub duration_minutes: i64,
    pub calories_burned: i64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewExerciseEntry {
    pub date: NaiveDate,
    pub kind: String,
    pub duration_minutes: i64,
}

pub fn validate_duration(minutes: i64) -> Result<()> {
    if minutes <= 0 {
        return Err(
            TrackerError::Validation("Duration must be greater than 0 minutes".into()).into(),
        );
    }
    Ok(())
}

// --- Daily rollup ---

/// Per-date rollup over the meal and exercise logs plus a weight snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub calories_consumed: i64,
    pub calories_burned: i64,
    pub weight: Option<f64>,
}

impl DailySummary {
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            calories_consumed: 0,
            calories_burned: 0,
            weight: None,
        }
    }

    #[must_use]
    pub fn net_calories(&self) -> i64 {
        self.calories_consumed - self.calories_burned
    }
}

/// Everything logged on one date.
#[derive(Debug, Clone, Serialize)]
pub struct DayDetail {
    pub summary: DailySummary,
    pub meals: Vec<MealEntry>,
    pub exercises: Vec<ExerciseEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
}
