//! USDA `FoodData Central` response shapes and nutrient extraction.
//!
//! The service returns loosely shaped JSON: any nutrient may be missing and
//! individual entries can be malformed. Entries that cannot be read are
//! logged and skipped; a lookup only fails when nothing usable remains.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TrackerError;
use crate::models::NewMealEntry;

pub const MAX_SEARCH_RESULTS: usize = 20;
pub const UNKNOWN_BRAND: &str = "Generic/Unknown";
/// Nutrient values are reported per this many grams.
pub const REFERENCE_GRAMS: f64 = 100.0;
/// Calorie values above this per reference quantity are treated as bad data.
pub const MAX_REFERENCE_CALORIES: f64 = 1500.0;

const WHOLE_ITEM_PORTIONS: &[&str] = &["sandwich", "burger", "container", "bottle", "burrito", "cup"];
const MIN_FALLBACK_PORTION_G: f64 = 50.0;

// --- Structured amounts ---

/// A nutrient quantity such as `250 kcal` or `12.5 g`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub magnitude: f64,
    pub unit: String,
}

impl Amount {
    #[must_use]
    pub fn new(magnitude: f64, unit: &str) -> Self {
        Self {
            magnitude,
            unit: unit.to_string(),
        }
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude * factor,
            unit: self.unit.clone(),
        }
    }
}

impl FromStr for Amount {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(number), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TrackerError::MalformedExternalData(format!(
                "expected '<amount> <unit>', got '{s}'"
            )));
        };
        let magnitude: f64 = number.parse().map_err(|_| {
            TrackerError::MalformedExternalData(format!("invalid amount '{number}' in '{s}'"))
        })?;
        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(TrackerError::MalformedExternalData(format!(
                "amount out of range in '{s}'"
            )));
        }
        Ok(Self::new(magnitude, unit))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

// --- Nutrients ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nutrient {
    Calories,
    Fat,
    Carbs,
    Protein,
}

impl Nutrient {
    fn from_fdc_name(name: &str) -> Option<Self> {
        match name {
            "Energy" => Some(Self::Calories),
            "Total lipid (fat)" => Some(Self::Fat),
            "Carbohydrate, by difference" => Some(Self::Carbs),
            "Protein" => Some(Self::Protein),
            _ => None,
        }
    }

    fn from_display_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "calories" | "energy" => Some(Self::Calories),
            "fat" | "total fat" => Some(Self::Fat),
            "carbs" | "carbohydrates" => Some(Self::Carbs),
            "protein" => Some(Self::Protein),
            _ => None,
        }
    }

    const LABEL_KEYS: [(&'static str, Nutrient); 4] = [
        ("calories", Nutrient::Calories),
        ("fat", Nutrient::Fat),
        ("carbohydrates", Nutrient::Carbs),
        ("protein", Nutrient::Protein),
    ];

    fn default_unit(self) -> &'static str {
        match self {
            Self::Calories => "kcal",
            _ => "g",
        }
    }
}

/// Known nutrients for one reference quantity. `None` means the source did
/// not report it, which is different from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientProfile {
    pub calories: Option<Amount>,
    pub fat: Option<Amount>,
    pub carbs: Option<Amount>,
    pub protein: Option<Amount>,
}

impl NutrientProfile {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calories.is_none() && self.fat.is_none() && self.carbs.is_none() && self.protein.is_none()
    }

    fn slot(&mut self, nutrient: Nutrient) -> &mut Option<Amount> {
        match nutrient {
            Nutrient::Calories => &mut self.calories,
            Nutrient::Fat => &mut self.fat,
            Nutrient::Carbs => &mut self.carbs,
            Nutrient::Protein => &mut self.protein,
        }
    }

    /// Build from `name -> "amount unit"` pairs, skipping unknown names and
    /// values that do not parse.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut profile = Self::default();
        for (name, raw) in pairs {
            let Some(nutrient) = Nutrient::from_display_name(name) else {
                continue;
            };
            match raw.parse::<Amount>() {
                Ok(amount) => *profile.slot(nutrient) = Some(amount),
                Err(e) => tracing::warn!(nutrient = name, error = %e, "skipping nutrient value"),
            }
        }
        profile
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |a: &Option<Amount>| a.as_ref().map(|a| a.scaled(factor));
        Self {
            calories: scale(&self.calories),
            fat: scale(&self.fat),
            carbs: scale(&self.carbs),
            protein: scale(&self.protein),
        }
    }
}

// --- Lookup results ---

#[derive(Debug, Clone, Serialize)]
pub struct FoodCandidate {
    pub reference_id: i64,
    pub name: String,
    pub brand: String,
}

/// Nutrients for one food, per [`REFERENCE_GRAMS`], plus the gram weight of
/// one typical portion.
#[derive(Debug, Clone, Serialize)]
pub struct FoodNutrients {
    pub name: String,
    pub brand: String,
    pub nutrients: NutrientProfile,
    pub reference_portion_g: f64,
}

impl FoodNutrients {
    /// Nutrients for `quantity` portions.
    #[must_use]
    pub fn for_quantity(&self, quantity: f64) -> NutrientProfile {
        self.nutrients
            .scaled(self.reference_portion_g / REFERENCE_GRAMS * quantity)
    }

    /// A meal draft for `quantity` portions. Unreported nutrients are logged
    /// as zero since the meal log stores plain numbers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_meal(&self, date: NaiveDate, quantity: f64) -> NewMealEntry {
        let scaled = self.for_quantity(quantity);
        let grams = |a: Option<Amount>| a.map_or(0.0, |a| (a.magnitude * 100.0).round() / 100.0);
        NewMealEntry {
            date,
            name: self.name.clone(),
            calories: scaled.calories.map_or(0, |a| a.magnitude.round() as i64),
            fat: grams(scaled.fat),
            carbs: grams(scaled.carbs),
            protein: grams(scaled.protein),
        }
    }
}

// --- FoodData Central wire shapes ---

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<SearchFood>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFood {
    pub fdc_id: i64,
    pub description: String,
    pub brand_owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetailResponse {
    #[serde(default)]
    pub description: String,
    pub brand_owner: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<Value>,
    pub label_nutrients: Option<Value>,
    #[serde(default)]
    pub food_portions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodNutrientEntry {
    nutrient: NutrientInfo,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NutrientInfo {
    name: String,
    #[serde(default)]
    unit_name: String,
}

pub fn search_results(resp: SearchResponse) -> anyhow::Result<Vec<FoodCandidate>> {
    if let Some(err) = resp.error {
        let message = err.message.unwrap_or_else(|| "Unknown error".to_string());
        anyhow::bail!("FoodData Central error: {message}");
    }
    Ok(resp
        .foods
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|f| FoodCandidate {
            reference_id: f.fdc_id,
            name: f.description,
            brand: f
                .brand_owner
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| UNKNOWN_BRAND.to_string()),
        })
        .collect())
}

fn plausible(nutrient: Nutrient, amount: f64) -> bool {
    if !amount.is_finite() || amount < 0.0 {
        return false;
    }
    if nutrient == Nutrient::Calories && amount > MAX_REFERENCE_CALORIES {
        tracing::warn!(amount, "skipping implausible calorie value");
        return false;
    }
    true
}

fn nutrients_from_food_nutrients(entries: &[Value]) -> NutrientProfile {
    let mut profile = NutrientProfile::default();
    for raw in entries {
        let entry: FoodNutrientEntry = match serde_json::from_value(raw.clone()) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable foodNutrients entry");
                continue;
            }
        };
        let Some(nutrient) = Nutrient::from_fdc_name(&entry.nutrient.name) else {
            continue;
        };
        // Energy is also reported in kJ; only kcal counts.
        if nutrient == Nutrient::Calories && !entry.nutrient.unit_name.eq_ignore_ascii_case("kcal") {
            continue;
        }
        let Some(amount) = entry.amount else {
            tracing::warn!(nutrient = %entry.nutrient.name, "nutrient has no amount");
            continue;
        };
        if plausible(nutrient, amount) {
            let unit = if entry.nutrient.unit_name.is_empty() {
                nutrient.default_unit()
            } else {
                entry.nutrient.unit_name.as_str()
            };
            *profile.slot(nutrient) = Some(Amount::new(amount, &unit.to_lowercase()));
        }
    }
    profile
}

fn nutrients_from_label(label: &Value) -> NutrientProfile {
    let mut profile = NutrientProfile::default();
    for (key, nutrient) in Nutrient::LABEL_KEYS {
        let Some(entry) = label.get(key) else {
            continue;
        };
        let Some(amount) = entry.get("value").and_then(Value::as_f64) else {
            tracing::warn!(nutrient = key, "label nutrient has no numeric value");
            continue;
        };
        if plausible(nutrient, amount) {
            *profile.slot(nutrient) = Some(Amount::new(amount, nutrient.default_unit()));
        }
    }
    profile
}

/// Gram weight of one typical portion: a named whole item if listed, else the
/// first portion over 50 g, else the reference quantity itself.
#[must_use]
pub fn reference_portion_grams(portions: &[Value]) -> f64 {
    let gram_weight = |p: &Value| p.get("gramWeight").and_then(Value::as_f64).filter(|g| *g > 0.0);

    let whole_item = portions.iter().filter(|p| p.is_object()).find_map(|p| {
        let modifier = p.get("modifier").and_then(Value::as_str)?.to_lowercase();
        if WHOLE_ITEM_PORTIONS.iter().any(|k| modifier.contains(k)) {
            gram_weight(p)
        } else {
            None
        }
    });

    whole_item
        .or_else(|| {
            portions
                .iter()
                .filter_map(gram_weight)
                .find(|g| *g > MIN_FALLBACK_PORTION_G)
        })
        .unwrap_or(REFERENCE_GRAMS)
}

/// Extract nutrients from a detail response, or `None` when it has none.
#[must_use]
pub fn food_nutrients(detail: FoodDetailResponse) -> Option<FoodNutrients> {
    let mut nutrients = nutrients_from_food_nutrients(&detail.food_nutrients);
    if nutrients.is_empty() {
        if let Some(label) = &detail.label_nutrients {
            nutrients = nutrients_from_label(label);
        }
    }
    if nutrients.is_empty() {
        return None;
    }

    Some(FoodNutrients {
        name: detail.description,
        brand: detail
            .brand_owner
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| UNKNOWN_BRAND.to_string()),
        nutrients,
        reference_portion_g: reference_portion_grams(&detail.food_portions),
    })
}
