//! Body-metric unit conversions.

pub const LBS_PER_KG: f64 = 2.20462;
pub const CM_PER_INCH: f64 = 2.54;
pub const INCHES_PER_FOOT: f64 = 12.0;

#[must_use]
pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs / LBS_PER_KG
}

#[must_use]
pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

#[must_use]
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * INCHES_PER_FOOT + inches) * CM_PER_INCH
}

/// Split a height in centimeters into whole feet and remaining inches.
#[must_use]
pub fn cm_to_feet_inches(cm: f64) -> (u32, f64) {
    let total_inches = cm / CM_PER_INCH;
    let feet = (total_inches / INCHES_PER_FOOT).floor();
    let inches = total_inches - feet * INCHES_PER_FOOT;
    #[allow(clippy::cast_sign_loss)]
    (feet.max(0.0) as u32, inches)
}
