use chrono::{Datelike, NaiveDate};

/// Age in completed years on `on`.
///
/// A birthdate after `on` yields zero or a negative number; rejecting that is
/// left to input validation.
#[must_use]
pub fn age_on(birthdate: NaiveDate, on: NaiveDate) -> i32 {
    let years = on.year() - birthdate.year();
    if (on.month(), on.day()) < (birthdate.month(), birthdate.day()) {
        years - 1
    } else {
        years
    }
}
