mod exercise;
mod export;
mod helpers;
mod meal;
mod profile;
mod summary;
mod weight;

pub(crate) use exercise::{cmd_exercise_delete, cmd_exercise_kinds, cmd_exercise_log};
pub(crate) use export::cmd_export;
pub(crate) use helpers::{json_error, parse_date};
pub(crate) use meal::{cmd_meal_delete, cmd_meal_edit, cmd_meal_log, cmd_meal_lookup};
pub(crate) use profile::{ProfileArgs, cmd_profile_edit, cmd_profile_set, cmd_profile_show};
pub(crate) use summary::{cmd_history, cmd_plan, cmd_today};
pub(crate) use weight::cmd_weight;
