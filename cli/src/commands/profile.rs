use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Args;

use tally_core::age::age_on;
use tally_core::models::{ActivityLevel, Gender, NewProfile, Profile};
use tally_core::service::TrackerService;
use tally_core::units::{cm_to_feet_inches, lbs_to_kg};

use super::helpers::{height_cm, print_json, weight_to_lbs};

#[derive(Args, Debug, Default)]
pub(crate) struct ProfileArgs {
    /// Current weight
    #[arg(long)]
    weight: Option<f64>,
    /// Goal weight
    #[arg(long)]
    goal_weight: Option<f64>,
    /// Unit for --weight and --goal-weight: lbs or kg
    #[arg(short, long, default_value = "lbs")]
    unit: String,
    /// Target weekly change in lbs: positive to lose, negative to gain, 0 to maintain
    #[arg(long, allow_negative_numbers = true)]
    weekly_change: Option<f64>,
    /// Height in centimeters
    #[arg(long, conflicts_with_all = ["feet", "inches"])]
    height_cm: Option<f64>,
    /// Height, feet part
    #[arg(long)]
    feet: Option<f64>,
    /// Height, inches part
    #[arg(long)]
    inches: Option<f64>,
    /// Birthdate (YYYY-MM-DD)
    #[arg(long)]
    birthdate: Option<String>,
    /// Gender: male or female
    #[arg(long)]
    gender: Option<String>,
    /// Activity level: `not_active`, `somewhat_active`, `highly_active`, `extremely_active`
    #[arg(long)]
    activity: Option<String>,
}

/// Profile fields parsed from arguments; `None` where not given.
#[derive(Debug, Default, PartialEq)]
struct ProfileFields {
    weight: Option<f64>,
    goal_weight: Option<f64>,
    weekly_change: Option<f64>,
    height_cm: Option<f64>,
    birthdate: Option<NaiveDate>,
    gender: Option<Gender>,
    activity: Option<ActivityLevel>,
}

impl ProfileArgs {
    fn parse(&self) -> Result<ProfileFields> {
        let weight = self
            .weight
            .map(|w| weight_to_lbs(w, &self.unit))
            .transpose()?;
        let goal_weight = self
            .goal_weight
            .map(|w| weight_to_lbs(w, &self.unit))
            .transpose()?;
        let birthdate = self
            .birthdate
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .with_context(|| format!("Invalid birthdate '{s}'. Use YYYY-MM-DD"))
            })
            .transpose()?;
        Ok(ProfileFields {
            weight,
            goal_weight,
            weekly_change: self.weekly_change,
            height_cm: height_cm(self.height_cm, self.feet, self.inches),
            birthdate,
            gender: self.gender.as_deref().map(Gender::parse).transpose()?,
            activity: self.activity.as_deref().map(ActivityLevel::parse).transpose()?,
        })
    }
}

impl ProfileFields {
    fn complete(self) -> Result<NewProfile> {
        let mut missing = Vec::new();
        if self.weight.is_none() {
            missing.push("--weight");
        }
        if self.goal_weight.is_none() {
            missing.push("--goal-weight");
        }
        if self.weekly_change.is_none() {
            missing.push("--weekly-change");
        }
        if self.height_cm.is_none() {
            missing.push("--height-cm or --feet/--inches");
        }
        if self.birthdate.is_none() {
            missing.push("--birthdate");
        }
        if self.gender.is_none() {
            missing.push("--gender");
        }
        if self.activity.is_none() {
            missing.push("--activity");
        }
        match self {
            ProfileFields {
                weight: Some(weight),
                goal_weight: Some(goal_weight),
                weekly_change: Some(weekly_weight_change),
                height_cm: Some(height_cm),
                birthdate: Some(birthdate),
                gender: Some(gender),
                activity: Some(activity_level),
            } => Ok(NewProfile {
                goal_weight,
                weekly_weight_change,
                activity_level,
                gender,
                birthdate,
                weight,
                height_cm,
            }),
            _ => bail!("Missing profile fields: {}", missing.join(", ")),
        }
    }

    /// Overlay the given fields on an existing profile.
    fn merged_onto(self, current: &Profile) -> NewProfile {
        let base = NewProfile::from(current);
        NewProfile {
            goal_weight: self.goal_weight.unwrap_or(base.goal_weight),
            weekly_weight_change: self.weekly_change.unwrap_or(base.weekly_weight_change),
            activity_level: self.activity.unwrap_or(base.activity_level),
            gender: self.gender.unwrap_or(base.gender),
            birthdate: self.birthdate.unwrap_or(base.birthdate),
            weight: self.weight.unwrap_or(base.weight),
            height_cm: self.height_cm.unwrap_or(base.height_cm),
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn cmd_profile_set(svc: &TrackerService, args: &ProfileArgs, json: bool) -> Result<()> {
    let profile = args.parse()?.complete()?;
    let saved = svc.set_profile(&profile)?;
    if json {
        print_json(&saved)
    } else {
        println!("Profile saved.\n");
        print_profile(&saved);
        Ok(())
    }
}

pub(crate) fn cmd_profile_edit(svc: &TrackerService, args: &ProfileArgs, json: bool) -> Result<()> {
    let fields = args.parse()?;
    if fields.is_empty() {
        bail!("Nothing to update. Provide at least one profile field, e.g. --activity");
    }
    let current = svc.require_profile()?;
    let saved = svc.set_profile(&fields.merged_onto(&current))?;
    if json {
        print_json(&saved)
    } else {
        println!("Profile updated.\n");
        print_profile(&saved);
        Ok(())
    }
}

pub(crate) fn cmd_profile_show(svc: &TrackerService, json: bool) -> Result<()> {
    let profile = svc.require_profile()?;
    if json {
        return print_json(&profile);
    }
    print_profile(&profile);
    Ok(())
}

fn print_profile(p: &Profile) {
    let age = age_on(p.birthdate, Local::now().date_naive());
    let (feet, inches) = cm_to_feet_inches(p.height_cm);
    let weekly = p.weekly_weight_change;
    let direction = if weekly > 0.0 {
        "lose"
    } else if weekly < 0.0 {
        "gain"
    } else {
        "maintain"
    };

    println!(
        "  Weight:        {:.1} lbs ({:.1} kg)",
        p.weight,
        lbs_to_kg(p.weight)
    );
    println!(
        "  Goal weight:   {:.1} lbs ({:.1} kg)",
        p.goal_weight,
        lbs_to_kg(p.goal_weight)
    );
    if weekly == 0.0 {
        println!("  Weekly goal:   {direction}");
    } else {
        println!("  Weekly goal:   {direction} {:.1} lbs/week", weekly.abs());
    }
    println!("  Height:        {:.1} cm ({feet}' {inches:.1}\")", p.height_cm);
    println!("  Birthdate:     {} (age {age})", p.birthdate);
    println!("  Gender:        {}", p.gender);
    println!("  Activity:      {}", p.activity_level);
}
