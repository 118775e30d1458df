mod commands;
mod config;
mod fooddata;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    ProfileArgs, cmd_exercise_delete, cmd_exercise_kinds, cmd_exercise_log, cmd_export,
    cmd_history, cmd_meal_delete, cmd_meal_edit, cmd_meal_log, cmd_meal_lookup, cmd_plan,
    cmd_profile_edit, cmd_profile_set, cmd_profile_show, cmd_today, cmd_weight, json_error,
};
use crate::config::Config;
use crate::fooddata::FoodDataCentralClient;
use tally_core::error::{TrackerError, is_not_found};
use tally_core::models::UpdateMealEntry;
use tally_core::service::TrackerService;

const DEFAULT_LOG_FILTER: &str = "tally=warn,tally_core=warn";
const VERBOSE_LOG_FILTER: &str = "tally=debug,tally_core=debug";

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Track meals, exercise and weight against a daily calorie budget"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, view or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Record your current weight
    Weight {
        /// Weight value
        value: f64,
        /// Unit: lbs or kg
        #[arg(short, long, default_value = "lbs")]
        unit: String,
    },
    /// Log, look up, edit or delete meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Log or delete exercise
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Show one day's log and remaining budget (defaults to today)
    Today {
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow)
        date: Option<String>,
    },
    /// Show the daily log for every recorded day
    History,
    /// Show how the daily calorie budget is derived
    Plan,
    /// Export the daily log as CSV
    Export {
        /// Output file (default: stdout)
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create or replace the profile (all fields required)
    Set(ProfileArgs),
    /// Show the profile
    Show,
    /// Change some profile fields, keeping the rest
    Edit(ProfileArgs),
}

#[derive(Subcommand)]
enum MealCommands {
    /// Log a meal with known nutrition
    Log {
        /// Meal name
        name: String,
        /// Calories (kcal)
        #[arg(short, long)]
        calories: i64,
        /// Fat in grams
        #[arg(long, default_value = "0")]
        fat: f64,
        /// Carbs in grams
        #[arg(long, default_value = "0")]
        carbs: f64,
        /// Protein in grams
        #[arg(long, default_value = "0")]
        protein: f64,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Look up a food in USDA `FoodData Central` and log it
    Lookup {
        /// Food name to search for
        query: String,
        /// Number of portions
        #[arg(short, long, default_value = "1")]
        quantity: f64,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a meal entry
    Edit {
        /// Meal entry ID
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        calories: Option<i64>,
        #[arg(long)]
        fat: Option<f64>,
        #[arg(long)]
        carbs: Option<f64>,
        #[arg(long)]
        protein: Option<f64>,
        /// Move the entry to another date
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a meal entry
    Delete {
        /// Meal entry ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Log an exercise session
    Log {
        /// Exercise kind (see `tally exercise kinds`)
        kind: String,
        /// Duration in minutes
        minutes: i64,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an exercise entry
    Delete {
        /// Exercise entry ID
        id: i64,
    },
    /// List exercise kinds and burn rates
    Kinds,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    let no_profile = matches!(
        err.downcast_ref::<TrackerError>(),
        Some(TrackerError::NoProfile)
    );
    if is_not_found(err) || no_profile { 2 } else { 1 }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    if let Err(e) = run(cli) {
        if json {
            println!("{}", json_error(&format!("{e:#}")));
        } else {
            eprintln!("Error: {e:#}");
        }
        process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let svc = TrackerService::new(&config.db_path)?;
    let json = cli.json;

    match cli.command {
        Commands::Profile { command } => match command {
            ProfileCommands::Set(args) => cmd_profile_set(&svc, &args, json),
            ProfileCommands::Show => cmd_profile_show(&svc, json),
            ProfileCommands::Edit(args) => cmd_profile_edit(&svc, &args, json),
        },
        Commands::Weight { value, unit } => cmd_weight(&svc, value, &unit, json),
        Commands::Meal { command } => match command {
            MealCommands::Log {
                name,
                calories,
                fat,
                carbs,
                protein,
                date,
            } => cmd_meal_log(&svc, &name, calories, fat, carbs, protein, date, json),
            MealCommands::Lookup {
                query,
                quantity,
                date,
            } => {
                let client = FoodDataCentralClient::new(&config.fdc_api_key)?;
                cmd_meal_lookup(&svc, &client, &query, quantity, date, json)
            }
            MealCommands::Edit {
                id,
                name,
                calories,
                fat,
                carbs,
                protein,
                date,
            } => {
                let update = UpdateMealEntry {
                    name,
                    date: date.map(Some).map(commands::parse_date).transpose()?,
                    calories,
                    fat,
                    carbs,
                    protein,
                };
                cmd_meal_edit(&svc, id, &update, json)
            }
            MealCommands::Delete { id } => cmd_meal_delete(&svc, id, json),
        },
        Commands::Exercise { command } => match command {
            ExerciseCommands::Log {
                kind,
                minutes,
                date,
            } => cmd_exercise_log(&svc, &kind, minutes, date, json),
            ExerciseCommands::Delete { id } => cmd_exercise_delete(&svc, id, json),
            ExerciseCommands::Kinds => cmd_exercise_kinds(json),
        },
        Commands::Today { date } => cmd_today(&svc, date, json),
        Commands::History => cmd_history(&svc, json),
        Commands::Plan => cmd_plan(&svc, json),
        Commands::Export { path } => cmd_export(&svc, path.as_deref(), json),
    }
}
