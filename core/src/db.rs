use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::TrackerError;
use crate::models::{
    ActivityLevel, DailySummary, ExerciseEntry, Gender, MealEntry, NewMealEntry, NewProfile,
    Profile, UpdateMealEntry,
};

pub struct Database {
    conn: Connection,
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS profile (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    goal_weight REAL NOT NULL,
                    weekly_weight_change REAL NOT NULL,
                    activity_level TEXT NOT NULL,
                    gender TEXT NOT NULL,
                    birthdate TEXT NOT NULL,
                    weight REAL NOT NULL,
                    height_cm REAL NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS meal_log (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL,
                    name TEXT NOT NULL,
                    calories INTEGER NOT NULL CHECK (calories >= 0),
                    fat REAL NOT NULL DEFAULT 0,
                    carbs REAL NOT NULL DEFAULT 0,
                    protein REAL NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS exercise_log (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
                    calories_burned INTEGER NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS daily_log (
                    date TEXT PRIMARY KEY,
                    calories_consumed INTEGER NOT NULL DEFAULT 0,
                    weight REAL
                );

                CREATE INDEX IF NOT EXISTS idx_meal_log_date ON meal_log(date);
                CREATE INDEX IF NOT EXISTS idx_exercise_log_date ON exercise_log(date);

                PRAGMA user_version = 1;",
            )?;
        }

        if version < 2 {
            // Burned calories arrived after the first release; existing rows read as 0.
            self.conn.execute_batch(
                "ALTER TABLE daily_log ADD COLUMN calories_burned INTEGER NOT NULL DEFAULT 0;
                 PRAGMA user_version = 2;",
            )?;
            tracing::info!(from = version, to = 2, "database schema migrated");
        }

        Ok(())
    }

    /// Run `f` inside a transaction. Nested calls join the outer transaction.
    pub fn atomically<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if !self.conn.is_autocommit() {
            return f();
        }
        let tx = self.conn.unchecked_transaction()?;
        let out = f()?;
        tx.commit()?;
        Ok(out)
    }

    // --- Row mapping helpers ---

    fn parse_date_column(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    fn profile_from_row(row: &rusqlite::Row) -> rusqlite::Result<Profile> {
        let activity: String = row.get(2)?;
        let gender: String = row.get(3)?;
        let birthdate: String = row.get(4)?;
        Ok(Profile {
            goal_weight: row.get(0)?,
            weekly_weight_change: row.get(1)?,
            activity_level: ActivityLevel::from_db(&activity),
            gender: Gender::from_db(&gender),
            birthdate: Self::parse_date_column(4, &birthdate)?,
            weight: row.get(5)?,
            height_cm: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn meal_entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<MealEntry> {
        Ok(MealEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            name: row.get(2)?,
            calories: row.get(3)?,
            fat: row.get(4)?,
            carbs: row.get(5)?,
            protein: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn exercise_entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<ExerciseEntry> {
        Ok(ExerciseEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            kind: row.get(2)?,
            duration_minutes: row.get(3)?,
            calories_burned: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn daily_summary_from_row(row: &rusqlite::Row) -> rusqlite::Result<DailySummary> {
        Ok(DailySummary {
            date: row.get(0)?,
            calories_consumed: row.get(1)?,
            calories_burned: row.get(2)?,
            weight: row.get(3)?,
        })
    }

    // --- Profile ---

    pub fn get_profile(&self) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT goal_weight, weekly_weight_change, activity_level, gender, birthdate,
                        weight, height_cm, updated_at
                 FROM profile WHERE id = 1",
                [],
                Self::profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// Replace the profile wholesale. The single statement either swaps the
    /// whole row or leaves the previous one in place.
    pub fn replace_profile(&self, profile: &NewProfile) -> Result<Profile> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO profile
                (id, goal_weight, weekly_weight_change, activity_level, gender, birthdate, weight, height_cm, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                profile.goal_weight,
                profile.weekly_weight_change,
                profile.activity_level.as_str(),
                profile.gender.as_str(),
                date_key(profile.birthdate),
                profile.weight,
                profile.height_cm,
                now,
            ],
        )?;
        self.get_profile()?
            .context("Profile not found after replace")
    }

    /// Point update of the stored weight. Returns false when no profile exists.
    pub fn set_profile_weight(&self, weight: f64) -> Result<bool> {
        let now = Local::now().to_rfc3339();
        let rows = self.conn.execute(
            "UPDATE profile SET weight = ?1, updated_at = ?2 WHERE id = 1",
            params![weight, now],
        )?;
        Ok(rows > 0)
    }

    pub fn current_weight(&self) -> Result<Option<f64>> {
        let weight = self
            .conn
            .query_row("SELECT weight FROM profile WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(weight)
    }

    // --- Meal log ---

    pub fn insert_meal_entry(&self, entry: &NewMealEntry) -> Result<MealEntry> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO meal_log (date, name, calories, fat, carbs, protein, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                date_key(entry.date),
                entry.name,
                entry.calories,
                entry.fat,
                entry.carbs,
                entry.protein,
                now,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_meal_entry(id)
    }

    pub fn get_meal_entry(&self, id: i64) -> Result<MealEntry> {
        self.conn
            .query_row(
                "SELECT id, date, name, calories, fat, carbs, protein, created_at, updated_at
                 FROM meal_log WHERE id = ?1",
                params![id],
                Self::meal_entry_from_row,
            )
            .optional()?
            .ok_or_else(|| TrackerError::meal_not_found(id).into())
    }

    pub fn update_meal_entry(&self, id: i64, update: &UpdateMealEntry) -> Result<MealEntry> {
        let current = self.get_meal_entry(id)?;
        if update.is_empty() {
            return Ok(current);
        }

        let now = Local::now().to_rfc3339();
        let date = update.date.map_or(current.date, date_key);
        self.conn.execute(
            "UPDATE meal_log
             SET name = ?1, date = ?2, calories = ?3, fat = ?4, carbs = ?5, protein = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                update.name.as_deref().unwrap_or(&current.name),
                date,
                update.calories.unwrap_or(current.calories),
                update.fat.unwrap_or(current.fat),
                update.carbs.unwrap_or(current.carbs),
                update.protein.unwrap_or(current.protein),
                now,
                id,
            ],
        )?;
        self.get_meal_entry(id)
    }

    pub fn delete_meal_entry(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM meal_log WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    pub fn get_meals_for_date(&self, date: NaiveDate) -> Result<Vec<MealEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, name, calories, fat, carbs, protein, created_at, updated_at
             FROM meal_log WHERE date = ?1 ORDER BY id",
        )?;
        let entries = stmt
            .query_map(params![date_key(date)], Self::meal_entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn sum_meal_calories(&self, date: NaiveDate) -> Result<i64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(calories), 0) FROM meal_log WHERE date = ?1",
            params![date_key(date)],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    // --- Exercise log ---

    pub fn insert_exercise_entry(
        &self,
        date: NaiveDate,
        kind: &str,
        duration_minutes: i64,
        calories_burned: i64,
    ) -> Result<ExerciseEntry> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO exercise_log (date, kind, duration_minutes, calories_burned, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![date_key(date), kind, duration_minutes, calories_burned, now],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_exercise_entry(id)
    }

    pub fn get_exercise_entry(&self, id: i64) -> Result<ExerciseEntry> {
        self.conn
            .query_row(
                "SELECT id, date, kind, duration_minutes, calories_burned, created_at
                 FROM exercise_log WHERE id = ?1",
                params![id],
                Self::exercise_entry_from_row,
            )
            .optional()?
            .ok_or_else(|| TrackerError::exercise_not_found(id).into())
    }

    pub fn delete_exercise_entry(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM exercise_log WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    pub fn get_exercises_for_date(&self, date: NaiveDate) -> Result<Vec<ExerciseEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, kind, duration_minutes, calories_burned, created_at
             FROM exercise_log WHERE date = ?1 ORDER BY id",
        )?;
        let entries = stmt
            .query_map(params![date_key(date)], Self::exercise_entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // --- Daily log ---

    pub fn get_daily_summary(&self, date: NaiveDate) -> Result<Option<DailySummary>> {
        let summary = self
            .conn
            .query_row(
                "SELECT date, calories_consumed, calories_burned, weight
                 FROM daily_log WHERE date = ?1",
                params![date_key(date)],
                Self::daily_summary_from_row,
            )
            .optional()?;
        Ok(summary)
    }

    pub fn get_all_daily_summaries(&self) -> Result<Vec<DailySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, calories_consumed, calories_burned, weight
             FROM daily_log ORDER BY date ASC",
        )?;
        let rows = stmt
            .query_map([], Self::daily_summary_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Write consumed calories and the weight snapshot for `date`, keeping any
    /// burned calories already on the row.
    pub fn upsert_consumed(
        &self,
        date: NaiveDate,
        calories_consumed: i64,
        weight: Option<f64>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_log (date, calories_consumed, calories_burned, weight)
             VALUES (?1, ?2, 0, ?3)
             ON CONFLICT(date) DO UPDATE SET
                calories_consumed = excluded.calories_consumed,
                weight = excluded.weight",
            params![date_key(date), calories_consumed, weight],
        )?;
        Ok(())
    }

    /// Add `calories_burned` to an existing row, or create the row seeded with
    /// the given consumed total and weight.
    pub fn add_burned(
        &self,
        date: NaiveDate,
        calories_burned: i64,
        calories_consumed: i64,
        weight: Option<f64>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_log (date, calories_consumed, calories_burned, weight)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date) DO UPDATE SET
                calories_burned = calories_burned + excluded.calories_burned",
            params![date_key(date), calories_consumed, calories_burned, weight],
        )?;
        Ok(())
    }

    /// Remove `calories_burned` from the row for `date`, never going below zero.
    pub fn subtract_burned(&self, date: NaiveDate, calories_burned: i64) -> Result<()> {
        self.conn.execute(
            "UPDATE daily_log SET calories_burned = MAX(calories_burned - ?2, 0) WHERE date = ?1",
            params![date_key(date), calories_burned],
        )?;
        Ok(())
    }
}
