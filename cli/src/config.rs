use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DB_ENV: &str = "TALLY_DB";
pub const FDC_KEY_ENV: &str = "FDC_API_KEY";
pub const DEFAULT_FDC_KEY: &str = "DEMO_KEY";

pub struct Config {
    pub db_path: PathBuf,
    pub fdc_api_key: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_env(
            std::env::var_os(DB_ENV).map(PathBuf::from),
            std::env::var(FDC_KEY_ENV).ok(),
        )
    }

    fn from_env(db_override: Option<PathBuf>, fdc_api_key: Option<String>) -> Result<Self> {
        let db_path = match db_override.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory: {}", parent.display())
                    })?;
                }
                path
            }
            None => {
                let proj_dirs = ProjectDirs::from("", "", "tally")
                    .context("Could not determine home directory")?;
                let data_dir = proj_dirs.data_dir().to_path_buf();
                std::fs::create_dir_all(&data_dir).with_context(|| {
                    format!("Failed to create data directory: {}", data_dir.display())
                })?;
                data_dir.join("tally.db")
            }
        };

        let fdc_api_key = fdc_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_FDC_KEY.to_string());

        tracing::debug!(db = %db_path.display(), "configuration loaded");
        Ok(Config {
            db_path,
            fdc_api_key,
        })
    }
}
