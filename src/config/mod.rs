use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::utils::date::parse_date;
use crate::utils::path::resolve_from;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// CSV with `tz,alias` columns mapping deprecated timezone names.
    #[serde(default = "default_alias_table")]
    pub alias_table: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Where day tables are written; not written at all when unset.
    #[serde(default)]
    pub day_series_dir: Option<String>,
    #[serde(default = "default_start_date")]
    pub start_date: String,
    /// Defaults to today.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub output_format: ExportFormat,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_alias_table() -> String {
    "timezone-aliases.csv".to_string()
}
fn default_output_dir() -> String {
    "output/dataWithLocalTimeEstimates".to_string()
}
fn default_start_date() -> String {
    "2010-01-01".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alias_table: default_alias_table(),
            output_dir: default_output_dir(),
            day_series_dir: Some("output/daySeriesData".to_string()),
            start_date: default_start_date(),
            end_date: None,
            output_format: ExportFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rlocaltime")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rlocaltime")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rlocaltime.conf")
    }

    /// Load configuration from the default file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Alias table path. A relative path is taken from the directory of the
    /// config file it was loaded from.
    pub fn alias_table_path(&self, config_path: &Path) -> PathBuf {
        let base = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        resolve_from(&base, &self.alias_table)
    }

    pub fn start(&self) -> AppResult<NaiveDate> {
        parse_date(&self.start_date).ok_or_else(|| AppError::InvalidDate(self.start_date.clone()))
    }

    pub fn end(&self) -> AppResult<Option<NaiveDate>> {
        match &self.end_date {
            Some(s) => parse_date(s)
                .map(Some)
                .ok_or_else(|| AppError::InvalidDate(s.clone())),
            None => Ok(None),
        }
    }

    /// Write the default configuration file, unless one already exists.
    pub fn init_all(path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        if path.exists() {
            println!("ℹ️  Config file already present: {:?}", path);
            return Ok(());
        }

        let yaml = serde_yaml::to_string(&Config::default())?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;

        println!("✅ Config file: {:?}", path);
        Ok(())
    }
}
