//! Application configuration
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid
//! configuration.
//!
//! ```json
//! {
//!   "http": { "host": "127.0.0.1", "port": 8000, "cors_origins": [] },
//!   "date_format": "%Y-%m-%d",
//!   "max_form_fields": 500,
//!   "conclusions_path": "data/conclusions.json"
//! }
//! ```

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribute::RULE_DATE_FORMAT;
use crate::engine::EngineOptions;
use crate::http_server::HttpServerConfig;
use crate::workpaper::DEFAULT_MAX_FORM_FIELDS;

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "workaudit.json";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type AppConfigResult<T> = Result<T, AppConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    /// chrono format tried first for submitted `date_range` values
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Upper bound on form fields in one submission
    #[serde(default = "default_max_form_fields")]
    pub max_form_fields: usize,

    /// Conclusions are kept in memory when unset
    #[serde(default)]
    pub conclusions_path: Option<PathBuf>,
}

fn default_date_format() -> String {
    RULE_DATE_FORMAT.to_string()
}

fn default_max_form_fields() -> usize {
    DEFAULT_MAX_FORM_FIELDS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            date_format: default_date_format(),
            max_form_fields: default_max_form_fields(),
            conclusions_path: None,
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from `path`.
    pub fn load(path: &Path) -> AppConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| AppConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> AppConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given; otherwise the default file, or defaults if it is absent.
    pub fn load_or_default(path: Option<&Path>) -> AppConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> AppConfigResult<()> {
        self.http.check().map_err(AppConfigError::Invalid)?;

        if self.max_form_fields == 0 {
            return Err(AppConfigError::Invalid("max_form_fields must be > 0".into()));
        }

        if self.date_format.trim().is_empty() {
            return Err(AppConfigError::Invalid("date_format must not be empty".into()));
        }

        // The format has to both print and parse a full calendar date.
        let sample = NaiveDate::from_ymd_opt(2024, 3, 31)
            .ok_or_else(|| AppConfigError::Invalid("sample date out of range".into()))?;
        let mut rendered = String::new();
        if write!(rendered, "{}", sample.format(&self.date_format)).is_err() {
            return Err(AppConfigError::Invalid(format!(
                "date_format '{}' is not a valid format string",
                self.date_format
            )));
        }
        match NaiveDate::parse_from_str(&rendered, &self.date_format) {
            Ok(parsed) if parsed == sample => Ok(()),
            _ => Err(AppConfigError::Invalid(format!(
                "date_format '{}' does not round-trip a calendar date",
                self.date_format
            ))),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            date_format: self.date_format.clone(),
        }
    }
}
