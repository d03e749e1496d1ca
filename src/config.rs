//! Configuration file support
//!
//! Loads the initial form values and logging settings from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::command::DEFAULT_LANGUAGE;
use crate::core::error::AppError;
use crate::core::form::FormOptions;

pub const APP_NAME: &str = "submerge-gen";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Values the form starts with
    pub form: FormSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    pub output_path: String,
    pub language: String,
    pub add_metadata: bool,
    pub metadata_value: String,
    pub clear_subs: bool,
    pub metadata_only: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            output_path: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            add_metadata: false,
            metadata_value: String::new(),
            clear_subs: false,
            metadata_only: false,
        }
    }
}

impl FormSettings {
    pub fn to_options(&self) -> FormOptions {
        FormOptions {
            output_path: self.output_path.clone(),
            language: self.language.clone(),
            add_metadata: self.add_metadata,
            metadata_value: self.metadata_value.clone(),
            clear_subs: self.clear_subs,
            metadata_only: self.metadata_only,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// EnvFilter directive, overridden by RUST_LOG
    pub level: String,
    /// Log destination. The terminal form only logs when this is set.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| AppError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| AppError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// An explicit path must load. The default location is optional, and a
    /// broken default file only costs a warning.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Vec<String>), AppError> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Vec::new()));
        }

        let Some(path) = Self::default_path() else {
            return Ok((Self::default(), Vec::new()));
        };
        if !path.exists() {
            return Ok((Self::default(), Vec::new()));
        }

        match Self::from_file(&path) {
            Ok(config) => Ok((config, Vec::new())),
            Err(e) => Ok((Self::default(), vec![format!("{e}. Using defaults.")])),
        }
    }
}
