//! Configuration types.
//!
//! Configuration is merged from `/etc/funk/config.toml`, then the user file,
//! then `FUNK_*` environment variables. With `FUNK_STRICT_CONFIG=1` any
//! problem is an error; otherwise problems are collected as warnings and the
//! defaults are kept.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::request::DEFAULT_JOB_NAME;
use crate::formatting::{DEFAULT_WALLTIME, parse_walltime};

/// Strict-mode configuration failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FunkConfig {
    pub system: SystemConfig,

    pub form: FormConfig,

    pub display: DisplayConfig,

    pub behavior: BehaviorConfig,
}

/// System configuration for paths
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Platform description file (TOML or JSON).
    /// If not set, the built-in Grid'5000 description is used
    pub platform_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Mode selected when the form opens
    pub default_mode: String,

    /// Reservation walltime, OAR format or seconds
    pub walltime: String,

    /// Job name passed to the OAR sub-jobs
    pub job_name: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_mode: "date".to_string(),
            walltime: DEFAULT_WALLTIME.to_string(),
            job_name: DEFAULT_JOB_NAME.to_string(),
        }
    }
}

impl FormConfig {
    /// Validate form defaults.
    /// In non-strict mode, invalid values are reset to their default and a warning is returned.
    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, ConfigError> {
        let mut warnings = Vec::new();
        let defaults = Self::default();

        if parse_walltime(&self.walltime).is_none() {
            let msg = format!(
                "form.walltime must be h:mm:ss or a number of seconds, got '{}'",
                self.walltime
            );
            if strict {
                return Err(ConfigError::Invalid(msg));
            }
            warnings.push(format!("{msg} - using default ({})", defaults.walltime));
            self.walltime = defaults.walltime;
        }

        if self.job_name.trim().is_empty() {
            let msg = "form.job_name must not be empty".to_string();
            if strict {
                return Err(ConfigError::Invalid(msg));
            }
            warnings.push(format!("{msg} - using default ({})", defaults.job_name));
            self.job_name = defaults.job_name;
        }

        Ok(warnings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Theme name
    pub theme: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Ask for confirmation before printing the command and leaving the picker
    pub confirm_submit: bool,

    /// Enable clipboard support
    pub copy_to_clipboard: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            confirm_submit: true,
            copy_to_clipboard: true,
        }
    }
}

impl FunkConfig {
    /// Get the user config file path, respecting XDG_CONFIG_HOME
    ///
    /// Resolution order:
    /// 1. $XDG_CONFIG_HOME/funk/config.toml (if XDG_CONFIG_HOME is set)
    /// 2. $HOME/.config/funk/config.toml (if HOME is set)
    /// 3. dirs::config_dir()/funk/config.toml
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join("funk/config.toml"));
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config/funk/config.toml"));
        }

        dirs::config_dir().map(|dir| dir.join("funk/config.toml"))
    }

    /// Load configuration from files and environment.
    /// Returns the config and any warnings encountered during loading.
    pub fn load() -> Result<(Self, Vec<String>), ConfigError> {
        let mut config = Self::default();
        let mut warnings = Vec::new();
        let strict = Self::is_strict_mode();

        Self::load_config_file(&mut config, Path::new("/etc/funk/config.toml"), strict, &mut warnings)?;

        if let Some(user_path) = Self::user_config_path() {
            Self::load_config_file(&mut config, &user_path, strict, &mut warnings)?;
        }

        config.apply_env_overrides(strict, &mut warnings)?;
        warnings.extend(config.form.validate(strict)?);

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Ok((config, warnings))
    }

    /// Check if strict config mode is enabled via FUNK_STRICT_CONFIG
    fn is_strict_mode() -> bool {
        std::env::var("FUNK_STRICT_CONFIG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Load a config file. A missing file is not an error.
    fn load_config_file(
        config: &mut Self,
        path: &Path,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::merge_str(config, &content, &path.display().to_string(), strict, warnings),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                let path = path.display().to_string();
                if strict {
                    return Err(ConfigError::Read { path, source: e });
                }
                warnings.push(format!("Could not read config '{}': {}", path, e));
                Ok(())
            }
        }
    }

    fn merge_str(
        config: &mut Self,
        content: &str,
        origin: &str,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        match toml::from_str::<FunkConfig>(content) {
            Ok(parsed) => {
                tracing::debug!(path = origin, "loaded config file");
                config.merge(parsed);
                Ok(())
            }
            Err(e) => {
                let err = ConfigError::Parse {
                    path: origin.to_string(),
                    message: e.to_string(),
                };
                if strict {
                    return Err(err);
                }
                warnings.push(err.to_string());
                Ok(())
            }
        }
    }

    fn merge(&mut self, other: FunkConfig) {
        // Prefer other's platform file if set, otherwise keep current
        self.system.platform_file = other
            .system
            .platform_file
            .or(self.system.platform_file.take());
        self.form = other.form;
        self.display = other.display;
        self.behavior = other.behavior;
    }

    fn apply_env_overrides(&mut self, strict: bool, warnings: &mut Vec<String>) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("FUNK_PLATFORM")
            && !val.is_empty()
        {
            let path = PathBuf::from(&val);
            if path.is_file() {
                self.system.platform_file = Some(path);
            } else {
                Self::report_env_error(strict, "FUNK_PLATFORM", &val, "not a readable file", warnings)?;
            }
        }

        if let Ok(val) = std::env::var("FUNK_MODE")
            && !val.is_empty()
        {
            self.form.default_mode = val;
        }

        if let Ok(val) = std::env::var("FUNK_WALLTIME") {
            if parse_walltime(&val).is_some() {
                self.form.walltime = val;
            } else {
                Self::report_env_error(
                    strict,
                    "FUNK_WALLTIME",
                    &val,
                    "expected h:mm:ss or a number of seconds",
                    warnings,
                )?;
            }
        }

        if let Ok(val) = std::env::var("FUNK_THEME") {
            self.display.theme = val;
        }
        if std::env::var("FUNK_NO_CLIPBOARD").is_ok() {
            self.behavior.copy_to_clipboard = false;
        }
        Ok(())
    }

    /// Report an environment variable error, failing if strict mode is enabled
    fn report_env_error(
        strict: bool,
        var: &'static str,
        value: &str,
        reason: &str,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        let err = ConfigError::Env {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        };
        if strict {
            return Err(err);
        }
        warnings.push(format!("{err} - using default"));
        Ok(())
    }
}
