//! TOML-based planner configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{DeliveryMode, Holiday};
use crate::plan::week::TargetWeek;

/// Top-level planner configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`PlannerConfig::from_toml_file`] or use [`PlannerConfig::sample`] for the
/// built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Target week and delivery policy.
    #[serde(default)]
    pub plan: PlanConfig,
    /// Input locations.
    #[serde(default)]
    pub input: InputConfig,
    /// Non-working days.
    #[serde(default)]
    pub holidays: Vec<HolidayConfig>,
}

/// Target week and delivery policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    /// Any date in the target week. Absent or invalid selects the current week.
    pub week: Option<String>,
    /// Delivery mode: `"course-start"`, `"per-term"` or `"ad-hoc"`.
    pub mode: Option<String>,
}

/// Input locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Schedule CSV. Absent uses the built-in sample schools.
    pub schedule: Option<PathBuf>,
}

/// One holiday entry as written in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HolidayConfig {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"plan.mode"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl PlannerConfig {
    /// Returns the sample preset: current week, course-start mode, no holidays.
    pub fn sample() -> Self {
        Self::default()
    }

    /// Returns a preset whose target week is entirely blocked by holidays.
    ///
    /// Targets the week of 2026-12-21 (Christmas break).
    pub fn all_holidays() -> Self {
        let holidays = [
            (21, "Vacances de Nadal"),
            (22, "Vacances de Nadal"),
            (23, "Vacances de Nadal"),
            (24, "Vacances de Nadal"),
            (25, "Nadal"),
        ]
        .into_iter()
        .filter_map(|(day, name)| {
            NaiveDate::from_ymd_opt(2026, 12, day).map(|date| HolidayConfig {
                date,
                name: name.to_string(),
            })
        })
        .collect();

        Self {
            plan: PlanConfig {
                week: Some("2026-12-21".to_string()),
                mode: Some("ad-hoc".to_string()),
            },
            input: InputConfig::default(),
            holidays,
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["sample", "all_holidays"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "sample" => Ok(Self::sample()),
            "all_holidays" => Ok(Self::all_holidays()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// A relative `input.schedule` path is resolved against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let (Some(schedule), Some(dir)) = (cfg.input.schedule.as_mut(), path.parent()) {
            if schedule.is_relative() {
                *schedule = dir.join(&*schedule);
            }
        }
        Ok(cfg)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. An unparseable
    /// `plan.week` is not an error; it falls back to the current week.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(mode) = &self.plan.mode {
            if let Err(message) = mode.parse::<DeliveryMode>() {
                errors.push(ConfigError {
                    field: "plan.mode".into(),
                    message,
                });
            }
        }

        let mut seen = HashSet::new();
        for (i, h) in self.holidays.iter().enumerate() {
            if h.name.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("holidays[{i}].name"),
                    message: "must not be empty".into(),
                });
            }
            if !seen.insert(h.date) {
                errors.push(ConfigError {
                    field: format!("holidays[{i}].date"),
                    message: format!("duplicate holiday date {}", h.date),
                });
            }
        }

        errors
    }

    /// Configured delivery mode, defaulting to course-start.
    ///
    /// Call [`PlannerConfig::validate`] first; an invalid mode string also
    /// yields the default here.
    pub fn mode(&self) -> DeliveryMode {
        self.plan
            .mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }

    /// Configured target week, falling back to the week of `today`.
    pub fn week(&self, today: NaiveDate) -> TargetWeek {
        match &self.plan.week {
            Some(raw) => TargetWeek::parse_or(raw, today),
            None => TargetWeek::containing(today),
        }
    }

    /// Holidays as domain records.
    pub fn holidays(&self) -> Vec<Holiday> {
        self.holidays
            .iter()
            .map(|h| Holiday::new(h.date, h.name.trim()))
            .collect()
    }
}
