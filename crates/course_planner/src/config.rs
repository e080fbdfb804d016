use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::error::PlannerError;
use crate::selection::DEFAULT_MAX_COURSES;
use crate::timecode::PeriodTable;

pub const PERIOD_TABLE_VAR: &str = "PLANNER_PERIOD_TABLE";
pub const MAX_SELECTED_VAR: &str = "PLANNER_MAX_SELECTED";

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// JSON period table to use instead of the built-in one
    pub period_table_path: Option<PathBuf>,
    pub max_selected: usize,
}

impl PlannerConfig {
    /// Reads the configuration from the process environment.
    pub fn load() -> Result<Self, PlannerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlannerError> {
        let period_table_path = var(&lookup, PERIOD_TABLE_VAR).map(PathBuf::from);
        let max_selected = try_load(&lookup, MAX_SELECTED_VAR, DEFAULT_MAX_COURSES)?;

        if max_selected == 0 {
            return Err(PlannerError::InvalidConfig {
                message: format!("{MAX_SELECTED_VAR} must be at least 1"),
            });
        }

        Ok(Self {
            period_table_path,
            max_selected,
        })
    }

    /// The configured period table, or the built-in one
    pub fn period_table(&self) -> Result<PeriodTable, PlannerError> {
        match &self.period_table_path {
            Some(path) => PeriodTable::load_from_file(path),
            None => Ok(PeriodTable::default()),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            period_table_path: None,
            max_selected: DEFAULT_MAX_COURSES,
        }
    }
}

fn var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, PlannerError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(lookup, key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        PlannerError::InvalidConfig {
            message: format!("{key}={raw:?}: {e}"),
        }
    })
}
