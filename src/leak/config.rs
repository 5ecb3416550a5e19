// Leak detection thresholds
//
// Resolved once at startup: built-in defaults, then an optional TOML file,
// then environment variables. Immutable for the rest of the run.

use crate::error::{LeakError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MEMORY_GROWTH_ENV: &str = "MEMORY_GROWTH_THRESHOLD_PERCENT";
pub const CONCURRENCY_INCREASE_ENV: &str = "CONCURRENCY_UNIT_INCREASE_THRESHOLD";
pub const LEGACY_CONCURRENCY_INCREASE_ENV: &str = "GOROUTINE_INCREASE_THRESHOLD";
pub const FD_INCREASE_ENV: &str = "FD_INCREASE_THRESHOLD";
pub const CONNECTION_INCREASE_ENV: &str = "DB_CONN_INCREASE_THRESHOLD";

/// Thresholds that turn a baseline/post-test difference into a leak
///
/// # Example
/// ```
/// use leakscan::leak::Thresholds;
///
/// let thresholds = Thresholds::default();
/// assert_eq!(thresholds.memory_growth_percent, 70.0);
/// assert_eq!(thresholds.concurrency_unit_increase, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Relative change in allocated memory (percent, either direction) that
    /// counts as a leak. Heap growth is checked against the same value but
    /// only warns.
    pub memory_growth_percent: f64,

    /// Absolute increase in concurrency units
    pub concurrency_unit_increase: i64,

    /// Absolute increase in open file descriptors
    pub fd_increase: i64,

    /// Absolute increase in in-use pool connections (idle is not compared)
    pub connection_in_use_increase: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            memory_growth_percent: 70.0,
            concurrency_unit_increase: 50,
            fd_increase: 10,
            connection_in_use_increase: 5,
        }
    }
}

/// Partial thresholds from a `--config` TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsFile {
    memory_growth_percent: Option<f64>,
    concurrency_unit_increase: Option<i64>,
    fd_increase: Option<i64>,
    connection_in_use_increase: Option<i64>,
}

impl Thresholds {
    /// Resolve thresholds for a run: defaults, optional TOML file, environment
    ///
    /// # Errors
    ///
    /// Returns [`LeakError::InvalidConfig`] for unreadable files, malformed
    /// values, or thresholds that fail [`Thresholds::validate`].
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let base = match config_path {
            Some(path) => Self::default().merge_toml_file(path)?,
            None => Self::default(),
        };
        let thresholds = base.merge_lookup(|key| std::env::var(key).ok())?;
        thresholds.validate()?;
        tracing::debug!(?thresholds, "resolved thresholds");
        Ok(thresholds)
    }

    /// Overlay values from a TOML file
    pub fn merge_toml_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LeakError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        self.merge_toml_str(&content)
            .map_err(|e| LeakError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    fn merge_toml_str(self, content: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: ThresholdsFile = toml::from_str(content)?;
        Ok(Self {
            memory_growth_percent: file
                .memory_growth_percent
                .unwrap_or(self.memory_growth_percent),
            concurrency_unit_increase: file
                .concurrency_unit_increase
                .unwrap_or(self.concurrency_unit_increase),
            fd_increase: file.fd_increase.unwrap_or(self.fd_increase),
            connection_in_use_increase: file
                .connection_in_use_increase
                .unwrap_or(self.connection_in_use_increase),
        })
    }

    /// Overlay values from an environment-style lookup
    ///
    /// Unset and empty variables keep the current value.
    pub fn merge_lookup<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let concurrency = get(CONCURRENCY_INCREASE_ENV)
            .map(|v| (CONCURRENCY_INCREASE_ENV, v))
            .or_else(|| {
                get(LEGACY_CONCURRENCY_INCREASE_ENV).map(|v| (LEGACY_CONCURRENCY_INCREASE_ENV, v))
            });

        Ok(Self {
            memory_growth_percent: match get(MEMORY_GROWTH_ENV) {
                Some(v) => parse_value(MEMORY_GROWTH_ENV, &v)?,
                None => self.memory_growth_percent,
            },
            concurrency_unit_increase: match concurrency {
                Some((key, v)) => parse_value(key, &v)?,
                None => self.concurrency_unit_increase,
            },
            fd_increase: match get(FD_INCREASE_ENV) {
                Some(v) => parse_value(FD_INCREASE_ENV, &v)?,
                None => self.fd_increase,
            },
            connection_in_use_increase: match get(CONNECTION_INCREASE_ENV) {
                Some(v) => parse_value(CONNECTION_INCREASE_ENV, &v)?,
                None => self.connection_in_use_increase,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.memory_growth_percent.is_finite() || self.memory_growth_percent < 0.0 {
            return Err(LeakError::InvalidConfig(format!(
                "memory_growth_percent must be a non-negative number, got {}",
                self.memory_growth_percent
            )));
        }

        for (name, value) in [
            ("concurrency_unit_increase", self.concurrency_unit_increase),
            ("fd_increase", self.fd_increase),
            ("connection_in_use_increase", self.connection_in_use_increase),
        ] {
            if value < 0 {
                return Err(LeakError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| LeakError::InvalidConfig(format!("{key}={raw:?}: {e}")))
}
