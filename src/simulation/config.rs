// src/simulation/config.rs

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Longest accepted lead time, in days.
pub const MAX_LEAD_TIME: u32 = 365;

/// Run parameters. Immutable once a run has started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Days simulated by `run` when no count is given.
    #[serde(alias = "days")]
    pub days_default: u32,
    /// Reorder point `s`.
    #[serde(alias = "s")]
    pub reorder_point: i64,
    /// Order quantity `Q`.
    #[serde(alias = "q")]
    pub order_quantity: u32,
    #[serde(alias = "leadtimemin")]
    pub lead_min: u32,
    #[serde(alias = "leadtimemax")]
    pub lead_max: u32,
    #[serde(alias = "ordercostfixed")]
    pub order_cost_fixed: f64,
    /// Carried but never applied to any amount.
    #[serde(alias = "taxrate")]
    pub tax_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            days_default: 30,
            reorder_point: 15,
            order_quantity: 40,
            lead_min: 2,
            lead_max: 4,
            order_cost_fixed: 15.0,
            tax_rate: 0.17,
        }
    }
}

impl Config {
    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.order_quantity == 0 {
            return Err(SimError::InvalidConfig(
                "order quantity must be at least 1".to_string(),
            ));
        }
        if !self.order_cost_fixed.is_finite() || self.order_cost_fixed < 0.0 {
            return Err(SimError::InvalidConfig(
                "fixed order cost must be a non-negative number".to_string(),
            ));
        }
        let lead = self.lead_time_range();
        if *lead.start() < 1 {
            return Err(SimError::InvalidConfig(
                "lead time must be at least 1 day".to_string(),
            ));
        }
        if *lead.end() > MAX_LEAD_TIME {
            return Err(SimError::InvalidConfig(format!(
                "lead time must not exceed {} days",
                MAX_LEAD_TIME
            )));
        }
        if !self.tax_rate.is_finite() {
            return Err(SimError::InvalidConfig(
                "tax rate must be a number".to_string(),
            ));
        }
        Ok(())
    }

    /// Inclusive lead-time bounds; reversed bounds are swapped.
    pub fn lead_time_range(&self) -> RangeInclusive<u32> {
        if self.lead_max < self.lead_min {
            self.lead_max..=self.lead_min
        } else {
            self.lead_min..=self.lead_max
        }
    }
}
