//! Simulation configuration
//! Fixed policy constants of the food bank, overridable from a TOML file

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::variates::ReferralMapping;

/// Inventory level per category below which a full restock batch is ordered
pub const RESTOCK_THRESHOLD: u32 = 10;

/// Shelf life of a delivered box, in days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShelfLife {
    pub mean: f64,
    pub min: i32,
    pub max: i32,
}

impl Default for ShelfLife {
    fn default() -> Self {
        Self {
            mean: 5.0,
            min: 2,
            max: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub restock_threshold: u32,
    pub shelf_life: ShelfLife,
    /// Weekdays the food bank neither receives deliveries nor takes referrals
    pub closed_days: Vec<Weekday>,
    pub referral_mapping: ReferralMapping,
    /// First simulated day is the day after this date (default: today)
    pub start_date: Option<NaiveDate>,
    /// Base seed for per-run RNG streams; run `i` uses `seed + i`
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            restock_threshold: RESTOCK_THRESHOLD,
            shelf_life: ShelfLife::default(),
            closed_days: vec![Weekday::Fri, Weekday::Sat, Weekday::Sun],
            referral_mapping: ReferralMapping::Legacy,
            start_date: None,
            seed: None,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let shelf_life = &self.shelf_life;
        if shelf_life.min > shelf_life.max || !shelf_life.mean.is_finite() {
            return Err(ValidationError::InvalidShelfLife {
                min: shelf_life.min,
                max: shelf_life.max,
            });
        }
        Ok(())
    }

    pub fn is_open_on(&self, weekday: Weekday) -> bool {
        !self.closed_days.contains(&weekday)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
