//! Error types for the food bank simulation
//! Invalid parameters are rejected before any simulation run starts

use std::path::PathBuf;

use thiserror::Error;

use crate::models::FoodBoxCategory;

/// Parameter errors reported back to the caller
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("numberOfDays must be a positive integer, got {value}")]
    NonPositiveDays { value: i64 },

    #[error("numberOfSimulations must be a positive integer, got {value}")]
    NonPositiveSimulations { value: i64 },

    #[error("restockQuantity must not be negative, got {value}")]
    NegativeRestockQuantity { value: i64 },

    #[error("{field} is too large: {value} (max: {max})")]
    ValueTooLarge {
        field: &'static str,
        value: i64,
        max: u32,
    },

    #[error("referral probability for {category} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange {
        category: FoodBoxCategory,
        value: f64,
    },

    #[error("shelf life bounds are invalid: min {min} is greater than max {max}")]
    InvalidShelfLife { min: i32, max: i32 },
}

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors from a Monte Carlo sweep
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid simulation parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("simulation cancelled after {completed} of {requested} runs")]
    Cancelled { completed: u32, requested: u32 },
}
