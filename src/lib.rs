//! Monte Carlo simulation of a food bank's daily operation
//!
//! A [`simulation::FoodBank`] models one food bank day by day: restocking
//! low shelves, receiving deliveries, expiring old boxes and serving
//! referrals. [`monte_carlo::run_monte_carlo_simulation`] runs many
//! independent food banks with the same parameters and averages the
//! unfulfilled referrals, deliveries per day and expired boxes.

pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod monte_carlo;
pub mod reporting;
pub mod simulation;
pub mod validation;
pub mod variates;

pub use config::SimulationConfig;
pub use error::{ConfigError, SimulationError, ValidationError};
pub use models::{AggregateResult, FoodBoxCategory, ReferralProbabilities, RunSummary, SimulationRequest};
pub use monte_carlo::{run_monte_carlo_simulation, CancellationFlag};
pub use simulation::FoodBank;
