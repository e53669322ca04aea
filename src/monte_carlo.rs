//! Monte Carlo simulation and aggregation module
//! Runs many independent food bank simulations and averages their outcomes

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::models::{AggregateResult, RunSummary, SimulationPlan, SimulationRequest};
use crate::simulation::FoodBank;
use crate::validation::{validate_plan, validate_request};

/// Cooperative stop signal, checked before each simulation run starts
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The parts of a run summary that feed the aggregate
#[derive(Debug, Clone, Copy)]
struct RunTotals {
    unfulfilled_referrals: u64,
    average_deliveries_per_day: f64,
    expired_boxes: u64,
}

impl From<&RunSummary> for RunTotals {
    fn from(summary: &RunSummary) -> Self {
        RunTotals {
            unfulfilled_referrals: summary.number_of_unfulfilled_referrals,
            average_deliveries_per_day: summary.average_deliveries_per_day,
            expired_boxes: summary.number_of_expired_boxes,
        }
    }
}

/// Seed of the RNG stream for run `run_index`
pub fn run_seed(base_seed: u64, run_index: u32) -> u64 {
    base_seed.wrapping_add(u64::from(run_index))
}

/// Simulate one food bank from a fresh state
pub fn simulate_run(plan: &SimulationPlan, config: &SimulationConfig, seed: u64) -> RunSummary {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut food_bank = FoodBank::new(plan.restock_quantity, plan.probabilities, config, rng);
    food_bank.advance(plan.days)
}

/// Validate a request and run the Monte Carlo sweep it describes
pub fn run_monte_carlo_simulation(
    request: &SimulationRequest,
    config: &SimulationConfig,
) -> Result<AggregateResult, SimulationError> {
    run_monte_carlo_simulation_with_cancel(request, config, &CancellationFlag::new())
}

pub fn run_monte_carlo_simulation_with_cancel(
    request: &SimulationRequest,
    config: &SimulationConfig,
    cancel: &CancellationFlag,
) -> Result<AggregateResult, SimulationError> {
    let plan = validate_request(request)?;
    run_plan(&plan, config, cancel)
}

/// Execute `plan.simulations` independent runs and average them
pub fn run_plan(
    plan: &SimulationPlan,
    config: &SimulationConfig,
    cancel: &CancellationFlag,
) -> Result<AggregateResult, SimulationError> {
    validate_plan(plan)?;
    config.validate()?;

    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    // Every run starts on the same calendar day
    let config = SimulationConfig {
        start_date: Some(config.start_date()),
        ..config.clone()
    };

    info!(
        days = plan.days,
        simulations = plan.simulations,
        restock_quantity = plan.restock_quantity,
        base_seed,
        parallel = config.parallel,
        "starting monte carlo simulation"
    );

    let requested = plan.simulations;
    let completed = AtomicU32::new(0);
    let run_one = |run_index: u32| -> Result<RunTotals, SimulationError> {
        if cancel.is_cancelled() {
            return Err(SimulationError::Cancelled {
                completed: completed.load(Ordering::SeqCst),
                requested,
            });
        }

        let summary = simulate_run(plan, &config, run_seed(base_seed, run_index));
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("{} of {} simulations completed", done, requested);
        Ok(RunTotals::from(&summary))
    };

    // Totals are collected in run order, so both modes sum identically
    let collected: Result<Vec<RunTotals>, SimulationError> = if config.parallel {
        (0..requested).into_par_iter().map(run_one).collect()
    } else {
        (0..requested).map(run_one).collect()
    };

    let totals = match collected {
        Ok(totals) => totals,
        Err(err) => {
            warn!(error = %err, "monte carlo simulation stopped");
            return Err(err);
        }
    };

    let result = aggregate(&totals);
    info!(
        avg_unfulfilled_referrals = result.avg_number_of_unfulfilled_referrals,
        avg_deliveries_per_day = result.avg_number_of_deliveries_per_day,
        avg_expired_boxes = result.avg_number_of_expired_boxes_of_food,
        "monte carlo simulation finished"
    );
    Ok(result)
}

/// Round to two decimal places
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn aggregate(totals: &[RunTotals]) -> AggregateResult {
    let runs = totals.len() as f64;

    let unfulfilled: u64 = totals.iter().map(|t| t.unfulfilled_referrals).sum();
    let deliveries: f64 = totals.iter().map(|t| t.average_deliveries_per_day).sum();
    let expired: u64 = totals.iter().map(|t| t.expired_boxes).sum();

    AggregateResult {
        avg_number_of_unfulfilled_referrals: unfulfilled as f64 / runs,
        avg_number_of_deliveries_per_day: round_to_hundredths(deliveries / runs),
        avg_number_of_expired_boxes_of_food: round_to_hundredths(expired as f64 / runs),
    }
}
