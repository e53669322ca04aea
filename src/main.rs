use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use food_bank_sim::config::SimulationConfig;
use food_bank_sim::models::{ReferralProbabilities, SimulationRequest};
use food_bank_sim::monte_carlo::{run_plan, CancellationFlag};
use food_bank_sim::reporting::{display_aggregate_result, display_simulation_start};
use food_bank_sim::validation::validate_request;

#[derive(Parser, Debug)]
#[command(name = "food-bank-sim")]
#[command(about = "Monte Carlo simulation of a food bank's daily operation")]
#[command(version)]
struct Args {
    /// JSON simulation request; replaces the parameter flags below
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Days simulated per run
    #[arg(long, default_value = "30", allow_negative_numbers = true)]
    days: i64,

    /// Number of independent runs
    #[arg(long, default_value = "100", allow_negative_numbers = true)]
    simulations: i64,

    /// Boxes delivered when a category runs low
    #[arg(long, default_value = "20", allow_negative_numbers = true)]
    restock_quantity: i64,

    /// Referral probability for single households
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    single: f64,

    /// Referral probability for couples
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    couple: f64,

    /// Referral probability for families
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    family: f64,

    /// Referral probability for large families
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    large_family: f64,

    /// Base seed; run i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Run simulations one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log every simulated day
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_request(&self) -> SimulationRequest {
        SimulationRequest {
            number_of_days: self.days,
            number_of_simulations: self.simulations,
            restock_quantity: self.restock_quantity,
            referral_probabilities: ReferralProbabilities {
                single: self.single,
                couple: self.couple,
                family: self.family,
                large_family: self.large_family,
            },
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("FOOD_BANK_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_request(path: &Path) -> anyhow::Result<SimulationRequest> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("invalid simulation request in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.sequential {
        config.parallel = false;
    }

    let request = match &args.request {
        Some(path) => read_request(path)?,
        None => args.to_request(),
    };
    let plan = validate_request(&request)?;

    if !args.json {
        display_simulation_start(&plan);
    }

    let result = run_plan(&plan, &config, &CancellationFlag::new())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_aggregate_result(&result);
    }

    Ok(())
}
