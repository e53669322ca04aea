//! Data model for the food bank simulation
//! Box categories, inventory units, per-category counters and the
//! request/result shapes exchanged with callers

use std::fmt;
use std::ops::{Index, IndexMut};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Household size a food box is packed for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodBoxCategory {
    Single,
    Couple,
    Family,
    LargeFamily,
}

impl FoodBoxCategory {
    /// Every category, in the order deliveries and referrals are processed
    pub const ALL: [FoodBoxCategory; 4] = [
        FoodBoxCategory::Single,
        FoodBoxCategory::Couple,
        FoodBoxCategory::Family,
        FoodBoxCategory::LargeFamily,
    ];

    pub fn index(self) -> usize {
        match self {
            FoodBoxCategory::Single => 0,
            FoodBoxCategory::Couple => 1,
            FoodBoxCategory::Family => 2,
            FoodBoxCategory::LargeFamily => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FoodBoxCategory::Single => "single",
            FoodBoxCategory::Couple => "couple",
            FoodBoxCategory::Family => "family",
            FoodBoxCategory::LargeFamily => "large family",
        }
    }
}

impl fmt::Display for FoodBoxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single box of food sitting in the food bank's inventory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodBox {
    pub category: FoodBoxCategory,
    pub days_until_expiry: i32,
}

/// One count per box category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounters {
    pub single: u32,
    pub couple: u32,
    pub family: u32,
    pub large_family: u32,
}

impl CategoryCounters {
    /// Counters with the same value for every category
    pub fn splat(value: u32) -> Self {
        CategoryCounters {
            single: value,
            couple: value,
            family: value,
            large_family: value,
        }
    }

    pub fn total(&self) -> u64 {
        FoodBoxCategory::ALL
            .iter()
            .map(|&category| u64::from(self[category]))
            .sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    pub fn reset(&mut self) {
        *self = CategoryCounters::default();
    }
}

impl Index<FoodBoxCategory> for CategoryCounters {
    type Output = u32;

    fn index(&self, category: FoodBoxCategory) -> &u32 {
        match category {
            FoodBoxCategory::Single => &self.single,
            FoodBoxCategory::Couple => &self.couple,
            FoodBoxCategory::Family => &self.family,
            FoodBoxCategory::LargeFamily => &self.large_family,
        }
    }
}

impl IndexMut<FoodBoxCategory> for CategoryCounters {
    fn index_mut(&mut self, category: FoodBoxCategory) -> &mut u32 {
        match category {
            FoodBoxCategory::Single => &mut self.single,
            FoodBoxCategory::Couple => &mut self.couple,
            FoodBoxCategory::Family => &mut self.family,
            FoodBoxCategory::LargeFamily => &mut self.large_family,
        }
    }
}

impl fmt::Display for CategoryCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} single, {} couple, {} family, {} large family",
            self.single, self.couple, self.family, self.large_family
        )
    }
}

/// Probability (0 - 1) of each household type having a referral
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralProbabilities {
    pub single: f64,
    pub couple: f64,
    pub family: f64,
    pub large_family: f64,
}

impl ReferralProbabilities {
    /// The probability field named after `category`
    pub fn field(&self, category: FoodBoxCategory) -> f64 {
        match category {
            FoodBoxCategory::Single => self.single,
            FoodBoxCategory::Couple => self.couple,
            FoodBoxCategory::Family => self.family,
            FoodBoxCategory::LargeFamily => self.large_family,
        }
    }
}

/// Simulation parameters as supplied by a caller, before validation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub number_of_days: i64,
    pub number_of_simulations: i64,
    pub restock_quantity: i64,
    pub referral_probabilities: ReferralProbabilities,
}

/// Simulation parameters in engine units; `validate_plan` checks their ranges
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationPlan {
    pub days: u32,
    pub simulations: u32,
    pub restock_quantity: u32,
    pub probabilities: ReferralProbabilities,
}

/// What happened during one simulated day
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub day: u32,
    pub date: NaiveDate,
    pub is_open: bool,
    pub inventory_start: CategoryCounters,
    pub deliveries: CategoryCounters,
    pub referrals: CategoryCounters,
    pub expired: CategoryCounters,
    pub fulfilled: CategoryCounters,
    pub unfulfilled: CategoryCounters,
    pub inventory_end: CategoryCounters,
    pub expiring_tomorrow: u32,
}

/// End-of-run state of a single food bank simulation
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub number_of_unfulfilled_referrals: u64,
    pub average_deliveries_per_day: f64,
    pub final_inventory: Vec<FoodBox>,
    pub final_date: NaiveDate,
    pub days_elapsed: u32,
    pub number_of_expired_boxes: u64,
}

/// Population averages over every run of a Monte Carlo sweep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub avg_number_of_unfulfilled_referrals: f64,
    pub avg_number_of_deliveries_per_day: f64,
    pub avg_number_of_expired_boxes_of_food: f64,
}
