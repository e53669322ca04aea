//! Random variates used by the food bank simulation
//! Box shelf life and daily referral volumes

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::config::ShelfLife;
use crate::models::{FoodBoxCategory, ReferralProbabilities};

/// Number of uniform draws summed by `bounded_variate`
const UNIFORM_DRAWS: usize = 6;

/// Referral volume at probability 1.0
const REFERRAL_SCALE: f64 = 100.0;

/// Which probability field drives each category's referral volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralMapping {
    /// Single <- single, Couple <- couple, Family <- largeFamily,
    /// LargeFamily <- single. The `family` field is never read.
    #[default]
    Legacy,
    /// Every category reads its own field
    Corrected,
}

impl ReferralMapping {
    pub fn probability_for(self, category: FoodBoxCategory, probabilities: &ReferralProbabilities) -> f64 {
        match self {
            ReferralMapping::Corrected => probabilities.field(category),
            ReferralMapping::Legacy => match category {
                FoodBoxCategory::Single => probabilities.single,
                FoodBoxCategory::Couple => probabilities.couple,
                FoodBoxCategory::Family => probabilities.large_family,
                FoodBoxCategory::LargeFamily => probabilities.single,
            },
        }
    }
}

/// Integer clustered around `mean`, always within `[min, max]`
///
/// Sums six uniform draws on [0, 1) (centered at 3), shifts the sum onto
/// `mean`, clamps and rounds. Not a normal sampler: the shape is the
/// Irwin-Hall distribution of the sum.
pub fn bounded_variate<R: Rng + ?Sized>(rng: &mut R, mean: f64, min: i32, max: i32) -> i32 {
    let unit = Uniform::new(0.0_f64, 1.0);
    let mut sum = 0.0;
    for _ in 0..UNIFORM_DRAWS {
        sum += unit.sample(rng);
    }

    let value = (mean + (sum - 3.0)).min(f64::from(max)).max(f64::from(min));
    value.round() as i32
}

/// Days until a freshly delivered box expires
pub fn shelf_life_days<R: Rng + ?Sized>(rng: &mut R, shelf_life: &ShelfLife) -> i32 {
    bounded_variate(rng, shelf_life.mean, shelf_life.min, shelf_life.max)
}

/// Number of referrals for `category` on an open day
pub fn referral_count<R: Rng + ?Sized>(
    rng: &mut R,
    category: FoodBoxCategory,
    probabilities: &ReferralProbabilities,
    mapping: ReferralMapping,
) -> u32 {
    let probability = mapping.probability_for(category, probabilities);
    let draw: f64 = rng.gen();
    (draw * REFERRAL_SCALE * probability).floor() as u32
}
