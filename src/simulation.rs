//! Daily simulation logic for a single food bank
//! Handles restocking, deliveries, referrals and expiry one day at a time

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::inventory::Inventory;
use crate::models::{CategoryCounters, DayReport, FoodBox, FoodBoxCategory, ReferralProbabilities, RunSummary};
use crate::variates::{referral_count, shelf_life_days};

/// State of one food bank over one simulation run
#[derive(Debug)]
pub struct FoodBank<R: Rng> {
    rng: R,
    config: SimulationConfig,
    current_date: NaiveDate,
    is_open: bool,
    restock_quantity: u32,
    probabilities: ReferralProbabilities,
    inventory: Inventory,
    deliveries_today: CategoryCounters,
    referrals_today: CategoryCounters,
    number_of_expired_boxes: u64,
    number_of_unfulfilled_referrals: u64,
    average_deliveries_per_day: f64,
    days_elapsed: u32,
}

impl<R: Rng> FoodBank<R> {
    /// Create a food bank with an empty inventory.
    /// The first simulated day is the day after the configured start date.
    pub fn new(
        restock_quantity: u32,
        probabilities: ReferralProbabilities,
        config: &SimulationConfig,
        rng: R,
    ) -> Self {
        FoodBank {
            rng,
            current_date: config.start_date(),
            config: config.clone(),
            is_open: true,
            restock_quantity,
            probabilities,
            inventory: Inventory::new(),
            deliveries_today: CategoryCounters::default(),
            referrals_today: CategoryCounters::default(),
            number_of_expired_boxes: 0,
            number_of_unfulfilled_referrals: 0,
            average_deliveries_per_day: 0.0,
            days_elapsed: 0,
        }
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn days_elapsed(&self) -> u32 {
        self.days_elapsed
    }

    /// Run the food bank for `days` more days and summarize its state.
    /// Calling this again continues from where the previous call stopped.
    pub fn advance(&mut self, days: u32) -> RunSummary {
        for _ in 0..days {
            self.step();
        }
        self.summary()
    }

    /// Simulate a single day
    pub fn step(&mut self) -> DayReport {
        // Increment the date and decide whether the food bank is open today
        if let Some(next) = self.current_date.succ_opt() {
            self.current_date = next;
        }
        self.is_open = self.config.is_open_on(self.current_date.weekday());

        let inventory_start = self.inventory.counts();

        self.schedule_deliveries(&inventory_start);
        self.receive_deliveries();
        self.take_referrals();

        // Expired boxes leave the shelves before referrals are served
        let expired = self.inventory.remove_expired();
        self.number_of_expired_boxes += expired.total();

        let (fulfilled, unfulfilled) = self.fulfil_referrals();

        let delivered = self.deliveries_today.total() as f64;
        let prior_days = f64::from(self.days_elapsed);
        self.average_deliveries_per_day =
            (self.average_deliveries_per_day * prior_days + delivered) / (prior_days + 1.0);

        let report = DayReport {
            day: self.days_elapsed + 1,
            date: self.current_date,
            is_open: self.is_open,
            inventory_start,
            deliveries: self.deliveries_today,
            referrals: self.referrals_today,
            expired,
            fulfilled,
            unfulfilled,
            inventory_end: self.inventory.counts(),
            expiring_tomorrow: self.inventory.expiring_within(1),
        };

        debug!(
            day = report.day,
            date = %report.date,
            open = report.is_open,
            deliveries = %report.deliveries,
            referrals = %report.referrals,
            expired_today = report.expired.total(),
            expired_total = self.number_of_expired_boxes,
            unfulfilled_total = self.number_of_unfulfilled_referrals,
            inventory = self.inventory.len(),
            expiring_tomorrow = report.expiring_tomorrow,
            avg_deliveries_per_day = self.average_deliveries_per_day,
            "food bank day simulated"
        );

        self.deliveries_today.reset();
        self.referrals_today.reset();
        self.days_elapsed += 1;

        report
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            number_of_unfulfilled_referrals: self.number_of_unfulfilled_referrals,
            average_deliveries_per_day: self.average_deliveries_per_day,
            final_inventory: self.inventory.to_vec(),
            final_date: self.current_date,
            days_elapsed: self.days_elapsed,
            number_of_expired_boxes: self.number_of_expired_boxes,
        }
    }

    /// Order a full restock for every category running low; nothing arrives on closed days
    fn schedule_deliveries(&mut self, stock: &CategoryCounters) {
        for category in FoodBoxCategory::ALL {
            let running_low = stock[category] < self.config.restock_threshold;
            let quantity = if self.is_open && running_low {
                self.restock_quantity
            } else {
                0
            };
            self.deliveries_today[category] = quantity;
        }
    }

    fn receive_deliveries(&mut self) {
        for category in FoodBoxCategory::ALL {
            for _ in 0..self.deliveries_today[category] {
                let days_until_expiry = shelf_life_days(&mut self.rng, &self.config.shelf_life);
                self.inventory.add(FoodBox {
                    category,
                    days_until_expiry,
                });
            }
        }
    }

    /// Referrals are only accepted while the food bank is open
    fn take_referrals(&mut self) {
        for category in FoodBoxCategory::ALL {
            let count = if self.is_open {
                referral_count(
                    &mut self.rng,
                    category,
                    &self.probabilities,
                    self.config.referral_mapping,
                )
            } else {
                0
            };
            self.referrals_today[category] = count;
        }
    }

    /// Hand out one box per referral; referrals with no matching box go unfulfilled
    fn fulfil_referrals(&mut self) -> (CategoryCounters, CategoryCounters) {
        let mut fulfilled = CategoryCounters::default();
        let mut unfulfilled = CategoryCounters::default();

        for category in FoodBoxCategory::ALL {
            for _ in 0..self.referrals_today[category] {
                if self.inventory.take(category).is_some() {
                    fulfilled[category] += 1;
                } else {
                    unfulfilled[category] += 1;
                }
            }
        }

        self.number_of_unfulfilled_referrals += unfulfilled.total();
        (fulfilled, unfulfilled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Sunday, so the first simulated day is a Monday
    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    }

    fn config_starting(start: NaiveDate) -> SimulationConfig {
        SimulationConfig {
            start_date: Some(start),
            ..SimulationConfig::default()
        }
    }

    fn uniform_probabilities(p: f64) -> ReferralProbabilities {
        ReferralProbabilities {
            single: p,
            couple: p,
            family: p,
            large_family: p,
        }
    }

    fn food_bank(restock: u32, p: f64, seed: u64) -> FoodBank<ChaCha8Rng> {
        FoodBank::new(
            restock,
            uniform_probabilities(p),
            &config_starting(sunday()),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_first_open_day_restocks_every_category() {
        let mut bank = food_bank(20, 0.0, 1);
        let summary = bank.advance(1);

        assert_eq!(summary.final_date.weekday(), Weekday::Mon);
        assert_eq!(bank.current_date(), summary.final_date);
        assert!(bank.is_open());
        assert_eq!(bank.days_elapsed(), 1);
        assert_eq!(summary.days_elapsed, 1);
        assert_eq!(summary.average_deliveries_per_day, 80.0);
        assert_eq!(summary.final_inventory.len(), 80);
        // Shelf life is drawn from [2, 8] and the boxes have aged one day
        assert!(summary
            .final_inventory
            .iter()
            .all(|b| (1..=7).contains(&b.days_until_expiry)));
        assert_eq!(bank.inventory().counts(), CategoryCounters::splat(20));
        assert_eq!(summary.number_of_expired_boxes, 0);
        assert_eq!(summary.number_of_unfulfilled_referrals, 0);
    }

    #[test]
    fn test_running_mean_of_deliveries() {
        let mut bank = food_bank(20, 0.0, 2);
        let first = bank.step();
        let second = bank.step();

        assert_eq!(first.deliveries.total(), 80);
        // Every shelf still holds 20 boxes, above the restock threshold
        assert!(second.deliveries.is_zero());
        assert_eq!(bank.summary().average_deliveries_per_day, 40.0);
    }

    #[test]
    fn test_zero_days_leaves_state_unchanged() {
        let mut bank = food_bank(20, 0.5, 3);
        let summary = bank.advance(0);

        assert_eq!(summary.days_elapsed, 0);
        assert_eq!(summary.final_date, sunday());
        assert_eq!(summary.average_deliveries_per_day, 0.0);
        assert!(summary.final_inventory.is_empty());
        assert_eq!(summary.number_of_expired_boxes, 0);
        assert_eq!(summary.number_of_unfulfilled_referrals, 0);
    }

    #[test]
    fn test_closed_days_have_no_deliveries_or_referrals() {
        let mut bank = food_bank(20, 1.0, 4);
        for _ in 0..28 {
            let report = bank.step();
            let closed = matches!(report.date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun);
            assert_eq!(report.is_open, !closed);
            if closed {
                assert!(report.deliveries.is_zero(), "deliveries on {}", report.date);
                assert!(report.referrals.is_zero(), "referrals on {}", report.date);
            }
        }
    }

    #[test]
    fn test_referrals_without_stock_go_unfulfilled() {
        let mut bank = food_bank(0, 1.0, 5);
        let mut referred = 0;
        for _ in 0..14 {
            let report = bank.step();
            assert!(report.fulfilled.is_zero());
            assert_eq!(report.unfulfilled, report.referrals);
            referred += report.referrals.total();
        }

        let summary = bank.summary();
        assert!(referred > 0);
        assert_eq!(summary.number_of_unfulfilled_referrals, referred);
        assert!(summary.final_inventory.is_empty());
    }

    #[test]
    fn test_unreferred_boxes_all_expire() {
        let mut bank = food_bank(20, 0.0, 6);
        let mut delivered = 0;
        for _ in 0..21 {
            delivered += bank.step().deliveries.total();
        }

        let summary = bank.summary();
        assert!(summary.number_of_expired_boxes > 0);
        assert_eq!(
            summary.number_of_expired_boxes + summary.final_inventory.len() as u64,
            delivered
        );
        assert!(summary.final_inventory.iter().all(|b| b.days_until_expiry > 0));
    }

    #[test]
    fn test_same_seed_gives_identical_summary() {
        let first = food_bank(15, 0.3, 42).advance(60);
        let second = food_bank(15, 0.3, 42).advance(60);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_advance_continues_from_current_state() {
        let mut split = food_bank(15, 0.3, 8);
        split.advance(10);
        let split_summary = split.advance(10);

        let whole_summary = food_bank(15, 0.3, 8).advance(20);

        assert_eq!(split_summary, whole_summary);
        assert_eq!(split_summary.days_elapsed, 20);
    }

    #[test]
    fn test_custom_closed_days() {
        let config = SimulationConfig {
            start_date: Some(sunday()),
            closed_days: vec![Weekday::Mon],
            ..SimulationConfig::default()
        };
        let mut bank = FoodBank::new(20, uniform_probabilities(0.0), &config, ChaCha8Rng::seed_from_u64(9));

        let monday = bank.step();
        assert!(!monday.is_open);
        assert!(monday.deliveries.is_zero());

        let tuesday = bank.step();
        assert!(tuesday.is_open);
        assert_eq!(tuesday.deliveries.total(), 80);
    }

    proptest! {
        #[test]
        fn inventory_is_conserved_every_day(
            seed in any::<u64>(),
            restock in 0u32..40,
            p in 0.0f64..=1.0,
            days in 1usize..40,
        ) {
            let mut bank = food_bank(restock, p, seed);
            let mut expired_total = 0;
            let mut unfulfilled_total = 0;

            for _ in 0..days {
                let report = bank.step();
                for category in FoodBoxCategory::ALL {
                    prop_assert_eq!(
                        u64::from(report.inventory_end[category]),
                        u64::from(report.inventory_start[category])
                            + u64::from(report.deliveries[category])
                            - u64::from(report.expired[category])
                            - u64::from(report.fulfilled[category])
                    );
                    prop_assert_eq!(
                        report.referrals[category],
                        report.fulfilled[category] + report.unfulfilled[category]
                    );
                }
                expired_total += report.expired.total();
                unfulfilled_total += report.unfulfilled.total();
                prop_assert!(bank.inventory().boxes().all(|b| b.days_until_expiry > 0));
            }

            let summary = bank.summary();
            prop_assert_eq!(summary.number_of_expired_boxes, expired_total);
            prop_assert_eq!(summary.number_of_unfulfilled_referrals, unfulfilled_total);
            prop_assert!(summary.average_deliveries_per_day >= 0.0);
        }
    }
}
