//! Request validation
//! Turns caller-supplied parameters into a `SimulationPlan`, rejecting
//! anything out of range rather than clamping it

use crate::error::ValidationError;
use crate::models::{FoodBoxCategory, ReferralProbabilities, SimulationPlan, SimulationRequest};

/// Largest restock batch per category; every box in a batch is allocated on delivery
pub const MAX_RESTOCK_QUANTITY: u32 = 100_000;

pub fn validate_request(request: &SimulationRequest) -> Result<SimulationPlan, ValidationError> {
    if request.number_of_days <= 0 {
        return Err(ValidationError::NonPositiveDays {
            value: request.number_of_days,
        });
    }
    if request.number_of_simulations <= 0 {
        return Err(ValidationError::NonPositiveSimulations {
            value: request.number_of_simulations,
        });
    }
    if request.restock_quantity < 0 {
        return Err(ValidationError::NegativeRestockQuantity {
            value: request.restock_quantity,
        });
    }

    let plan = SimulationPlan {
        days: to_u32("numberOfDays", request.number_of_days)?,
        simulations: to_u32("numberOfSimulations", request.number_of_simulations)?,
        restock_quantity: to_u32("restockQuantity", request.restock_quantity)?,
        probabilities: request.referral_probabilities,
    };
    validate_plan(&plan)?;
    Ok(plan)
}

/// Checks a plan built directly by a caller, not through `validate_request`
pub fn validate_plan(plan: &SimulationPlan) -> Result<(), ValidationError> {
    if plan.days == 0 {
        return Err(ValidationError::NonPositiveDays { value: 0 });
    }
    if plan.simulations == 0 {
        return Err(ValidationError::NonPositiveSimulations { value: 0 });
    }
    if plan.restock_quantity > MAX_RESTOCK_QUANTITY {
        return Err(ValidationError::ValueTooLarge {
            field: "restockQuantity",
            value: i64::from(plan.restock_quantity),
            max: MAX_RESTOCK_QUANTITY,
        });
    }
    validate_probabilities(&plan.probabilities)
}

pub fn validate_probabilities(probabilities: &ReferralProbabilities) -> Result<(), ValidationError> {
    for category in FoodBoxCategory::ALL {
        let value = probabilities.field(category);
        // NaN fails the range check as well
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::ProbabilityOutOfRange { category, value });
        }
    }
    Ok(())
}

fn to_u32(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::ValueTooLarge {
        field,
        value,
        max: u32::MAX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SimulationRequest {
        SimulationRequest {
            number_of_days: 30,
            number_of_simulations: 10,
            restock_quantity: 20,
            referral_probabilities: ReferralProbabilities {
                single: 0.2,
                couple: 0.3,
                family: 0.4,
                large_family: 0.1,
            },
        }
    }

    #[test]
    fn test_valid_request_becomes_plan() {
        let plan = validate_request(&request()).unwrap();
        assert_eq!(plan.days, 30);
        assert_eq!(plan.simulations, 10);
        assert_eq!(plan.restock_quantity, 20);
        assert_eq!(plan.probabilities, request().referral_probabilities);
    }

    #[test]
    fn test_zero_restock_is_allowed() {
        let mut req = request();
        req.restock_quantity = 0;
        assert_eq!(validate_request(&req).unwrap().restock_quantity, 0);
    }

    #[test]
    fn test_non_positive_days_rejected() {
        for days in [0, -5] {
            let mut req = request();
            req.number_of_days = days;
            assert_eq!(
                validate_request(&req),
                Err(ValidationError::NonPositiveDays { value: days })
            );
        }
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let mut req = request();
        req.number_of_simulations = 0;
        assert_eq!(
            validate_request(&req),
            Err(ValidationError::NonPositiveSimulations { value: 0 })
        );
    }

    #[test]
    fn test_negative_restock_rejected() {
        let mut req = request();
        req.restock_quantity = -1;
        assert_eq!(
            validate_request(&req),
            Err(ValidationError::NegativeRestockQuantity { value: -1 })
        );
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut req = request();
        req.referral_probabilities.couple = 1.5;
        assert_eq!(
            validate_request(&req),
            Err(ValidationError::ProbabilityOutOfRange {
                category: FoodBoxCategory::Couple,
                value: 1.5,
            })
        );

        let mut req = request();
        req.referral_probabilities.large_family = -0.1;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_nan_probability_rejected() {
        let mut req = request();
        req.referral_probabilities.family = f64::NAN;
        assert!(matches!(
            validate_request(&req),
            Err(ValidationError::ProbabilityOutOfRange {
                category: FoodBoxCategory::Family,
                ..
            })
        ));
    }

    #[test]
    fn test_oversized_restock_rejected() {
        let mut req = request();
        req.restock_quantity = i64::from(MAX_RESTOCK_QUANTITY) + 1;
        assert_eq!(
            validate_request(&req),
            Err(ValidationError::ValueTooLarge {
                field: "restockQuantity",
                value: i64::from(MAX_RESTOCK_QUANTITY) + 1,
                max: MAX_RESTOCK_QUANTITY,
            })
        );

        req.restock_quantity = i64::from(MAX_RESTOCK_QUANTITY);
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_plan_with_bad_probability_rejected() {
        let mut plan = validate_request(&request()).unwrap();
        plan.probabilities.single = 2.0;
        assert!(matches!(
            validate_plan(&plan),
            Err(ValidationError::ProbabilityOutOfRange {
                category: FoodBoxCategory::Single,
                ..
            })
        ));
    }

    #[test]
    fn test_oversized_days_rejected() {
        let mut req = request();
        req.number_of_days = i64::from(u32::MAX) + 1;
        assert!(matches!(
            validate_request(&req),
            Err(ValidationError::ValueTooLarge { field: "numberOfDays", .. })
        ));
    }
}
