//! Reporting and output formatting module
//! Handles all console output and result presentation

use crate::models::{AggregateResult, FoodBoxCategory, SimulationPlan};

const BAR_WIDTH: usize = 50;

/// Display the parameters of the sweep about to run
pub fn display_simulation_start(plan: &SimulationPlan) {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                     FOOD BANK MONTE CARLO SIMULATION                         ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝\n");

    println!("Days per run:       {}", plan.days);
    println!("Simulations:        {}", plan.simulations);
    println!("Restock quantity:   {}", plan.restock_quantity);
    println!("Referral probabilities:");
    for category in FoodBoxCategory::ALL {
        println!("  {:<14} {:.2}", category.name(), plan.probabilities.field(category));
    }
    println!();
}

/// Display the averaged results and a bar chart of them
pub fn display_aggregate_result(result: &AggregateResult) {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                           MONTE CARLO RESULTS                                ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝\n");

    println!(
        "Avg. unfulfilled referrals:    {:.2}",
        result.avg_number_of_unfulfilled_referrals
    );
    println!(
        "Avg. deliveries per day:       {:.2}",
        result.avg_number_of_deliveries_per_day
    );
    println!(
        "Avg. expired boxes of food:    {:.2}\n",
        result.avg_number_of_expired_boxes_of_food
    );

    print!("{}", render_bar_chart(result, BAR_WIDTH));
}

/// Horizontal bar chart of the three averages, scaled to the largest one
pub fn render_bar_chart(result: &AggregateResult, width: usize) -> String {
    let rows = [
        ("Unfulfilled referrals", result.avg_number_of_unfulfilled_referrals),
        ("Deliveries per day", result.avg_number_of_deliveries_per_day),
        ("Expired boxes", result.avg_number_of_expired_boxes_of_food),
    ];
    let largest = rows.iter().map(|(_, value)| *value).fold(0.0_f64, f64::max);

    let mut chart = String::new();
    for (label, value) in rows {
        let filled = if largest > 0.0 {
            ((value / largest) * width as f64).round() as usize
        } else {
            0
        };
        chart.push_str(&format!(
            "{:<22} │{}{} {:.2}\n",
            label,
            "█".repeat(filled),
            " ".repeat(width - filled.min(width)),
            value
        ));
    }
    chart
}
