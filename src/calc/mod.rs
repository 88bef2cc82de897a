//! Cost calculation and aggregation

pub mod aggregate;
pub mod cost;

pub use aggregate::{filtered_total, path_totals, stage_totals, total_cost, GroupTotal};
pub use cost::{compute_cost, CostBreakdown, CostCalculator, TierCost};

/// Format a Citrine amount for display
///
/// Whole amounts print without decimals, everything else with two.
pub fn format_citrine(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}
