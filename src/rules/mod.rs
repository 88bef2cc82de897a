//! Per-stage breakthrough rules loaded from JSON

pub mod breakthrough;
mod loader;

pub use breakthrough::{BreakthroughRule, BreakthroughRules, BreakthroughTable};
pub use loader::{load_breakthrough_rules, rules_from_records};
