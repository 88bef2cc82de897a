//! Build breakthrough rules from parsed table records

use crate::data::schema::{parse_records, BreakthroughRecord};
use crate::core::error::Result;
use crate::rules::breakthrough::{BreakthroughRule, BreakthroughRules, BreakthroughTable};

/// Parse `breakthroughs.json` text into per-stage tables
pub fn load_breakthrough_rules(resource: &str, text: &str) -> Result<BreakthroughRules> {
    let records: Vec<BreakthroughRecord> = parse_records(resource, text)?;
    Ok(rules_from_records(records))
}

/// Index rule sets by stage
///
/// Rule sets with an empty stage name are dropped. When a stage appears more
/// than once, the first rule set is kept.
pub fn rules_from_records(records: Vec<BreakthroughRecord>) -> BreakthroughRules {
    let mut rules = BreakthroughRules::new();

    for record in records {
        let stage = record.cultivation_stage.trim();
        if stage.is_empty() {
            tracing::warn!("Skipping breakthrough rule set with empty stage");
            continue;
        }

        let table = BreakthroughTable::new(
            record
                .breakthroughs
                .iter()
                .map(|r| BreakthroughRule::new(r.level, r.books_required)),
        );

        if !rules.insert(stage, table) {
            tracing::warn!(stage, "Duplicate breakthrough rule set, keeping the first");
        }
    }

    rules
}
