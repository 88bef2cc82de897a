//! Property-based tests using proptest
//!
//! Invariants that must hold for all inputs:
//! - Cost is never negative or NaN
//! - Cost is monotonic in level
//! - Cost is a pure function of its inputs
//! - Stored levels are always in range and on the step
//! - The grand total equals the sum of row costs after any edit sequence

use citrine_calc::calc::compute_cost;
use citrine_calc::core::types::{normalize_level, AbilityId};
use citrine_calc::data::{Ability, CultivationStage, ReferenceData, ViewFilter};
use citrine_calc::rules::{BreakthroughRule, BreakthroughRules, BreakthroughTable};
use citrine_calc::store::{LevelStore, MemoryLevelStore};
use citrine_calc::{CitrineSource, Session};
use proptest::prelude::*;
use std::sync::Arc;

fn ability(stage: &str, max_level: u32) -> Ability {
    Ability {
        id: AbilityId::new("Sword", stage, "Rising Dragon"),
        name: "Rising Dragon".into(),
        stage: stage.into(),
        path: "Sword".into(),
        max_level,
        citrine_per_book: None,
    }
}

fn rules_strategy() -> impl Strategy<Value = BreakthroughRules> {
    prop::collection::vec((0u32..=200, 0u32..=500), 0..12).prop_map(|tiers| {
        let mut rules = BreakthroughRules::new();
        rules.insert(
            "Connection",
            BreakthroughTable::new(
                tiers
                    .into_iter()
                    .map(|(level, books)| BreakthroughRule::new(level, books)),
            ),
        );
        rules
    })
}

/// Four abilities across two paths and three stages, one without rules
fn session_with(rules: BreakthroughRules) -> Session {
    let make = |path: &str, stage: &str, name: &str, max_level: u32| Ability {
        id: AbilityId::new(path, stage, name),
        name: name.into(),
        stage: stage.into(),
        path: path.into(),
        max_level,
        citrine_per_book: None,
    };
    let abilities = vec![
        make("Sword", "Connection", "Rising Dragon", 200),
        make("Fist", "Connection", "Iron Palm", 60),
        make("Sword", "Foundation", "Falling Star", 100),
        make("Body", "Nirvana", "Void Step", 40),
    ];
    let stages = [("Connection", 100.0), ("Foundation", 150.0), ("Nirvana", 500.0)]
        .into_iter()
        .map(|(name, rate)| CultivationStage {
            name: name.into(),
            citrine_per_book: Some(rate),
        })
        .collect();

    let mut rules = rules;
    rules.insert(
        "Foundation",
        BreakthroughTable::new([BreakthroughRule::new(20, 4), BreakthroughRule::new(30, 10)]),
    );
    Session::new(
        Arc::new(ReferenceData::new(abilities, stages, rules)),
        Box::new(MemoryLevelStore::new(10)),
        CitrineSource::Stage,
    )
}

const ABILITY_IDS: [&str; 4] = [
    "Sword/Connection/Rising Dragon",
    "Fist/Connection/Iron Palm",
    "Sword/Foundation/Falling Star",
    "Body/Nirvana/Void Step",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_cost_is_monotonic(
        rules in rules_strategy(),
        a in 0u32..=200,
        b in 0u32..=200,
        per_book in 0.0f64..1000.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let ability = ability("Connection", 200);
        let low_cost = compute_cost(&ability, low as f64, &rules, Some(per_book));
        let high_cost = compute_cost(&ability, high as f64, &rules, Some(per_book));
        prop_assert!(high_cost >= low_cost, "cost({}) = {} < cost({}) = {}", high, high_cost, low, low_cost);
    }

    #[test]
    fn prop_cost_is_idempotent(rules in rules_strategy(), level in any::<f64>(), per_book in any::<f64>()) {
        let ability = ability("Connection", 200);
        let first = compute_cost(&ability, level, &rules, Some(per_book));
        let second = compute_cost(&ability, level, &rules, Some(per_book));
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn prop_cost_is_finite_and_non_negative(rules in rules_strategy(), level in any::<f64>(), per_book in any::<f64>()) {
        let ability = ability("Connection", 200);
        let cost = compute_cost(&ability, level, &rules, Some(per_book));
        prop_assert!(cost.is_finite());
        prop_assert!(cost >= 0.0);
    }

    #[test]
    fn prop_unknown_stage_costs_nothing(rules in rules_strategy(), level in 0u32..=200) {
        let ability = ability("Nirvana", 200);
        prop_assert_eq!(compute_cost(&ability, level as f64, &rules, Some(500.0)), 0.0);
    }

    #[test]
    fn prop_below_lowest_threshold_costs_nothing(rules in rules_strategy(), per_book in 0.0f64..1000.0) {
        let ability = ability("Connection", 200);
        let lowest = rules
            .for_stage("Connection")
            .and_then(|t| t.rules().first().map(|r| r.level));
        if let Some(lowest) = lowest.filter(|&l| l > 0) {
            let cost = compute_cost(&ability, (lowest - 1) as f64, &rules, Some(per_book));
            prop_assert_eq!(cost, 0.0);
        }
    }

    #[test]
    fn prop_stored_level_in_range_and_on_step(raw in any::<f64>(), max_steps in 0u32..=30) {
        let max_level = max_steps * 10;
        let mut store = MemoryLevelStore::new(10);
        let ability = ability("Connection", max_level);

        let stored = store.set_level(&ability, raw).unwrap();
        prop_assert!(stored <= max_level);
        prop_assert_eq!(stored % 10, 0);
        prop_assert_eq!(store.get_level(&ability.id), stored);
    }

    #[test]
    fn prop_normalize_is_stable(raw in -1000.0f64..1000.0, max_steps in 0u32..=30) {
        let max_level = max_steps * 10;
        let once = normalize_level(raw, max_level, 10);
        prop_assert_eq!(normalize_level(once as f64, max_level, 10), once);
    }

    #[test]
    fn prop_total_matches_rows_after_edits(
        rules in rules_strategy(),
        edits in prop::collection::vec((0usize..4, -50.0f64..300.0), 1..40),
    ) {
        let mut session = session_with(rules);
        for (index, raw) in edits {
            let outcome = session.edit(ABILITY_IDS[index], raw).unwrap();
            let rows = session.rows(&ViewFilter::all());
            let sum: f64 = rows.iter().map(|row| row.cost).sum();

            prop_assert_eq!(rows.len(), 4);
            prop_assert_eq!(outcome.total, sum);
            prop_assert_eq!(session.total(), sum);
            let edited = rows.iter().find(|row| row.id.as_str() == ABILITY_IDS[index]).unwrap();
            prop_assert_eq!(edited.level, outcome.level);
            prop_assert_eq!(edited.cost, outcome.cost);
        }
    }
}
