//! Totals across abilities at their stored levels
//!
//! Nothing here is cached: every call reads the store, so a total always
//! reflects the latest edit.

use serde::Serialize;

use crate::calc::cost::CostCalculator;
use crate::data::model::{Ability, ViewFilter};
use crate::data::reference::ReferenceData;
use crate::store::LevelStore;

/// Sum of costs for `abilities` at their stored levels, capped at `f64::MAX`
pub fn total_cost<'a, S>(
    abilities: impl IntoIterator<Item = &'a Ability>,
    calculator: &CostCalculator<'_>,
    store: &S,
) -> f64
where
    S: LevelStore + ?Sized,
{
    abilities
        .into_iter()
        .map(|ability| calculator.cost(ability, store.level_for(ability)))
        .sum::<f64>()
        .min(f64::MAX)
}

/// Total for the abilities passing `filter`
pub fn filtered_total<S>(
    data: &ReferenceData,
    filter: &ViewFilter,
    calculator: &CostCalculator<'_>,
    store: &S,
) -> f64
where
    S: LevelStore + ?Sized,
{
    total_cost(
        data.abilities().iter().filter(|a| filter.matches(a)),
        calculator,
        store,
    )
}

/// Subtotal for one stage or path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    pub abilities: usize,
    pub total: f64,
}

fn group_totals<'d, S, K>(
    data: &'d ReferenceData,
    groups: Vec<&'d str>,
    key: K,
    calculator: &CostCalculator<'_>,
    store: &S,
) -> Vec<GroupTotal>
where
    S: LevelStore + ?Sized,
    K: Fn(&'d Ability) -> &'d str,
{
    groups
        .into_iter()
        .map(|group| {
            let members: Vec<&Ability> = data
                .abilities()
                .iter()
                .filter(|a| key(*a) == group)
                .collect();
            GroupTotal {
                group: group.to_string(),
                abilities: members.len(),
                total: total_cost(members, calculator, store),
            }
        })
        .filter(|g| g.abilities > 0)
        .collect()
}

/// Subtotals per cultivation stage, in stage order
pub fn stage_totals<S>(data: &ReferenceData, calculator: &CostCalculator<'_>, store: &S) -> Vec<GroupTotal>
where
    S: LevelStore + ?Sized,
{
    group_totals(data, data.stage_names(), |a| a.stage.as_str(), calculator, store)
}

/// Subtotals per path, in first-seen order
pub fn path_totals<S>(data: &ReferenceData, calculator: &CostCalculator<'_>, store: &S) -> Vec<GroupTotal>
where
    S: LevelStore + ?Sized,
{
    group_totals(data, data.paths(), |a| a.path.as_str(), calculator, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CitrineSource;
    use crate::store::MemoryLevelStore;

    const ABILITIES: &str = r#"[
        {"name": "Rising Dragon", "stage": "Connection", "path": "Sword", "maxLevel": 100},
        {"name": "Iron Palm", "stage": "Connection", "path": "Fist", "maxLevel": 100},
        {"name": "Falling Star", "stage": "Foundation", "path": "Sword", "maxLevel": 100}
    ]"#;
    const STAGES: &str = r#"[
        {"name": "Connection", "citrinePerBook": 100},
        {"name": "Foundation", "citrinePerBook": 150},
        {"name": "Nirvana", "citrinePerBook": 500}
    ]"#;
    const RULES: &str = r#"[
        {"stage": "Connection", "breakthroughs": [{"level": 0, "books": 0}, {"level": 20, "books": 4}, {"level": 30, "books": 10}]},
        {"stage": "Foundation", "breakthroughs": [{"level": 20, "books": 4}]}
    ]"#;

    fn data() -> ReferenceData {
        ReferenceData::from_json(ABILITIES, STAGES, RULES, 10).unwrap()
    }

    #[test]
    fn test_total_of_nothing_is_zero() {
        let data = ReferenceData::default();
        let calc = CostCalculator::new(&data, CitrineSource::Stage);
        let store = MemoryLevelStore::default();
        assert_eq!(total_cost(data.abilities(), &calc, &store), 0.0);
    }

    #[test]
    fn test_total_follows_edits() {
        let data = data();
        let calc = CostCalculator::new(&data, CitrineSource::Stage);
        let mut store = MemoryLevelStore::default();
        assert_eq!(total_cost(data.abilities(), &calc, &store), 0.0);

        let dragon = data.resolve("Sword/Connection/Rising Dragon").unwrap();
        let star = data.resolve("Falling Star").unwrap();
        store.set_level(dragon, 30.0).unwrap();
        store.set_level(star, 20.0).unwrap();
        assert_eq!(total_cost(data.abilities(), &calc, &store), 1400.0 + 600.0);

        store.set_level(dragon, 20.0).unwrap();
        assert_eq!(total_cost(data.abilities(), &calc, &store), 400.0 + 600.0);
    }

    #[test]
    fn test_total_stays_finite_with_huge_rates() {
        let stages = r#"[{"name": "Connection", "citrinePerBook": 1e308}]"#;
        let data = ReferenceData::from_json(ABILITIES, stages, RULES, 10).unwrap();
        let calc = CostCalculator::new(&data, CitrineSource::Stage);
        let mut store = MemoryLevelStore::default();
        store.set_level(data.resolve("Rising Dragon").unwrap(), 30.0).unwrap();
        store.set_level(data.resolve("Iron Palm").unwrap(), 30.0).unwrap();

        let total = total_cost(data.abilities(), &calc, &store);
        assert!(total.is_finite());
        assert_eq!(total, f64::MAX);
        assert_eq!(stage_totals(&data, &calc, &store)[0].total, f64::MAX);
    }

    #[test]
    fn test_filtered_total_vs_grand_total() {
        let data = data();
        let calc = CostCalculator::new(&data, CitrineSource::Stage);
        let mut store = MemoryLevelStore::default();
        store.set_level(data.resolve("Rising Dragon").unwrap(), 30.0).unwrap();
        store.set_level(data.resolve("Iron Palm").unwrap(), 20.0).unwrap();

        let fist = ViewFilter::all().with_path("Fist");
        assert_eq!(filtered_total(&data, &fist, &calc, &store), 400.0);
        assert_eq!(filtered_total(&data, &ViewFilter::all(), &calc, &store), 1800.0);
    }

    #[test]
    fn test_group_totals() {
        let data = data();
        let calc = CostCalculator::new(&data, CitrineSource::Stage);
        let mut store = MemoryLevelStore::default();
        store.set_level(data.resolve("Rising Dragon").unwrap(), 30.0).unwrap();
        store.set_level(data.resolve("Falling Star").unwrap(), 20.0).unwrap();

        let stages = stage_totals(&data, &calc, &store);
        // Nirvana has no abilities and is left out
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].group, "Connection");
        assert_eq!(stages[0].abilities, 2);
        assert_eq!(stages[0].total, 1400.0);
        assert_eq!(stages[1].total, 600.0);

        let paths = path_totals(&data, &calc, &store);
        assert_eq!(paths[0].group, "Sword");
        assert_eq!(paths[0].total, 2000.0);
        assert_eq!(paths[1].total, 0.0);
    }
}
