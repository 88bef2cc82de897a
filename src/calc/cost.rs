//! Citrine cost of an ability at a given level
//!
//! Cost is cumulative: an ability at level 45 pays for every breakthrough
//! tier from 0 through 40, not just the 40 tier. The book total is then
//! priced at the ability's Citrine-per-book rate.

use serde::Serialize;

use crate::core::config::CitrineSource;
use crate::core::types::Level;
use crate::data::model::Ability;
use crate::data::reference::ReferenceData;
use crate::rules::BreakthroughRules;

/// Turn a raw level into a whole level, or `None` if it is not usable
fn whole_level(raw: f64) -> Option<Level> {
    if raw.is_finite() && raw >= 0.0 {
        // `as` saturates for values beyond Level::MAX
        Some(raw.floor() as Level)
    } else {
        None
    }
}

fn per_book_or_zero(citrine_per_book: Option<f64>) -> f64 {
    match citrine_per_book {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Citrine needed to bring `ability` to `level`
///
/// The level is floored and clamped to the ability's `max_level`, so tiers
/// the ability can never reach are not charged. Returns 0 for an invalid
/// level, a stage without breakthrough rules, or a missing per-book cost.
/// Never returns NaN or a negative value.
pub fn compute_cost(
    ability: &Ability,
    level: f64,
    rules: &BreakthroughRules,
    citrine_per_book: Option<f64>,
) -> f64 {
    let Some(level) = whole_level(level) else {
        return 0.0;
    };
    let Some(table) = rules.for_stage(&ability.stage) else {
        return 0.0;
    };
    price(table.books_through(level.min(ability.max_level)), per_book_or_zero(citrine_per_book))
}

/// Books times rate; a huge rate can overflow to infinity, so cap it
fn price(books: u64, per_book: f64) -> f64 {
    (books as f64 * per_book).min(f64::MAX)
}

/// One breakthrough tier and what it costs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierCost {
    pub level: Level,
    pub books: u32,
    pub citrine: f64,
}

/// Tier-by-tier cost of an ability at a level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub level: Level,
    pub citrine_per_book: f64,
    pub tiers: Vec<TierCost>,
    pub total_books: u64,
    pub total: f64,
    /// Next reachable tier above `level`, if any
    pub next: Option<TierCost>,
}

/// Prices abilities against loaded reference data
///
/// The per-book rate is read from the single [`CitrineSource`] chosen at
/// construction, never from whichever field happens to be present.
#[derive(Debug, Clone, Copy)]
pub struct CostCalculator<'a> {
    data: &'a ReferenceData,
    source: CitrineSource,
}

impl<'a> CostCalculator<'a> {
    pub fn new(data: &'a ReferenceData, source: CitrineSource) -> Self {
        Self { data, source }
    }

    pub fn citrine_per_book(&self, ability: &Ability) -> Option<f64> {
        match self.source {
            CitrineSource::Ability => ability.citrine_per_book,
            CitrineSource::Stage => self
                .data
                .stage(&ability.stage)
                .and_then(|stage| stage.citrine_per_book),
        }
    }

    pub fn cost(&self, ability: &Ability, level: Level) -> f64 {
        self.cost_raw(ability, level as f64)
    }

    /// Cost for an unvalidated level; invalid input costs 0
    pub fn cost_raw(&self, ability: &Ability, level: f64) -> f64 {
        compute_cost(ability, level, self.data.rules(), self.citrine_per_book(ability))
    }

    pub fn books(&self, ability: &Ability, level: Level) -> u64 {
        let level = level.min(ability.max_level);
        self.data
            .table_for(ability)
            .map_or(0, |table| table.books_through(level))
    }

    pub fn breakdown(&self, ability: &Ability, level: Level) -> CostBreakdown {
        let level = level.min(ability.max_level);
        let per_book = per_book_or_zero(self.citrine_per_book(ability));
        let tier = |level: Level, books: u32| TierCost {
            level,
            books,
            citrine: price(books as u64, per_book),
        };

        let (tiers, next) = match self.data.table_for(ability) {
            Some(table) => (
                table
                    .reached(level)
                    .map(|r| tier(r.level, r.books_required))
                    .collect::<Vec<_>>(),
                table
                    .next_after(level)
                    .filter(|r| r.level <= ability.max_level)
                    .map(|r| tier(r.level, r.books_required)),
            ),
            None => (Vec::new(), None),
        };

        let total_books: u64 = tiers.iter().map(|t| t.books as u64).sum();
        CostBreakdown {
            level,
            citrine_per_book: per_book,
            total_books,
            total: price(total_books, per_book),
            tiers,
            next,
        }
    }
}
