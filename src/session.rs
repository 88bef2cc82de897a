//! A calculator session: loaded reference data plus the user's levels
//!
//! Reference data is loaded once and shared read-only. Each edit runs to
//! completion (normalize, price, persist, re-total) before the next one.

use serde::Serialize;
use std::sync::Arc;

use crate::calc::{self, CostBreakdown, CostCalculator, GroupTotal};
use crate::core::config::{CalculatorConfig, CitrineSource};
use crate::core::error::Result;
use crate::core::types::{normalize_level, AbilityId, Level};
use crate::data::{load_reference_data, Ability, DataSources, ReferenceData, ViewFilter};
use crate::store::{FileLevelStore, LevelStore, MemoryLevelStore};

/// One visible ability with its current level and cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityRow {
    pub id: AbilityId,
    pub name: String,
    pub stage: String,
    pub path: String,
    pub max_level: Level,
    pub level: Level,
    pub cost: f64,
}

/// Result of a single level edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditOutcome {
    pub id: AbilityId,
    pub previous_level: Level,
    pub level: Level,
    pub cost: f64,
    pub total: f64,
}

pub struct Session {
    data: Arc<ReferenceData>,
    store: Box<dyn LevelStore>,
    source: CitrineSource,
}

impl Session {
    pub fn new(data: Arc<ReferenceData>, store: Box<dyn LevelStore>, source: CitrineSource) -> Self {
        Self { data, store, source }
    }

    /// Load reference data and open the level store described by `config`
    ///
    /// With `ephemeral`, levels live in memory only and nothing is written.
    pub async fn open(config: &CalculatorConfig, ephemeral: bool) -> Result<Self> {
        config.validate()?;

        let sources = DataSources::from(&config.data);
        let data = load_reference_data(&sources, config.level_step).await?;

        let store: Box<dyn LevelStore> = if ephemeral {
            Box::new(MemoryLevelStore::new(config.level_step))
        } else {
            Box::new(FileLevelStore::open(&config.store_path, config.level_step)?)
        };

        Ok(Self::new(Arc::new(data), store, config.citrine_source))
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn calculator(&self) -> CostCalculator<'_> {
        CostCalculator::new(&self.data, self.source)
    }

    /// Find an ability by full id or by unique name
    pub fn resolve(&self, query: &str) -> Result<&Ability> {
        self.data.resolve(query)
    }

    /// Selectable paths, in first-seen order
    pub fn paths(&self) -> Vec<&str> {
        self.data.paths()
    }

    /// Selectable cultivation stages, in stage order
    pub fn stages(&self) -> Vec<&str> {
        self.data.stage_names()
    }

    /// Set an ability's level and return its new cost and the grand total
    pub fn edit(&mut self, query: &str, raw_level: f64) -> Result<EditOutcome> {
        let data = Arc::clone(&self.data);
        let ability = data.resolve(query)?;

        let previous_level = self.store.level_for(ability);
        let level = normalize_level(raw_level, ability.max_level, self.store.level_step());
        let cost = CostCalculator::new(&data, self.source).cost(ability, level);

        let stored = self.store.set_level(ability, raw_level)?;
        debug_assert_eq!(stored, level);

        let total = self.total();
        tracing::debug!(
            ability = %ability.id,
            raw_level,
            previous_level,
            level,
            cost,
            total,
            "Level updated"
        );

        Ok(EditOutcome {
            id: ability.id.clone(),
            previous_level,
            level,
            cost,
            total,
        })
    }

    /// Price an ability at a level without storing anything
    pub fn what_if(&self, query: &str, raw_level: f64) -> Result<(&Ability, CostBreakdown)> {
        let ability = self.resolve(query)?;
        let level = normalize_level(raw_level, ability.max_level, self.store.level_step());
        Ok((ability, self.calculator().breakdown(ability, level)))
    }

    /// Visible abilities, grouped by stage then path
    pub fn rows(&self, filter: &ViewFilter) -> Vec<AbilityRow> {
        let calculator = self.calculator();
        self.data
            .grouped(filter)
            .into_iter()
            .map(|ability| {
                let level = self.store.level_for(ability);
                AbilityRow {
                    id: ability.id.clone(),
                    name: ability.name.clone(),
                    stage: ability.stage.clone(),
                    path: ability.path.clone(),
                    max_level: ability.max_level,
                    level,
                    cost: calculator.cost(ability, level),
                }
            })
            .collect()
    }

    /// Grand total over every ability, whatever is currently visible
    pub fn total(&self) -> f64 {
        calc::total_cost(self.data.abilities(), &self.calculator(), self.store.as_ref())
    }

    pub fn visible_total(&self, filter: &ViewFilter) -> f64 {
        calc::filtered_total(&self.data, filter, &self.calculator(), self.store.as_ref())
    }

    pub fn stage_totals(&self) -> Vec<GroupTotal> {
        calc::stage_totals(&self.data, &self.calculator(), self.store.as_ref())
    }

    pub fn path_totals(&self) -> Vec<GroupTotal> {
        calc::path_totals(&self.data, &self.calculator(), self.store.as_ref())
    }
}
