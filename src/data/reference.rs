//! Immutable reference data shared by every calculation
//!
//! Built once from the three tables at startup. Abilities keep the order of
//! the source file; stages keep the order of `stages.json`.

use ahash::AHashMap;

use crate::core::error::{CalcError, Result};
use crate::core::types::{AbilityId, Level};
use crate::data::model::{Ability, CultivationStage, ViewFilter};
use crate::data::schema::{parse_records, AbilityRecord, StageRecord};
use crate::rules::{load_breakthrough_rules, BreakthroughRules, BreakthroughTable};

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    abilities: Vec<Ability>,
    by_id: AHashMap<AbilityId, usize>,
    stages: Vec<CultivationStage>,
    stage_index: AHashMap<String, usize>,
    rules: BreakthroughRules,
}

impl ReferenceData {
    /// Assemble reference data from validated records
    ///
    /// Duplicate ability ids and stage names keep their first occurrence.
    pub fn new(
        abilities: Vec<Ability>,
        stages: Vec<CultivationStage>,
        rules: BreakthroughRules,
    ) -> Self {
        let mut data = Self {
            rules,
            ..Self::default()
        };

        for stage in stages {
            if data.stage_index.contains_key(&stage.name) {
                tracing::warn!(stage = %stage.name, "Duplicate cultivation stage, keeping the first");
                continue;
            }
            data.stage_index.insert(stage.name.clone(), data.stages.len());
            data.stages.push(stage);
        }

        for ability in abilities {
            if data.by_id.contains_key(&ability.id) {
                tracing::warn!(ability = %ability.id, "Duplicate ability, keeping the first");
                continue;
            }
            if !data.stage_index.contains_key(&ability.stage) {
                tracing::warn!(
                    ability = %ability.id,
                    stage = %ability.stage,
                    "Ability references an unknown cultivation stage"
                );
            }
            data.by_id.insert(ability.id.clone(), data.abilities.len());
            data.abilities.push(ability);
        }

        data
    }

    /// Parse and validate the three table documents
    pub fn from_json(
        abilities_json: &str,
        stages_json: &str,
        breakthroughs_json: &str,
        level_step: Level,
    ) -> Result<Self> {
        let abilities = parse_records::<AbilityRecord>("abilities", abilities_json)?
            .into_iter()
            .filter_map(|r| r.into_ability(level_step))
            .collect();
        let stages = parse_records::<StageRecord>("stages", stages_json)?
            .into_iter()
            .filter_map(StageRecord::into_stage)
            .collect();
        let rules = load_breakthrough_rules("breakthroughs", breakthroughs_json)?;

        let data = Self::new(abilities, stages, rules);
        tracing::info!(
            abilities = data.abilities.len(),
            stages = data.stages.len(),
            rule_sets = data.rules.len(),
            "Reference data loaded"
        );
        Ok(data)
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn ability(&self, id: &AbilityId) -> Option<&Ability> {
        self.by_id.get(id).map(|&i| &self.abilities[i])
    }

    pub fn stages(&self) -> &[CultivationStage] {
        &self.stages
    }

    pub fn stage(&self, name: &str) -> Option<&CultivationStage> {
        self.stage_index.get(name).map(|&i| &self.stages[i])
    }

    pub fn rules(&self) -> &BreakthroughRules {
        &self.rules
    }

    pub fn table_for(&self, ability: &Ability) -> Option<&BreakthroughTable> {
        self.rules.for_stage(&ability.stage)
    }

    /// Find an ability by full id, or by name when the name is unique
    ///
    /// Name matching ignores ASCII case.
    pub fn resolve(&self, query: &str) -> Result<&Ability> {
        let query = query.trim();
        if let Some(ability) = self.ability(&AbilityId::from(query)) {
            return Ok(ability);
        }

        let matches: Vec<&Ability> = self
            .abilities
            .iter()
            .filter(|a| a.name.eq_ignore_ascii_case(query))
            .collect();

        match matches.as_slice() {
            [] => Err(CalcError::UnknownAbility(query.to_string())),
            [only] => Ok(*only),
            many => Err(CalcError::AmbiguousAbility {
                query: query.to_string(),
                candidates: many.iter().map(|a| a.id.to_string()).collect(),
            }),
        }
    }

    /// Distinct paths in first-seen order
    pub fn paths(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for ability in &self.abilities {
            if !seen.contains(&ability.path.as_str()) {
                seen.push(ability.path.as_str());
            }
        }
        seen
    }

    /// Stage names in display order
    ///
    /// Stages from `stages.json` come first, then any stage only referenced
    /// by abilities.
    pub fn stage_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stages.iter().map(|s| s.name.as_str()).collect();
        for ability in &self.abilities {
            if !names.contains(&ability.stage.as_str()) {
                names.push(ability.stage.as_str());
            }
        }
        names
    }

    /// Abilities passing `filter`, grouped by stage then path
    ///
    /// Order within a group follows the source file.
    pub fn grouped(&self, filter: &ViewFilter) -> Vec<&Ability> {
        let stage_order = self.stage_names();
        let path_order = self.paths();
        let position = |list: &[&str], key: &str| list.iter().position(|k| *k == key);

        let mut visible: Vec<&Ability> =
            self.abilities.iter().filter(|a| filter.matches(a)).collect();
        visible.sort_by_key(|a| {
            (
                position(stage_order.as_slice(), a.stage.as_str()),
                position(path_order.as_slice(), a.path.as_str()),
            )
        });
        visible
    }
}
