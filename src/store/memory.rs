//! In-process level store

use ahash::AHashMap;

use crate::core::error::Result;
use crate::core::types::{normalize_level, AbilityId, Level, DEFAULT_LEVEL_STEP};
use crate::data::model::Ability;
use crate::store::LevelStore;

#[derive(Debug, Clone)]
pub struct MemoryLevelStore {
    levels: AHashMap<AbilityId, Level>,
    step: Level,
}

impl Default for MemoryLevelStore {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_STEP)
    }
}

impl MemoryLevelStore {
    pub fn new(step: Level) -> Self {
        Self {
            levels: AHashMap::new(),
            step: step.max(1),
        }
    }

    /// Seed with already-normalized entries
    pub fn with_levels(step: Level, levels: impl IntoIterator<Item = (AbilityId, Level)>) -> Self {
        let mut store = Self::new(step);
        store.levels.extend(levels);
        store
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelStore for MemoryLevelStore {
    fn get_level(&self, id: &AbilityId) -> Level {
        self.levels.get(id).copied().unwrap_or(0)
    }

    fn set_level(&mut self, ability: &Ability, raw: f64) -> Result<Level> {
        let level = normalize_level(raw, ability.max_level, self.step);
        self.levels.insert(ability.id.clone(), level);
        Ok(level)
    }

    fn level_step(&self) -> Level {
        self.step
    }

    fn entries(&self) -> Vec<(AbilityId, Level)> {
        let mut entries: Vec<_> = self
            .levels
            .iter()
            .map(|(id, level)| (id.clone(), *level))
            .collect();
        entries.sort();
        entries
    }
}
