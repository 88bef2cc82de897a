//! Breakthrough rule definitions and storage

use ahash::AHashMap;
use crate::core::types::Level;

/// A single breakthrough tier: reaching `level` costs `books_required` books
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakthroughRule {
    pub level: Level,
    pub books_required: u32,
}

impl BreakthroughRule {
    pub fn new(level: Level, books_required: u32) -> Self {
        Self { level, books_required }
    }
}

/// All breakthrough tiers for one cultivation stage, sorted by level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakthroughTable {
    rules: Vec<BreakthroughRule>,
}

impl BreakthroughTable {
    /// Build a table from rules in any order
    ///
    /// Rules sharing a threshold are merged by adding their books.
    pub fn new(rules: impl IntoIterator<Item = BreakthroughRule>) -> Self {
        let mut rules: Vec<BreakthroughRule> = rules.into_iter().collect();
        rules.sort_by_key(|r| r.level);
        rules.dedup_by(|later, earlier| {
            if later.level == earlier.level {
                earlier.books_required = earlier.books_required.saturating_add(later.books_required);
                true
            } else {
                false
            }
        });
        Self { rules }
    }

    pub fn rules(&self) -> &[BreakthroughRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Tiers whose threshold has been reached at `level`
    pub fn reached(&self, level: Level) -> impl Iterator<Item = &BreakthroughRule> {
        self.rules.iter().filter(move |r| r.level <= level)
    }

    /// Total books for every tier reached at `level`
    pub fn books_through(&self, level: Level) -> u64 {
        self.reached(level).map(|r| r.books_required as u64).sum()
    }

    /// First tier above `level`, if any
    pub fn next_after(&self, level: Level) -> Option<&BreakthroughRule> {
        self.rules.iter().find(|r| r.level > level)
    }
}

/// Breakthrough tables indexed by cultivation stage name
#[derive(Debug, Clone, Default)]
pub struct BreakthroughRules {
    tables: AHashMap<String, BreakthroughTable>,
}

impl BreakthroughRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for a stage
    pub fn for_stage(&self, stage: &str) -> Option<&BreakthroughTable> {
        self.tables.get(stage)
    }

    /// Insert the table for a stage, returning false if one was already present
    pub fn insert(&mut self, stage: impl Into<String>, table: BreakthroughTable) -> bool {
        let stage = stage.into();
        if self.tables.contains_key(&stage) {
            return false;
        }
        self.tables.insert(stage, table);
        true
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
