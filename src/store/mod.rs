//! Persistence of user-entered ability levels

pub mod file;
pub mod memory;

pub use file::FileLevelStore;
pub use memory::MemoryLevelStore;

use crate::core::error::Result;
use crate::core::types::{normalize_level, AbilityId, Level};
use crate::data::model::Ability;

/// Key-value store of ability levels
///
/// Every stored level is a multiple of the store's step and within the
/// ability's `[0, max_level]` range. Entries are never removed.
pub trait LevelStore {
    /// Stored level, or 0 when nothing has been stored
    fn get_level(&self, id: &AbilityId) -> Level;

    /// Normalize `raw` against the ability and persist it
    ///
    /// Returns the level actually stored.
    fn set_level(&mut self, ability: &Ability, raw: f64) -> Result<Level>;

    /// Step that stored levels snap to
    fn level_step(&self) -> Level;

    /// All stored entries, sorted by id
    fn entries(&self) -> Vec<(AbilityId, Level)>;

    /// Stored level re-checked against the current ability definition
    ///
    /// Entries written before an ability's `max_level` was lowered are
    /// clamped here rather than rewritten.
    fn level_for(&self, ability: &Ability) -> Level {
        normalize_level(
            self.get_level(&ability.id) as f64,
            ability.max_level,
            self.level_step(),
        )
    }
}
