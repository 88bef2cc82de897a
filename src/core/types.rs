//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ability level as stored and displayed
pub type Level = u32;

/// Levels are entered and stored in steps of this size
pub const DEFAULT_LEVEL_STEP: Level = 10;

/// Separator between the parts of an [`AbilityId`]; never allowed inside a part
pub const ID_SEPARATOR: char = '/';

/// Unique identifier for an ability: `path/stage/name`
///
/// Ability names are only unique within a path and stage, so all three
/// parts make up the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(String);

impl AbilityId {
    pub fn new(path: &str, stage: &str, name: &str) -> Self {
        Self(format!("{path}{sep}{stage}{sep}{name}", sep = ID_SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AbilityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Clamp a raw level into `[0, max_level]` and snap it to the nearest
/// multiple of `step` (ties round up).
///
/// Non-finite and negative input yields 0. The result never exceeds
/// `max_level` rounded down to a whole step.
pub fn normalize_level(raw: f64, max_level: Level, step: Level) -> Level {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let step = step.max(1);
    let cap = max_level - max_level % step;
    let clamped = raw.min(max_level as f64);
    let snapped = ((clamped / step as f64).round() as Level).saturating_mul(step);
    snapped.min(cap)
}
