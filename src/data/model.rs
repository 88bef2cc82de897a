//! Validated reference records

use serde::Serialize;

use crate::core::types::{AbilityId, Level};

/// An ability that can be levelled with resource books
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    /// Cultivation stage name; selects the breakthrough table
    pub stage: String,
    /// Category tag used to filter the view
    pub path: String,
    /// Always a multiple of the level step
    pub max_level: Level,
    pub citrine_per_book: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CultivationStage {
    pub name: String,
    pub citrine_per_book: Option<f64>,
}

/// Restricts which abilities are shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub path: Option<String>,
    pub stage: Option<String>,
}

impl ViewFilter {
    /// Filter that lets every ability through
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn matches(&self, ability: &Ability) -> bool {
        let path_ok = self
            .path
            .as_deref()
            .map_or(true, |p| p.eq_ignore_ascii_case(&ability.path));
        let stage_ok = self
            .stage
            .as_deref()
            .map_or(true, |s| s.eq_ignore_ascii_case(&ability.stage));
        path_ok && stage_ok
    }

    pub fn is_unfiltered(&self) -> bool {
        self.path.is_none() && self.stage.is_none()
    }
}
