//! Versioned JSON schema for the reference tables
//!
//! A table file is either a bare array of records (read as version 1) or an
//! envelope `{ "version": 1, "records": [...] }`.
//! Records are validated one at a time: a malformed record is skipped with a
//! warning instead of failing the whole table.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{CalcError, Result};
use crate::core::types::{AbilityId, Level, ID_SEPARATOR};
use crate::data::model::{Ability, CultivationStage};

/// Current schema version for reference tables
pub const SCHEMA_VERSION: u32 = 1;

/// Envelope written by this crate
#[derive(Debug, Serialize, Deserialize)]
pub struct Document<T> {
    pub version: u32,
    pub records: Vec<T>,
}

impl<T> Document<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            records,
        }
    }
}

/// Ability as it appears in `abilities.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityRecord {
    #[serde(alias = "name")]
    pub ability_name: String,
    #[serde(alias = "stage")]
    pub cultivation_stage: String,
    #[serde(alias = "path")]
    pub ability_type: String,
    pub max_level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citrine_per_book: Option<f64>,
}

/// Cultivation stage as it appears in `stages.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    #[serde(alias = "cultivationStage")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citrine_per_book: Option<f64>,
}

/// One stage's breakthrough table as it appears in `breakthroughs.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakthroughRecord {
    #[serde(alias = "stage")]
    pub cultivation_stage: String,
    pub breakthroughs: Vec<RuleRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    pub level: Level,
    #[serde(alias = "books")]
    pub books_required: u32,
}

/// Parse a table file into its valid records
///
/// `resource` names the table in errors and log lines. Fails only when the
/// document itself is unreadable or carries an unsupported version.
pub fn parse_records<T: DeserializeOwned>(resource: &str, text: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(text).map_err(|e| CalcError::DataLoad {
        resource: resource.to_string(),
        reason: format!("invalid JSON: {}", e),
    })?;

    let raw_records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| schema_error(resource, "envelope is missing a numeric 'version'"))?;
            if version != SCHEMA_VERSION as u64 {
                return Err(schema_error(
                    resource,
                    &format!("unsupported version {} (expected {})", version, SCHEMA_VERSION),
                ));
            }
            match map.remove("records") {
                Some(Value::Array(items)) => items,
                _ => return Err(schema_error(resource, "envelope 'records' must be an array")),
            }
        }
        _ => {
            return Err(schema_error(
                resource,
                "expected an array of records or a versioned envelope",
            ))
        }
    };

    let total = raw_records.len();
    let records: Vec<T> = raw_records
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(resource, index, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::warn!(
            resource,
            kept = records.len(),
            skipped = total - records.len(),
            "Some records were rejected"
        );
    }

    Ok(records)
}

fn schema_error(resource: &str, reason: &str) -> CalcError {
    CalcError::Schema {
        resource: resource.to_string(),
        reason: reason.to_string(),
    }
}

/// Drop negative and non-finite per-book costs
fn sanitize_per_book(value: Option<f64>, owner: &str) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Some(v),
        Some(v) => {
            tracing::warn!(owner, value = v, "Ignoring invalid citrinePerBook");
            None
        }
        None => None,
    }
}

impl AbilityRecord {
    /// Validate into a domain ability, or `None` if the record is unusable
    pub fn into_ability(self, level_step: Level) -> Option<Ability> {
        let name = self.ability_name.trim();
        let stage = self.cultivation_stage.trim();
        let path = self.ability_type.trim();
        if name.is_empty() || stage.is_empty() {
            tracing::warn!(
                name = %self.ability_name,
                stage = %self.cultivation_stage,
                "Skipping ability with empty name or stage"
            );
            return None;
        }
        if [name, stage, path].iter().any(|part| part.contains(ID_SEPARATOR)) {
            tracing::warn!(
                ability = name,
                stage,
                path,
                "Skipping ability with '/' in its name, stage or path"
            );
            return None;
        }

        let step = level_step.max(1);
        let max_level = self.max_level - self.max_level % step;
        if max_level != self.max_level {
            tracing::warn!(
                ability = name,
                max_level = self.max_level,
                rounded = max_level,
                "maxLevel is not a multiple of the level step, rounding down"
            );
        }

        Some(Ability {
            id: AbilityId::new(path, stage, name),
            name: name.to_string(),
            stage: stage.to_string(),
            path: path.to_string(),
            max_level,
            citrine_per_book: sanitize_per_book(self.citrine_per_book, name),
        })
    }
}

impl StageRecord {
    pub fn into_stage(self) -> Option<CultivationStage> {
        let name = self.name.trim();
        if name.is_empty() {
            tracing::warn!("Skipping cultivation stage with empty name");
            return None;
        }
        Some(CultivationStage {
            name: name.to_string(),
            citrine_per_book: sanitize_per_book(self.citrine_per_book, name),
        })
    }
}
