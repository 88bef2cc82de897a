//! Bundled default data set
//!
//! Stage costs and the breakthrough table shipped with the calculator. Every
//! stage shares the same breakthrough table. The ability list is left for the
//! user to fill in.

use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::data::schema::{
    AbilityRecord, BreakthroughRecord, Document, RuleRecord, StageRecord,
};

/// (level, books required) for each breakthrough tier
pub const DEFAULT_BREAKTHROUGHS: &[(u32, u32)] = &[
    (0, 0),
    (20, 4),
    (30, 10),
    (40, 18),
    (50, 32),
    (60, 52),
    (70, 78),
    (80, 113),
    (90, 153),
    (100, 198),
];

/// (stage, citrine per book)
pub const DEFAULT_STAGES: &[(&str, f64)] = &[
    ("Connection", 100.0),
    ("Foundation", 150.0),
    ("Virtuoso", 240.0),
    ("Nascent", 280.0),
    ("Incarnation", 400.0),
    ("Incarnation extra", 450.0),
    ("Immortal's Will", 200.0),
    ("Voidbreak 1", 150.0),
    ("Voidbreak 1 - element", 200.0),
    ("Voidbreak 2", 200.0),
    ("Voidbreak 2 - element", 280.0),
    ("Wholeness 1", 280.0),
    ("Wholeness 1 - element", 400.0),
    ("Wholeness 2", 400.0),
    ("Wholeness 2 - element", 450.0),
    ("Perfection", 500.0),
    ("Perfection - element", 500.0),
    ("Nirvana", 500.0),
    ("Nirvana - element", 500.0),
];

pub fn default_stages() -> Vec<StageRecord> {
    DEFAULT_STAGES
        .iter()
        .map(|&(name, cost)| StageRecord {
            name: name.to_string(),
            citrine_per_book: Some(cost),
        })
        .collect()
}

pub fn default_breakthroughs() -> Vec<BreakthroughRecord> {
    let table: Vec<RuleRecord> = DEFAULT_BREAKTHROUGHS
        .iter()
        .map(|&(level, books_required)| RuleRecord { level, books_required })
        .collect();

    DEFAULT_STAGES
        .iter()
        .map(|&(stage, _)| BreakthroughRecord {
            cultivation_stage: stage.to_string(),
            breakthroughs: table.clone(),
        })
        .collect()
}

/// Files written by [`write_default_data`]
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write the bundled tables into `dir`
///
/// Existing files are left untouched unless `overwrite` is set.
pub fn write_default_data(dir: &Path, overwrite: bool) -> Result<WrittenFiles> {
    std::fs::create_dir_all(dir)?;

    let files = [
        (
            "abilities.json",
            serde_json::to_string_pretty(&Document::<AbilityRecord>::new(Vec::new()))?,
        ),
        (
            "stages.json",
            serde_json::to_string_pretty(&Document::new(default_stages()))?,
        ),
        (
            "breakthroughs.json",
            serde_json::to_string_pretty(&Document::new(default_breakthroughs()))?,
        ),
    ];

    let mut result = WrittenFiles::default();
    for (name, content) in files {
        let path = dir.join(name);
        if path.exists() && !overwrite {
            tracing::info!(path = %path.display(), "Keeping existing file");
            result.skipped.push(path);
            continue;
        }
        std::fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "Wrote default data");
        result.written.push(path);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference::ReferenceData;

    #[test]
    fn test_every_stage_has_a_table() {
        let stages = default_stages();
        let tables = default_breakthroughs();
        assert_eq!(stages.len(), tables.len());
        assert!(tables.iter().all(|t| t.breakthroughs.len() == DEFAULT_BREAKTHROUGHS.len()));
    }

    #[test]
    fn test_written_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_default_data(dir.path(), false).unwrap();
        assert_eq!(written.written.len(), 3);

        let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
        let data = ReferenceData::from_json(
            &read("abilities.json"),
            &read("stages.json"),
            &read("breakthroughs.json"),
            10,
        )
        .unwrap();

        assert!(data.abilities().is_empty());
        assert_eq!(data.stages().len(), DEFAULT_STAGES.len());
        assert_eq!(data.stage("Nascent").unwrap().citrine_per_book, Some(280.0));
        assert_eq!(data.rules().for_stage("Nirvana").unwrap().books_through(100), 658);
    }

    #[test]
    fn test_existing_files_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("abilities.json"), "[]").unwrap();

        let written = write_default_data(dir.path(), false).unwrap();
        assert_eq!(written.skipped.len(), 1);
        assert_eq!(std::fs::read_to_string(dir.path().join("abilities.json")).unwrap(), "[]");

        let again = write_default_data(dir.path(), true).unwrap();
        assert_eq!(again.written.len(), 3);
    }
}
