//! Durable level store backed by a JSON file
//!
//! File format: `{ "version": 1, "levels": { "<ability id>": level } }`.
//! The file is rewritten on every change through a temp file and rename so a
//! crash never leaves a half-written store behind. A change only becomes
//! visible in memory once it is on disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::error::{CalcError, Result};
use crate::core::types::{AbilityId, Level};
use crate::data::model::Ability;
use crate::store::{LevelStore, MemoryLevelStore};

/// Current on-disk format version
pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    levels: BTreeMap<AbilityId, Level>,
}

#[derive(Debug)]
pub struct FileLevelStore {
    path: PathBuf,
    inner: MemoryLevelStore,
}

impl FileLevelStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. An unreadable or unrecognized file
    /// is an error; it is never replaced silently.
    pub fn open(path: impl Into<PathBuf>, step: Level) -> Result<Self> {
        let path = path.into();
        let inner = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let file: StoreFile = serde_json::from_str(&content).map_err(|e| {
                    CalcError::Store(format!("{} is not a valid level store: {}", path.display(), e))
                })?;
                if file.version != STORE_VERSION {
                    return Err(CalcError::Store(format!(
                        "{} has unsupported version {} (expected {})",
                        path.display(),
                        file.version,
                        STORE_VERSION
                    )));
                }
                tracing::debug!(path = %path.display(), entries = file.levels.len(), "Level store opened");
                MemoryLevelStore::with_levels(step, file.levels)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No level store yet, starting empty");
                MemoryLevelStore::new(step)
            }
            Err(e) => {
                return Err(CalcError::Store(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self { path, inner })
    }

}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Write `levels` to `path` through a temp file
fn persist(path: &Path, levels: &MemoryLevelStore) -> Result<()> {
    let file = StoreFile {
        version: STORE_VERSION,
        levels: levels.entries().into_iter().collect(),
    };
    let content = serde_json::to_string_pretty(&file)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, content)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(CalcError::Store(format!(
            "failed to write {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

impl LevelStore for FileLevelStore {
    fn get_level(&self, id: &AbilityId) -> Level {
        self.inner.get_level(id)
    }

    fn set_level(&mut self, ability: &Ability, raw: f64) -> Result<Level> {
        let mut next = self.inner.clone();
        let level = next.set_level(ability, raw)?;
        if let Err(e) = persist(&self.path, &next) {
            tracing::warn!(path = %self.path.display(), ability = %ability.id, error = %e, "Level not saved");
            return Err(e);
        }
        self.inner = next;
        Ok(level)
    }

    fn level_step(&self) -> Level {
        self.inner.level_step()
    }

    fn entries(&self) -> Vec<(AbilityId, Level)> {
        self.inner.entries()
    }
}
