//! Async loading of the reference tables
//!
//! Each table comes from a local file or an HTTP(S) URL. All three are
//! fetched concurrently and must succeed before anything is calculated.

use reqwest::Client;
use std::fmt;
use std::path::PathBuf;

use crate::core::config::DataConfig;
use crate::core::error::{CalcError, Result};
use crate::core::types::Level;
use crate::data::reference::ReferenceData;

/// Location of a single reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Classify a location string
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Fetch the raw document text
    pub async fn fetch(&self, client: &Client) -> Result<String> {
        match self {
            DataSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| CalcError::DataLoad {
                        resource: self.to_string(),
                        reason: e.to_string(),
                    })
            }
            DataSource::Url(url) => {
                let response = client.get(url).send().await.map_err(|e| CalcError::DataLoad {
                    resource: self.to_string(),
                    reason: e.to_string(),
                })?;

                if !response.status().is_success() {
                    return Err(CalcError::DataLoad {
                        resource: self.to_string(),
                        reason: format!("HTTP status {}", response.status()),
                    });
                }

                Ok(response.text().await?)
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// The three table locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub abilities: DataSource,
    pub stages: DataSource,
    pub breakthroughs: DataSource,
}

impl From<&DataConfig> for DataSources {
    fn from(config: &DataConfig) -> Self {
        Self {
            abilities: DataSource::parse(&config.abilities),
            stages: DataSource::parse(&config.stages),
            breakthroughs: DataSource::parse(&config.breakthroughs),
        }
    }
}

/// Fetch and validate all reference data
///
/// Fails as a whole if any table cannot be fetched or has an unusable
/// document shape. Individual bad records are skipped.
pub async fn load_reference_data(sources: &DataSources, level_step: Level) -> Result<ReferenceData> {
    let client = Client::new();

    tracing::debug!(
        abilities = %sources.abilities,
        stages = %sources.stages,
        breakthroughs = %sources.breakthroughs,
        "Fetching reference data"
    );

    let (abilities, stages, breakthroughs) = tokio::try_join!(
        sources.abilities.fetch(&client),
        sources.stages.fetch(&client),
        sources.breakthroughs.fetch(&client),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Reference data fetch failed");
        e
    })?;

    ReferenceData::from_json(&abilities, &stages, &breakthroughs, level_step)
}
