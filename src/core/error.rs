use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Failed to load {resource}: {reason}")]
    DataLoad { resource: String, reason: String },

    #[error("Schema error in {resource}: {reason}")]
    Schema { resource: String, reason: String },

    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Ambiguous ability '{query}', candidates: {}", candidates.join(", "))]
    AmbiguousAbility { query: String, candidates: Vec<String> },

    #[error("Level store error: {0}")]
    Store(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CalcError>;
