pub mod config;
pub mod error;
pub mod types;

pub use config::{CalculatorConfig, CitrineSource, DataConfig};
pub use error::{CalcError, Result};
pub use types::{normalize_level, AbilityId, Level, DEFAULT_LEVEL_STEP};
