//! Reference data: abilities, cultivation stages and breakthrough tables

pub mod defaults;
pub mod model;
pub mod reference;
pub mod schema;
pub mod source;

pub use model::{Ability, CultivationStage, ViewFilter};
pub use reference::ReferenceData;
pub use schema::SCHEMA_VERSION;
pub use source::{load_reference_data, DataSource, DataSources};
