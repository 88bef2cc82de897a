//! Citrine Calc - ability breakthrough cost calculator

pub mod calc;
pub mod core;
pub mod data;
pub mod rules;
pub mod session;
pub mod store;

pub use crate::core::{CalcError, CalculatorConfig, CitrineSource, Result};
pub use crate::session::{AbilityRow, EditOutcome, Session};
