//! Retirement plan rows and the solver inputs derived from them

mod data;
pub mod loader;

pub use data::{DerivedInputs, RetirementPlan, MONTHS_PER_YEAR, RULE_OF_25_MULTIPLE};
pub use loader::{load_plans, load_plans_from_reader};
