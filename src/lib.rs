//! Retirement IRR - required annual return for a savings plan
//!
//! This library provides:
//! - A Newton-Raphson solver for the rate that grows an initial sum plus
//!   level yearly contributions into a target fund
//! - Derivation of solver inputs from retirement plan rows (inflation, rule of 25)
//! - CSV plan loading, result writing and report notifications
//! - Parallel batch evaluation

pub mod error;
pub mod plan;
pub mod report;
pub mod runner;
pub mod sinks;
pub mod solver;

// Re-export commonly used types
pub use error::{FailureKind, NotFoundReason, PlanError, SolveError};
pub use plan::{DerivedInputs, RetirementPlan};
pub use runner::{PlanEvaluation, PlanRunner, RunSummary};
pub use solver::{solve, CashflowShape, IrrSolver, RateResult, Solution, SolverConfig};
