//! Required-return solver over a fixed savings cash-flow shape

mod cashflows;
mod irr;

pub use cashflows::CashflowShape;
pub use irr::{solve, IrrSolver, RateResult, Solution, SolverConfig, SolverState};
