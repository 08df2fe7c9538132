//! Internal Rate of Return (IRR) calculation
//!
//! Solves NPV(rate) = 0 for a [`CashflowShape`] with Newton-Raphson. Each
//! iteration is an explicit [`SolverState`] transition so the order of the
//! exit checks is fixed: flat derivative, then domain, then convergence.

use super::cashflows::CashflowShape;
use crate::error::{NotFoundReason, SolveError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of a solve: the converged rate or a typed failure
pub type RateResult = Result<Solution, SolveError>;

/// Converged periodic rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Solution {
    /// Rate as a fraction (0.0823 for 8.23%)
    pub rate: f64,
    /// Newton steps taken
    pub iterations: u32,
}

/// Solver parameters. `Default` is the behavior-compatible baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub initial_guess: f64,
    pub max_iterations: u32,
    /// Convergence threshold on |new_rate - rate|
    pub tolerance: f64,
    /// |NPV'| below this stops the iteration
    pub derivative_floor: f64,
    /// Exclusive lower bound on candidate rates
    pub min_rate: f64,
    /// Exclusive upper bound on candidate rates
    pub max_rate: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            max_iterations: 1000,
            tolerance: 1e-7,
            derivative_floor: 1e-10,
            min_rate: -0.99,
            max_rate: 10.0,
        }
    }
}

impl SolverConfig {
    /// Load overrides from a JSON file; absent fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, crate::error::PlanError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn in_domain(&self, rate: f64) -> bool {
        rate.is_finite() && rate > self.min_rate && rate < self.max_rate
    }
}

/// Newton-Raphson iteration state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverState {
    /// `iteration` steps completed so far
    Iterating { rate: f64, iteration: u32 },
    Converged { rate: f64, iterations: u32 },
    DomainInvalid { candidate: f64, iteration: u32 },
    Flat { rate: f64, derivative: f64, iteration: u32 },
    Exhausted { rate: f64 },
}

impl SolverState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SolverState::Iterating { .. })
    }
}

/// Stateless IRR solver; every call owns its iteration state
#[derive(Debug, Clone, Default)]
pub struct IrrSolver {
    config: SolverConfig,
}

impl IrrSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Starting state for a solve
    pub fn initial_state(&self) -> SolverState {
        SolverState::Iterating {
            rate: self.config.initial_guess,
            iteration: 0,
        }
    }

    /// Advance one transition. Terminal states are returned unchanged.
    pub fn step(&self, shape: &CashflowShape, state: SolverState) -> SolverState {
        let (rate, iteration) = match state {
            SolverState::Iterating { rate, iteration } => (rate, iteration),
            terminal => return terminal,
        };

        if iteration >= self.config.max_iterations {
            return SolverState::Exhausted { rate };
        }

        let value = shape.npv(rate);
        let derivative = shape.npv_derivative(rate);

        if derivative.abs() < self.config.derivative_floor {
            return SolverState::Flat { rate, derivative, iteration };
        }

        let new_rate = rate - value / derivative;

        if !self.config.in_domain(new_rate) {
            return SolverState::DomainInvalid {
                candidate: new_rate,
                iteration: iteration + 1,
            };
        }

        if (new_rate - rate).abs() < self.config.tolerance {
            return SolverState::Converged {
                rate: new_rate,
                iterations: iteration + 1,
            };
        }

        SolverState::Iterating {
            rate: new_rate,
            iteration: iteration + 1,
        }
    }

    /// Solve NPV(rate) = 0 for the shape
    pub fn solve(&self, shape: &CashflowShape) -> RateResult {
        let mut state = self.initial_state();
        while !state.is_terminal() {
            state = self.step(shape, state);
        }

        log::debug!("IRR solve for {:?} ended in {:?}", shape, state);

        match state {
            SolverState::Converged { rate, iterations } => Ok(Solution { rate, iterations }),
            SolverState::DomainInvalid { candidate, iteration } => {
                Err(SolveError::RateOverflowOrInvalid { candidate, iteration })
            }
            SolverState::Flat { iteration, .. } => Err(SolveError::NotFound {
                reason: NotFoundReason::FlatDerivative,
                iterations: iteration,
            }),
            SolverState::Exhausted { .. } | SolverState::Iterating { .. } => Err(SolveError::NotFound {
                reason: NotFoundReason::IterationsExhausted,
                iterations: self.config.max_iterations,
            }),
        }
    }

    /// Validate raw inputs and solve
    pub fn solve_inputs(&self, initial: f64, contribution: f64, periods: u32, target: f64) -> RateResult {
        let shape = CashflowShape::new(initial, contribution, periods, target)?;
        self.solve(&shape)
    }
}

/// Solve with the default configuration
///
/// # Arguments
/// * `initial` - Initial investment `A` (outflow at t=0)
/// * `contribution` - Periodic contribution `M`
/// * `periods` - Number of periods `N` (>= 1)
/// * `target` - Target final amount `X`
pub fn solve(initial: f64, contribution: f64, periods: u32, target: f64) -> RateResult {
    IrrSolver::default().solve_inputs(initial, contribution, periods, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Target that makes NPV(r0) exactly zero for the given A, M, N
    fn target_for_rate(initial: f64, contribution: f64, periods: u32, r0: f64) -> f64 {
        let v = 1.0 / (1.0 + r0);
        let contributions: f64 = (1..periods).map(|t| v.powi(t as i32)).sum();
        (initial + contribution * contributions) / v.powi(periods as i32) + contribution
    }

    #[test]
    fn test_default_config_baseline() {
        let config = SolverConfig::default();
        assert_eq!(config.initial_guess, 0.10);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tolerance, 1e-7);
        assert_eq!(config.derivative_floor, 1e-10);
        assert_eq!(config.min_rate, -0.99);
        assert_eq!(config.max_rate, 10.0);
    }

    #[test]
    fn test_partial_json_config_keeps_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"max_iterations": 50}"#).unwrap();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.initial_guess, 0.10);
        assert_eq!(config.tolerance, 1e-7);
    }

    #[test]
    fn test_zero_growth() {
        // Contributions alone reach the target
        let result = solve(0.0, 1000.0, 10, 10_000.0).unwrap();
        assert_abs_diff_eq!(result.rate, 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_known_rate_round_trip() {
        for &(r0, a, m, n) in &[
            (0.07, 25_000.0, 6_000.0, 30),
            (0.035, 5_000.0, 1_200.0, 10),
            (-0.02, 50_000.0, 1_000.0, 15),
        ] {
            let x = target_for_rate(a, m, n, r0);
            let result = solve(a, m, n, x).unwrap();
            assert_abs_diff_eq!(result.rate, r0, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_larger_target_needs_higher_rate() {
        let rates: Vec<f64> = [300_000.0, 500_000.0, 800_000.0, 1_191_000.0, 2_000_000.0]
            .iter()
            .map(|&x| solve(10_000.0, 2_400.0, 20, x).unwrap().rate)
            .collect();

        for pair in rates.windows(2) {
            assert!(pair[1] >= pair[0], "rates not monotone: {:?}", rates);
        }
    }

    #[test]
    fn test_flat_derivative_all_zero_flows() {
        let err = solve(0.0, 0.0, 20, 0.0).unwrap_err();
        assert_eq!(
            err,
            SolveError::NotFound {
                reason: NotFoundReason::FlatDerivative,
                iterations: 0,
            }
        );
    }

    #[test]
    fn test_flat_derivative_single_period_netted_to_zero() {
        // X - M = 0 at t=1 leaves nothing to discount
        let err = solve(0.0, 500.0, 1, 500.0).unwrap_err();
        assert!(matches!(
            err,
            SolveError::NotFound { reason: NotFoundReason::FlatDerivative, .. }
        ));
    }

    #[test]
    fn test_domain_violation_returns_immediately() {
        // Large outflow, tiny payoff, one period: first step lands far below -0.99
        let err = solve(1_000.0, 0.0, 1, 1.0).unwrap_err();
        match err {
            SolveError::RateOverflowOrInvalid { candidate, iteration } => {
                assert_eq!(iteration, 1);
                assert!(candidate < -0.99);
            }
            other => panic!("expected RateOverflowOrInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_overshoot_above_window_is_invalid() {
        // Newton overshoots past the 10.0 bound from the 10% start
        let err = solve(0.0, 5_000.0, 20, 100_000.0).unwrap_err();
        match err {
            SolveError::RateOverflowOrInvalid { candidate, iteration } => {
                assert!(candidate >= 10.0);
                assert!(iteration < 10);
            }
            other => panic!("expected RateOverflowOrInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_retirement_scenario_baseline() {
        let result = solve(10_000.0, 2_400.0, 20, 1_191_000.0).unwrap();
        assert_abs_diff_eq!(result.rate, 0.225_293_185_109_604_8, epsilon = 1e-9);
        assert!(result.iterations < 20);
    }

    #[test]
    fn test_iteration_cap_exhausted() {
        let solver = IrrSolver::new(SolverConfig {
            max_iterations: 2,
            ..SolverConfig::default()
        });
        let shape = CashflowShape::new(10_000.0, 2_400.0, 20, 1_191_000.0).unwrap();
        assert_eq!(
            solver.solve(&shape),
            Err(SolveError::NotFound {
                reason: NotFoundReason::IterationsExhausted,
                iterations: 2,
            })
        );
    }

    #[test]
    fn test_idempotent() {
        let solver = IrrSolver::default();
        let shape = CashflowShape::new(10_000.0, 2_400.0, 20, 1_191_000.0).unwrap();
        assert_eq!(solver.solve(&shape), solver.solve(&shape));
        assert_eq!(solve(1_000.0, 0.0, 1, 1.0), solve(1_000.0, 0.0, 1, 1.0));
    }

    #[test]
    fn test_invalid_periods_rejected() {
        let err = solve(1_000.0, 100.0, 0, 5_000.0).unwrap_err();
        assert!(matches!(err, SolveError::InvalidInput { .. }));
    }

    #[test]
    fn test_flat_checked_before_domain() {
        // Floor large enough to trip at the first evaluation of a valid shape
        let solver = IrrSolver::new(SolverConfig {
            derivative_floor: 1e12,
            ..SolverConfig::default()
        });
        let shape = CashflowShape::new(1_000.0, 0.0, 1, 1.0).unwrap();
        let state = solver.step(&shape, solver.initial_state());
        assert!(matches!(state, SolverState::Flat { iteration: 0, .. }));
    }

    #[test]
    fn test_terminal_state_is_fixed_point() {
        let solver = IrrSolver::default();
        let shape = CashflowShape::new(1_000.0, 0.0, 1, 1.0).unwrap();
        let terminal = solver.step(&shape, solver.initial_state());
        assert!(terminal.is_terminal());
        assert_eq!(solver.step(&shape, terminal), terminal);
    }
}
