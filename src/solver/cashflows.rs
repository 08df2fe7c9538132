//! Fixed cash-flow shape of a savings plan
//!
//! Outflow `A` at t=0, outflow `M` at each of t=1..N-1, and net inflow
//! `X - M` at t=N.

use crate::error::SolveError;
use serde::{Deserialize, Serialize};

/// Cash-flow shape handed to the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowShape {
    /// Initial investment (outflow at t=0)
    pub initial: f64,
    /// Periodic contribution (outflow at t=1..N-1, netted against the target at t=N)
    pub contribution: f64,
    /// Number of periods, at least 1
    pub periods: u32,
    /// Target final amount at t=N
    pub target: f64,
}

impl CashflowShape {
    /// Build a shape, rejecting zero periods and non-finite amounts
    pub fn new(initial: f64, contribution: f64, periods: u32, target: f64) -> Result<Self, SolveError> {
        if periods == 0 {
            return Err(SolveError::invalid_input("number of periods must be at least 1"));
        }
        if periods > i32::MAX as u32 {
            return Err(SolveError::invalid_input(format!("number of periods too large: {}", periods)));
        }
        for (name, value) in [("initial", initial), ("contribution", contribution), ("target", target)] {
            if !value.is_finite() {
                return Err(SolveError::invalid_input(format!("{} amount is not finite: {}", name, value)));
            }
        }

        Ok(Self { initial, contribution, periods, target })
    }

    /// Cash flow at period `t` for t in 1..=N (zero outside that range)
    pub fn cashflow(&self, t: u32) -> f64 {
        if t == 0 || t > self.periods {
            0.0
        } else if t == self.periods {
            self.target - self.contribution
        } else {
            -self.contribution
        }
    }

    /// Full series including the t=0 outflow
    pub fn cashflows(&self) -> Vec<f64> {
        let mut flows = Vec::with_capacity(self.periods as usize + 1);
        flows.push(-self.initial);
        flows.extend((1..=self.periods).map(|t| self.cashflow(t)));
        flows
    }

    /// Net present value at a periodic rate
    pub fn npv(&self, rate: f64) -> f64 {
        let mut value = -self.initial;
        for t in 1..=self.periods {
            value += self.cashflow(t) / (1.0 + rate).powi(t as i32);
        }
        value
    }

    /// d(NPV)/d(rate), summing -t * c_t / (1 + rate)^(t+1) over every period
    pub fn npv_derivative(&self, rate: f64) -> f64 {
        let mut deriv = 0.0;
        for t in 1..=self.periods {
            deriv -= (t as f64) * self.cashflow(t) / (1.0 + rate).powi(t as i32 + 1);
        }
        deriv
    }
}
