//! Plan data structures matching the input sheet format

use crate::error::{PlanError, SolveError};
use crate::solver::CashflowShape;
use serde::{Deserialize, Serialize};

/// Months in a year, for annualizing monthly figures
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Years of annual income the fund must cover (the "rule of 25")
pub const RULE_OF_25_MULTIPLE: f64 = 25.0;

/// A single input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    /// Recipient of the report, if any
    #[serde(default)]
    pub email: Option<String>,

    pub current_age: u32,

    pub retirement_age: u32,

    /// Monthly income wanted at retirement, in today's money
    pub monthly_income_goal: f64,

    /// Annual inflation in percent (2.5 for 2.5%)
    pub inflation_pct: f64,

    pub current_savings: f64,

    pub monthly_contribution: f64,
}

/// Values computed from a plan before solving
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedInputs {
    pub years_to_retirement: u32,
    /// Monthly income goal inflated to the retirement year
    pub future_monthly_income: f64,
    /// Fund needed at retirement
    pub future_fund_needed: f64,
    /// Contribution per year
    pub annual_contribution: f64,
    pub initial_savings: f64,
}

impl RetirementPlan {
    pub fn new(
        current_age: u32,
        retirement_age: u32,
        monthly_income_goal: f64,
        inflation_pct: f64,
        current_savings: f64,
        monthly_contribution: f64,
    ) -> Self {
        Self {
            email: None,
            current_age,
            retirement_age,
            monthly_income_goal,
            inflation_pct,
            current_savings,
            monthly_contribution,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Years until retirement; zero or negative horizons are rejected
    pub fn years_to_retirement(&self) -> Result<u32, PlanError> {
        match self.retirement_age.checked_sub(self.current_age) {
            Some(years) if years >= 1 => Ok(years),
            _ => Err(PlanError::InvalidPlan {
                reason: format!(
                    "retirement age {} must exceed current age {}",
                    self.retirement_age, self.current_age
                ),
            }),
        }
    }

    /// Compute the derived inputs
    /// Future income = goal * (1 + inflation/100)^years; fund = income * 12 * 25
    pub fn derive(&self) -> Result<DerivedInputs, PlanError> {
        let years = self.years_to_retirement()?;
        let growth = (1.0 + self.inflation_pct / 100.0).powi(years as i32);
        let future_monthly_income = self.monthly_income_goal * growth;
        let future_fund_needed = future_monthly_income * MONTHS_PER_YEAR * RULE_OF_25_MULTIPLE;

        Ok(DerivedInputs {
            years_to_retirement: years,
            future_monthly_income,
            future_fund_needed,
            annual_contribution: self.monthly_contribution * MONTHS_PER_YEAR,
            initial_savings: self.current_savings,
        })
    }
}

impl DerivedInputs {
    /// Solver shape: A = savings, M = annual contribution, N = years, X = fund needed
    pub fn shape(&self) -> Result<CashflowShape, SolveError> {
        CashflowShape::new(
            self.initial_savings,
            self.annual_contribution,
            self.years_to_retirement,
            self.future_fund_needed,
        )
    }
}
