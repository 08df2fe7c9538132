//! Presentation of solver outcomes and plain-text plan reports

use crate::error::{NotFoundReason, SolveError};
use crate::plan::{DerivedInputs, RetirementPlan};
use crate::solver::RateResult;
use chrono::NaiveDate;
use std::fmt::Write;

/// Subject line used for notifications
pub const REPORT_SUBJECT: &str = "Your retirement savings report";

/// Rate as a percentage with 4 decimals, e.g. 0.0823 -> "8.2300%"
pub fn format_rate(rate: f64) -> String {
    format!("{:.4}%", rate * 100.0)
}

/// Diagnostic text for a failed solve, distinct from any percentage
pub fn describe_failure(err: &SolveError) -> String {
    match err {
        SolveError::RateOverflowOrInvalid { .. } => {
            "Error: rate overflow or invalid (no viable rate in range)".to_string()
        }
        SolveError::NotFound { reason: NotFoundReason::FlatDerivative, .. } => {
            "Error: IRR not found (derivative vanished)".to_string()
        }
        SolveError::NotFound { reason: NotFoundReason::IterationsExhausted, .. } => {
            "Error: IRR not found (iteration limit reached)".to_string()
        }
        SolveError::InvalidInput { reason } => format!("Error: invalid input ({})", reason),
    }
}

/// Text shown for the required return column
pub fn describe_outcome(outcome: &RateResult) -> String {
    match outcome {
        Ok(solution) => format_rate(solution.rate),
        Err(err) => describe_failure(err),
    }
}

/// Plain-text report sent to the plan owner
pub fn render_report(
    plan: &RetirementPlan,
    derived: &DerivedInputs,
    outcome: &RateResult,
    generated_on: NaiveDate,
) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Retirement Savings Report ({})", generated_on.format("%Y-%m-%d"));
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Current age:            {}", plan.current_age);
    let _ = writeln!(out, "Retirement age:         {}", plan.retirement_age);
    let _ = writeln!(out, "Years to retirement:    {}", derived.years_to_retirement);
    let _ = writeln!(out, "Monthly income goal:    ${:.2}", plan.monthly_income_goal);
    let _ = writeln!(out, "Inflation:              {:.2}%", plan.inflation_pct);
    let _ = writeln!(out, "Future monthly income:  ${:.2}", derived.future_monthly_income);
    let _ = writeln!(out, "Fund needed:            ${:.2}", derived.future_fund_needed);
    let _ = writeln!(out, "Current savings:        ${:.2}", plan.current_savings);
    let _ = writeln!(out, "Monthly contribution:   ${:.2}", plan.monthly_contribution);
    let _ = writeln!(out);

    match outcome {
        Ok(solution) => {
            let _ = writeln!(out, "Required annual return: {}", format_rate(solution.rate));
        }
        Err(err) => {
            let _ = writeln!(out, "Required annual return: {}", describe_failure(err));
            let _ = writeln!(out, "No annual return in the supported range reaches this goal.");
        }
    }

    out
}
