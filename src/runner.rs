//! Plan runner for single and batch evaluations
//!
//! Holds one configured solver and evaluates plans against it. Batches run in
//! parallel; every plan gets exactly one solve.

use crate::error::PlanError;
use crate::plan::{DerivedInputs, RetirementPlan};
use crate::report::{describe_outcome, render_report};
use crate::sinks::{Notifier, ResultRecord, ResultsSink};
use crate::solver::{IrrSolver, RateResult, SolverConfig};
use chrono::NaiveDate;
use rayon::prelude::*;

/// Result of evaluating one plan
#[derive(Debug)]
pub enum PlanEvaluation {
    /// Inputs derived and handed to the solver
    Solved {
        derived: DerivedInputs,
        outcome: RateResult,
    },
    /// Row could not be turned into a cash-flow shape
    Rejected(PlanError),
}

impl PlanEvaluation {
    pub fn outcome(&self) -> Option<&RateResult> {
        match self {
            PlanEvaluation::Solved { outcome, .. } => Some(outcome),
            PlanEvaluation::Rejected(_) => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.outcome(), Some(Ok(_)))
    }

    /// Build the output record for row `row`
    pub fn to_record(&self, row: usize, plan: &RetirementPlan) -> ResultRecord {
        let mut record = ResultRecord {
            row,
            email: plan.email.clone(),
            current_age: plan.current_age,
            retirement_age: plan.retirement_age,
            monthly_income_goal: plan.monthly_income_goal,
            inflation_pct: plan.inflation_pct,
            current_savings: plan.current_savings,
            monthly_contribution: plan.monthly_contribution,
            years_to_retirement: None,
            future_monthly_income: None,
            future_fund_needed: None,
            required_return: String::new(),
            required_rate: None,
            status: String::new(),
        };

        match self {
            PlanEvaluation::Solved { derived, outcome } => {
                record.years_to_retirement = Some(derived.years_to_retirement);
                record.future_monthly_income = Some(derived.future_monthly_income);
                record.future_fund_needed = Some(derived.future_fund_needed);
                record.required_return = describe_outcome(outcome);
                match outcome {
                    Ok(solution) => {
                        record.required_rate = Some(solution.rate);
                        record.status = "ok".to_string();
                    }
                    Err(err) => record.status = err.kind().as_str().to_string(),
                }
            }
            PlanEvaluation::Rejected(err) => {
                record.required_return = format!("Error: {}", err);
                record.status = "invalid_plan".to_string();
            }
        }

        record
    }
}

/// Counts from a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub solved: usize,
    pub failed: usize,
    pub notified: usize,
}

/// Evaluates retirement plans with a single solver configuration
#[derive(Debug, Clone, Default)]
pub struct PlanRunner {
    solver: IrrSolver,
}

impl PlanRunner {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            solver: IrrSolver::new(config),
        }
    }

    pub fn solver(&self) -> &IrrSolver {
        &self.solver
    }

    /// Derive inputs and solve for one plan
    pub fn evaluate(&self, plan: &RetirementPlan) -> PlanEvaluation {
        let derived = match plan.derive() {
            Ok(derived) => derived,
            Err(err) => return PlanEvaluation::Rejected(err),
        };

        let outcome = derived.shape().and_then(|shape| self.solver.solve(&shape));
        PlanEvaluation::Solved { derived, outcome }
    }

    /// Evaluate many plans in parallel, preserving input order
    pub fn evaluate_batch(&self, plans: &[RetirementPlan]) -> Vec<PlanEvaluation> {
        plans.par_iter().map(|plan| self.evaluate(plan)).collect()
    }

    /// Evaluate plans, write every result and send reports to rows with an email.
    /// Notification failures are logged and do not stop the run; sink write
    /// failures are returned.
    pub fn run(
        &self,
        plans: &[RetirementPlan],
        results: &mut dyn ResultsSink,
        notifier: &mut dyn Notifier,
        generated_on: NaiveDate,
    ) -> Result<RunSummary, PlanError> {
        let evaluations = self.evaluate_batch(plans);
        let mut summary = RunSummary {
            rows: plans.len(),
            ..Default::default()
        };

        for (row, (plan, evaluation)) in plans.iter().zip(&evaluations).enumerate() {
            let record = evaluation.to_record(row, plan);

            if evaluation.is_solved() {
                summary.solved += 1;
                log::info!("Row {}: required return {}", row, record.required_return);
            } else {
                summary.failed += 1;
                log::warn!("Row {}: {}", row, record.required_return);
            }

            results.write(&record)?;

            if let (Some(email), PlanEvaluation::Solved { derived, outcome }) = (&plan.email, evaluation) {
                let report = render_report(plan, derived, outcome, generated_on);
                match notifier.notify(email, &report) {
                    Ok(()) => summary.notified += 1,
                    Err(err) => log::warn!("Row {}: notification to {} failed: {}", row, email, err),
                }
            }
        }

        results.flush()?;
        Ok(summary)
    }
}
