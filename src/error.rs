//! Error types for solving and for plan processing

use thiserror::Error;

/// Why the solver gave up without converging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// NPV curve went flat before the iterates settled
    FlatDerivative,
    /// Iteration cap reached
    IterationsExhausted,
}

/// Coarse failure tag, used for status columns and report text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateOverflowOrInvalid,
    NotFound,
    InvalidInput,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::RateOverflowOrInvalid => "rate_overflow_or_invalid",
            FailureKind::NotFound => "not_found",
            FailureKind::InvalidInput => "invalid_input",
        }
    }
}

/// Failure outcomes of a single solve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Newton step left the admissible window or stopped being finite
    #[error("Rate overflow or invalid: candidate {candidate} at iteration {iteration}")]
    RateOverflowOrInvalid {
        /// The rejected candidate rate
        candidate: f64,
        /// 1-based iteration that produced it
        iteration: u32,
    },

    /// No converged rate
    #[error("IRR not found ({reason:?}) after {iterations} iterations")]
    NotFound {
        reason: NotFoundReason,
        iterations: u32,
    },

    /// Inputs rejected before iterating
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl SolveError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SolveError::RateOverflowOrInvalid { .. } => FailureKind::RateOverflowOrInvalid,
            SolveError::NotFound { .. } => FailureKind::NotFound,
            SolveError::InvalidInput { .. } => FailureKind::InvalidInput,
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        SolveError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading plans or writing results
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Row values that cannot form a cash-flow shape
    #[error("Invalid plan: {reason}")]
    InvalidPlan { reason: String },
}
