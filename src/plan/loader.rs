//! Load retirement plans from a CSV input sheet

use super::RetirementPlan;
use crate::error::PlanError;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Raw CSV row matching the input sheet columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Email", default)]
    email: Option<String>,
    #[serde(rename = "CurrentAge")]
    current_age: u32,
    #[serde(rename = "RetirementAge")]
    retirement_age: u32,
    #[serde(rename = "MonthlyIncomeGoal")]
    monthly_income_goal: f64,
    #[serde(rename = "InflationPct")]
    inflation_pct: f64,
    #[serde(rename = "CurrentSavings")]
    current_savings: f64,
    #[serde(rename = "MonthlyContribution")]
    monthly_contribution: f64,
}

impl CsvRow {
    fn into_plan(self) -> RetirementPlan {
        RetirementPlan {
            email: self.email.filter(|e| !e.is_empty()),
            current_age: self.current_age,
            retirement_age: self.retirement_age,
            monthly_income_goal: self.monthly_income_goal,
            inflation_pct: self.inflation_pct,
            current_savings: self.current_savings,
            monthly_contribution: self.monthly_contribution,
        }
    }
}

/// Load all plans from a CSV file
pub fn load_plans<P: AsRef<Path>>(path: P) -> Result<Vec<RetirementPlan>, PlanError> {
    let file = std::fs::File::open(path)?;
    load_plans_from_reader(file)
}

/// Load plans from any reader (e.g., string buffer, network stream)
pub fn load_plans_from_reader<R: Read>(reader: R) -> Result<Vec<RetirementPlan>, PlanError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut plans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        plans.push(row.into_plan());
    }

    log::debug!("Loaded {} plans", plans.len());
    Ok(plans)
}
