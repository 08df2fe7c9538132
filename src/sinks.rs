//! Output collaborators: report notifications and result records

use crate::error::PlanError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// One output row: the original inputs, derived values and the solver result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub row: usize,
    pub email: Option<String>,
    pub current_age: u32,
    pub retirement_age: u32,
    pub monthly_income_goal: f64,
    pub inflation_pct: f64,
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub years_to_retirement: Option<u32>,
    pub future_monthly_income: Option<f64>,
    pub future_fund_needed: Option<f64>,
    /// Formatted percentage or diagnostic text
    pub required_return: String,
    /// Converged rate as a fraction, empty on failure
    pub required_rate: Option<f64>,
    /// `ok`, `rate_overflow_or_invalid`, `not_found`, `invalid_input` or `invalid_plan`
    pub status: String,
}

/// Receives a plain-text report addressed to a recipient
pub trait Notifier {
    fn notify(&mut self, recipient: &str, report: &str) -> Result<(), PlanError>;

    fn flush(&mut self) -> Result<(), PlanError> {
        Ok(())
    }
}

/// Persists result records
pub trait ResultsSink {
    fn write(&mut self, record: &ResultRecord) -> Result<(), PlanError>;

    fn flush(&mut self) -> Result<(), PlanError> {
        Ok(())
    }
}

/// Notifier that only logs the report
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, recipient: &str, report: &str) -> Result<(), PlanError> {
        log::info!("Report for {}:\n{}", recipient, report);
        Ok(())
    }
}

#[derive(Serialize)]
struct OutboxMessage<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Notifier that queues messages as JSON lines for a separate mailer
pub struct OutboxNotifier<W: Write> {
    out: W,
    sent: usize,
}

impl<W: Write> OutboxNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out, sent: 0 }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for OutboxNotifier<W> {
    fn notify(&mut self, recipient: &str, report: &str) -> Result<(), PlanError> {
        let message = OutboxMessage {
            to: recipient,
            subject: crate::report::REPORT_SUBJECT,
            body: report,
        };
        serde_json::to_writer(&mut self.out, &message)?;
        self.out.write_all(b"\n")?;
        self.sent += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PlanError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Writes records as CSV rows, header first
pub struct CsvResultsWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvResultsWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
        }
    }

    pub fn into_inner(self) -> Result<W, PlanError> {
        self.writer.into_inner().map_err(|e| PlanError::Io(e.into_error()))
    }
}

impl<W: Write> ResultsSink for CsvResultsWriter<W> {
    fn write(&mut self, record: &ResultRecord) -> Result<(), PlanError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PlanError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory store keyed by row; a later write replaces the earlier one
#[derive(Debug, Default)]
pub struct KeyedResults {
    records: BTreeMap<usize, ResultRecord>,
}

impl KeyedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: usize) -> Option<&ResultRecord> {
        self.records.get(&row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.values()
    }
}

impl ResultsSink for KeyedResults {
    fn write(&mut self, record: &ResultRecord) -> Result<(), PlanError> {
        self.records.insert(record.row, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, status: &str) -> ResultRecord {
        ResultRecord {
            row,
            email: Some("ana@example.com".to_string()),
            current_age: 35,
            retirement_age: 65,
            monthly_income_goal: 4000.0,
            inflation_pct: 2.5,
            current_savings: 50000.0,
            monthly_contribution: 500.0,
            years_to_retirement: Some(30),
            future_monthly_income: Some(8390.0),
            future_fund_needed: Some(2_517_000.0),
            required_return: "11.3190%".to_string(),
            required_rate: Some(0.11319),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_keyed_results_last_write_wins() {
        let mut sink = KeyedResults::new();
        sink.write(&record(0, "not_found")).unwrap();
        sink.write(&record(0, "ok")).unwrap();
        sink.write(&record(1, "ok")).unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get(0).unwrap().status, "ok");
    }

    #[test]
    fn test_csv_writer_header_and_empty_options() {
        let mut sink = CsvResultsWriter::new(Vec::new());
        sink.write(&record(0, "ok")).unwrap();

        let mut failed = record(1, "not_found");
        failed.required_rate = None;
        failed.required_return = "Error: IRR not found (derivative vanished)".to_string();
        sink.write(&failed).unwrap();

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("row,email,current_age"));
        assert!(lines[0].ends_with("required_return,required_rate,status"));
        assert!(lines[2].ends_with("Error: IRR not found (derivative vanished),,not_found"));
    }

    #[test]
    fn test_outbox_writes_json_lines() {
        let mut outbox = OutboxNotifier::new(Vec::new());
        outbox.notify("ana@example.com", "line one\nline two").unwrap();
        outbox.notify("bo@example.com", "hello").unwrap();
        assert_eq!(outbox.sent(), 2);

        let text = String::from_utf8(outbox.into_inner()).unwrap();
        let messages: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["to"], "ana@example.com");
        assert_eq!(messages[0]["body"], "line one\nline two");
        assert_eq!(messages[1]["subject"], crate::report::REPORT_SUBJECT);
    }
}
