//! Month-to-date cost from AWS Cost Explorer.

use crate::command_runner::{args, CommandRunner};
use crate::error::ReportError;
use chrono::{Datelike, Days, NaiveDate};
use serde::Deserialize;
use std::io::{self, Write};
use tracing::{debug, warn};

pub const UNAVAILABLE_MESSAGE: &str =
    "(Billing info unavailable: check permissions or Cost Explorer access)";
pub const PARSE_FAILURE_MESSAGE: &str = "(Could not parse billing info)";

/// Unblended cost for the current month so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingReport {
    pub amount: String,
    pub currency: String,
}

/// Query range `[start, end)` for Cost Explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    /// First day of `today`'s month through tomorrow, so today's costs are included.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today.checked_add_days(Days::new(1)).unwrap_or(today),
        }
    }

    /// Formats the `--time-period` value, e.g. `Start=2026-10-01,End=2026-10-20`.
    pub fn to_arg(&self) -> String {
        format!(
            "Start={},End={}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct CostAndUsageResponse {
    #[serde(rename = "ResultsByTime", default)]
    results_by_time: Vec<ResultByTime>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultByTime {
    #[serde(rename = "Total", default)]
    total: CostTotals,
}

#[derive(Debug, Default, Deserialize)]
struct CostTotals {
    #[serde(rename = "UnblendedCost", default)]
    unblended_cost: MetricValue,
}

#[derive(Debug, Default, Deserialize)]
struct MetricValue {
    #[serde(rename = "Amount", default)]
    amount: String,
    #[serde(rename = "Unit", default)]
    unit: String,
}

/// Parses `aws ce get-cost-and-usage --output json` output.
///
/// Only the first time period is used. Amount and unit must both be present.
pub fn parse_billing_response(json: &str) -> Result<BillingReport, ReportError> {
    let response: CostAndUsageResponse = serde_json::from_str(json).map_err(|e| {
        debug!("billing response is not valid JSON: {}", e);
        ReportError::Unparseable
    })?;

    let first = response
        .results_by_time
        .into_iter()
        .next()
        .ok_or(ReportError::Unparseable)?;
    let cost = first.total.unblended_cost;
    if cost.amount.is_empty() || cost.unit.is_empty() {
        return Err(ReportError::Unparseable);
    }

    Ok(BillingReport {
        amount: cost.amount,
        currency: cost.unit,
    })
}

/// Queries Cost Explorer for the unblended cost within `period`.
pub fn fetch_billing(
    runner: &dyn CommandRunner,
    aws_command: &str,
    region: &str,
    period: BillingPeriod,
) -> Result<BillingReport, ReportError> {
    if !runner.is_available(aws_command) {
        warn!(aws_command, "AWS CLI not found on PATH");
        return Err(ReportError::Unavailable);
    }

    let output = runner
        .run(
            aws_command,
            &args([
                "ce".to_string(),
                "get-cost-and-usage".to_string(),
                "--time-period".to_string(),
                period.to_arg(),
                "--granularity".to_string(),
                "MONTHLY".to_string(),
                "--metrics".to_string(),
                "UnblendedCost".to_string(),
                "--region".to_string(),
                region.to_string(),
                "--output".to_string(),
                "json".to_string(),
            ]),
        )
        .map_err(|e| {
            warn!("billing query could not start: {:#}", e);
            ReportError::Unavailable
        })?;

    if !output.success {
        warn!(reason = %output.failure_reason(), "billing query failed");
        return Err(ReportError::Unavailable);
    }
    if output.combined.is_empty() {
        warn!("billing query returned no output");
        return Err(ReportError::Unavailable);
    }

    parse_billing_response(&output.combined)
}

/// Prints the month-to-date cost, or a hint when it cannot be determined.
pub fn report_billing(
    runner: &dyn CommandRunner,
    aws_command: &str,
    region: &str,
    today: NaiveDate,
    out: &mut dyn Write,
) -> io::Result<()> {
    match fetch_billing(runner, aws_command, region, BillingPeriod::for_date(today)) {
        Ok(report) => writeln!(
            out,
            "Current month AWS cost: {} {}",
            report.amount, report.currency
        ),
        Err(ReportError::Unparseable) => writeln!(out, "{}", PARSE_FAILURE_MESSAGE),
        Err(_) => writeln!(out, "{}", UNAVAILABLE_MESSAGE),
    }
}

#[cfg(test)]
#[path = "tests/billing_tests.rs"]
mod tests;
