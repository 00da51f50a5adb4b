//! Monthly late summary

use crate::error::EngineResult;
use chrono::{Datelike, NaiveDate};
use lf_core::{
    AttendanceRecord, CoreError, CountScope, CountingMode, EmployeeId, PolicyConfig, StrikeTally,
};
use lf_db::{AttendanceStore, HistoryRange};
use serde::Serialize;

/// Late arrivals of one employee within a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeLateSummary {
    pub employee_id: EmployeeId,
    pub late_dates: Vec<NaiveDate>,
    pub late_count: u32,

    /// Stored records in the month that carry a penalty remark
    pub penalties_recorded: u32,

    /// Whether the month's records alone reach the threshold: the late count
    /// when cumulative, the longest late run when strictly consecutive
    pub threshold_reached: bool,
}

/// Per-employee late summary for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub policy_enabled: bool,
    pub threshold: u32,
    pub counting_mode: CountingMode,

    /// Employees with at least one late arrival in the month, by id
    pub employees: Vec<EmployeeLateSummary>,
}

impl MonthlySummary {
    pub fn total_late(&self) -> u32 {
        self.employees.iter().map(|e| e.late_count).sum()
    }

    /// Employees whose late count reached the threshold
    pub fn over_threshold(&self) -> impl Iterator<Item = &EmployeeLateSummary> {
        self.employees.iter().filter(|e| e.threshold_reached)
    }
}

/// First and last day of `year`-`month`
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let invalid = || CoreError::InvalidInput {
        message: format!("invalid month {:04}-{:02}", year, month),
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
    Ok((first, last))
}

/// Summarise late arrivals in `year`-`month` for every employee.
///
/// Late days before the policy's effective date are left out. The
/// `threshold_reached` flag is false whenever the policy is disabled. Runs
/// are counted from the first record of the month.
pub async fn monthly_summary(
    store: &dyn AttendanceStore,
    policy: &PolicyConfig,
    year: i32,
    month: u32,
) -> EngineResult<MonthlySummary> {
    let (first, last) = month_bounds(year, month)?;
    let range = HistoryRange::between(first, last);

    let mut employees = Vec::new();
    for employee_id in store.list_employees().await? {
        let history = store.load_history(&employee_id, range).await?;
        let late_dates: Vec<NaiveDate> = history
            .iter()
            .filter(|r| r.is_late && policy.applies_to(r.date))
            .map(|r| r.date)
            .collect();
        if late_dates.is_empty() {
            continue;
        }
        let late_count = late_dates.len() as u32;
        let penalties_recorded = history
            .iter()
            .filter(|r| r.derived.penalty_remark.is_some())
            .count() as u32;
        let threshold_reached =
            policy.enabled() && peak_strikes(&history, policy) >= policy.threshold();
        employees.push(EmployeeLateSummary {
            employee_id,
            late_dates,
            late_count,
            penalties_recorded,
            threshold_reached,
        });
    }
    log::debug!(
        "Monthly summary {:04}-{:02}: {} employee(s) late",
        first.year(),
        first.month(),
        employees.len()
    );

    Ok(MonthlySummary {
        year,
        month,
        policy_enabled: policy.enabled(),
        threshold: policy.threshold(),
        counting_mode: policy.counting_mode(),
        employees,
    })
}

/// Highest count the policy's counting mode reaches over `history`
fn peak_strikes(history: &[AttendanceRecord], policy: &PolicyConfig) -> u32 {
    let mut tally = StrikeTally::new(CountScope::from(policy));
    history
        .iter()
        .map(|record| tally.observe(record))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
