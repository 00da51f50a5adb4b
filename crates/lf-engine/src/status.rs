//! Read-only late status queries.

use crate::error::EngineResult;
use chrono::NaiveDate;
use lf_core::{
    count_strikes, predict_next_trigger, tally_history, CountScope, CountingMode, EmployeeId,
    PolicyConfig, RecordId,
};
use lf_db::{AttendanceStore, HistoryRange};
use serde::Serialize;

/// Strike status of one employee as of a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LateStatus {
    pub enabled: bool,

    /// Late records counted in the policy window up to the date
    pub late_count: u32,

    /// Trailing run of late records, only under strictly consecutive counting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_count: Option<u32>,

    pub threshold: u32,
    pub counting_mode: CountingMode,

    /// Whether one more late arrival would reach the threshold
    pub next_will_trigger: bool,
}

impl LateStatus {
    fn disabled(policy: &PolicyConfig) -> Self {
        Self {
            enabled: false,
            late_count: 0,
            consecutive_count: None,
            threshold: policy.threshold(),
            counting_mode: policy.counting_mode(),
            next_will_trigger: false,
        }
    }
}

/// Strike count for live recompute while a record is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LateCount {
    pub count: u32,
}

/// History that can affect the count as of `date`, oldest first
pub(crate) async fn history_as_of(
    store: &dyn AttendanceStore,
    scope: &CountScope,
    employee: &EmployeeId,
    date: NaiveDate,
) -> EngineResult<Vec<lf_core::AttendanceRecord>> {
    let range = HistoryRange::until(date).starting(scope.history_start(date));
    Ok(store.load_history(employee, range).await?)
}

/// Late status of `employee` as of `date`. Never writes.
///
/// A disabled policy yields a neutral response instead of an error.
pub async fn get_late_status(
    store: &dyn AttendanceStore,
    policy: &PolicyConfig,
    employee: &EmployeeId,
    date: NaiveDate,
) -> EngineResult<LateStatus> {
    if !policy.enabled() {
        return Ok(LateStatus::disabled(policy));
    }

    let scope = CountScope::from(policy);
    let history = history_as_of(store, &scope, employee, date).await?;
    let mut tally = tally_history(&history, scope, None)?;
    tally.roll_to(date);

    let consecutive_count = match policy.counting_mode() {
        CountingMode::StrictlyConsecutive => Some(tally.consecutive()),
        CountingMode::Cumulative => None,
    };
    Ok(LateStatus {
        enabled: true,
        late_count: tally.cumulative(),
        consecutive_count,
        threshold: policy.threshold(),
        counting_mode: policy.counting_mode(),
        next_will_trigger: predict_next_trigger(tally.current(), policy),
    })
}

/// Strike count of `employee` as of `date` under the policy's counting mode,
/// treating the record `excluding` as if it did not exist.
///
/// The caller adds the lateness of the record being edited itself.
pub async fn get_late_count(
    store: &dyn AttendanceStore,
    policy: &PolicyConfig,
    employee: &EmployeeId,
    date: NaiveDate,
    excluding: Option<&RecordId>,
) -> EngineResult<LateCount> {
    if !policy.enabled() {
        return Ok(LateCount { count: 0 });
    }

    let scope = CountScope::from(policy);
    let history = history_as_of(store, &scope, employee, date).await?;
    let count = count_strikes(&history, scope, excluding)?;
    Ok(LateCount { count })
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
