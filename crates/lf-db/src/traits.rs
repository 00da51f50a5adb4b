//! Attendance store trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use lf_core::{AttendanceRecord, DerivedUpdate, EmployeeId, PolicyConfig, RecordId};

/// Inclusive date range for history queries. `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl HistoryRange {
    /// Every record
    pub fn all() -> Self {
        Self::default()
    }

    /// Records up to and including `date`
    pub fn until(date: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(date),
        }
    }

    /// Records from `from` to `to`, both inclusive
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Narrow the lower bound
    pub fn starting(mut self, from: Option<NaiveDate>) -> Self {
        self.from = from;
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Persistence collaborator for the strike engine.
///
/// Implementations must be Send + Sync; the reprocessor shares one store
/// across its worker tasks.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Active policy, or a disabled policy when none has been saved
    async fn load_policy(&self) -> DbResult<PolicyConfig>;

    /// Replace the active policy
    async fn save_policy(&self, policy: &PolicyConfig) -> DbResult<()>;

    /// Distinct employees with at least one record, sorted
    async fn list_employees(&self) -> DbResult<Vec<EmployeeId>>;

    /// One employee's records within `range`, sorted ascending by date
    async fn load_history(
        &self,
        employee: &EmployeeId,
        range: HistoryRange,
    ) -> DbResult<Vec<AttendanceRecord>>;

    /// Look up a record by id
    async fn get_record(&self, id: &RecordId) -> DbResult<Option<AttendanceRecord>>;

    /// Insert or replace a record by id.
    ///
    /// Fails with `Conflict` when another record already holds the same
    /// employee and date.
    async fn upsert_record(&self, record: &AttendanceRecord) -> DbResult<()>;

    /// Insert new records atomically; any id or (employee, date) clash
    /// rejects the whole batch. Returns the number inserted.
    async fn insert_records(&self, records: &[AttendanceRecord]) -> DbResult<usize>;

    /// Write derived fields for one employee atomically: either every update
    /// lands or none do. Returns the number of records written.
    async fn apply_updates(
        &self,
        employee: &EmployeeId,
        updates: &[DerivedUpdate],
    ) -> DbResult<usize>;

    /// Store type identifier for logging
    fn store_type(&self) -> &'static str;
}
